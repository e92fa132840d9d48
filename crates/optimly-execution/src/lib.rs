//! Mock async task runner.
//!
//! [`Backend`] is the seam between use cases and whatever produces results.
//! [`MockBackend`] fills it with delayed, templated output; [`OperationTracker`]
//! supplies the loading flags and cancel-on-abandon behaviour.

pub mod backend;
pub mod clock;
pub mod mock_backend;
pub mod random;
pub mod tracker;

pub use backend::{
    Backend, IntentRequest, Operation, QueryGenerationRequest, SimulationRequest, VariantRequest,
};
pub use clock::{Clock, InstantClock, TokioClock};
pub use mock_backend::MockBackend;
pub use random::SeededRandom;
pub use tracker::OperationTracker;
