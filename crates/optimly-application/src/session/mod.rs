//! Session bookkeeping for the application layer.

mod registry;

pub use registry::SessionRegistry;
