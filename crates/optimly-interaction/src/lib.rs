//! External interfaces: the CMS webhook and local exports.

pub mod cms_webhook;
pub mod export;

pub use cms_webhook::{CmsExportPayload, CmsWebhookClient, WinningVariantEntry};
pub use export::{WinnerDownload, clipboard_text};
