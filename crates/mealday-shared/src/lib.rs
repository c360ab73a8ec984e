//! # mealday-shared
//!
//! Types shared by every mealday crate: constants, the [`Status`] glyphs,
//! the flat [`Translator`] and the [`Notifier`] seam used by the schedule
//! engine to post messages.

pub mod constants;
pub mod error;
pub mod notifier;
pub mod translate;
pub mod types;

pub use error::{LoadError, NotifyError};
pub use notifier::{Notifier, PostedStatus};
pub use translate::{TranslationFile, Translator};
pub use types::Status;
