//! Outbound post seam.
//!
//! The schedule engine only knows this trait.  Concrete implementations live
//! in `mealday-notify`.

use serde::{Deserialize, Serialize};

use crate::error::NotifyError;

/// Confirmation returned by a successful post.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PostedStatus {
    /// Identifier assigned by the remote service.
    pub id: String,
    /// Text as echoed back by the remote service.
    pub text: String,
}

impl std::fmt::Display for PostedStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "posted {}: {}", self.id, self.text)
    }
}

/// Performs one outbound post per call.
pub trait Notifier {
    fn post(&self, message: &str) -> Result<PostedStatus, NotifyError>;
}

impl<N: Notifier + ?Sized> Notifier for Box<N> {
    fn post(&self, message: &str) -> Result<PostedStatus, NotifyError> {
        (**self).post(message)
    }
}
