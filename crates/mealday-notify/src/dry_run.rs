//! A notifier that only logs.

use mealday_shared::{Notifier, NotifyError, PostedStatus};
use tracing::info;

/// Logs the message instead of posting it.  Used by `--dry-run`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunNotifier;

impl Notifier for DryRunNotifier {
    fn post(&self, message: &str) -> Result<PostedStatus, NotifyError> {
        info!(%message, "dry run, not posting");
        Ok(PostedStatus {
            id: "dry-run".to_string(),
            text: message.to_string(),
        })
    }
}
