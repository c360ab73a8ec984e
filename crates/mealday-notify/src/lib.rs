//! Outbound notifiers for mealday: the X (Twitter) v2 client with
//! OAuth 1.0a user-context signing, and a logging dry-run stand-in.

pub mod credentials;
pub mod dry_run;
pub mod oauth;
pub mod x;

pub use credentials::Credentials;
pub use dry_run::DryRunNotifier;
pub use x::XNotifier;
