//! External collaborators: the task source, the credential source, and the
//! notification sink.

pub mod credentials;
pub mod notify;
pub mod source;

pub use credentials::{CredentialSource, EnvCredentialSource};
pub use notify::{Notifier, NullNotifier, WebhookNotifier};
pub use source::{FetchOutcome, HttpTaskSource, TaskSource};
