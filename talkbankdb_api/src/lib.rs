//! Client for TalkBankDB, the query service over the TalkBank corpora.
//!
//! Every data call takes a [`QuerySpec`], checks it locally (corpus name
//! present, each corpus path a real descent through the [`types::PathTree`]),
//! posts it to the service and returns a [`types::ResultTable`].

pub mod auth;
mod client;
mod errors;
mod query;
pub mod transport;
pub mod types;
pub mod validation;
pub use self::auth::{CredentialPrompt, CredentialProvider, StaticCredentials};
pub use self::client::Client;
pub use self::errors::Error;
pub use self::query::{Operation, QuerySpec};
pub use self::transport::{HttpTransport, Transport};
pub use self::validation::{validate_path, ValidationOutcome};
