//! Client for the TalkBankDB query service.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};
use tokio::sync::OnceCell;

use crate::{
    auth::{CredentialPrompt, CredentialProvider},
    query::{Operation, QuerySpec, PATH_TREES_ROUTE},
    transport::{HttpTransport, Transport},
    types::{service_message, Credentials, PathTree, ResultTable},
    validation::{self, ValidationOutcome},
    Error,
};

/// Client for the TalkBankDB query service.
///
/// Each data call checks the query locally, then makes exactly one request
/// and reshapes the answer into a [`ResultTable`]. The corpus path tree is
/// fetched at most once per client (or supplied up front with
/// [`Client::with_path_tree`]) and reused to check `corpora` entries.
pub struct Client<T = HttpTransport> {
    transport: T,
    credentials: Option<Arc<dyn CredentialProvider>>,
    path_tree: OnceCell<PathTree>,
    deadline: Option<Duration>,
}

impl Client<HttpTransport> {
    /// Creates a new client pointing at the production TalkBankDB service.
    pub fn new() -> Result<Self, Error> {
        Ok(Self::with_transport(HttpTransport::new()?))
    }

    /// Creates a new client with a custom base URL. Used for testing with wiremock.
    pub fn with_base_url(base_url: &str) -> Result<Self, Error> {
        Ok(Self::with_transport(HttpTransport::with_base_url(base_url)?))
    }
}

impl<T: Transport> Client<T> {
    pub fn with_transport(transport: T) -> Self {
        Self {
            transport,
            credentials: None,
            path_tree: OnceCell::new(),
            deadline: None,
        }
    }

    /// Sets the source of logins used when a query has `auth` set.
    pub fn with_credentials<P>(mut self, provider: P) -> Self
    where
        P: CredentialProvider + 'static,
    {
        self.credentials = Some(Arc::new(provider));
        self
    }

    /// Uses `tree` for path checks instead of fetching it from the service.
    pub fn with_path_tree(self, tree: PathTree) -> Self {
        Self {
            path_tree: OnceCell::new_with(Some(tree)),
            ..self
        }
    }

    /// Abandons any single request that takes longer than `deadline`.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    async fn send(&self, route: &str, body: &Value) -> Result<Value, Error> {
        tracing::debug!("POST {}", route);
        match self.deadline {
            Some(deadline) => {
                match tokio::time::timeout(deadline, self.transport.post_json(route, body)).await {
                    Ok(result) => result,
                    Err(_) => {
                        tracing::error!("{} did not answer within {:?}", route, deadline);
                        Err(Error::RequestCancelled(format!(
                            "{} exceeded deadline of {:?}",
                            route, deadline
                        )))
                    }
                }
            }
            None => self.transport.post_json(route, body).await,
        }
    }

    /// Fetches the full hierarchy of valid corpus paths.
    pub async fn get_path_trees(&self) -> Result<PathTree, Error> {
        let resp = self.send(PATH_TREES_ROUTE, &json!({})).await?;
        PathTree::from_response(resp)
    }

    /// The session's path tree, fetched on first use.
    pub async fn path_tree(&self) -> Result<&PathTree, Error> {
        self.path_tree
            .get_or_try_init(|| self.get_path_trees())
            .await
    }

    /// Checks `segments` against the session's path tree.
    ///
    /// Makes no request if the tree is already held.
    pub async fn valid_path<S: AsRef<str>>(
        &self,
        segments: &[S],
    ) -> Result<ValidationOutcome, Error> {
        let tree = self.path_tree().await?;
        let outcome = validation::validate_path(segments, tree);
        if let ValidationOutcome::Invalid { depth } = outcome {
            tracing::warn!(
                "Invalid path at: {}",
                segments[depth].as_ref()
            );
        }
        Ok(outcome)
    }

    /// Asks the provider for logins on the blocking pool, since providers
    /// may wait on a terminal.
    async fn gather_credentials(&self) -> Result<Vec<Credentials>, Error> {
        let provider = Arc::clone(self.credentials.as_ref().ok_or(Error::MissingCredentials)?);
        let prompt = tokio::task::spawn_blocking(move || provider.credentials())
            .await
            .map_err(|e| {
                tracing::error!("Credential prompt failed: {}", e);
                Error::RequestCancelled(format!("credential prompt failed: {}", e))
            })?;
        match prompt {
            CredentialPrompt::Provided(credentials) => Ok(credentials),
            CredentialPrompt::Cancelled => {
                tracing::info!("Credential prompt cancelled; no request sent");
                Err(Error::RequestCancelled(
                    "credential prompt cancelled".to_string(),
                ))
            }
        }
    }

    /// Runs one data query.
    ///
    /// The corpus name and every `corpora` entry are checked before anything
    /// is sent; credentials are gathered only after those checks pass.
    pub async fn query(&self, operation: Operation, query: &QuerySpec) -> Result<ResultTable, Error> {
        validation::validate_corpus_name(query)?;
        if !query.corpora.is_empty() {
            let tree = self.path_tree().await?;
            validation::validate_corpora(query, tree)?;
        }

        let credentials = if query.auth {
            Some(self.gather_credentials().await?)
        } else {
            None
        };

        let body = query.to_payload(credentials.as_deref())?;
        let resp = self.send(operation.route(), &body).await?;
        if query.auth {
            if let Some(message) = service_message(&resp) {
                tracing::error!("{} refused the supplied logins: {}", operation, message);
                return Err(Error::Authentication(message.to_string()));
            }
        }
        let table = ResultTable::from_response(resp)?;
        tracing::debug!(
            "{} returned {} rows x {} columns",
            operation,
            table.len(),
            table.col_headings.len()
        );
        Ok(table)
    }

    /// Transcript metadata, one row per transcript.
    pub async fn get_transcripts(&self, query: &QuerySpec) -> Result<ResultTable, Error> {
        self.query(Operation::Transcripts, query).await
    }

    /// Participant details, one row per speaker per transcript.
    pub async fn get_participants(&self, query: &QuerySpec) -> Result<ResultTable, Error> {
        self.query(Operation::Participants, query).await
    }

    /// Tokens with utterance position, speaker, stem and part of speech.
    pub async fn get_tokens(&self, query: &QuerySpec) -> Result<ResultTable, Error> {
        self.query(Operation::Tokens, query).await
    }

    /// Token types with their counts.
    pub async fn get_token_types(&self, query: &QuerySpec) -> Result<ResultTable, Error> {
        self.query(Operation::TokenTypes, query).await
    }

    /// Utterance text, codes and media timings.
    pub async fn get_utterances(&self, query: &QuerySpec) -> Result<ResultTable, Error> {
        self.query(Operation::Utterances, query).await
    }

    /// N-gram frequencies; the query should carry `nGram`.
    pub async fn get_ngrams(&self, query: &QuerySpec) -> Result<ResultTable, Error> {
        self.query(Operation::Ngrams, query).await
    }

    /// Pattern search; the query should carry `cqlArr`.
    pub async fn get_cql(&self, query: &QuerySpec) -> Result<ResultTable, Error> {
        self.query(Operation::Cql, query).await
    }
}
