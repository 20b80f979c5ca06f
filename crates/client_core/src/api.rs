use async_trait::async_trait;
use reqwest::Client;
use shared::{
    domain::{PlaylistRequest, ResultLink, Session, UserProfile},
    protocol::{
        AuthenticateReply, AuthenticateRequest, GenerateReply, GenerateRequest, GenresReply,
        STATUS_AUTH_ERROR, STATUS_FORBIDDEN, STATUS_RATE_LIMIT, STATUS_SUCCESS,
    },
};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Settings;

/// Classified result of one remote operation. Transport-level failure
/// (network, timeout, malformed body) is a first-class case, distinct from
/// a well-formed error reply. Callers own all retry policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Success(T),
    RateLimited {
        message: String,
        retry_after_secs: Option<u64>,
    },
    AuthFailed {
        message: String,
    },
    Forbidden {
        message: String,
    },
    Generic {
        message: String,
    },
    Transport {
        message: String,
    },
}

impl<T> Outcome<T> {
    /// Classifies a well-formed reply with a non-success `status`
    /// discriminator. Unknown statuses are generic failures, per contract.
    fn from_reply_failure(status: &str, message: Option<String>, retry_after: Option<u64>) -> Self {
        let message = message.unwrap_or_else(|| format!("request failed with status {status:?}"));
        debug!(status, %message, "remote operation returned a failure reply");
        match status {
            STATUS_RATE_LIMIT => Outcome::RateLimited {
                message,
                retry_after_secs: retry_after,
            },
            STATUS_AUTH_ERROR => Outcome::AuthFailed { message },
            STATUS_FORBIDDEN => Outcome::Forbidden { message },
            _ => Outcome::Generic { message },
        }
    }

    fn transport(operation: &str, err: impl std::fmt::Display) -> Self {
        // Logged distinctly from well-formed failure replies: these are the
        // cases worth diagnosing on the client side.
        warn!(operation, error = %err, "remote operation failed in transport");
        Outcome::Transport {
            message: err.to_string(),
        }
    }
}

/// Successful authentication payload. `normalized_token` is what must be
/// persisted; the backend may have cleaned up the submitted form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionResult {
    pub session: Session,
    pub normalized_token: String,
}

/// The remote playlist service as the state machine sees it: three
/// suspending operations, each resolving to a classified [`Outcome`].
#[async_trait]
pub trait PlaylistService: Send + Sync {
    async fn authenticate(&self, token: &str) -> Outcome<SessionResult>;
    async fn fetch_genres(&self) -> Outcome<Vec<String>>;
    async fn execute_generation(
        &self,
        token: &str,
        request: &PlaylistRequest,
    ) -> Outcome<Vec<ResultLink>>;
}

#[derive(Debug, Error)]
pub enum SetupError {
    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// HTTP implementation of [`PlaylistService`].
pub struct BackendClient {
    http: Client,
    server_url: String,
}

impl BackendClient {
    pub fn new(settings: &Settings) -> Result<Self, SetupError> {
        let http = Client::builder()
            .timeout(settings.request_timeout())
            .build()?;
        Ok(Self {
            http,
            server_url: settings.server_url.clone(),
        })
    }
}

#[async_trait]
impl PlaylistService for BackendClient {
    async fn authenticate(&self, token: &str) -> Outcome<SessionResult> {
        let reply: AuthenticateReply = match self
            .http
            .post(format!("{}/authenticate", self.server_url))
            .json(&AuthenticateRequest {
                token: token.to_string(),
            })
            .send()
            .await
            .and_then(|res| res.error_for_status())
        {
            Ok(res) => match res.json().await {
                Ok(reply) => reply,
                Err(err) => return Outcome::transport("authenticate", err),
            },
            Err(err) => return Outcome::transport("authenticate", err),
        };

        if reply.status != STATUS_SUCCESS {
            return Outcome::from_reply_failure(&reply.status, reply.message, reply.retry_after);
        }

        let normalized_token = reply.cleaned_token.unwrap_or_else(|| token.to_string());
        Outcome::Success(SessionResult {
            session: Session {
                token: normalized_token.clone(),
                profile: Some(UserProfile {
                    display_name: reply.display_name,
                }),
            },
            normalized_token,
        })
    }

    async fn fetch_genres(&self) -> Outcome<Vec<String>> {
        let reply: GenresReply = match self
            .http
            .get(format!("{}/genres", self.server_url))
            .send()
            .await
            .and_then(|res| res.error_for_status())
        {
            Ok(res) => match res.json().await {
                Ok(reply) => reply,
                Err(err) => return Outcome::transport("fetch_genres", err),
            },
            Err(err) => return Outcome::transport("fetch_genres", err),
        };
        Outcome::Success(reply.genres)
    }

    async fn execute_generation(
        &self,
        token: &str,
        request: &PlaylistRequest,
    ) -> Outcome<Vec<ResultLink>> {
        let reply: GenerateReply = match self
            .http
            .post(format!("{}/execute", self.server_url))
            .json(&GenerateRequest {
                token: token.to_string(),
                genres: request.genres.clone(),
                playlist_name: request.name.clone(),
                description: request.description.clone(),
                track_count: request.track_count,
            })
            .send()
            .await
            .and_then(|res| res.error_for_status())
        {
            Ok(res) => match res.json().await {
                Ok(reply) => reply,
                Err(err) => return Outcome::transport("execute_generation", err),
            },
            Err(err) => return Outcome::transport("execute_generation", err),
        };

        if reply.status != STATUS_SUCCESS {
            return Outcome::from_reply_failure(&reply.status, reply.message, reply.retry_after);
        }

        match reply.links {
            Some(links) => Outcome::Success(links),
            None => Outcome::transport("execute_generation", "success reply without links"),
        }
    }
}

#[cfg(test)]
#[path = "tests/api_tests.rs"]
mod tests;
