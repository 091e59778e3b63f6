//! # Remote API Operations
//!
//! One function per remote action.  Every function is a thin request builder over
//! [`ApiClient`]: no retries, no timeouts, no caching.  Failures are returned to the
//! caller, which decides how to surface them.
//!
//! ## Endpoints
//!
//! ```text
//! GET    /<kind>            list
//! POST   /<kind>            create
//! PUT    /<kind>/<id>       update
//! DELETE /<kind>/<id>       delete
//! GET    /customers/...     lookups (see LookupQuery)
//! GET    /user/login/<username>/<password>
//! POST   /user/register
//! POST   /user/reset-password
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use loandesk_derive::Form;

use crate::http_utils::{ApiClient, HttpError};
use crate::{EntityKind, LookupQuery, Record, RecordId};

/// Reply of the authentication endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthReply {
    /// Present when the operation succeeded.
    #[serde(default)]
    pub success_message: Option<String>,
    /// Present when the server refused the operation.
    #[serde(default)]
    pub failure_message: Option<String>,
}

impl AuthReply {
    /// True when the server reported success.
    pub fn succeeded(&self) -> bool {
        self.success_message.is_some()
    }
}

/// Body of a registration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Form)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    /// Full name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Login name.
    pub user_name: String,
    /// Chosen password.
    pub password: String,
    /// Answer to the first security question.
    pub security_answer1: String,
    /// Answer to the second security question.
    pub security_answer2: String,
}

/// Body of a password reset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Form)]
#[serde(rename_all = "camelCase")]
pub struct PasswordReset {
    /// Login name.
    pub user_name: String,
    /// Full name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Answer to the first security question.
    pub security_answer1: String,
    /// Answer to the second security question.
    pub security_answer2: String,
    /// Replacement password.
    pub new_password: String,
}

/// Typed operations of the loan-management API.
#[derive(Debug, Clone)]
pub struct LoanApi {
    client: ApiClient,
}

impl LoanApi {
    /// Creates the API for the server rooted at `base_url`.
    pub fn new(base_url: &str) -> Result<Self, HttpError> {
        Ok(Self {
            client: ApiClient::new(base_url)?,
        })
    }

    /// Fetches every record of `R`'s kind.
    ///
    /// A response without the list key, or with a list that does not decode, yields an
    /// empty sequence rather than an error.
    pub async fn list<R: Record>(&self) -> Result<Vec<R>, HttpError> {
        let kind = R::KIND;
        let body: Value = self.client.get(&[kind.path()]).await?;
        let key = kind.list_key();
        let Some(items) = body.get(&key) else {
            tracing::warn!(%kind, %key, "list response has no list key");
            return Ok(Vec::new());
        };
        match serde_json::from_value::<Vec<R>>(items.clone()) {
            Ok(records) => Ok(records),
            Err(e) => {
                tracing::warn!(%kind, error = %e, "list response is malformed");
                Ok(Vec::new())
            }
        }
    }

    /// Creates a record from `draft`.  The draft carries no identifier.
    pub async fn create<R: Record>(&self, draft: &R::Draft) -> Result<Value, HttpError> {
        let reply = self.client.post(&[R::KIND.path()], draft).await?;
        tracing::info!(kind = %R::KIND, "created record");
        Ok(reply)
    }

    /// Replaces record `id` with `draft`.
    pub async fn update<R: Record>(
        &self,
        id: RecordId,
        draft: &R::Draft,
    ) -> Result<Value, HttpError> {
        let id = id.to_string();
        let reply = self.client.put(&[R::KIND.path(), &id], draft).await?;
        tracing::info!(kind = %R::KIND, %id, "updated record");
        Ok(reply)
    }

    /// Deletes record `id` of `kind`.
    pub async fn delete(&self, kind: EntityKind, id: RecordId) -> Result<(), HttpError> {
        let id = id.to_string();
        self.client.delete(&[kind.path(), &id]).await?;
        tracing::info!(%kind, %id, "deleted record");
        Ok(())
    }

    /// Runs a parameterized lookup and returns the raw response.
    pub async fn lookup(&self, query: &LookupQuery) -> Result<Value, HttpError> {
        let segments = query.segments();
        let segments: Vec<&str> = segments.iter().map(String::as_str).collect();
        self.client.get(&segments).await
    }

    /// Checks a username and password.
    pub async fn login(&self, username: &str, password: &str) -> Result<AuthReply, HttpError> {
        let reply: AuthReply = self
            .client
            .get(&["user", "login", username, password])
            .await?;
        tracing::info!(%username, succeeded = reply.succeeded(), "login attempted");
        Ok(reply)
    }

    /// Registers a new user.
    pub async fn register(&self, registration: &Registration) -> Result<AuthReply, HttpError> {
        let reply = self
            .client
            .post(&["user", "register"], registration)
            .await?;
        decode_auth_reply(reply)
    }

    /// Resets a forgotten password.
    pub async fn reset_password(&self, reset: &PasswordReset) -> Result<AuthReply, HttpError> {
        let reply = self
            .client
            .post(&["user", "reset-password"], reset)
            .await?;
        decode_auth_reply(reply)
    }
}

fn decode_auth_reply(reply: Value) -> Result<AuthReply, HttpError> {
    serde_json::from_value(reply)
        .map_err(|e| HttpError::new(format!("Unexpected response body: {}", e)))
}
