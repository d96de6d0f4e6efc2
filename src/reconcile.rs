//! The reconciler.
//!
//! One invocation is a single state evaluation: the desired state picks one
//! operation on the resource handler, the operation produces one
//! [`ApiResponse`], and the status code is interpreted into an [`Outcome`].
//! There is no retry, no second chance, and no state carried between
//! invocations; the host re-invokes if it wants another attempt.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::config::ModuleParams;
use crate::error::ProviderError;
use crate::session::{ApiResponse, Session};

/// The desired state of a managed resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DesiredState {
    /// Create-if-absent. For datasources an existing resource of the same
    /// name conflicts; see [`ConflictPolicy`].
    #[default]
    Present,
    /// Idempotent create-or-update.
    Latest,
    /// Delete-if-present. An already-missing resource is not an error.
    Absent,
}

impl fmt::Display for DesiredState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Present => "present",
            Self::Latest => "latest",
            Self::Absent => "absent",
        };
        f.write_str(s)
    }
}

/// How a 409 Conflict on `state=present` is treated.
///
/// Some deployments want "already present" reported as an unchanged
/// success, others as a hard failure, so the behavior is selectable.
/// [`ConflictPolicy::Tolerate`] is the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConflictPolicy {
    /// 409 on present is an unchanged success (already present).
    #[default]
    Tolerate,
    /// 409 on present is a hard failure.
    Fail,
}

/// The result of one reconciliation, reported back to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome {
    /// Whether the server state was changed by this invocation.
    pub changed: bool,
    /// The server's response body, passed through verbatim.
    pub msg: String,
}

/// One create/update/delete operation per resource kind.
///
/// Each method performs at most one mutating HTTP call (update and delete
/// may issue a resolve GET first) and returns the raw response for the
/// reconciler to interpret. Handlers never branch on status codes.
#[async_trait::async_trait]
pub trait ResourceHandler: Send + Sync {
    /// Create the resource.
    async fn create(&self, session: &Session) -> Result<ApiResponse, ProviderError>;

    /// Bring the resource to its desired form, creating or updating as the
    /// server sees fit.
    async fn update(&self, session: &Session) -> Result<ApiResponse, ProviderError>;

    /// Delete the resource.
    async fn delete(&self, session: &Session) -> Result<ApiResponse, ProviderError>;
}

/// Map an operation's response onto an outcome.
///
/// - 2xx: changed.
/// - 404 on absent: already gone, unchanged.
/// - 409 on present: already there, unchanged under
///   [`ConflictPolicy::Tolerate`].
/// - anything else: a hard failure carrying status and body verbatim.
pub fn interpret(
    resp: ApiResponse,
    state: DesiredState,
    policy: ConflictPolicy,
) -> Result<Outcome, ProviderError> {
    if resp.status.is_success() {
        return Ok(Outcome {
            changed: true,
            msg: resp.body,
        });
    }

    let benign = (resp.status == reqwest::StatusCode::NOT_FOUND && state == DesiredState::Absent)
        || (resp.status == reqwest::StatusCode::CONFLICT
            && state == DesiredState::Present
            && policy == ConflictPolicy::Tolerate);

    if benign {
        return Ok(Outcome {
            changed: false,
            msg: resp.body,
        });
    }

    Err(ProviderError::Api {
        status: resp.status.as_u16(),
        body: resp.body,
    })
}

/// Apply a desired state through a resource handler and interpret the result.
pub async fn apply(
    session: &Session,
    handler: &dyn ResourceHandler,
    state: DesiredState,
    policy: ConflictPolicy,
) -> Result<Outcome, ProviderError> {
    let resp = match state {
        DesiredState::Present => handler.create(session).await?,
        DesiredState::Latest => handler.update(session).await?,
        DesiredState::Absent => handler.delete(session).await?,
    };
    interpret(resp, state, policy)
}

/// Reconcile one resource from the host's parameters.
///
/// Validates the parameters, establishes the session, runs the single
/// operation the desired state calls for, and interprets the response. The
/// session is dropped on every exit path when this function returns.
pub async fn run(params: &ModuleParams) -> Result<Outcome, ProviderError> {
    params.validate()?;

    let session = Session::establish(
        params.base_url(),
        &params.login_user,
        &params.login_password,
    )
    .await?;

    let handler = params.handler();
    match apply(&session, handler.as_ref(), params.state, ConflictPolicy::default()).await {
        Ok(outcome) => {
            info!(
                state = %params.state,
                changed = outcome.changed,
                "Reconciliation completed"
            );
            Ok(outcome)
        }
        Err(e) => {
            error!(state = %params.state, error = %e, "Reconciliation failed");
            Err(e)
        }
    }
}
