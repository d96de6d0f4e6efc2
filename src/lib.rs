//! Grafana Provider
//!
//! This crate is a configuration-management plugin that reconciles a Grafana
//! server's datasources and dashboards against a declared desired state by
//! calling Grafana's REST API.
//!
//! # Overview
//!
//! The plugin is invoked by an orchestration host once per managed resource
//! with a flat set of parameters, performs at most one
//! create/update/delete call sequence, and reports a changed/unchanged
//! outcome (or a failure carrying the HTTP status) back to the host.
//!
//! The crate provides:
//!
//! - **[`ModuleParams`]**: The strongly-typed invocation parameters with the
//!   host's defaults and boundary validation
//! - **[`Session`]**: An authenticated HTTP context established once per
//!   invocation from the login endpoint's session cookie
//! - **[`ResourceHandler`] implementations**: Datasource and dashboard
//!   create/update/delete operations
//! - **[`reconcile::run`]**: The entry point mapping desired state onto one
//!   operation and its status code onto an [`Outcome`]
//! - **Error types**: One [`ProviderError`] enum for transport, boundary,
//!   and API failures
//! - **Logging**: Integration with `tracing` for structured logging
//!
//! # Quick Start
//!
//! ```ignore
//! use grafana_provider::{reconcile, ModuleParams};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let params: ModuleParams = serde_json::from_str(
//!         r#"{
//!             "server_url": "http://localhost:3000",
//!             "login_user": "admin",
//!             "login_password": "admin",
//!             "resource": "datasource",
//!             "resource_name": "influxdb",
//!             "resource_url": "localhost:8086",
//!             "resource_db": "metrics",
//!             "state": "latest"
//!         }"#,
//!     )?;
//!
//!     let outcome = reconcile::run(&params).await?;
//!     println!("changed: {}", outcome.changed);
//!     Ok(())
//! }
//! ```
//!
//! # Reconciliation
//!
//! One invocation is a single state evaluation, not a persistent state
//! machine:
//!
//! | resource   | state            | operation                              |
//! |------------|------------------|----------------------------------------|
//! | datasource | present          | create                                 |
//! | datasource | latest           | update (resolve id, else pass through) |
//! | datasource | absent           | delete (resolve id, else pass through) |
//! | dashboard  | present / latest | upload (server-side upsert by slug)    |
//! | dashboard  | absent           | delete by derived slug                 |
//!
//! A 2xx means changed; a 404 on `absent` and a 409 on `present` are
//! unchanged successes; everything else fails with status and body verbatim.
//!
//! # Host Protocol
//!
//! The binary reads the parameter JSON from a file named in argv[1] (or from
//! stdin) and writes exactly one outcome JSON object to stdout:
//!
//! ```text
//! {"changed": true, "msg": "Datasource added"}
//! {"failed": true, "msg": "Server returned 502: bad gateway", "status_code": 502}
//! ```
//!
//! All logs go to stderr; stdout is reserved for the outcome object.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod dashboard;
pub mod datasource;
pub mod error;
pub mod logging;
pub mod reconcile;
pub mod resolve;
pub mod session;

// Re-export main types at crate root
pub use config::{ModuleParams, ResourceKind};
pub use dashboard::Dashboard;
pub use datasource::Datasource;
pub use error::ProviderError;
pub use logging::{init_logging, init_logging_with_default, try_init_logging};
pub use reconcile::{ConflictPolicy, DesiredState, Outcome, ResourceHandler};
pub use resolve::Lookup;
pub use session::{ApiResponse, Session};

// Re-export async_trait for convenience
pub use async_trait::async_trait;

// Re-export commonly used external types
pub use serde_json;
pub use tracing;
