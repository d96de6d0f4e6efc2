//! Datasource operations.
//!
//! A datasource is identified by name on the server. Create posts the full
//! body to the collection endpoint; update and delete first resolve the name
//! to a server-assigned id and address `api/datasources/{id}`. If the resolve
//! step does not yield an id, its response is returned as the operation's
//! outcome (see [`crate::resolve`]).

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::error::ProviderError;
use crate::reconcile::ResourceHandler;
use crate::resolve::{self, Lookup};
use crate::session::{ApiResponse, Session};

/// The access mode sent for every datasource body.
pub const DEFAULT_ACCESS: &str = "proxy";

/// A Grafana datasource in its desired form.
#[derive(Debug, Clone)]
pub struct Datasource {
    /// Unique name of the datasource on the server.
    pub name: String,
    /// Backend type, e.g. `influxdb`.
    pub kind: String,
    /// Backend address as `host:port`, without a scheme.
    pub url: String,
    /// Database name on the backend.
    pub database: String,
    /// Whether this is the default datasource.
    pub is_default: bool,
    /// Access mode (`proxy` or `direct`).
    pub access: String,
    /// Free-form backend-specific settings, passed through verbatim.
    pub json_data: Value,
}

/// Wire body for datasource create and update.
#[derive(Debug, Serialize)]
struct DatasourcePayload<'a> {
    name: &'a str,
    #[serde(rename = "type")]
    kind: &'a str,
    url: String,
    database: &'a str,
    #[serde(rename = "isDefault")]
    is_default: bool,
    access: &'a str,
    #[serde(rename = "jsonData")]
    json_data: &'a Value,
}

impl Datasource {
    fn payload(&self) -> DatasourcePayload<'_> {
        DatasourcePayload {
            name: &self.name,
            kind: &self.kind,
            // Fixed convention: callers supply host:port without a scheme
            // and the prefix is applied unconditionally. A caller-supplied
            // scheme gets double-prefixed.
            url: format!("http://{}", self.url),
            database: &self.database,
            is_default: self.is_default,
            access: &self.access,
            json_data: &self.json_data,
        }
    }
}

#[async_trait]
impl ResourceHandler for Datasource {
    async fn create(&self, session: &Session) -> Result<ApiResponse, ProviderError> {
        info!(name = %self.name, kind = %self.kind, "Creating datasource");
        session.post_json("api/datasources", &self.payload()).await
    }

    async fn update(&self, session: &Session) -> Result<ApiResponse, ProviderError> {
        match resolve::datasource_id(session, &self.name).await? {
            Lookup::Unresolved(resp) => Ok(resp),
            Lookup::Resolved(id) => {
                info!(name = %self.name, id = id, "Updating datasource");
                session
                    .put_json(&format!("api/datasources/{}", id), &self.payload())
                    .await
            }
        }
    }

    async fn delete(&self, session: &Session) -> Result<ApiResponse, ProviderError> {
        match resolve::datasource_id(session, &self.name).await? {
            Lookup::Unresolved(resp) => Ok(resp),
            Lookup::Resolved(id) => {
                info!(name = %self.name, id = id, "Deleting datasource");
                session.delete(&format!("api/datasources/{}", id)).await
            }
        }
    }
}
