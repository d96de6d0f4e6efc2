//! Invocation parameters.
//!
//! The orchestration host hands the plugin a flat set of named parameters.
//! They are deserialized into [`ModuleParams`], with the host's defaults
//! applied, and validated before the reconciler runs so that bad
//! combinations fail at the boundary instead of mid-call.

use std::path::PathBuf;

use serde::Deserialize;
use serde_json::Value;

use crate::dashboard::Dashboard;
use crate::datasource::{Datasource, DEFAULT_ACCESS};
use crate::error::ProviderError;
use crate::reconcile::{DesiredState, ResourceHandler};

/// The kind of Grafana resource being managed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    /// A named backend data source configuration.
    Datasource,
    /// A dashboard JSON document, upserted by its slug.
    Dashboard,
}

fn default_hostname() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_resource_type() -> String {
    "influxdb".to_string()
}

fn default_json_data() -> Value {
    Value::Object(serde_json::Map::new())
}

/// The flat parameter set for one invocation.
///
/// Field names match what the host sends; unknown fields are rejected so a
/// typo in a playbook fails loudly rather than silently applying a default.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModuleParams {
    /// Full base URL of the Grafana instance. Takes precedence over
    /// `server_hostname`/`server_port` when set.
    #[serde(default)]
    pub server_url: Option<String>,
    /// Hostname used when `server_url` is not given.
    #[serde(default = "default_hostname")]
    pub server_hostname: String,
    /// Port used when `server_url` is not given.
    #[serde(default = "default_port")]
    pub server_port: u16,
    /// Login user for the session.
    pub login_user: String,
    /// Login password for the session.
    pub login_password: String,
    /// Which resource kind to reconcile.
    pub resource: ResourceKind,
    /// Datasource backend address as `host:port`, without a scheme.
    #[serde(default)]
    pub resource_url: Option<String>,
    /// Database name on the datasource backend.
    #[serde(default, alias = "database")]
    pub resource_db: Option<String>,
    /// Path of the dashboard JSON document.
    #[serde(default)]
    pub resource_json_path: Option<PathBuf>,
    /// Free-form datasource settings, passed through as `jsonData`.
    #[serde(default = "default_json_data")]
    pub resource_json_data: Value,
    /// Name of the resource on the server.
    #[serde(default)]
    pub resource_name: Option<String>,
    /// Datasource backend type.
    #[serde(default = "default_resource_type")]
    pub resource_type: String,
    /// Whether the datasource becomes the default one.
    #[serde(rename = "resource_isDefault", default)]
    pub resource_is_default: bool,
    /// Desired state of the resource.
    #[serde(default)]
    pub state: DesiredState,
}

impl ModuleParams {
    /// The base URL of the Grafana instance for this invocation.
    ///
    /// `server_url` wins when present; otherwise the URL is derived from
    /// hostname and port.
    pub fn base_url(&self) -> String {
        match &self.server_url {
            Some(url) => url.clone(),
            None => format!("http://{}:{}", self.server_hostname, self.server_port),
        }
    }

    /// Validate that the parameter combination is usable for the requested
    /// resource and state.
    pub fn validate(&self) -> Result<(), ProviderError> {
        match self.resource {
            ResourceKind::Datasource => {
                if self.resource_name.is_none() {
                    return Err(ProviderError::Configuration(
                        "resource_name is required for resource=datasource".to_string(),
                    ));
                }
                if self.state != DesiredState::Absent && self.resource_url.is_none() {
                    return Err(ProviderError::Configuration(format!(
                        "resource_url is required for resource=datasource state={}",
                        self.state
                    )));
                }
            }
            ResourceKind::Dashboard => match self.state {
                DesiredState::Present | DesiredState::Latest => {
                    if self.resource_json_path.is_none() {
                        return Err(ProviderError::Configuration(format!(
                            "resource_json_path is required for resource=dashboard state={}",
                            self.state
                        )));
                    }
                }
                DesiredState::Absent => {
                    if self.resource_name.is_none() {
                        return Err(ProviderError::Configuration(
                            "resource_name is required for resource=dashboard state=absent"
                                .to_string(),
                        ));
                    }
                }
            },
        }
        Ok(())
    }

    /// Build the resource handler described by these parameters.
    ///
    /// Call [`ModuleParams::validate`] first; fields that validation
    /// guarantees for the requested state are filled with empty defaults
    /// otherwise.
    pub fn handler(&self) -> Box<dyn ResourceHandler> {
        match self.resource {
            ResourceKind::Datasource => Box::new(Datasource {
                name: self.resource_name.clone().unwrap_or_default(),
                kind: self.resource_type.clone(),
                url: self.resource_url.clone().unwrap_or_default(),
                database: self.resource_db.clone().unwrap_or_default(),
                is_default: self.resource_is_default,
                access: DEFAULT_ACCESS.to_string(),
                json_data: self.resource_json_data.clone(),
            }),
            ResourceKind::Dashboard => Box::new(Dashboard {
                json_path: self.resource_json_path.clone(),
                name: self.resource_name.clone(),
            }),
        }
    }
}
