//! Dashboard operations.
//!
//! Grafana's dashboard API is upsert-by-slug, so create and update are the
//! same POST of the raw dashboard document. Delete addresses the dashboard
//! by the slug derived from its human-readable name.

use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

use crate::error::ProviderError;
use crate::reconcile::ResourceHandler;
use crate::session::{ApiResponse, Session};

/// A Grafana dashboard in its desired form.
///
/// For present/latest the dashboard is the JSON document at `json_path`;
/// for absent only the `name` is needed.
#[derive(Debug, Clone, Default)]
pub struct Dashboard {
    /// Path of the dashboard JSON document (present/latest).
    pub json_path: Option<PathBuf>,
    /// Human-readable dashboard name (absent).
    pub name: Option<String>,
}

/// Derive the URL slug for a dashboard name: spaces become hyphens,
/// everything is lowercased.
///
/// This must match Grafana's own slugification exactly; a divergence makes
/// delete hit the wrong path and come back as a not-found instead of
/// deleting the intended dashboard.
pub fn slug(name: &str) -> String {
    name.replace(' ', "-").to_lowercase()
}

#[async_trait]
impl ResourceHandler for Dashboard {
    async fn create(&self, session: &Session) -> Result<ApiResponse, ProviderError> {
        let path = self.json_path.as_ref().ok_or_else(|| {
            ProviderError::Configuration(
                "resource_json_path is required for dashboard present/latest".to_string(),
            )
        })?;

        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ProviderError::DashboardFile {
                path: path.clone(),
                source,
            })?;
        let doc: Value = serde_json::from_str(&raw)?;

        info!(path = %path.display(), "Uploading dashboard");
        session.post_json("api/dashboards/db", &doc).await
    }

    // The dashboard API is idempotent on upload; latest is the same call.
    async fn update(&self, session: &Session) -> Result<ApiResponse, ProviderError> {
        self.create(session).await
    }

    async fn delete(&self, session: &Session) -> Result<ApiResponse, ProviderError> {
        let name = self.name.as_ref().ok_or_else(|| {
            ProviderError::Configuration(
                "resource_name is required for dashboard absent".to_string(),
            )
        })?;

        let slug = slug(name);
        info!(name = %name, slug = %slug, "Deleting dashboard");
        session.delete(&format!("api/dashboards/db/{}", slug)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_slug_lowercases_and_hyphenates() {
        assert_eq!(slug("My Dashboard"), "my-dashboard");
        assert_eq!(slug("already-sluggy"), "already-sluggy");
        assert_eq!(slug("Node Exporter Full"), "node-exporter-full");
        assert_eq!(slug(""), "");
    }

    async fn session_for(server: &MockServer) -> Session {
        Mock::given(method("POST"))
            .and(path("/login"))
            .respond_with(ResponseTemplate::new(200))
            .mount(server)
            .await;
        Session::establish(server.uri(), "admin", "admin")
            .await
            .unwrap()
    }

    fn write_dashboard(doc: &Value) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", doc).unwrap();
        file
    }

    #[tokio::test]
    async fn test_create_posts_document_verbatim() {
        let server = MockServer::start().await;
        let session = session_for(&server).await;

        let doc = serde_json::json!({
            "dashboard": {"title": "My Dashboard", "panels": []},
            "overwrite": true
        });
        let file = write_dashboard(&doc);

        Mock::given(method("POST"))
            .and(path("/api/dashboards/db"))
            .and(body_json(doc.clone()))
            .respond_with(ResponseTemplate::new(200).set_body_string("{\"slug\":\"my-dashboard\"}"))
            .expect(1)
            .mount(&server)
            .await;

        let dashboard = Dashboard {
            json_path: Some(file.path().to_path_buf()),
            name: None,
        };
        let resp = dashboard.create(&session).await.unwrap();
        assert_eq!(resp.status.as_u16(), 200);
    }

    #[tokio::test]
    async fn test_update_is_the_same_upload_as_create() {
        let server = MockServer::start().await;
        let session = session_for(&server).await;

        let doc = serde_json::json!({"dashboard": {"title": "CPU"}});
        let file = write_dashboard(&doc);

        // Same endpoint, same body, twice: once via create, once via update.
        Mock::given(method("POST"))
            .and(path("/api/dashboards/db"))
            .and(body_json(doc.clone()))
            .respond_with(ResponseTemplate::new(200))
            .expect(2)
            .mount(&server)
            .await;

        let dashboard = Dashboard {
            json_path: Some(file.path().to_path_buf()),
            name: None,
        };
        dashboard.create(&session).await.unwrap();
        dashboard.update(&session).await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_targets_derived_slug() {
        let server = MockServer::start().await;
        let session = session_for(&server).await;

        Mock::given(method("DELETE"))
            .and(path("/api/dashboards/db/my-dashboard"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{\"title\":\"My Dashboard\"}"))
            .expect(1)
            .mount(&server)
            .await;

        let dashboard = Dashboard {
            json_path: None,
            name: Some("My Dashboard".to_string()),
        };
        let resp = dashboard.delete(&session).await.unwrap();
        assert_eq!(resp.status.as_u16(), 200);
    }

    #[tokio::test]
    async fn test_create_without_path_is_a_configuration_error() {
        let server = MockServer::start().await;
        let session = session_for(&server).await;

        let dashboard = Dashboard::default();
        let err = dashboard.create(&session).await.unwrap_err();
        assert!(matches!(err, ProviderError::Configuration(_)));
    }

    #[tokio::test]
    async fn test_create_with_missing_file_reports_path() {
        let server = MockServer::start().await;
        let session = session_for(&server).await;

        let dashboard = Dashboard {
            json_path: Some(PathBuf::from("/nonexistent/dashboard.json")),
            name: None,
        };
        let err = dashboard.create(&session).await.unwrap_err();
        match err {
            ProviderError::DashboardFile { path, .. } => {
                assert_eq!(path, PathBuf::from("/nonexistent/dashboard.json"));
            }
            other => panic!("expected DashboardFile error, got {}", other),
        }
    }
}
