//! Resource resolver.
//!
//! Datasource update and delete address the resource by its server-assigned
//! numeric id, which is looked up here by name. A lookup that does not yield
//! an id is not an error: the caller returns the lookup's own response as the
//! operation's final outcome. That short-circuit is what lets `state=absent`
//! on a missing datasource report "unchanged" without a second round trip.
//!
//! Ids are only valid within the current invocation and are never cached.

use tracing::debug;

use crate::error::ProviderError;
use crate::session::{ApiResponse, Session};

/// The result of a name-to-id lookup.
#[derive(Debug, Clone)]
pub enum Lookup {
    /// The name resolved to a server-assigned id.
    Resolved(i64),
    /// The lookup did not yield an id; the raw response is passed through
    /// so the caller can report it as the operation's outcome.
    Unresolved(ApiResponse),
}

/// Resolve a datasource name to its server-assigned id.
///
/// Issues a GET to `api/datasources/id/{name}` and extracts the `id` field
/// from the JSON body. A body without an `id` (e.g. a 404 from the server)
/// yields [`Lookup::Unresolved`] carrying the response verbatim.
pub async fn datasource_id(session: &Session, name: &str) -> Result<Lookup, ProviderError> {
    let resp = session.get(&format!("api/datasources/id/{}", name)).await?;

    let id = resp
        .json()
        .and_then(|v| v.get("id").and_then(serde_json::Value::as_i64));

    match id {
        Some(id) => {
            debug!(name = %name, id = id, "Datasource resolved");
            Ok(Lookup::Resolved(id))
        }
        None => {
            debug!(name = %name, status = %resp.status, "Datasource did not resolve");
            Ok(Lookup::Unresolved(resp))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

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

    #[tokio::test]
    async fn test_resolves_id_from_lookup_body() {
        let server = MockServer::start().await;
        let session = session_for(&server).await;

        Mock::given(method("GET"))
            .and(path("/api/datasources/id/influxdb"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": 42})),
            )
            .mount(&server)
            .await;

        match datasource_id(&session, "influxdb").await.unwrap() {
            Lookup::Resolved(id) => assert_eq!(id, 42),
            Lookup::Unresolved(resp) => panic!("expected resolved id, got {:?}", resp),
        }
    }

    #[tokio::test]
    async fn test_missing_id_passes_response_through() {
        let server = MockServer::start().await;
        let session = session_for(&server).await;

        Mock::given(method("GET"))
            .and(path("/api/datasources/id/ghost"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_json(serde_json::json!({"message": "Data source not found"})),
            )
            .mount(&server)
            .await;

        match datasource_id(&session, "ghost").await.unwrap() {
            Lookup::Unresolved(resp) => {
                assert_eq!(resp.status.as_u16(), 404);
                assert!(resp.body.contains("Data source not found"));
            }
            Lookup::Resolved(id) => panic!("expected pass-through, got id {}", id),
        }
    }

    #[tokio::test]
    async fn test_non_json_body_passes_response_through() {
        let server = MockServer::start().await;
        let session = session_for(&server).await;

        Mock::given(method("GET"))
            .and(path("/api/datasources/id/weird"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy error</html>"))
            .mount(&server)
            .await;

        assert!(matches!(
            datasource_id(&session, "weird").await.unwrap(),
            Lookup::Unresolved(_)
        ));
    }
}
