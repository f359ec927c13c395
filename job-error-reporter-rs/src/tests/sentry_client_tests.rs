//! Mock tests for the Sentry reporting client
//!
//! These tests use WireMock to stand in for a Sentry project's store endpoint.
//! The client is blocking, so it is built and driven on a blocking thread.

#[cfg(test)]
mod tests {
    use config_models::{FailureOrigin, FailureReason, StandardWorkspace};
    use serde_json::{json, Value};
    use uuid::Uuid;
    use wiremock::matchers::{header, header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::client::sentry::STACKTRACE_PARSE_ERROR_TAG_KEY;
    use crate::client::{JobErrorReportingClient, ReportMetadata, SentryJobErrorReportingClient};
    use crate::error::{ReporterError, Result};

    const PROJECT_ID: &str = "42";
    const DOCKER_IMAGE: &str = "airbyte/source-stripe:1.2.3";

    /// DSN pointing at the mock server
    fn dsn_for(mock_server: &MockServer) -> String {
        format!(
            "{}/{}",
            mock_server.uri().replacen("://", "://public_key@", 1),
            PROJECT_ID
        )
    }

    async fn report(
        dsn: String,
        workspace: StandardWorkspace,
        reason: FailureReason,
        metadata: ReportMetadata,
    ) -> Result<()> {
        tokio::task::spawn_blocking(move || {
            let client = SentryJobErrorReportingClient::new(&dsn)?;
            client.report_job_failure_reason(&workspace, &reason, DOCKER_IMAGE, &metadata)
        })
        .await
        .expect("reporting task panicked")
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_report_posts_event_to_store_endpoint() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/42/store/"))
            .and(header_exists("x-sentry-auth"))
            .and(header("content-type", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "abc" })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let workspace = StandardWorkspace::new(Uuid::new_v4()).with_name("Acme");
        let reason = FailureReason::new()
            .with_failure_origin(FailureOrigin::Source)
            .with_internal_message("Rate limit exceeded");
        let metadata = ReportMetadata::from([
            ("connector_name".to_string(), "Stripe".to_string()),
            ("deployment_mode".to_string(), "OSS".to_string()),
        ]);

        let result = report(dsn_for(&mock_server), workspace.clone(), reason, metadata).await;
        assert!(result.is_ok());

        let requests = mock_server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);

        let event: Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(event["release"], "airbyte-source-stripe@1.2.3");
        assert_eq!(event["fingerprint"], json!(["{{ default }}", "airbyte-source-stripe"]));
        assert_eq!(event["platform"], "other");
        assert_eq!(event["user"]["id"], workspace.workspace_id.to_string());
        assert_eq!(event["user"]["username"], "Acme");
        assert_eq!(event["message"]["formatted"], "Rate limit exceeded");
        assert_eq!(event["tags"]["connector_name"], "Stripe");
        assert_eq!(event["tags"]["deployment_mode"], "OSS");
        assert!(event.get("exception").is_none());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_report_includes_raw_stacktrace_when_unparseable() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/42/store/"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&mock_server)
            .await;

        let reason = FailureReason::new().with_stacktrace("something exploded");

        let result = report(
            dsn_for(&mock_server),
            StandardWorkspace::new(Uuid::new_v4()),
            reason,
            ReportMetadata::new(),
        )
        .await;
        assert!(result.is_ok());

        let requests = mock_server.received_requests().await.unwrap();
        let event: Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(event["exception"]["values"][0]["value"], "something exploded");
        assert!(event["tags"].get(STACKTRACE_PARSE_ERROR_TAG_KEY).is_some());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_rejected_event_is_an_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/42/store/"))
            .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let result = report(
            dsn_for(&mock_server),
            StandardWorkspace::new(Uuid::new_v4()),
            FailureReason::new(),
            ReportMetadata::new(),
        )
        .await;

        match result {
            Err(ReporterError::ReportingClient(message)) => {
                assert!(message.contains("500"));
                assert!(message.contains("internal error"));
            }
            other => panic!("expected a reporting client error, got {:?}", other),
        }
    }
}
