use std::sync::Arc;
use std::time::Duration;

use dynext_domain::Credentials;
use dynext_infra::{DynatraceClient, DynatraceClientConfig};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TOKEN: &str = "abc123";
pub const EXTENSIONS: &str = "/api/config/v1/extensions";

/// Install a test subscriber once; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().with_env_filter("debug").try_init();
}

/// Answer the connectivity check with an empty listing.
pub async fn mount_validation(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(EXTENSIONS))
        .and(query_param("pageSize", "10"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"extensions":[],"totalResults":0,"nextPageKey":""}"#),
        )
        .mount(server)
        .await;
}

pub fn fast_config() -> DynatraceClientConfig {
    DynatraceClientConfig {
        timeout: Duration::from_secs(2),
        base_backoff: Duration::from_millis(5),
        ..DynatraceClientConfig::default()
    }
}

/// Connect a client against the mock server, passing the connectivity check.
pub async fn connected_client(server: &MockServer) -> Arc<DynatraceClient> {
    connected_client_with(server, fast_config()).await
}

pub async fn connected_client_with(
    server: &MockServer,
    config: DynatraceClientConfig,
) -> Arc<DynatraceClient> {
    init_tracing();
    mount_validation(server).await;
    let client = DynatraceClient::connect(
        &Credentials::new(server.uri(), TOKEN),
        config,
        &CancellationToken::new(),
    )
    .await
    .expect("client should connect");
    Arc::new(client)
}
