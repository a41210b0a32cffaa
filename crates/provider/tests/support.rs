use std::sync::Arc;

use dynext_domain::{ConfigValue, ProviderConfig};
use dynext_infra::MapEnv;
use dynext_provider::{
    ConfigureRequest, DynatraceExtensionProvider, ExtensionResource, ExtensionsDataSource,
    ProviderData,
};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TOKEN: &str = "abc123";
pub const EXTENSIONS: &str = "/api/config/v1/extensions";

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

pub fn declared_config(server: &MockServer) -> ProviderConfig {
    ProviderConfig::new(ConfigValue::Value(server.uri()), ConfigValue::Value(TOKEN.into()))
}

/// Configure a provider against the mock server and return its data.
pub async fn configured_provider_data(server: &MockServer, env: MapEnv) -> ProviderData {
    mount_validation(server).await;
    let provider = DynatraceExtensionProvider::new("test").with_env(Arc::new(env));
    let response = provider
        .configure(ConfigureRequest { config: declared_config(server) }, &CancellationToken::new())
        .await;
    assert!(
        !response.diagnostics.has_error(),
        "configure failed: {:?}",
        response.diagnostics
    );
    response.provider_data.expect("provider data")
}

pub async fn configured_resource(server: &MockServer) -> ExtensionResource {
    configured_resource_with_env(server, MapEnv::new()).await
}

pub async fn configured_resource_with_env(server: &MockServer, env: MapEnv) -> ExtensionResource {
    let data = configured_provider_data(server, env).await;
    let mut resource = ExtensionResource::new();
    let diags = resource.configure(Some(data));
    assert!(diags.is_empty());
    resource
}

pub async fn configured_data_source(server: &MockServer) -> ExtensionsDataSource {
    let data = configured_provider_data(server, MapEnv::new()).await;
    let mut data_source = ExtensionsDataSource::new();
    assert!(data_source.configure(Some(data)).is_empty());
    data_source
}
