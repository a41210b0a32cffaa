//! End-to-end tests of the provider against a mock Dynatrace environment
//!
//! **Coverage:**
//! - Configure: connectivity check success and failure
//! - Resource: create, read (pass-through, drift, gone), update by
//!   replacement, reject policy, delete idempotency
//! - Data source: paged listing with type filter
//!
//! **Infrastructure:**
//! - WireMock HTTP server standing in for a Dynatrace environment
//! - `MapEnv` instead of the process environment

#![allow(dead_code)]

#[path = "support.rs"]
mod support;

use std::sync::Arc;

use dynext_domain::{ConfigValue, ProviderConfig};
use dynext_infra::config::loader::UPDATE_POLICY_VAR;
use dynext_infra::MapEnv;
use dynext_provider::data_sources::ExtensionsQuery;
use dynext_provider::resources::{
    CreateRequest, DeleteRequest, ExtensionModel, ReadRequest, UpdateRequest,
};
use dynext_provider::{ConfigureRequest, DynatraceExtensionProvider, Severity};
use support::{configured_data_source, configured_resource, configured_resource_with_env, EXTENSIONS, TOKEN};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{body_string, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn managed(id: &str, payload: &str) -> ExtensionModel {
    ExtensionModel {
        id: Some(id.into()),
        name: Some("Kafka".into()),
        payload: payload.into(),
        last_updated: Some("2025-01-15T10:00:00+00:00".into()),
    }
}

async fn mount_create(server: &MockServer, payload: &str, id: &str) {
    Mock::given(method("POST"))
        .and(path(EXTENSIONS))
        .and(body_string(payload))
        .respond_with(
            ResponseTemplate::new(201).set_body_string(format!(r#"{{"id":"{id}","name":"Kafka"}}"#)),
        )
        .expect(1)
        .mount(server)
        .await;
}

// ============================================================================
// Configure
// ============================================================================

#[tokio::test]
async fn configure_succeeds_against_empty_environment() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(EXTENSIONS))
        .and(query_param("pageSize", "10"))
        .and(header("Authorization", format!("Api-Token {TOKEN}").as_str()))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"extensions":[],"totalResults":0,"nextPageKey":""}"#),
        )
        .expect(1)
        .mount(&server)
        .await;

    let provider = DynatraceExtensionProvider::new("test").with_env(Arc::new(MapEnv::new()));
    let response = provider
        .configure(
            ConfigureRequest { config: support::declared_config(&server) },
            &CancellationToken::new(),
        )
        .await;

    assert!(response.diagnostics.is_empty());
    assert!(response.provider_data.is_some());
}

#[tokio::test]
async fn configure_reports_rejected_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(EXTENSIONS))
        .respond_with(ResponseTemplate::new(401).set_body_string("Token Authentication failed"))
        .expect(1)
        .mount(&server)
        .await;

    let provider = DynatraceExtensionProvider::new("test").with_env(Arc::new(MapEnv::new()));
    let response = provider
        .configure(
            ConfigureRequest {
                config: ProviderConfig::new(
                    ConfigValue::Value(server.uri()),
                    ConfigValue::Value("wrong".into()),
                ),
            },
            &CancellationToken::new(),
        )
        .await;

    assert!(response.provider_data.is_none());
    let diag = response.diagnostics.iter().next().expect("diagnostic");
    assert_eq!(diag.severity, Severity::Error);
    assert_eq!(diag.summary, "Unable to Create Dynatrace API Client");
    assert!(diag.detail.contains("401"));
    assert!(diag.detail.contains("Token Authentication failed"));
}

// ============================================================================
// Create / Read
// ============================================================================

#[tokio::test]
async fn create_then_read_passes_stored_value_through() {
    let server = MockServer::start().await;
    let resource = configured_resource(&server).await;
    let cancel = CancellationToken::new();
    mount_create(&server, "bundle-v1", "custom.jmx.kafka").await;
    Mock::given(method("GET"))
        .and(path(format!("{EXTENSIONS}/custom.jmx.kafka")))
        .respond_with(ResponseTemplate::new(200).set_body_string("bundle-v1"))
        .mount(&server)
        .await;

    let created = resource
        .create(CreateRequest { plan: ExtensionModel::planned("bundle-v1") }, &cancel)
        .await;
    assert!(created.diagnostics.is_empty(), "{:?}", created.diagnostics);
    let state = created.state.expect("state after create");
    assert_eq!(state.id.as_deref(), Some("custom.jmx.kafka"));
    assert_eq!(state.name.as_deref(), Some("Kafka"));
    assert!(state.last_updated.is_some());

    let read = resource.read(ReadRequest { state: state.clone() }, &cancel).await;

    assert!(read.diagnostics.is_empty());
    assert!(!read.drifted);
    assert_eq!(read.state, Some(state));
}

#[tokio::test]
async fn create_failure_leaves_no_state() {
    let server = MockServer::start().await;
    let resource = configured_resource(&server).await;
    Mock::given(method("POST"))
        .and(path(EXTENSIONS))
        .respond_with(ResponseTemplate::new(400).set_body_string("Invalid extension archive"))
        .mount(&server)
        .await;

    let response = resource
        .create(CreateRequest { plan: ExtensionModel::planned("not-a-zip") }, &CancellationToken::new())
        .await;

    assert!(response.state.is_none());
    let diag = response.diagnostics.iter().next().expect("diagnostic");
    assert_eq!(diag.summary, "Error creating extension");
    assert!(diag.detail.contains("Invalid extension archive"));
}

#[tokio::test]
async fn read_flags_remote_drift() {
    let server = MockServer::start().await;
    let resource = configured_resource(&server).await;
    Mock::given(method("GET"))
        .and(path(format!("{EXTENSIONS}/custom.jmx.kafka")))
        .respond_with(ResponseTemplate::new(200).set_body_string("edited-in-ui"))
        .mount(&server)
        .await;

    let read = resource
        .read(ReadRequest { state: managed("custom.jmx.kafka", "bundle-v1") }, &CancellationToken::new())
        .await;

    assert!(read.drifted);
    assert!(!read.diagnostics.has_error());
    assert_eq!(read.diagnostics.iter().next().map(|d| d.severity), Some(Severity::Warning));
    assert_eq!(read.state.unwrap().payload, "edited-in-ui");
}

#[tokio::test]
async fn read_of_deleted_extension_drops_state() {
    let server = MockServer::start().await;
    let resource = configured_resource(&server).await;
    Mock::given(method("GET"))
        .and(path(format!("{EXTENSIONS}/custom.jmx.kafka")))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let read = resource
        .read(ReadRequest { state: managed("custom.jmx.kafka", "bundle-v1") }, &CancellationToken::new())
        .await;

    assert!(read.state.is_none());
    assert!(read.diagnostics.is_empty());
}

// ============================================================================
// Update
// ============================================================================

#[tokio::test]
async fn update_replaces_extension() {
    let server = MockServer::start().await;
    let resource = configured_resource(&server).await;
    Mock::given(method("DELETE"))
        .and(path(format!("{EXTENSIONS}/custom.jmx.kafka")))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    mount_create(&server, "bundle-v2", "custom.jmx.kafka2").await;

    let response = resource
        .update(
            UpdateRequest {
                plan: ExtensionModel::planned("bundle-v2"),
                state: managed("custom.jmx.kafka", "bundle-v1"),
            },
            &CancellationToken::new(),
        )
        .await;

    assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);
    let state = response.state.expect("state after update");
    assert_eq!(state.id.as_deref(), Some("custom.jmx.kafka2"));
    assert_eq!(state.payload, "bundle-v2");
}

#[tokio::test]
async fn update_that_fails_to_recreate_drops_state() {
    let server = MockServer::start().await;
    let resource = configured_resource(&server).await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(EXTENSIONS))
        .respond_with(ResponseTemplate::new(400).set_body_string("bad archive"))
        .mount(&server)
        .await;

    let response = resource
        .update(
            UpdateRequest {
                plan: ExtensionModel::planned("bundle-v2"),
                state: managed("custom.jmx.kafka", "bundle-v1"),
            },
            &CancellationToken::new(),
        )
        .await;

    assert!(response.state.is_none());
    assert!(response.diagnostics.has_error());
}

#[tokio::test]
async fn reject_policy_keeps_state_and_makes_no_calls() {
    let server = MockServer::start().await;
    let env = MapEnv::new().with(UPDATE_POLICY_VAR, "reject");
    let resource = configured_resource_with_env(&server, env).await;
    Mock::given(method("DELETE")).respond_with(ResponseTemplate::new(204)).expect(0).mount(&server).await;
    Mock::given(method("POST")).respond_with(ResponseTemplate::new(201)).expect(0).mount(&server).await;

    let current = managed("custom.jmx.kafka", "bundle-v1");
    let response = resource
        .update(
            UpdateRequest { plan: ExtensionModel::planned("bundle-v2"), state: current.clone() },
            &CancellationToken::new(),
        )
        .await;

    assert_eq!(response.state, Some(current));
    let diag = response.diagnostics.iter().next().expect("diagnostic");
    assert!(diag.detail.contains("Unsupported"), "{}", diag.detail);
}

// ============================================================================
// Delete
// ============================================================================

#[tokio::test]
async fn delete_of_missing_extension_succeeds() {
    let server = MockServer::start().await;
    let resource = configured_resource(&server).await;
    Mock::given(method("DELETE"))
        .and(path(format!("{EXTENSIONS}/custom.gone")))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let response = resource
        .delete(DeleteRequest { state: managed("custom.gone", "bundle") }, &CancellationToken::new())
        .await;

    assert!(response.diagnostics.is_empty());
}

#[tokio::test]
async fn delete_surfaces_remote_failure() {
    let server = MockServer::start().await;
    let resource = configured_resource(&server).await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(403).set_body_string("Token is missing required scope"))
        .mount(&server)
        .await;

    let response = resource
        .delete(DeleteRequest { state: managed("custom.jmx.kafka", "bundle") }, &CancellationToken::new())
        .await;

    let diag = response.diagnostics.iter().next().expect("diagnostic");
    assert_eq!(diag.summary, "Error deleting extension");
    assert!(diag.detail.contains("403"));
}

// ============================================================================
// Data source
// ============================================================================

#[tokio::test]
async fn data_source_lists_and_filters_by_type() {
    let server = MockServer::start().await;
    let data_source = configured_data_source(&server).await;
    Mock::given(method("GET"))
        .and(path(EXTENSIONS))
        .and(query_param("pageSize", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"extensions":[
                {"id":"custom.jmx.kafka","name":"Kafka","type":"JMX"},
                {"id":"custom.python.ping","name":"Ping","type":"ACTIVEGATE"},
                {"id":"custom.jmx.tomcat","name":"Tomcat","type":"JMX"}
            ],"totalResults":3}"#,
        ))
        .mount(&server)
        .await;

    let response = data_source
        .read(ExtensionsQuery { extension_type: Some("jmx".into()) }, &CancellationToken::new())
        .await;

    assert!(response.diagnostics.is_empty());
    let state = response.state.expect("state");
    let ids: Vec<_> = state.extensions.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, ["custom.jmx.kafka", "custom.jmx.tomcat"]);
    assert_eq!(state.total_results, 2);
}
