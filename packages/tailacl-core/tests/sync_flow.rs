use std::fs;
use std::path::Path;

use httpmock::prelude::*;
use serde_json::{Value, json};
use tailacl_core::{ApiEndpointConfig, SyncError, SyncSettings, TailnetClient, sync};
use tempfile::tempdir;

const TAILNET: &str = "example.com";
// base64("tskey-test:")
const BASIC_AUTH: &str = "Basic dHNrZXktdGVzdDo=";
const ACL_PATH: &str = "/api/v2/tailnet/example.com/acl";
const RANGES_PATH: &str = "/api/v2/tailnet/example.com/ip-ranges";

fn client_for(server: &MockServer) -> TailnetClient {
    let settings = SyncSettings::resolve(Some(TAILNET.into()), Some("tskey-test".into()))
        .expect("settings");
    TailnetClient::new(&ApiEndpointConfig::with_base_url(&server.base_url()), settings)
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).expect("read file")).expect("valid json")
}

#[tokio::test]
async fn integration_export_writes_combined_document() {
    let server = MockServer::start();
    let acl = server.mock(|when, then| {
        when.method(GET)
            .path(ACL_PATH)
            .header("authorization", BASIC_AUTH)
            .header("accept", "application/json");
        then.status(200).json_body(json!({"rules": []}));
    });
    let ranges = server.mock(|when, then| {
        when.method(GET)
            .path(RANGES_PATH)
            .header("authorization", BASIC_AUTH);
        then.status(200).json_body(json!(["10.0.0.0/8"]));
    });

    let dir = tempdir().expect("tempdir");
    let out = dir.path().join("out.json");
    sync::export(&client_for(&server), &out)
        .await
        .expect("export succeeds");

    acl.assert_calls(1);
    ranges.assert_calls(1);
    assert_eq!(
        read_json(&out),
        json!({"acl": {"rules": []}, "ip_ranges": ["10.0.0.0/8"]})
    );
    let text = fs::read_to_string(&out).expect("read file");
    assert!(text.starts_with("{\n  \"acl\": {\n    \"rules\": []"));
}

#[tokio::test]
async fn integration_import_without_ip_ranges_only_posts_acl() {
    let server = MockServer::start();
    let acl = server.mock(|when, then| {
        when.method(POST)
            .path(ACL_PATH)
            .header("authorization", BASIC_AUTH)
            .header("content-type", "application/json")
            .json_body(json!({"rules": ["a"]}));
        then.status(200);
    });
    let ranges = server.mock(|when, then| {
        when.method(POST).path(RANGES_PATH);
        then.status(200);
    });

    let dir = tempdir().expect("tempdir");
    let input = dir.path().join("in.json");
    fs::write(&input, r#"{"acl": {"rules": ["a"]}}"#).expect("write input");

    let summary = sync::import(&client_for(&server), &input)
        .await
        .expect("import succeeds");

    assert!(!summary.pushed_ranges);
    assert_eq!(acl.calls(), 1);
    assert_eq!(ranges.calls(), 0);
}

#[tokio::test]
async fn integration_import_without_acl_posts_empty_policy() {
    let server = MockServer::start();
    let acl = server.mock(|when, then| {
        when.method(POST).path(ACL_PATH).json_body(json!({}));
        then.status(200);
    });
    let ranges = server.mock(|when, then| {
        when.method(POST)
            .path(RANGES_PATH)
            .header("authorization", BASIC_AUTH)
            .json_body(json!(["192.168.0.0/16"]));
        then.status(200);
    });

    let dir = tempdir().expect("tempdir");
    let input = dir.path().join("in.json");
    fs::write(&input, r#"{"ip_ranges": ["192.168.0.0/16"]}"#).expect("write input");

    let summary = sync::import(&client_for(&server), &input)
        .await
        .expect("import succeeds");

    assert!(summary.pushed_ranges);
    assert_eq!(acl.calls(), 1);
    assert_eq!(ranges.calls(), 1);
}

#[tokio::test]
async fn integration_export_then_import_round_trips() {
    let policy = json!({
        "groups": {"group:eng": ["alice@example.com"]},
        "acls": [{"action": "accept", "src": ["group:eng"], "dst": ["*:*"]}],
        "tagOwners": {}
    });
    let ip_ranges = json!(["100.64.0.0/10", "fd7a:115c:a1e0::/48"]);

    let server = MockServer::start();
    let get_acl = server.mock(|when, then| {
        when.method(GET).path(ACL_PATH);
        then.status(200).json_body(policy.clone());
    });
    let get_ranges = server.mock(|when, then| {
        when.method(GET).path(RANGES_PATH);
        then.status(200).json_body(ip_ranges.clone());
    });
    let post_acl = server.mock(|when, then| {
        when.method(POST).path(ACL_PATH).json_body(policy.clone());
        then.status(200);
    });
    let post_ranges = server.mock(|when, then| {
        when.method(POST).path(RANGES_PATH).json_body(ip_ranges.clone());
        then.status(200);
    });

    let client = client_for(&server);
    let dir = tempdir().expect("tempdir");
    let file = dir.path().join("acl.json");

    let exported = sync::export(&client, &file).await.expect("export");
    assert_eq!(exported.acl.0, policy);

    let summary = sync::import(&client, &file).await.expect("import");
    assert!(summary.pushed_ranges);

    get_acl.assert_calls(1);
    get_ranges.assert_calls(1);
    post_acl.assert_calls(1);
    post_ranges.assert_calls(1);
}

#[tokio::test]
async fn integration_export_fails_on_rejected_fetch_without_writing() {
    let server = MockServer::start();
    let acl = server.mock(|when, then| {
        when.method(GET).path(ACL_PATH);
        then.status(403).body("{\"message\":\"invalid API key\"}");
    });
    let ranges = server.mock(|when, then| {
        when.method(GET).path(RANGES_PATH);
        then.status(200).json_body(json!([]));
    });

    let dir = tempdir().expect("tempdir");
    let out = dir.path().join("out.json");
    let err = sync::export(&client_for(&server), &out)
        .await
        .expect_err("export fails");

    assert_eq!(err.status().map(|s| s.as_u16()), Some(403));
    let msg = err.to_string();
    assert!(msg.contains("403"));
    assert!(msg.contains("invalid API key"));
    assert!(!msg.contains("tskey-test"));
    assert_eq!(acl.calls(), 1);
    assert_eq!(ranges.calls(), 0);
    assert!(!out.exists());
}

#[tokio::test]
async fn integration_export_fails_when_ranges_fetch_is_rejected() {
    let server = MockServer::start();
    let acl = server.mock(|when, then| {
        when.method(GET).path(ACL_PATH);
        then.status(200).json_body(json!({"acls": []}));
    });
    let ranges = server.mock(|when, then| {
        when.method(GET).path(RANGES_PATH);
        then.status(502).body("bad gateway");
    });

    let dir = tempdir().expect("tempdir");
    let out = dir.path().join("out.json");
    let err = sync::export(&client_for(&server), &out)
        .await
        .expect_err("export fails");

    assert!(matches!(err, SyncError::Remote { method: "GET", .. }));
    assert_eq!(err.status().map(|s| s.as_u16()), Some(502));
    assert!(err.to_string().contains("ip-ranges"));
    assert_eq!(acl.calls(), 1);
    assert_eq!(ranges.calls(), 1);
    assert!(!out.exists());
}

#[tokio::test]
async fn integration_import_stops_after_failed_ranges_push() {
    let server = MockServer::start();
    let acl = server.mock(|when, then| {
        when.method(POST).path(ACL_PATH);
        then.status(200);
    });
    let ranges = server.mock(|when, then| {
        when.method(POST).path(RANGES_PATH);
        then.status(500).body("internal error");
    });

    let dir = tempdir().expect("tempdir");
    let input = dir.path().join("in.json");
    fs::write(&input, r#"{"acl": {}, "ip_ranges": []}"#).expect("write input");

    let err = sync::import(&client_for(&server), &input)
        .await
        .expect_err("import fails");

    assert!(matches!(err, SyncError::Remote { method: "POST", .. }));
    assert!(err.to_string().contains("500"));
    assert_eq!(acl.calls(), 1);
    assert_eq!(ranges.calls(), 1);
}

#[tokio::test]
async fn integration_import_rejects_bad_file_before_any_request() {
    let server = MockServer::start();
    let acl = server.mock(|when, then| {
        when.path(ACL_PATH);
        then.status(200);
    });
    let ranges = server.mock(|when, then| {
        when.path(RANGES_PATH);
        then.status(200);
    });

    let dir = tempdir().expect("tempdir");
    let client = client_for(&server);

    let missing = dir.path().join("missing.json");
    let err = sync::import(&client, &missing).await.expect_err("missing file");
    assert!(matches!(err, SyncError::Input { .. }));

    let not_object = dir.path().join("list.json");
    fs::write(&not_object, "[1, 2]").expect("write input");
    let err = sync::import(&client, &not_object).await.expect_err("not an object");
    assert!(matches!(err, SyncError::Input { .. }));

    let garbage = dir.path().join("garbage.json");
    fs::write(&garbage, "acl = {}").expect("write input");
    let err = sync::import(&client, &garbage).await.expect_err("invalid json");
    assert!(matches!(err, SyncError::Input { .. }));

    assert_eq!(acl.calls(), 0);
    assert_eq!(ranges.calls(), 0);
}
