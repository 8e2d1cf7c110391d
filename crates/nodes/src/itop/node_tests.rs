//! End-to-end tests of `ITopNode` against a mock iTop server.

use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use itop::credentials::{SECRET_PASSWORD, SECRET_URL, SECRET_USERNAME};

use super::{ITopNode, OptionEntry};
use crate::{ExecutableNode, ExecutionContext, NodeError};

async fn server_replying(body: Value) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/webservices/rest.php"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;
    server
}

fn node() -> ITopNode {
    ITopNode::with_http_client(reqwest::Client::builder().no_proxy().build().unwrap())
}

fn ctx_for(server: &MockServer) -> ExecutionContext {
    ExecutionContext::new("iTop")
        .with_secret(SECRET_URL, server.uri())
        .with_secret(SECRET_USERNAME, "admin")
        .with_secret(SECRET_PASSWORD, "pw")
}

async fn sent_json_data(server: &MockServer) -> Vec<Value> {
    server
        .received_requests()
        .await
        .expect("recording enabled")
        .iter()
        .map(|req| {
            let form: std::collections::HashMap<String, String> =
                url::form_urlencoded::parse(&req.body).into_owned().collect();
            serde_json::from_str(&form["json_data"]).unwrap()
        })
        .collect()
}

fn one_object(class: &str, key: u64, fields: Value) -> Value {
    let mut objects = serde_json::Map::new();
    objects.insert(
        format!("{class}::{key}"),
        json!({ "code": 0, "message": "", "class": class, "key": key.to_string(), "fields": fields }),
    );
    json!({ "version": "1.3", "code": 0, "message": "", "objects": objects })
}

#[tokio::test]
async fn ticket_create_returns_flat_record() {
    let server = server_replying(one_object("UserRequest", 145, json!({ "title": "Printer down" }))).await;

    let out = node()
        .execute(
            json!({ "resource": "ticket", "operation": "create", "fields": { "title": "Printer down" } }),
            &ctx_for(&server),
        )
        .await
        .unwrap();

    assert_eq!(out, vec![json!({ "id": 145, "title": "Printer down" })]);
    assert_eq!(
        sent_json_data(&server).await,
        vec![json!({
            "operation": "core/create",
            "class": "UserRequest",
            "comment": "rusty automation - core/create UserRequest",
            "fields": { "title": "Printer down" }
        })]
    );
}

#[tokio::test]
async fn ticket_delete_reports_success_without_fields() {
    let server = server_replying(json!({ "code": 0, "message": "", "objects": {} })).await;

    let out = node()
        .execute(
            json!({ "resource": "ticket", "operation": "delete", "ticket_id": "77" }),
            &ctx_for(&server),
        )
        .await
        .unwrap();

    assert_eq!(out, vec![json!({ "success": true, "id": 77 })]);
    let sent = sent_json_data(&server).await;
    assert!(sent[0].get("fields").is_none());
    assert_eq!(sent[0]["comment"], "rusty automation - core/delete UserRequest");
}

#[tokio::test]
async fn person_delete_sends_empty_fields_and_comment() {
    let server = server_replying(json!({ "code": 0, "objects": null })).await;

    node()
        .execute(
            json!({ "resource": "person", "operation": "delete", "person_id": 3 }),
            &ctx_for(&server),
        )
        .await
        .unwrap();

    let sent = sent_json_data(&server).await;
    assert_eq!(sent[0]["fields"], json!({}));
    assert_eq!(sent[0]["comment"], "rusty automation - core/delete Person");
    assert_eq!(sent[0]["key"], 3);
}

#[tokio::test]
async fn person_get_all_returns_every_successful_record() {
    let server = server_replying(json!({
        "code": 0,
        "objects": {
            "Person::1": { "code": 0, "key": "1", "fields": { "name": "Doe" } },
            "Person::2": { "code": 2, "message": "denied", "key": "2", "fields": { "name": "Roe" } },
            "Person::4": { "code": 0, "key": "4", "fields": { "name": "Poe" } }
        }
    }))
    .await;

    let out = node()
        .execute(
            json!({ "resource": "person", "operation": "getAll", "filters": { "org_id": "1" } }),
            &ctx_for(&server),
        )
        .await
        .unwrap();

    assert_eq!(
        out,
        vec![json!({ "id": 1, "name": "Doe" }), json!({ "id": 4, "name": "Poe" })]
    );
    let sent = sent_json_data(&server).await;
    assert_eq!(sent[0]["key"], "SELECT Person WHERE org_id = 1");
    assert_eq!(sent[0]["output_fields"], super::person::BASIC_PERSON_FIELDS);
}

#[tokio::test]
async fn failed_object_becomes_an_error() {
    let server = server_replying(json!({
        "code": 0,
        "objects": { "Organization::9": { "code": 1, "message": "Not allowed", "key": 9, "fields": {} } }
    }))
    .await;

    let err = node()
        .execute(
            json!({ "resource": "organization", "operation": "get", "organization_id": 9 }),
            &ctx_for(&server),
        )
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "iTop API error: Not allowed");
}

#[tokio::test]
async fn invalid_parameters_never_reach_the_server() {
    let server = server_replying(json!({ "code": 0 })).await;

    let err = node()
        .execute(
            json!({ "resource": "ticket", "operation": "update" }),
            &ctx_for(&server),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, NodeError::Validation(_)));
    assert!(sent_json_data(&server).await.is_empty());
}

#[tokio::test]
async fn missing_credentials_fail_execution() {
    let err = node()
        .execute(
            json!({ "resource": "ticket", "operation": "get", "ticket_id": 1 }),
            &ExecutionContext::new("iTop"),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, NodeError::Credentials(_)));
}

#[tokio::test]
async fn list_organizations_is_sorted_with_fallback_names() {
    let server = server_replying(json!({
        "code": 0,
        "objects": {
            "Organization::1": { "code": 0, "key": 1, "fields": { "name": "" } },
            "Organization::2": { "code": 0, "key": 2, "fields": { "name": "B" } }
        }
    }))
    .await;

    let entries = node().list_organizations(&ctx_for(&server)).await.unwrap();
    assert_eq!(
        entries,
        vec![
            OptionEntry { name: "B".into(), value: 2 },
            OptionEntry { name: "Organization 1".into(), value: 1 },
        ]
    );

    let sent = sent_json_data(&server).await;
    assert_eq!(sent[0]["key"], r#"SELECT Organization WHERE status = "active""#);
    assert_eq!(sent[0]["output_fields"], "id,name");
}

#[tokio::test]
async fn list_persons_uses_full_names() {
    let server = server_replying(json!({
        "code": 0,
        "objects": {
            "Person::5": { "code": 0, "key": 5, "fields": { "name": "Doe", "first_name": "John" } },
            "Person::6": { "code": 0, "key": 6, "fields": { "name": "Adams", "first_name": "" } }
        }
    }))
    .await;

    let entries = node().list_persons(&ctx_for(&server)).await.unwrap();
    let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, ["Adams", "John Doe"]);
}

#[tokio::test]
async fn lookups_without_credentials_are_empty() {
    let ctx = ExecutionContext::new("iTop");
    let node = node();

    assert!(node.list_organizations(&ctx).await.unwrap().is_empty());
    assert!(node.list_persons(&ctx).await.unwrap().is_empty());
    assert!(node.list_teams(&ctx).await.unwrap().is_empty());
    assert!(node.list_locations(&ctx).await.unwrap().is_empty());
}

#[tokio::test]
async fn team_and_location_failures_are_swallowed() {
    let server = server_replying(json!({ "code": 100, "message": "Unknown class Team" })).await;
    let ctx = ctx_for(&server);

    assert!(node().list_teams(&ctx).await.unwrap().is_empty());
    assert!(node().list_locations(&ctx).await.unwrap().is_empty());

    let err = node().list_organizations(&ctx).await.unwrap_err();
    assert_eq!(err.to_string(), "Unknown class Team");
}
