#![allow(dead_code)]

use diesel::sqlite::SqliteConnection;
use rocket::http::{ContentType, Status};
use rocket::local::blocking::{Client, LocalResponse};
use rocket::serde::json::Value;
use sentence_lab::database::{establish_connection, run_migrations};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};

static DATABASE_COUNT: AtomicUsize = AtomicUsize::new(0);

pub fn prepare_new_database() -> String {
    let database_path = std::env::temp_dir().join(format!(
        "sentence_lab_test_{}_{}.db",
        std::process::id(),
        DATABASE_COUNT.fetch_add(1, Ordering::Relaxed)
    ));
    for suffix in ["", "-wal", "-shm"] {
        let _ = std::fs::remove_file(format!("{}{}", database_path.display(), suffix));
    }

    let database_url = database_path.display().to_string();
    let mut database_connection = create_database_connection(&database_url);
    run_migrations(&mut database_connection).expect("migrations should run");

    database_url
}

pub fn create_client() -> (Client, String) {
    let database_url = prepare_new_database();
    let rocket = sentence_lab::rocket(&database_url);

    (
        Client::tracked(rocket).expect("client should launch"),
        database_url,
    )
}

pub fn create_database_connection(database_url: &str) -> SqliteConnection {
    establish_connection(database_url).expect("database connection should be established")
}

pub fn send_post_request_with_json<'a>(
    client: &'a Client,
    url: &'a str,
    json: Value,
) -> LocalResponse<'a> {
    client
        .post(url)
        .header(ContentType::JSON)
        .body(json.to_string())
        .dispatch()
}

pub fn send_get_request<'a>(client: &'a Client, url: &'a str) -> LocalResponse<'a> {
    client.get(url).dispatch()
}

pub fn response_to_json(response: LocalResponse) -> Value {
    response.into_json::<Value>().expect("body must be json")
}

pub fn assert_fail(json: &Value, message: &str) {
    let response_status = json
        .get("status")
        .expect("should include 'status' field")
        .as_str();

    assert_eq!(response_status, Some("fail"));

    let response_message = json
        .get("message")
        .expect("should include 'message' field")
        .as_str();

    assert_eq!(response_message, Some(message));
}

fn collect_fail_reasons(json: &Value) -> Vec<String> {
    json.get("reasons")
        .expect("should include 'reasons' field")
        .as_array()
        .expect("'reasons' should be an array")
        .iter()
        .map(|reason| {
            reason
                .as_str()
                .expect("all elements in 'reasons' should be strings")
                .to_string()
        })
        .collect::<Vec<String>>()
}

pub fn assert_fail_reasons_validation_fields(json: &Value, fields: Vec<String>) {
    let fields_len = fields.len();
    let response_reasons = collect_fail_reasons(json);
    let response_reasons_len = response_reasons.len();

    assert_eq!(
        response_reasons_len, fields_len,
        "response should have exactly {} reasons; received amount of response reasons: {}",
        fields_len, response_reasons_len
    );

    'fields: for field in &fields {
        for response_reason in &response_reasons {
            if response_reason.starts_with(&(format!(r#"field "{}"#, field))) {
                continue 'fields;
            }
        }

        panic!(
            "response reasons should contain '{}' error; received response reasons: {:?}",
            field, response_reasons
        );
    }
}

pub fn assert_success(json: &Value) {
    let response_status = json
        .get("status")
        .expect("should include 'status' field")
        .as_str();

    assert_eq!(response_status, Some("success"));
    assert!(json.get("data").is_some());
}

/// Posts `json` to `url`, expects success and returns the response's `data`.
pub fn post_success(client: &Client, url: &str, json: Value) -> Value {
    let response = send_post_request_with_json(client, url, json);
    assert_eq!(response.status(), Status::Ok);
    let json = response_to_json(response);
    assert_success(&json);

    json["data"].clone()
}

pub fn get_success(client: &Client, url: &str) -> Value {
    let response = send_get_request(client, url);
    assert_eq!(response.status(), Status::Ok);
    let json = response_to_json(response);
    assert_success(&json);

    json["data"].clone()
}

pub fn id_of(data: &Value) -> i64 {
    data["id"].as_i64().expect("should include numeric 'id'")
}

pub fn add_tag(client: &Client, name: &str, vocab_topic: &str, vocab_subtopic: Option<&str>) -> i64 {
    let data = post_success(
        client,
        "/api/tags-with-mapping",
        json!({
            "name": name,
            "type": "topic",
            "vocab_topic": vocab_topic,
            "vocab_subtopic": vocab_subtopic,
        }),
    );

    data["tag_id"].as_i64().expect("should include 'tag_id'")
}

pub fn add_template(client: &Client, pattern: &str, tag_id: i64) -> i64 {
    let template_id = id_of(&post_success(
        client,
        "/api/sentence-templates",
        json!({ "template_pattern": pattern, "is_active": true }),
    ));
    post_success(
        client,
        "/api/taggings",
        json!({ "tag_id": tag_id, "target_id": template_id }),
    );

    template_id
}

pub fn add_slot(client: &Client, template_id: i64, slot_name: &str, part_of_speech: &str, order_index: i64) -> i64 {
    id_of(&post_success(
        client,
        "/api/template-slots",
        json!({
            "template_id": template_id,
            "slot_name": slot_name,
            "part_of_speech": part_of_speech,
            "is_required": true,
            "order_index": order_index,
        }),
    ))
}

pub fn add_vocabulary(client: &Client, vocabulary: Value) -> i64 {
    id_of(&post_success(client, "/api/vocabulary", vocabulary))
}
