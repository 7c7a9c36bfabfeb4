//! Supabase store against a mocked project.

use std::time::Duration;

use bytes::Bytes;
use playground_core::{
    error::PlaygroundError,
    model::MediaKind,
    store::{Caller, IdentityProvider, MediaCategory, MediaStore, NewMediaRecord},
};
use playground_supabase::{SupabaseStore, client::SupabaseClient};
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, body_partial_json, header, method, path, query_param},
};

fn store(server: &MockServer) -> SupabaseStore {
    SupabaseClient::with_http(server.uri(), "anon-key", reqwest::Client::new()).into()
}

fn caller() -> Caller {
    Caller {
        user_id: "user-1".into(),
        access_token: "session-jwt".into(),
        runway_api_key: Some("key_runway".into()),
    }
}

#[tokio::test]
async fn authenticate_reads_the_saved_api_key() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .and(header("apikey", "anon-key"))
        .and(header("Authorization", "Bearer session-jwt"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "user-1",
            "email": "a@example.com",
            "user_metadata": {"runway_api_key": "key_runway"}
        })))
        .mount(&server)
        .await;

    let caller = store(&server).authenticate("session-jwt").await.unwrap().unwrap();
    assert_eq!(caller.user_id, "user-1");
    assert_eq!(caller.runway_api_key.as_deref(), Some("key_runway"));
}

#[tokio::test]
async fn rejected_sessions_are_not_errors() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"msg": "invalid JWT"})))
        .mount(&server)
        .await;

    assert!(store(&server).authenticate("expired").await.unwrap().is_none());
}

#[tokio::test]
async fn users_without_metadata_have_no_key() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "user-2"})))
        .mount(&server)
        .await;

    let caller = store(&server).authenticate("jwt").await.unwrap().unwrap();
    assert_eq!(caller.runway_api_key, None);
}

#[tokio::test]
async fn prompts_and_input_media_are_filtered_by_id() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/prompts"))
        .and(query_param("id", "eq.prompt-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": "prompt-1",
            "prompt_text": "a red balloon",
            "model": "gen4_image",
            "generation_type": "image",
            "ratio": "1920:1080"
        }])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/prompts"))
        .and(query_param("id", "eq.missing"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/media"))
        .and(query_param("prompt_id", "eq.prompt-1"))
        .and(query_param("category", "eq.input"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": "m-1",
            "prompt_id": "prompt-1",
            "path": "user-1/in.png",
            "type": "image",
            "category": "input",
            "tag": "balloon",
            "position": null,
            "user_id": "user-1"
        }])))
        .mount(&server)
        .await;

    let store = store(&server);
    let caller = caller();

    let prompt = store.fetch_prompt(&caller, "prompt-1").await.unwrap().unwrap();
    assert_eq!(prompt.prompt_text, "a red balloon");
    assert_eq!(prompt.ratio.as_deref(), Some("1920:1080"));

    assert!(store.fetch_prompt(&caller, "missing").await.unwrap().is_none());

    let media = store
        .fetch_media(&caller, "prompt-1", MediaCategory::Input)
        .await
        .unwrap();
    assert_eq!(media.len(), 1);
    assert_eq!(media[0].tag.as_deref(), Some("balloon"));
}

#[tokio::test]
async fn insert_returns_the_stored_row() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/media"))
        .and(header("Prefer", "return=representation"))
        .and(body_partial_json(json!({
            "prompt_id": "prompt-1",
            "path": "user-1/prompt-1.png",
            "type": "image",
            "category": "output"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([{
            "id": "m-9",
            "prompt_id": "prompt-1",
            "path": "user-1/prompt-1.png",
            "type": "image",
            "category": "output",
            "tag": null,
            "position": null,
            "user_id": "user-1"
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let row = store(&server)
        .insert_media(
            &caller(),
            NewMediaRecord {
                prompt_id: "prompt-1".into(),
                path: "user-1/prompt-1.png".into(),
                kind: MediaKind::Image,
                category: MediaCategory::Output,
                tag: None,
                position: None,
                user_id: "user-1".into(),
            },
        )
        .await
        .unwrap();
    assert_eq!(row.id, "m-9");
}

#[tokio::test]
async fn object_upload_remove_and_sign() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/storage/v1/object/media/user-1/prompt-1.mp4"))
        .and(header("Content-Type", "video/mp4"))
        .and(header("x-upsert", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"Key": "media/user-1/prompt-1.mp4"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/storage/v1/object/media"))
        .and(body_json(json!({"prefixes": ["user-1/prompt-1.mp4"]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/storage/v1/object/sign/media/user-1/in.png"))
        .and(body_json(json!({"expiresIn": 3600})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "signedURL": "/object/sign/media/user-1/in.png?token=abc"
        })))
        .mount(&server)
        .await;

    let store = store(&server);
    let caller = caller();

    store
        .upload_object(&caller, "user-1/prompt-1.mp4", Bytes::from_static(b"mp4"), "video/mp4")
        .await
        .unwrap();
    store.remove_object(&caller, "user-1/prompt-1.mp4").await.unwrap();

    let url = store
        .sign_url(&caller, "user-1/in.png", Duration::from_secs(3600))
        .await
        .unwrap();
    assert_eq!(
        url,
        format!("{}/storage/v1/object/sign/media/user-1/in.png?token=abc", server.uri())
    );
}

#[tokio::test]
async fn failed_writes_are_storage_failures() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/media"))
        .respond_with(ResponseTemplate::new(403).set_body_string("permission denied"))
        .mount(&server)
        .await;

    let err = store(&server).delete_media(&caller(), "m-1").await.unwrap_err();
    assert!(matches!(err, PlaygroundError::Storage(_)));
    assert!(err.to_string().contains("permission denied"));
}
