use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, app_with, fixture, Registry};
use serde_json::Value;
use tower::ServiceExt;

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

#[tokio::test]
async fn get_seeded_pokemon() {
    let resp = app().oneshot(get("/pokemon/charizard")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let doc = body_json(resp).await;
    assert_eq!(doc["name"], "charizard");
    assert_eq!(doc["weight"], 905);
}

#[tokio::test]
async fn unknown_pokemon_returns_404() {
    let resp = app().oneshot(get("/pokemon/missingno")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn lookups_are_case_sensitive() {
    let resp = app().oneshot(get("/pokemon/Pikachu")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn post_is_not_allowed() {
    let resp = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/pokemon/pikachu")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn hits_count_both_found_and_missing() {
    let registry = Registry::new();
    registry.insert(fixture("ditto", 3, 40, 101));

    let resp = app_with(registry.clone())
        .oneshot(get("/pokemon/ditto"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app_with(registry.clone())
        .oneshot(get("/pokemon/mew"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    assert_eq!(registry.hits(), 2);
}

#[tokio::test]
async fn replaced_document_is_served() {
    let registry = Registry::seeded();
    registry.insert(fixture("pikachu", 4, 9999, 112));

    let resp = app_with(registry).oneshot(get("/pokemon/pikachu")).await.unwrap();
    let doc = body_json(resp).await;
    assert_eq!(doc["weight"], 9999);
}
