//! End-to-end tests for the HTTP surface, driven through the router with a
//! scripted storyteller.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use dnd_engine::{GameService, MemoryCharacterStore, MemorySessionStore, ScriptedStoryteller};
use dnd_server::{app, AppState};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn test_app() -> (Router, Arc<ScriptedStoryteller>) {
    let storyteller = Arc::new(ScriptedStoryteller::new());
    let game = GameService::new(
        Arc::new(MemoryCharacterStore::new()),
        Arc::new(MemorySessionStore::new()),
        storyteller.clone(),
    );
    (app(AppState::new(game)), storyteller)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn thorin() -> Value {
    json!({
        "name": "Thorin",
        "race": "Dwarf",
        "class": "Fighter",
        "stats": {
            "strength": 15,
            "dexterity": 14,
            "constitution": 13,
            "intelligence": 12,
            "wisdom": 10,
            "charisma": 8
        },
        "armor": { "type": "heavy", "name": "Chain Mail" },
        "inventory": [{ "name": "Longsword" }]
    })
}

async fn create(app: &Router) -> String {
    let (status, body) = send(app, "POST", "/api/characters", Some(thorin())).await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_at_root_and_api() {
    let (app, _) = test_app();
    for uri in ["/health", "/api/health"] {
        let (status, body) = send(&app, "GET", uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "ok" }));
    }
}

// =============================================================================
// Characters
// =============================================================================

#[tokio::test]
async fn test_create_returns_sheet() {
    let (app, _) = test_app();
    let (status, body) = send(&app, "POST", "/characters", Some(thorin())).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["name"], "Thorin");
    assert_eq!(body["level"], 1);
    assert_eq!(body["hitPoints"], json!({ "current": 11, "maximum": 11 }));
    assert_eq!(body["armorClass"], 16);
    assert_eq!(body["proficiencyBonus"], 2);
    assert_eq!(body["abilityModifiers"]["strength"], 2);
    assert_eq!(body["inventory"][0]["quantity"], 1);
    assert!(body["createdAt"].is_string());
}

#[tokio::test]
async fn test_character_crud() {
    let (app, _) = test_app();
    let id = create(&app).await;
    let uri = format!("/api/characters/{id}");

    let (status, body) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], id.as_str());

    let (status, body) = send(
        &app,
        "PUT",
        &uri,
        Some(json!({ "name": "Thorin Oakenshield", "level": 5 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Thorin Oakenshield");
    assert_eq!(body["proficiencyBonus"], 3);
    assert_eq!(body["race"], "Dwarf");

    let (status, body) = send(&app, "GET", "/api/characters", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, body) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Character deleted successfully");

    let (status, body) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Character not found");

    let (status, _) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_stat_total_over_limit_is_rejected() {
    let (app, _) = test_app();
    let mut character = thorin();
    character["stats"] = json!({
        "strength": 20,
        "dexterity": 20,
        "constitution": 20,
        "intelligence": 20,
        "wisdom": 3,
        "charisma": 3
    });

    let (status, body) = send(&app, "POST", "/api/characters", Some(character)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("exceed"));

    let (_, list) = send(&app, "GET", "/api/characters", None).await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn test_update_over_limit_keeps_original() {
    let (app, _) = test_app();
    let id = create(&app).await;
    let uri = format!("/api/characters/{id}");

    let (status, _) = send(
        &app,
        "PUT",
        &uri,
        Some(json!({ "stats": {
            "strength": 20, "dexterity": 20, "constitution": 20,
            "intelligence": 20, "wisdom": 20, "charisma": 20
        }})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = send(&app, "GET", &uri, None).await;
    assert_eq!(body["stats"]["strength"], 15);
}

#[tokio::test]
async fn test_bad_input_is_400() {
    let (app, _) = test_app();

    let (status, body) = send(&app, "GET", "/api/characters/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid character ID");

    let mut character = thorin();
    character["race"] = json!("Goblin");
    let (status, _) = send(&app, "POST", "/api/characters", Some(character)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let request = Request::builder()
        .method("POST")
        .uri("/api/characters")
        .header("content-type", "application/json")
        .body(Body::from("{ not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// =============================================================================
// Game sessions
// =============================================================================

#[tokio::test]
async fn test_game_flow() {
    let (app, storyteller) = test_app();
    let id = create(&app).await;
    storyteller.push_reply("You stand at the gates of Erebor.");
    storyteller.push_reply("The gate groans as you push.");

    let (status, session) = send(&app, "POST", &format!("/api/game/start/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(session["characterId"], id.as_str());
    assert_eq!(session["currentScene"], "You stand at the gates of Erebor.");
    assert_eq!(session["history"].as_array().unwrap().len(), 1);

    let (status, session) = send(
        &app,
        "POST",
        &format!("/api/game/action/{id}"),
        Some(json!({ "action": "I push the very heavy gate" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let history = session["history"].as_array().unwrap();
    assert_eq!(history.len(), 4);
    assert_eq!(history[1]["type"], "player_action");
    assert_eq!(history[2]["type"], "ability_check");
    assert_eq!(history[2]["content"], "strength check (DC 15) modifier 2");
    assert_eq!(history[3]["type"], "scene");
    assert_eq!(session["lastAction"], "I push the very heavy gate");

    let (status, state) = send(&app, "GET", &format!("/api/game/state/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(state, session);

    let (status, body) = send(&app, "POST", &format!("/api/game/end/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Game ended successfully");

    let (status, _) = send(&app, "POST", &format!("/api/game/end/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, "GET", &format!("/api/game/state/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "No active game found");
}

#[tokio::test]
async fn test_action_requires_text_and_session() {
    let (app, _) = test_app();
    let id = create(&app).await;
    let uri = format!("/game/action/{id}");

    let (status, body) = send(&app, "POST", &uri, Some(json!({ "action": "I wave" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No active game found");

    send(&app, "POST", &format!("/game/start/{id}"), None).await;

    let (status, body) = send(&app, "POST", &uri, Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Action is required");

    let (status, body) = send(&app, "POST", &uri, Some(json!({ "action": "  " }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Action is required");
}

#[tokio::test]
async fn test_start_unknown_character_is_404() {
    let (app, storyteller) = test_app();
    let missing = dnd_engine::CharacterId::new();

    let (status, body) = send(&app, "POST", &format!("/api/game/start/{missing}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Character not found");
    assert!(storyteller.requests().is_empty());
}

#[tokio::test]
async fn test_upstream_failure_is_generic_500_and_not_committed() {
    let (app, storyteller) = test_app();
    let id = create(&app).await;
    let (_, started) = send(&app, "POST", &format!("/api/game/start/{id}"), None).await;

    storyteller.fail_next("529 overloaded");
    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/game/action/{id}"),
        Some(json!({ "action": "I climb the wall" })),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Failed to generate AI response" }));

    let (_, state) = send(&app, "GET", &format!("/api/game/state/{id}"), None).await;
    assert_eq!(state, started);
}
