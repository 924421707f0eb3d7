use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use tft_data_api::{
    config::{Config, DatabaseConfig},
    database::Database,
    image_assets::AssetResolver,
    web::{router, AppState},
};

struct TestApp {
    router: Router,
    // Keeps the asset tree alive for the duration of the test
    _assets: TempDir,
}

async fn test_app() -> TestApp {
    let assets = TempDir::new().unwrap();
    for (dir, file, bytes) in [
        ("champions", "ahri.png", b"ahri-icon".as_slice()),
        ("championsplashes", "ahri.jpg", b"ahri-splash".as_slice()),
        ("traits", "huntress.png", b"huntress".as_slice()),
        ("augments", "bastion.png", b"bastion".as_slice()),
        ("items", "tft_item_bfsword.png", b"bf-sword".as_slice()),
        ("items", "giant's belt.png", b"giants-belt".as_slice()),
    ] {
        let path = assets.path().join(dir);
        std::fs::create_dir_all(&path).unwrap();
        std::fs::write(path.join(file), bytes).unwrap();
    }

    let mut config = Config::default();
    config.database = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: Some(1),
    };
    config.storage.asset_root = assets.path().to_path_buf();

    let database = Database::new(&config.database).await.unwrap();
    database.migrate().await.unwrap();
    let resolver = AssetResolver::new(config.storage.asset_root.clone());

    TestApp {
        router: router(AppState::new(config, database, resolver)),
        _assets: assets,
    }
}

// Helper function to send requests to the app
async fn send_raw(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
    headers: &[(header::HeaderName, &str)],
) -> (StatusCode, HeaderMap, Vec<u8>) {
    let mut request_builder = Request::builder().method(method).uri(uri);
    for (name, value) in headers {
        request_builder = request_builder.header(name, *value);
    }

    let request = if let Some(body) = body {
        request_builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap()
    } else {
        request_builder.body(Body::empty()).unwrap()
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();

    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    (status, headers, body_bytes.to_vec())
}

async fn send_request(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let (status, _, body_bytes) = send_raw(app, method, uri, body, &[]).await;

    let json: Value = if body_bytes.is_empty() {
        json!({})
    } else {
        serde_json::from_slice(&body_bytes).unwrap_or(json!({}))
    };

    (status, json)
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = test_app().await;

    let (status, response) = send_request(&app.router, Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["status"], "healthy");
    assert_eq!(response["database"], "connected");
}

#[tokio::test]
async fn test_item_crud_lifecycle() {
    let app = test_app().await;

    let (status, created) = send_request(
        &app.router,
        Method::POST,
        "/api/v1/items",
        Some(json!({
            "api_name": "TFT_Item_BFSword",
            "name": "B.F. Sword",
            "icon": "ASSETS/Maps/TFT/Icons/Items/Hexcore/TFT_Item_BFSword.TFT_Set13.tex",
            "tags": ["component"],
            "effects": {"AD": 10, "Flags": {"Stackable": false}}
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["success"], true);
    assert_eq!(created["data"]["normalized_key"], "tft_item_bfsword");
    assert_eq!(created["data"]["image_url"], "/images/items/tft_item_bfsword");
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let (status, fetched) =
        send_request(&app.router, Method::GET, &format!("/api/v1/items/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["data"]["effects"]["AD"], 10.0);
    assert_eq!(fetched["data"]["effects"]["Flags"]["Stackable"], false);

    let (status, updated) = send_request(
        &app.router,
        Method::PATCH,
        &format!("/api/v1/items/{}", id),
        Some(json!({"name": "BF Sword"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["data"]["name"], "BF Sword");
    assert_eq!(updated["data"]["tags"], json!(["component"]));

    let (status, _) =
        send_request(&app.router, Method::DELETE, &format!("/api/v1/items/{}", id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, missing) =
        send_request(&app.router, Method::GET, &format!("/api/v1/items/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(missing["success"], false);

    let (status, _) =
        send_request(&app.router, Method::DELETE, &format!("/api/v1/items/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_duplicate_api_name_conflicts() {
    let app = test_app().await;
    let body = json!({"api_name": "TFT16_Tank", "name": "Tank"});

    let (status, _) =
        send_request(&app.router, Method::POST, "/api/v1/roles", Some(body.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, response) =
        send_request(&app.router, Method::POST, "/api/v1/roles", Some(body)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(response["success"], false);
}

#[tokio::test]
async fn test_create_rejects_blank_name() {
    let app = test_app().await;

    let (status, response) = send_request(
        &app.router,
        Method::POST,
        "/api/v1/items",
        Some(json!({"api_name": "TFT_Item_Spatula", "name": "  "})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["success"], false);
}

#[tokio::test]
async fn test_pagination_and_search() {
    let app = test_app().await;
    for (api_name, name) in [
        ("TFT16_Caster", "Caster"),
        ("TFT16_Fighter", "Fighter"),
        ("TFT16_Marksman", "Marksman"),
    ] {
        let (status, _) = send_request(
            &app.router,
            Method::POST,
            "/api/v1/roles",
            Some(json!({"api_name": api_name, "name": name})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, page) =
        send_request(&app.router, Method::GET, "/api/v1/roles?page=2&limit=2", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["data"]["total"], 3);
    assert_eq!(page["data"]["total_pages"], 2);
    assert_eq!(page["data"]["items"].as_array().unwrap().len(), 1);
    assert_eq!(page["data"]["items"][0]["name"], "Marksman");
    assert_eq!(page["data"]["has_next"], false);

    let (status, found) =
        send_request(&app.router, Method::GET, "/api/v1/roles?search=FIGHT", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found["data"]["total"], 1);

    let (status, _) =
        send_request(&app.router, Method::GET, "/api/v1/roles?limit=0", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_trait_lookup_by_key() {
    let app = test_app().await;

    let (status, created) = send_request(
        &app.router,
        Method::POST,
        "/api/v1/traits",
        Some(json!({
            "api_name": "TFT16_Huntress",
            "name": "Huntress",
            "set_number": 16,
            "effects": [{"min_units": 2, "max_units": 3, "style": 1, "variables": {"AS": 0.15}}]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["data"]["image_url"], "/images/traits/huntress");

    for key in ["TFT16_Huntress", "Huntress", "huntress"] {
        let (status, found) = send_request(
            &app.router,
            Method::GET,
            &format!("/api/v1/traits/key/{}", key),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK, "key {}", key);
        assert_eq!(found["data"]["api_name"], "TFT16_Huntress");
    }

    let (status, _) =
        send_request(&app.router, Method::GET, "/api/v1/traits/key/Bastion", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send_request(
        &app.router,
        Method::POST,
        "/api/v1/traits",
        Some(json!({
            "api_name": "TFT16_Broken",
            "name": "Broken",
            "effects": [{"min_units": 4, "max_units": 2, "style": 1}]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_advertised_image_urls_are_served() {
    let app = test_app().await;

    let mut urls = Vec::new();
    for (uri, body) in [
        (
            "/api/v1/traits",
            json!({"api_name": "TFT16_Huntress", "name": "Huntress", "set_number": 16}),
        ),
        (
            "/api/v1/items",
            json!({"api_name": "TFT_Item_BFSword", "name": "B.F. Sword"}),
        ),
        (
            "/api/v1/items",
            json!({"api_name": "Giant's Belt", "name": "Giant's Belt"}),
        ),
    ] {
        let (status, created) = send_request(&app.router, Method::POST, uri, Some(body)).await;
        assert_eq!(status, StatusCode::CREATED);
        urls.push(created["data"]["image_url"].as_str().unwrap().to_string());
    }
    assert_eq!(urls[2], "/images/items/giant%27s%20belt");

    for (url, expected) in urls.iter().zip([
        b"huntress".as_slice(),
        b"bf-sword".as_slice(),
        b"giants-belt".as_slice(),
    ]) {
        let (status, headers, body) = send_raw(&app.router, Method::GET, url, None, &[]).await;
        assert_eq!(status, StatusCode::OK, "url {}", url);
        assert_eq!(headers[header::CONTENT_TYPE], "image/png");
        assert_eq!(body, expected);
    }

    let (status, listed) =
        send_request(&app.router, Method::GET, "/api/v1/items?search=giant", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed["data"]["items"][0]["image_url"], urls[2]);
}

#[tokio::test]
async fn test_image_url_omitted_without_file() {
    let app = test_app().await;

    let (status, created) = send_request(
        &app.router,
        Method::POST,
        "/api/v1/traits",
        Some(json!({"api_name": "TFT16_Bastion", "name": "Bastion"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["data"]["normalized_key"], "bastion");
    assert!(created["data"]["image_url"].is_null());
}

#[tokio::test]
async fn test_malformed_params_use_error_envelope() {
    let app = test_app().await;

    for uri in [
        "/api/v1/items/not-a-uuid",
        "/api/v1/traits/not-a-uuid",
        "/api/v1/roles/not-a-uuid",
        "/api/v1/feedback/not-a-uuid",
        "/api/v1/screen-tracking/not-a-uuid",
        "/api/v1/feedback?category=praise",
        "/api/v1/traits?set_number=sixteen",
    ] {
        let (status, headers, body) = send_raw(&app.router, Method::GET, uri, None, &[]).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "uri {}", uri);
        assert_eq!(headers[header::CONTENT_TYPE], "application/json", "uri {}", uri);

        let response: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(response["success"], false);
        assert!(response["error"].is_string());
        assert!(response["timestamp"].is_string());
    }

    let (status, response) = send_request(
        &app.router,
        Method::PATCH,
        "/api/v1/items/not-a-uuid",
        Some(json!({"name": "BF Sword"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["success"], false);
}

#[tokio::test]
async fn test_feedback_flow() {
    let app = test_app().await;

    let (status, _) = send_request(
        &app.router,
        Method::POST,
        "/api/v1/feedback",
        Some(json!({"message": "   "})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send_request(
        &app.router,
        Method::POST,
        "/api/v1/feedback",
        Some(json!({"message": "x".repeat(2001)})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, general) = send_request(
        &app.router,
        Method::POST,
        "/api/v1/feedback",
        Some(json!({"message": "Love the app"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(general["data"]["category"], "general");

    let (status, _) = send_request(
        &app.router,
        Method::POST,
        "/api/v1/feedback",
        Some(json!({"message": "Crash on launch", "category": "bug", "platform": "ios"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, bugs) =
        send_request(&app.router, Method::GET, "/api/v1/feedback?category=bug", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(bugs["data"]["total"], 1);
    assert_eq!(bugs["data"]["items"][0]["platform"], "ios");

    let id = general["data"]["id"].as_str().unwrap();
    let (status, _) = send_request(
        &app.router,
        Method::DELETE,
        &format!("/api/v1/feedback/{}", id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_screen_tracking_stats() {
    let app = test_app().await;
    for (screen, duration) in [("comps", 2000), ("comps", 4000), ("items", 500)] {
        let (status, _) = send_request(
            &app.router,
            Method::POST,
            "/api/v1/screen-tracking",
            Some(json!({"screen_name": screen, "duration_ms": duration})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, _) = send_request(
        &app.router,
        Method::POST,
        "/api/v1/screen-tracking",
        Some(json!({"screen_name": "comps", "duration_ms": -1})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, stats) =
        send_request(&app.router, Method::GET, "/api/v1/screen-tracking/stats", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["data"][0]["screen_name"], "comps");
    assert_eq!(stats["data"][0]["views"], 2);
    assert_eq!(stats["data"][0]["average_duration_ms"], 3000.0);
    assert_eq!(stats["data"][1]["screen_name"], "items");

    let (status, views) = send_request(
        &app.router,
        Method::GET,
        "/api/v1/screen-tracking?screen_name=items",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(views["data"]["total"], 1);
}

#[tokio::test]
async fn test_image_serving() {
    let app = test_app().await;

    let (status, headers, body) = send_raw(
        &app.router,
        Method::GET,
        "/images/championsplashes/Ahri",
        None,
        &[],
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"ahri-splash");
    assert_eq!(headers[header::CONTENT_TYPE], "image/jpeg");
    assert_eq!(headers[header::CACHE_CONTROL], "public, max-age=86400");
    let etag = headers[header::ETAG].to_str().unwrap().to_string();

    let (status, _, body) = send_raw(
        &app.router,
        Method::GET,
        "/images/championsplashes/Ahri",
        None,
        &[(header::IF_NONE_MATCH, etag.as_str())],
    )
    .await;
    assert_eq!(status, StatusCode::NOT_MODIFIED);
    assert!(body.is_empty());

    let (status, headers, body) = send_raw(
        &app.router,
        Method::GET,
        "/images/traits/TFT16_Huntress?ext=PNG",
        None,
        &[],
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"huntress");
    assert_eq!(headers[header::CONTENT_TYPE], "image/png");

    let (status, _, body) = send_raw(
        &app.router,
        Method::GET,
        "/images/augments/ASSETS/Maps/TFT/Icons/Augments/Hexcore/Bastion.TFT_Set13.tex",
        None,
        &[],
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"bastion");
}

#[tokio::test]
async fn test_image_errors() {
    let app = test_app().await;

    let (status, response) =
        send_request(&app.router, Method::GET, "/images/emotes/Ahri", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(response["details"]["reason"], "invalid asset type");

    let (status, response) =
        send_request(&app.router, Method::GET, "/images/traits/TFT16_Bastion", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(response["details"]["reason"], "asset missing");
    assert_eq!(response["details"]["key"], "bastion");

    let (status, _) =
        send_request(&app.router, Method::GET, "/images/champions/ahri?ext=gif", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send_request(
        &app.router,
        Method::GET,
        "/images/champions/ahri?ext=jpg",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
