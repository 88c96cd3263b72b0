#![allow(dead_code)]

use axum::body::{Body, Bytes};
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

use foodgram_api::app::build_app_router;
use foodgram_api::auth::jwt::{generate_access_token, JwtConfig};
use foodgram_api::auth::password::hash_password;
use foodgram_api::config::{ServerConfig, ShortLinkConfig};
use foodgram_api::state::AppState;
use foodgram_core::catalog_import::{NewIngredient, NewTag};
use foodgram_core::roles::ROLE_USER;
use foodgram_core::short_code::DEFAULT_MIN_LENGTH;
use foodgram_core::types::DbId;
use foodgram_db::models::user::CreateUser;
use foodgram_db::repositories::{IngredientRepo, TagRepo, UserRepo};

pub const PUBLIC_BASE_URL: &str = "https://foodgram.test";
pub const PASSWORD: &str = "correct-horse-42";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        database_url: String::new(),
        public_base_url: PUBLIC_BASE_URL.to_string(),
        short_link: ShortLinkConfig {
            salt: "integration-test-salt".to_string(),
            min_length: DEFAULT_MIN_LENGTH,
        },
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
            access_token_expiry_mins: 60,
        },
    }
}

/// Build the full application router, with the production middleware stack,
/// over the given database pool.
pub fn build_test_app(pool: PgPool) -> Router {
    build_app_router(AppState::new(pool, test_config())).expect("test config is valid")
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// A registered user and a valid access token for them.
pub struct TestUser {
    pub id: DbId,
    pub token: String,
}

/// Create a user with [`PASSWORD`] directly in the database and sign a token.
pub async fn create_user(pool: &PgPool, username: &str) -> TestUser {
    create_user_with_role(pool, username, ROLE_USER).await
}

pub async fn create_user_with_role(pool: &PgPool, username: &str, role: &str) -> TestUser {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            email: format!("{username}@example.com"),
            username: username.to_string(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            password_hash: hash_password(PASSWORD).expect("hashing should succeed"),
            role: role.to_string(),
        },
    )
    .await
    .expect("user creation should succeed");

    let token = generate_access_token(user.id, &user.role, &test_config().jwt)
        .expect("token generation should succeed");
    TestUser { id: user.id, token }
}

pub async fn create_tag(pool: &PgPool, slug: &str) -> DbId {
    TagRepo::upsert(
        pool,
        &NewTag {
            name: slug.to_uppercase(),
            slug: slug.to_string(),
            color: Some("#49B64E".to_string()),
        },
    )
    .await
    .expect("tag upsert should succeed")
    .id
}

pub async fn create_ingredient(pool: &PgPool, name: &str, unit: &str) -> DbId {
    IngredientRepo::insert_many(
        pool,
        &[NewIngredient {
            name: name.to_string(),
            measurement_unit: unit.to_string(),
        }],
    )
    .await
    .expect("ingredient insert should succeed");
    IngredientRepo::list(pool, Some(name))
        .await
        .expect("ingredient search should succeed")
        .into_iter()
        .find(|i| i.name == name && i.measurement_unit == unit)
        .expect("ingredient was just inserted")
        .id
}

/// A valid recipe payload using the given tag and `(ingredient, amount)` pairs.
pub fn recipe_body(name: &str, tags: &[DbId], ingredients: &[(DbId, i32)]) -> Value {
    let ingredients: Vec<Value> = ingredients
        .iter()
        .map(|(id, amount)| serde_json::json!({ "id": id, "amount": amount }))
        .collect();
    serde_json::json!({
        "ingredients": ingredients,
        "tags": tags,
        "image": "data:image/png;base64,iVBORw0KGgo=",
        "name": name,
        "text": "Mix everything and cook.",
        "cooking_time": 15,
    })
}

/// Create a recipe through the API and return its id.
pub async fn create_recipe(app: Router, token: &str, body: Value) -> DbId {
    let response = post_json_auth(app, "/api/recipes", body, token).await;
    assert_eq!(response.status(), 201, "recipe creation should succeed");
    body_json(response).await["id"]
        .as_i64()
        .expect("created recipe has an id")
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
    token: Option<&str>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Token {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request should build");

    app.oneshot(request).await.expect("router is infallible")
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, Some(token)).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(body), None).await
}

pub async fn post_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response<Body> {
    send(app, Method::POST, uri, Some(body), Some(token)).await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(token)).await
}

pub async fn patch_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response<Body> {
    send(app, Method::PATCH, uri, Some(body), Some(token)).await
}

pub async fn put_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response<Body> {
    send(app, Method::PUT, uri, Some(body), Some(token)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, None, Some(token)).await
}

pub async fn body_bytes(response: Response<Body>) -> Bytes {
    response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes()
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).expect("body should be JSON")
}
