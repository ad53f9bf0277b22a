use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

use cats_api::config::{AdminSeed, Config, PasswordConfig};
use cats_api::store::MemoryStore;

/// A running test server backed by a fresh in-process store.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
}

/// A registered and logged-in user.
pub struct TestUser {
    pub id: String,
    pub token: String,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn register(&self, name: &str, email: &str, password: &str) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url("/api/v1/users"))
            .json(&json!({ "user_name": name, "email": email, "password": password }))
            .send()
            .await
            .expect("register request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    pub async fn login(&self, email: &str, password: &str) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url("/api/v1/auth/login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("login request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Log in as the admin account seeded at startup.
    pub async fn admin(&self) -> TestUser {
        let (body, status) = self.login(ADMIN_EMAIL, "password123").await;
        assert_eq!(status, StatusCode::OK, "admin login failed: {body}");
        TestUser {
            id: body["user"]["_id"].as_str().unwrap().to_string(),
            token: body["token"].as_str().unwrap().to_string(),
        }
    }

    /// Register then log in as a plain user.
    pub async fn signup(&self, name: &str, email: &str) -> TestUser {
        let (body, status) = self.register(name, email, "password123").await;
        assert_eq!(status, StatusCode::OK, "register failed: {body}");
        let id = body["data"]["_id"].as_str().unwrap().to_string();

        let (body, status) = self.login(email, "password123").await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        let token = body["token"].as_str().unwrap().to_string();

        TestUser { id, token }
    }

    /// Create a cat, return the created cat JSON.
    pub async fn create_cat(&self, token: &str, name: &str, location: Option<[f64; 2]>) -> Value {
        let mut body = json!({
            "cat_name": name,
            "weight": 4.2,
            "birthdate": "2020-01-01",
        });
        if let Some(coordinates) = location {
            body["location"] = json!({ "type": "Point", "coordinates": coordinates });
        }
        let (resp, status) = self.post_auth("/api/v1/cats", token, &body).await;
        assert_eq!(status, StatusCode::OK, "create cat failed: {resp}");
        resp["data"].clone()
    }

    pub async fn get_auth(&self, path: &str, token: &str) -> (Value, StatusCode) {
        let resp = self
            .client
            .get(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .expect("get request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    pub async fn post_auth(&self, path: &str, token: &str, body: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .expect("post request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    pub async fn put_auth(&self, path: &str, token: &str, body: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .put(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .expect("put request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    pub async fn delete_auth(&self, path: &str, token: &str) -> (Value, StatusCode) {
        let resp = self
            .client
            .delete(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .expect("delete request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }
}

pub const ADMIN_EMAIL: &str = "admin@test.com";

pub fn test_config() -> Config {
    Config {
        database_url: None,
        jwt_secret: "test-jwt-secret-that-is-long-enough".to_string(),
        token_ttl: chrono::Duration::minutes(15),
        host: "127.0.0.1".parse().unwrap(),
        port: 0, // unused, we bind to random port
        max_body_size: 1_048_576,
        store_timeout: Duration::from_secs(1),
        log_level: "warn".to_string(),
        password: PasswordConfig {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        },
        admin: Some(AdminSeed {
            user_name: "Admin".to_string(),
            email: ADMIN_EMAIL.to_string(),
            password: "password123".to_string(),
        }),
    }
}

/// Spawn a test app on a random port with an in-process store holding only
/// the seeded admin.
pub async fn spawn_app() -> TestApp {
    let config = test_config();
    let seed = config.admin.clone().unwrap();
    let (app, state) = cats_api::build_app(Arc::new(MemoryStore::new()), config);
    state.users.seed_admin(&seed).await.expect("Failed to seed admin");

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    TestApp {
        addr,
        client: Client::new(),
    }
}
