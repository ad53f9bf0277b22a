mod common;

use reqwest::StatusCode;
use serde_json::json;

// ── Health ──────────────────────────────────────────────────────

#[tokio::test]
async fn health_returns_ok() {
    let app = common::spawn_app().await;

    let resp = app.client.get(app.url("/health")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.unwrap(), "ok");
}

// ── Registration & Auth ─────────────────────────────────────────

#[tokio::test]
async fn register_returns_public_projection() {
    let app = common::spawn_app().await;

    let (body, status) = app.register("Alice", "alice@test.com", "password123").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User created successfully");
    assert_eq!(body["data"]["user_name"], "Alice");
    assert!(body["data"]["_id"].is_string());
    assert!(body["data"].get("password").is_none());
}

#[tokio::test]
async fn register_rejects_invalid_fields() {
    let app = common::spawn_app().await;

    let (body, status) = app.register("", "not-an-email", "short").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let msg = body["error"].as_str().unwrap();
    assert!(msg.contains("user_name"));
    assert!(msg.contains("email"));
    assert!(msg.contains("password"));
}

#[tokio::test]
async fn register_duplicate_email_fails_generically() {
    let app = common::spawn_app().await;
    app.register("Alice", "alice@test.com", "password123").await;

    let (body, status) = app.register("Other", "alice@test.com", "password123").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "User creation failed");
}

#[tokio::test]
async fn registered_users_are_plain_and_emails_ignore_case() {
    let app = common::spawn_app().await;
    let alice = app.signup("Alice", "Alice@Test.com").await;

    let (got, status) = app
        .get_auth(&format!("/api/v1/users/{}", alice.id), &alice.token)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(got["role"], "user");
    assert_eq!(got["email"], "alice@test.com");

    let (_, status) = app.login("ALICE@test.com", "password123").await;
    assert_eq!(status, StatusCode::OK);

    let (body, status) = app.register("Other", "alice@TEST.com", "password123").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "User creation failed");
}

#[tokio::test]
async fn login_invalid_credentials() {
    let app = common::spawn_app().await;
    app.signup("Alice", "alice@test.com").await;

    let (_, status) = app.login("alice@test.com", "wrongpassword").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (_, status) = app.login("nobody@test.com", "password123").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_is_rate_limited_after_repeated_failures() {
    let app = common::spawn_app().await;
    app.signup("Alice", "alice@test.com").await;

    for _ in 0..5 {
        let (_, status) = app.login("alice@test.com", "wrongpassword").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
    let (_, status) = app.login("alice@test.com", "password123").await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn missing_or_bad_token_is_unauthorized() {
    let app = common::spawn_app().await;

    let resp = app.client.get(app.url("/api/v1/cats")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let (_, status) = app.get_auth("/api/v1/cats", "garbage").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn check_token_returns_identity() {
    let app = common::spawn_app().await;
    let alice = app.signup("Alice", "alice@test.com").await;

    let (body, status) = app.get_auth("/api/v1/users/token", &alice.token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Token is valid");
    assert_eq!(body["data"]["_id"], alice.id.as_str());
    assert_eq!(body["data"]["email"], "alice@test.com");
}

// ── Users ───────────────────────────────────────────────────────

#[tokio::test]
async fn users_list_and_get() {
    let app = common::spawn_app().await;
    let admin = app.admin().await;
    let alice = app.signup("Alice", "alice@test.com").await;

    let (list, status) = app.get_auth("/api/v1/users", &alice.token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 2);

    let (got, status) = app
        .get_auth(&format!("/api/v1/users/{}", admin.id), &alice.token)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(got["role"], "admin");
    assert!(got.get("password").is_none());

    let (got, _) = app
        .get_auth(&format!("/api/v1/users/{}", alice.id), &alice.token)
        .await;
    assert_eq!(got["role"], "user");
}

#[tokio::test]
async fn get_unknown_user_is_not_found() {
    let app = common::spawn_app().await;
    let alice = app.signup("Alice", "alice@test.com").await;

    let (body, status) = app
        .get_auth(
            "/api/v1/users/0190b2a4-0000-7000-8000-000000000000",
            &alice.token,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "User not found");

    let (_, status) = app.get_auth("/api/v1/users/not-a-uuid", &alice.token).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_current_user_and_login_with_new_password() {
    let app = common::spawn_app().await;
    let alice = app.signup("Alice", "alice@test.com").await;

    let (body, status) = app
        .put_auth(
            "/api/v1/users",
            &alice.token,
            &json!({ "user_name": "Alicia", "password": "new-password" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User updated successfully");
    assert_eq!(body["data"]["user_name"], "Alicia");

    let (_, status) = app.login("alice@test.com", "password123").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (_, status) = app.login("alice@test.com", "new-password").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn delete_current_user_twice() {
    let app = common::spawn_app().await;
    let alice = app.signup("Alice", "alice@test.com").await;

    let (body, status) = app.delete_auth("/api/v1/users", &alice.token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User deleted successfully");
    assert_eq!(body["data"]["_id"], alice.id.as_str());

    let (_, status) = app.delete_auth("/api/v1/users", &alice.token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ── Cats CRUD ───────────────────────────────────────────────────

#[tokio::test]
async fn cats_crud() {
    let app = common::spawn_app().await;
    let alice = app.signup("Alice", "alice@test.com").await;

    // Create
    let cat = app.create_cat(&alice.token, "Mittens", Some([24.94, 60.17])).await;
    let cat_id = cat["_id"].as_str().unwrap();
    assert_eq!(cat["owner"]["_id"], alice.id.as_str());
    assert_eq!(cat["owner"]["user_name"], "Alice");
    assert_eq!(cat["owner"]["email"], "alice@test.com");
    assert_eq!(cat["location"]["type"], "Point");
    assert_eq!(cat["weight"], 4.2);

    // List
    let (list, status) = app.get_auth("/api/v1/cats", &alice.token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);

    // Get
    let (got, status) = app
        .get_auth(&format!("/api/v1/cats/{cat_id}"), &alice.token)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(got["cat_name"], "Mittens");

    // Update
    let (updated, status) = app
        .put_auth(
            &format!("/api/v1/cats/{cat_id}"),
            &alice.token,
            &json!({ "cat_name": "Tom", "weight": 5.1, "birthdate": "2019-05-05" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["message"], "Cat updated successfully");
    assert_eq!(updated["data"]["cat_name"], "Tom");
    assert!(updated["data"].get("location").is_none());

    // Delete
    let (deleted, status) = app
        .delete_auth(&format!("/api/v1/cats/{cat_id}"), &alice.token)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted["message"], "Cat deleted successfully");

    // Second delete
    let (_, status) = app
        .delete_auth(&format!("/api/v1/cats/{cat_id}"), &alice.token)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Verify deleted
    let (_, status) = app
        .get_auth(&format!("/api/v1/cats/{cat_id}"), &alice.token)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn cat_validation_failures_are_bad_request() {
    let app = common::spawn_app().await;
    let alice = app.signup("Alice", "alice@test.com").await;

    let (body, status) = app
        .post_auth(
            "/api/v1/cats",
            &alice.token,
            &json!({ "cat_name": "Mittens", "weight": -1.0, "birthdate": "2999-01-01" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let msg = body["error"].as_str().unwrap();
    assert!(msg.contains("weight"));
    assert!(msg.contains("birthdate"));

    // Wrong geometry type
    let (_, status) = app
        .post_auth(
            "/api/v1/cats",
            &alice.token,
            &json!({
                "cat_name": "Mittens",
                "weight": 4.2,
                "birthdate": "2020-01-01",
                "location": { "type": "Polygon", "coordinates": [1.0, 2.0] }
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn owner_snapshot_is_not_a_live_join() {
    let app = common::spawn_app().await;
    let alice = app.signup("Alice", "alice@test.com").await;
    let cat = app.create_cat(&alice.token, "Mittens", None).await;
    let cat_id = cat["_id"].as_str().unwrap();

    let (_, status) = app
        .put_auth(
            "/api/v1/users",
            &alice.token,
            &json!({ "user_name": "Alicia" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (got, _) = app
        .get_auth(&format!("/api/v1/cats/{cat_id}"), &alice.token)
        .await;
    assert_eq!(got["owner"]["user_name"], "Alice");
}

#[tokio::test]
async fn non_owner_cannot_update_or_delete() {
    let app = common::spawn_app().await;
    let alice = app.signup("Alice", "alice@test.com").await;
    let bob = app.signup("Bob", "bob@test.com").await;
    let cat = app.create_cat(&alice.token, "Mittens", None).await;
    let cat_id = cat["_id"].as_str().unwrap();

    let (body, status) = app
        .put_auth(
            &format!("/api/v1/cats/{cat_id}"),
            &bob.token,
            &json!({ "cat_name": "Stolen", "weight": 4.0, "birthdate": "2020-01-01" }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Only owner can update cat");

    let (body, status) = app
        .delete_auth(&format!("/api/v1/cats/{cat_id}"), &bob.token)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Only owner can delete cat");

    // Still there, unchanged
    let (got, status) = app
        .get_auth(&format!("/api/v1/cats/{cat_id}"), &alice.token)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(got["cat_name"], "Mittens");
}

#[tokio::test]
async fn admin_delete_requires_admin() {
    let app = common::spawn_app().await;
    let admin = app.admin().await;
    let alice = app.signup("Alice", "alice@test.com").await;
    let cat = app.create_cat(&alice.token, "Mittens", None).await;
    let cat_id = cat["_id"].as_str().unwrap();

    let (body, status) = app
        .delete_auth(&format!("/api/v1/cats/admin/{cat_id}"), &alice.token)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Only admin can delete cat");

    let (body, status) = app
        .delete_auth(&format!("/api/v1/cats/admin/{cat_id}"), &admin.token)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["_id"], cat_id);
}

#[tokio::test]
async fn owner_reassignment() {
    let app = common::spawn_app().await;
    let admin = app.admin().await;
    let alice = app.signup("Alice", "alice@test.com").await;
    let bob = app.signup("Bob", "bob@test.com").await;
    let cat = app.create_cat(&alice.token, "Mittens", None).await;
    let cat_id = cat["_id"].as_str().unwrap();
    let path = format!("/api/v1/cats/admin/{cat_id}");

    // A stranger may not move the cat
    let (body, status) = app
        .put_auth(&path, &bob.token, &json!({ "owner": bob.id }))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Only admin can change cat owner");

    // The current owner may
    let (body, status) = app
        .put_auth(&path, &alice.token, &json!({ "owner": bob.id }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["owner"]["_id"], bob.id.as_str());
    assert_eq!(body["data"]["owner"]["user_name"], "Bob");

    // So may an admin
    let (body, status) = app
        .put_auth(&path, &admin.token, &json!({ "owner": alice.id }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["owner"]["_id"], alice.id.as_str());
}

// ── Listing by owner and area ───────────────────────────────────

#[tokio::test]
async fn cats_of_current_user() {
    let app = common::spawn_app().await;
    let alice = app.signup("Alice", "alice@test.com").await;
    let bob = app.signup("Bob", "bob@test.com").await;
    app.create_cat(&alice.token, "A1", None).await;
    app.create_cat(&alice.token, "A2", None).await;
    app.create_cat(&bob.token, "B1", None).await;

    let (list, status) = app.get_auth("/api/v1/cats/user", &alice.token).await;
    assert_eq!(status, StatusCode::OK);
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 2);
    assert!(list.iter().all(|c| c["owner"]["_id"] == alice.id.as_str()));
}

#[tokio::test]
async fn cats_in_bounding_box_include_edges() {
    let app = common::spawn_app().await;
    let alice = app.signup("Alice", "alice@test.com").await;
    app.create_cat(&alice.token, "Inside", Some([35.0, 15.0])).await;
    app.create_cat(&alice.token, "Edge", Some([30.0, 15.0])).await;
    app.create_cat(&alice.token, "Outside", Some([45.0, 15.0])).await;
    app.create_cat(&alice.token, "Nowhere", None).await;

    let (list, status) = app
        .get_auth(
            "/api/v1/cats/area?minLat=10&maxLat=20&minLon=30&maxLon=40",
            &alice.token,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let mut names: Vec<&str> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["cat_name"].as_str().unwrap())
        .collect();
    names.sort();
    assert_eq!(names, vec!["Edge", "Inside"]);
}

#[tokio::test]
async fn bounding_box_requires_all_params() {
    let app = common::spawn_app().await;
    let alice = app.signup("Alice", "alice@test.com").await;

    let (_, status) = app
        .get_auth("/api/v1/cats/area?minLat=10&maxLat=20", &alice.token)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
