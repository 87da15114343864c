//! HTTP-level integration tests for comments and the caller's account.

mod common;

use axum::http::{Method, StatusCode};
use common::{body_json, get, post_json, seed_user, send};
use serde_json::json;
use sqlx::PgPool;

async fn seed_page(pool: &PgPool, path: &str) {
    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        &format!("/api/v1/pages{path}"),
        json!({ "title": "Talk", "body": "discuss" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

fn comment(title: &str, body: &str) -> serde_json::Value {
    json!({ "title": title, "body": body })
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_anonymous_cannot_comment(pool: PgPool) {
    seed_page(&pool, "/talk").await;
    let app = common::build_test_app(pool);
    let response = post_json(app, "/api/v1/comments/page/talk", comment("Hi", "there")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_comment_create_list_and_edit(pool: PgPool) {
    seed_page(&pool, "/talk").await;
    let author = seed_user(&pool, "author", &[]).await;

    let app = common::build_test_app(pool.clone());
    let response = send(
        app,
        Method::POST,
        "/api/v1/comments/page/talk",
        Some(&author.token),
        Some(comment("Typo", "second paragraph")),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    let id = created["data"]["id"].as_i64().unwrap();
    assert_eq!(created["data"]["account_id"], author.id);

    let app = common::build_test_app(pool.clone());
    let listed = body_json(get(app, "/api/v1/comments/page/talk").await).await;
    assert_eq!(listed["data"].as_array().unwrap().len(), 1);

    let app = common::build_test_app(pool);
    let response = send(
        app,
        Method::PATCH,
        &format!("/api/v1/comments/{id}"),
        Some(&author.token),
        Some(json!({ "body": "fixed" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["data"]["body"], "fixed");
    assert_eq!(updated["data"]["title"], "Typo");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_only_author_or_moderator_may_change_comment(pool: PgPool) {
    seed_page(&pool, "/talk").await;
    let author = seed_user(&pool, "author", &[]).await;
    let stranger = seed_user(&pool, "stranger", &[]).await;
    let moderator = seed_user(&pool, "moderator", &["wikiAdmin/comments"]).await;

    let app = common::build_test_app(pool.clone());
    let created = body_json(
        send(
            app,
            Method::POST,
            "/api/v1/comments/page/talk",
            Some(&author.token),
            Some(comment("Mine", "body")),
        )
        .await,
    )
    .await;
    let uri = format!("/api/v1/comments/{}", created["data"]["id"]);

    let app = common::build_test_app(pool.clone());
    let response = send(app, Method::DELETE, &uri, Some(&stranger.token), None).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let app = common::build_test_app(pool.clone());
    let response = send(app, Method::DELETE, &uri, Some(&moderator.token), None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool);
    let response = send(app, Method::DELETE, &uri, Some(&author.token), None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_empty_comment_is_rejected(pool: PgPool) {
    seed_page(&pool, "/talk").await;
    let author = seed_user(&pool, "author", &[]).await;
    let app = common::build_test_app(pool);
    let response = send(
        app,
        Method::POST,
        "/api/v1/comments/page/talk",
        Some(&author.token),
        Some(comment("", "body")),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_comments_on_missing_page_are_not_found(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/comments/page/nowhere").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_account_me_and_settings(pool: PgPool) {
    let user = seed_user(&pool, "ada", &["wikiView/staff"]).await;

    let app = common::build_test_app(pool.clone());
    let response = send(app, Method::GET, "/api/v1/accounts/me", Some(&user.token), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["username"], "ada");
    assert_eq!(json["data"]["permissions"][0], "wikiView/staff");

    let app = common::build_test_app(pool.clone());
    let response = send(
        app,
        Method::PATCH,
        "/api/v1/accounts/me/settings",
        Some(&user.token),
        Some(json!({ "settings": { "theme": "dark" } })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["settings"]["theme"], "dark");

    let app = common::build_test_app(pool.clone());
    let response = send(
        app,
        Method::PATCH,
        "/api/v1/accounts/me/settings",
        Some(&user.token),
        Some(json!({ "settings": [1, 2] })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/accounts/me").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
