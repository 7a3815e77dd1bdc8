// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Review, upvote and comment API tests against the in-memory store.

use axum::http::StatusCode;
use serde_json::{json, Value};
use tower::ServiceExt;

mod common;

fn review_body(title: &str) -> Value {
    json!({
        "bookTitle": title,
        "summary": "A boy is sent to a camp where inmates dig holes all day.",
        "gradeLevel": "6th grade",
        "reasons": "Clever interlocking plot"
    })
}

/// Create a review through the API and return its id.
async fn post_review(app: &axum::Router, token: &str, title: &str) -> String {
    let response = app
        .clone()
        .oneshot(common::json_request(
            "POST",
            "/api/reviews",
            Some(token),
            Some(review_body(title)),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = common::body_json(response).await;
    body["id"].as_str().unwrap().to_string()
}

async fn post_comment(app: &axum::Router, token: &str, review_id: &str, content: &str) -> StatusCode {
    app.clone()
        .oneshot(common::json_request(
            "POST",
            &format!("/api/reviews/{}/comments", review_id),
            Some(token),
            Some(json!({ "content": content })),
        ))
        .await
        .unwrap()
        .status()
}

async fn list(app: &axum::Router, query: &str) -> Vec<Value> {
    let response = app
        .clone()
        .oneshot(common::json_request(
            "GET",
            &format!("/api/reviews{}", query),
            None,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    common::body_json(response).await.as_array().unwrap().clone()
}

#[tokio::test]
async fn test_create_review_sets_author_and_zero_upvotes() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt("alice", &state.config.jwt_signing_key);

    let response = app
        .oneshot(common::json_request(
            "POST",
            "/api/reviews",
            Some(&token),
            Some(review_body("Holes")),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = common::body_json(response).await;
    assert_eq!(body["userId"], "alice");
    assert_eq!(body["authorName"], "alice (test)");
    assert_eq!(body["upvotes"], 0);
    assert_eq!(body["upvotedBy"], json!([]));
}

#[tokio::test]
async fn test_create_review_rejects_blank_field() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt("alice", &state.config.jwt_signing_key);

    let mut body = review_body("Holes");
    body["summary"] = json!("   ");

    let response = app
        .oneshot(common::json_request(
            "POST",
            "/api/reviews",
            Some(&token),
            Some(body),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = common::body_json(response).await;
    assert_eq!(body["error"], "bad_request");
}

#[tokio::test]
async fn test_comment_body_missing_content_is_json_bad_request() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt("alice", &state.config.jwt_signing_key);
    let review_id = post_review(&app, &token, "Holes").await;

    let response = app
        .oneshot(common::json_request(
            "POST",
            &format!("/api/reviews/{}/comments", review_id),
            Some(&token),
            Some(json!({})),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = common::body_json(response).await;
    assert_eq!(body["error"], "bad_request");
    assert!(body["details"].as_str().unwrap().contains("content"));
}

#[tokio::test]
async fn test_malformed_review_body_is_json_bad_request() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt("alice", &state.config.jwt_signing_key);

    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/api/reviews")
        .header(axum::http::header::AUTHORIZATION, format!("Bearer {}", token))
        .header(axum::http::header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from("{\"bookTitle\": "))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = common::body_json(response).await;
    assert_eq!(body["error"], "bad_request");
}

#[tokio::test]
async fn test_upvote_toggle_twice() {
    let (app, state) = common::create_test_app();
    let alice = common::create_test_jwt("alice", &state.config.jwt_signing_key);
    let bob = common::create_test_jwt("bob", &state.config.jwt_signing_key);
    let review_id = post_review(&app, &alice, "Holes").await;
    let uri = format!("/api/reviews/{}/upvote", review_id);

    let response = app
        .clone()
        .oneshot(common::json_request("POST", &uri, Some(&bob), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_json(response).await;
    assert_eq!(body["upvotes"], 1);
    assert_eq!(body["upvoted"], true);

    let listing = list(&app, "").await;
    assert_eq!(listing[0]["upvotedBy"], json!(["bob"]));

    let response = app
        .clone()
        .oneshot(common::json_request("POST", &uri, Some(&bob), None))
        .await
        .unwrap();
    let body = common::body_json(response).await;
    assert_eq!(body["upvotes"], 0);
    assert_eq!(body["upvoted"], false);

    let listing = list(&app, "").await;
    assert_eq!(listing[0]["upvotes"], 0);
    assert_eq!(listing[0]["upvotedBy"], json!([]));
}

#[tokio::test]
async fn test_upvote_unknown_review() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt("bob", &state.config.jwt_signing_key);

    let response = app
        .oneshot(common::json_request(
            "POST",
            "/api/reviews/does-not-exist/upvote",
            Some(&token),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_whitespace_comment_is_not_stored() {
    let (app, state) = common::create_test_app();
    let alice = common::create_test_jwt("alice", &state.config.jwt_signing_key);
    let review_id = post_review(&app, &alice, "Holes").await;

    let status = post_comment(&app, &alice, &review_id, "  \n\t  ").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let listing = list(&app, "").await;
    assert_eq!(listing[0]["comments"], json!([]));
}

#[tokio::test]
async fn test_comment_is_attached_with_flavor_tags() {
    let (app, state) = common::create_test_app();
    let alice = common::create_test_jwt("alice", &state.config.jwt_signing_key);
    let bob = common::create_test_jwt("bob", &state.config.jwt_signing_key);
    let review_id = post_review(&app, &alice, "Holes").await;

    let status = post_comment(&app, &bob, &review_id, "  Loved Stanley  ").await;
    assert_eq!(status, StatusCode::CREATED);

    let listing = list(&app, "").await;
    let comments = listing[0]["comments"].as_array().unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0]["content"], "Loved Stanley");
    assert_eq!(comments[0]["reviewId"], review_id.as_str());
    assert_eq!(comments[0]["userId"], "bob");
    for tag in ["isHacker", "isNerd", "isEntrepreneur"] {
        assert!(comments[0][tag].is_boolean(), "missing tag {}", tag);
    }
}

#[tokio::test]
async fn test_delete_review_cascades_comments() {
    let (app, state) = common::create_test_app();
    let alice = common::create_test_jwt("alice", &state.config.jwt_signing_key);
    let bob = common::create_test_jwt("bob", &state.config.jwt_signing_key);

    let doomed = post_review(&app, &alice, "Holes").await;
    let kept = post_review(&app, &alice, "Wonder").await;
    post_comment(&app, &bob, &doomed, "first").await;
    post_comment(&app, &bob, &doomed, "second").await;
    post_comment(&app, &bob, &kept, "keep me").await;

    // Not the author
    let response = app
        .clone()
        .oneshot(common::json_request(
            "DELETE",
            &format!("/api/reviews/{}", doomed),
            Some(&bob),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .clone()
        .oneshot(common::json_request(
            "DELETE",
            &format!("/api/reviews/{}", doomed),
            Some(&alice),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["commentsDeleted"], 2);

    let remaining = state
        .review_service
        .fetch_reviews_with_comments(None)
        .await
        .unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].review.id, kept);
    assert_eq!(remaining[0].comments.len(), 1);

    // Deleting again is a 404
    let response = app
        .oneshot(common::json_request(
            "DELETE",
            &format!("/api/reviews/{}", doomed),
            Some(&alice),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_filtered_by_user() {
    let (app, state) = common::create_test_app();
    let alice = common::create_test_jwt("alice", &state.config.jwt_signing_key);
    let bob = common::create_test_jwt("bob", &state.config.jwt_signing_key);

    let a1 = post_review(&app, &alice, "Holes").await;
    post_review(&app, &alice, "Wonder").await;
    post_review(&app, &bob, "Dune").await;
    post_comment(&app, &bob, &a1, "great pick").await;

    let alice_reviews = list(&app, "?userId=alice").await;
    assert_eq!(alice_reviews.len(), 2);
    assert!(alice_reviews.iter().all(|r| r["userId"] == "alice"));

    let with_comment = alice_reviews
        .iter()
        .find(|r| r["id"] == a1.as_str())
        .unwrap();
    assert_eq!(with_comment["comments"].as_array().unwrap().len(), 1);

    assert_eq!(list(&app, "").await.len(), 3);
    assert!(list(&app, "?userId=nobody").await.is_empty());
}
