//! Auth and book catalog integration tests
//!
//! Require a database; set DATABASE_URL and run the migrations first.
//! The whole flow lives in one test so table truncation never races a
//! sibling test.

use axum::http::StatusCode;
use serde_json::json;
use tower::util::ServiceExt;

use book_review_api::auth::TokenSigner;

mod common;
use common::{
    body_json, post_json, register_and_login, request_empty, request_json, setup_test_db,
    test_app, TEST_JWT_SECRET,
};

#[tokio::test]
async fn test_auth_and_book_catalog_e2e() {
    let pool = setup_test_db().await;
    let app = test_app(pool.clone());

    // --- Registration and login ---

    let (token_a, user_a_id) = register_and_login(&app, "Alice", "alice@example.com").await;
    let (token_b, _user_b_id) = register_and_login(&app, "Bob", "bob@example.com").await;

    // Duplicate email is rejected
    let response = app
        .clone()
        .oneshot(post_json(
            "/auth/register",
            None,
            json!({ "name": "Alice Again", "email": "alice@example.com", "password": "turning-pages-9" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_json(response).await;
    assert_eq!(body["errorCode"], "duplicate_email");

    // Unknown email on login
    let response = app
        .clone()
        .oneshot(post_json(
            "/auth/login",
            None,
            json!({ "email": "nobody@example.com", "password": "turning-pages-9" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Wrong password
    let response = app
        .clone()
        .oneshot(post_json(
            "/auth/login",
            None,
            json!({ "email": "alice@example.com", "password": "wrong-password-1" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // --- Access guard ---

    // No credential
    let response = app
        .clone()
        .oneshot(post_json(
            "/books/add",
            None,
            json!({ "title": "T", "author": "A", "description": "D", "genre": "Fiction", "publishedYear": 2001 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Expired credential, signed with the right key
    let expired = TokenSigner::new(TEST_JWT_SECRET, -60)
        .issue(user_a_id.parse().unwrap(), "Alice", "alice@example.com")
        .unwrap();
    let response = app
        .clone()
        .oneshot(request_empty("GET", "/books/user/me", Some(&expired)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Token has expired");

    // Garbage credential
    let response = app
        .clone()
        .oneshot(request_empty("GET", "/books/user/me", Some("not.a.token")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // --- Book creation and validation ---

    let response = app
        .clone()
        .oneshot(post_json(
            "/books/add",
            Some(&token_a),
            json!({
                "title": "The Left Hand of Darkness",
                "author": "Ursula K. Le Guin",
                "description": "An envoy on a planet of ambisexual people",
                "genre": "Science Fiction",
                "publishedYear": 1969
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["book"]["averageRating"], 0.0);
    assert_eq!(body["book"]["totalReviews"], 0);
    let book_id = body["book"]["id"].as_str().unwrap().to_string();

    // Bad genre
    let response = app
        .clone()
        .oneshot(post_json(
            "/books/add",
            Some(&token_a),
            json!({ "title": "T", "author": "A", "description": "D", "genre": "Cyberpunk", "publishedYear": 1984 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["errorCode"], "validation_error");

    // Year out of range
    let response = app
        .clone()
        .oneshot(post_json(
            "/books/add",
            Some(&token_a),
            json!({ "title": "T", "author": "A", "description": "D", "genre": "History", "publishedYear": 999 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // --- Reads ---

    let response = app
        .clone()
        .oneshot(request_empty("GET", &format!("/books/{}", book_id), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["book"]["addedByName"], "Alice");
    assert_eq!(body["book"]["addedBy"], user_a_id);

    // Unknown book id
    let response = app
        .clone()
        .oneshot(request_empty(
            "GET",
            "/books/00000000-0000-0000-0000-00000000beef",
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // --- Ownership ---

    // Editing a missing book is 404, not a server error
    let response = app
        .clone()
        .oneshot(request_json(
            "PATCH",
            "/books/edit/00000000-0000-0000-0000-00000000beef",
            Some(&token_a),
            json!({ "title": "Ghost" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Bob cannot edit Alice's book
    let response = app
        .clone()
        .oneshot(request_json(
            "PATCH",
            &format!("/books/edit/{}", book_id),
            Some(&token_b),
            json!({ "title": "Hijacked" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Bob cannot delete it either
    let response = app
        .clone()
        .oneshot(request_empty(
            "DELETE",
            &format!("/books/delete/{}", book_id),
            Some(&token_b),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Alice can update; unspecified fields stay put
    let response = app
        .clone()
        .oneshot(request_json(
            "PATCH",
            &format!("/books/edit/{}", book_id),
            Some(&token_a),
            json!({ "genre": "Fantasy" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["book"]["genre"], "Fantasy");
    assert_eq!(body["book"]["title"], "The Left Hand of Darkness");

    // --- Pagination ---

    // Six more books: seven total, so two pages of size 5
    for i in 0..6 {
        let response = app
            .clone()
            .oneshot(post_json(
                "/books/add",
                Some(&token_a),
                json!({
                    "title": format!("Filler volume {}", i),
                    "author": "Prolific Author",
                    "description": "Filler",
                    "genre": "Other",
                    "publishedYear": 2000 + i
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app
        .clone()
        .oneshot(request_empty("GET", "/books/all?page=1", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["currentPage"], 1);
    assert_eq!(body["totalPages"], 2);
    assert_eq!(body["books"].as_array().unwrap().len(), 5);

    let response = app
        .clone()
        .oneshot(request_empty("GET", "/books/all?page=2", None))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["currentPage"], 2);
    assert_eq!(body["books"].as_array().unwrap().len(), 2);

    // Missing page parameter defaults to the first page
    let response = app
        .clone()
        .oneshot(request_empty("GET", "/books/all", None))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["currentPage"], 1);

    // A page number at the i64 ceiling answers with an empty page, no panic
    let response = app
        .clone()
        .oneshot(request_empty(
            "GET",
            &format!("/books/all?page={}", i64::MAX),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["books"].as_array().unwrap().len(), 0);

    // --- Books by owner ---

    let response = app
        .clone()
        .oneshot(request_empty("GET", "/books/user/me", Some(&token_b)))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["books"].as_array().unwrap().len(), 0);

    let response = app
        .clone()
        .oneshot(request_empty("GET", "/books/user/me", Some(&token_a)))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["books"].as_array().unwrap().len(), 7);

    // --- Owner delete ---

    let response = app
        .clone()
        .oneshot(request_empty(
            "DELETE",
            &format!("/books/delete/{}", book_id),
            Some(&token_a),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(request_empty("GET", &format!("/books/{}", book_id), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
