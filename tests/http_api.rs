//! Integration tests for the REST surface, wired over the in-memory
//! adapters: routing, authentication, authorization, list queries and the
//! derived-aggregate behavior observable through the API.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use devcamper::adapters::http::{api_router, AppState, CookieSettings};
use devcamper::adapters::memory::{
    MemoryBootcampRepository, MemoryCourseRepository, MemoryReviewRepository,
    MemoryUserRepository,
};
use devcamper::adapters::security::{BcryptHasher, JwtTokenService};
use devcamper::application::{
    AggregateRecomputer, AuthSession, BootcampService, CourseService, ReviewService,
    UserAdminService,
};
use devcamper::domain::{ApiError, GeoPoint, Role, User, UserId};
use devcamper::ports::{Geocoder, Mailer, PasswordHasher as _, PhotoStorage, UserRepository as _};

struct FixedGeocoder;

#[async_trait]
impl Geocoder for FixedGeocoder {
    async fn geocode(&self, _zipcode: &str) -> Result<GeoPoint, ApiError> {
        Ok(GeoPoint { lat: 42.36, lng: -71.05 })
    }
}

struct NullStorage;

#[async_trait]
impl PhotoStorage for NullStorage {
    async fn store(&self, _filename: &str, _bytes: &[u8]) -> Result<(), ApiError> {
        Ok(())
    }
}

/// Captures outbound mail so tests can read reset links.
#[derive(Default)]
struct RecordingMailer {
    bodies: Mutex<Vec<String>>,
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, _to: &str, _subject: &str, body: &str) -> Result<(), ApiError> {
        self.bodies.lock().unwrap().push(body.to_string());
        Ok(())
    }
}

struct TestApp {
    app: Router,
    users: Arc<MemoryUserRepository>,
    hasher: Arc<BcryptHasher>,
    mailer: Arc<RecordingMailer>,
}

fn test_app() -> TestApp {
    let users = Arc::new(MemoryUserRepository::new());
    let bootcamps = Arc::new(MemoryBootcampRepository::new());
    let courses = Arc::new(MemoryCourseRepository::new());
    let reviews = Arc::new(MemoryReviewRepository::new());

    let hasher = Arc::new(BcryptHasher::with_cost(4));
    let tokens = Arc::new(JwtTokenService::new("integration-test-secret", 1));
    let mailer = Arc::new(RecordingMailer::default());

    let recomputer = Arc::new(AggregateRecomputer::new(
        bootcamps.clone(),
        courses.clone(),
        reviews.clone(),
    ));

    let state = AppState {
        auth: Arc::new(AuthSession::new(
            users.clone(),
            hasher.clone(),
            tokens,
            mailer.clone(),
        )),
        bootcamps: Arc::new(BootcampService::new(
            bootcamps.clone(),
            courses.clone(),
            reviews.clone(),
            Arc::new(FixedGeocoder),
            Arc::new(NullStorage),
            1024 * 1024,
        )),
        courses: Arc::new(CourseService::new(
            courses,
            bootcamps.clone(),
            recomputer.clone(),
        )),
        reviews: Arc::new(ReviewService::new(reviews, bootcamps, recomputer)),
        users: Arc::new(UserAdminService::new(users.clone(), hasher.clone())),
        cookie: CookieSettings {
            expire_days: 30,
            secure: false,
        },
        reset_url_base: "http://localhost:5000/api/v1/auth/resetpassword".to_string(),
    };

    TestApp {
        app: api_router(state),
        users,
        hasher,
        mailer,
    }
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
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

async fn register(app: &Router, name: &str, email: &str, role: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/v1/auth/register",
        None,
        Some(json!({
            "name": name,
            "email": email,
            "password": "secret123",
            "role": role,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}

/// Seeds an admin directly; registration cannot create one.
async fn admin_token(fx: &TestApp) -> String {
    let hash = fx.hasher.hash("secret123").unwrap();
    let admin = User::new(
        UserId::new(),
        "Root".to_string(),
        "root@devcamper.io".to_string(),
        hash,
        Role::Admin,
    )
    .unwrap();
    fx.users.insert(&admin).await.unwrap();

    let (status, body) = send(
        &fx.app,
        "POST",
        "/api/v1/auth/login",
        None,
        Some(json!({"email": "root@devcamper.io", "password": "secret123"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}

fn bootcamp_input(name: &str) -> Value {
    json!({
        "name": name,
        "description": "Full stack in twelve weeks",
        "careers": ["Web Development"],
        "housing": true,
    })
}

#[tokio::test]
async fn register_then_me_resolves_the_account() {
    let fx = test_app();
    let token = register(&fx.app, "John", "john@devcamper.io", "user").await;

    let (status, body) = send(&fx.app, "GET", "/api/v1/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["email"], json!("john@devcamper.io"));
    // Secrets never serialize.
    assert!(body["data"].get("passwordHash").is_none());
}

#[tokio::test]
async fn login_failures_share_one_message() {
    let fx = test_app();
    register(&fx.app, "John", "john@devcamper.io", "user").await;

    let (status, body) = send(
        &fx.app,
        "POST",
        "/api/v1/auth/login",
        None,
        Some(json!({"email": "john@devcamper.io", "password": "wrong"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], json!("Invalid credentials"));

    let (status, body) = send(
        &fx.app,
        "POST",
        "/api/v1/auth/login",
        None,
        Some(json!({"email": "ghost@devcamper.io", "password": "wrong"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], json!("Invalid credentials"));
}

#[tokio::test]
async fn protected_routes_reject_missing_and_bad_tokens() {
    let fx = test_app();

    let (status, body) = send(
        &fx.app,
        "POST",
        "/api/v1/bootcamps",
        None,
        Some(bootcamp_input("Devworks")),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], json!(false));

    let (status, _) = send(
        &fx.app,
        "POST",
        "/api/v1/bootcamps",
        Some("not-a-real-token"),
        Some(bootcamp_input("Devworks")),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn publisher_cap_and_ownership_are_enforced() {
    let fx = test_app();
    let publisher = register(&fx.app, "Pub", "pub@devcamper.io", "publisher").await;

    let (status, body) = send(
        &fx.app,
        "POST",
        "/api/v1/bootcamps",
        Some(&publisher),
        Some(bootcamp_input("Devworks")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["data"]["id"].as_str().unwrap().to_string();

    // Second listing from the same publisher is capped.
    let (status, _) = send(
        &fx.app,
        "POST",
        "/api/v1/bootcamps",
        Some(&publisher),
        Some(bootcamp_input("Second Camp")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // A different publisher cannot touch it; an admin can.
    let other = register(&fx.app, "Other", "other@devcamper.io", "publisher").await;
    let (status, _) = send(
        &fx.app,
        "PUT",
        &format!("/api/v1/bootcamps/{}", id),
        Some(&other),
        Some(json!({"housing": false})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let admin = admin_token(&fx).await;
    let (status, body) = send(
        &fx.app,
        "PUT",
        &format!("/api/v1/bootcamps/{}", id),
        Some(&admin),
        Some(json!({"housing": false})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["housing"], json!(false));
}

#[tokio::test]
async fn plain_users_cannot_publish_bootcamps() {
    let fx = test_app();
    let user = register(&fx.app, "User", "user@devcamper.io", "user").await;

    let (status, _) = send(
        &fx.app,
        "POST",
        "/api/v1/bootcamps",
        Some(&user),
        Some(bootcamp_input("Devworks")),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn adding_courses_updates_average_cost() {
    let fx = test_app();
    let publisher = register(&fx.app, "Pub", "pub@devcamper.io", "publisher").await;

    let (_, body) = send(
        &fx.app,
        "POST",
        "/api/v1/bootcamps",
        Some(&publisher),
        Some(bootcamp_input("Devworks")),
    )
    .await;
    let id = body["data"]["id"].as_str().unwrap().to_string();

    for tuition in [8000.0, 11000.0] {
        let (status, _) = send(
            &fx.app,
            "POST",
            &format!("/api/v1/bootcamps/{}/courses", id),
            Some(&publisher),
            Some(json!({
                "title": "Course",
                "description": "desc",
                "weeks": "8",
                "tuition": tuition,
                "minimumSkill": "beginner",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    // mean 9500 -> rounded up to the next ten.
    let (_, body) = send(&fx.app, "GET", &format!("/api/v1/bootcamps/{}", id), None, None).await;
    assert_eq!(body["data"]["averageCost"], json!(9500.0));

    let (_, body) = send(
        &fx.app,
        "GET",
        &format!("/api/v1/bootcamps/{}/courses", id),
        None,
        None,
    )
    .await;
    assert_eq!(body["count"], json!(2));
}

#[tokio::test]
async fn reviews_are_limited_to_one_per_user_and_update_average_rating() {
    let fx = test_app();
    let publisher = register(&fx.app, "Pub", "pub@devcamper.io", "publisher").await;
    let (_, body) = send(
        &fx.app,
        "POST",
        "/api/v1/bootcamps",
        Some(&publisher),
        Some(bootcamp_input("Devworks")),
    )
    .await;
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let reviews_uri = format!("/api/v1/bootcamps/{}/reviews", id);
    let reviewer = register(&fx.app, "Rev", "rev@devcamper.io", "user").await;

    let (status, _) = send(
        &fx.app,
        "POST",
        &reviews_uri,
        Some(&reviewer),
        Some(json!({"title": "Great", "text": "Loved it", "rating": 8})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // Same user again: duplicate.
    let (status, body) = send(
        &fx.app,
        "POST",
        &reviews_uri,
        Some(&reviewer),
        Some(json!({"title": "Again", "text": "More", "rating": 9})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], json!("Duplicate field value entered"));

    // Publishers cannot review at all.
    let (status, _) = send(
        &fx.app,
        "POST",
        &reviews_uri,
        Some(&publisher),
        Some(json!({"title": "Mine", "text": "Biased", "rating": 10})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let second = register(&fx.app, "Rev2", "rev2@devcamper.io", "user").await;
    send(
        &fx.app,
        "POST",
        &reviews_uri,
        Some(&second),
        Some(json!({"title": "Okay", "text": "Fine", "rating": 4})),
    )
    .await;

    let (_, body) = send(&fx.app, "GET", &format!("/api/v1/bootcamps/{}", id), None, None).await;
    assert_eq!(body["data"]["averageRating"], json!(6.0));
}

#[tokio::test]
async fn review_list_sorts_by_rating_and_paginates() {
    let fx = test_app();
    let publisher = register(&fx.app, "Pub", "pub@devcamper.io", "publisher").await;
    let (_, body) = send(
        &fx.app,
        "POST",
        "/api/v1/bootcamps",
        Some(&publisher),
        Some(bootcamp_input("Devworks")),
    )
    .await;
    let id = body["data"]["id"].as_str().unwrap().to_string();

    for (i, rating) in [3, 9, 6].iter().enumerate() {
        let reviewer = register(
            &fx.app,
            "Rev",
            &format!("rev{}@devcamper.io", i),
            "user",
        )
        .await;
        send(
            &fx.app,
            "POST",
            &format!("/api/v1/bootcamps/{}/reviews", id),
            Some(&reviewer),
            Some(json!({"title": "t", "text": "x", "rating": rating})),
        )
        .await;
    }

    let (status, body) = send(
        &fx.app,
        "GET",
        "/api/v1/reviews?sort=-rating&limit=2&page=1",
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], json!(2));
    assert_eq!(body["data"][0]["rating"], json!(9));
    assert_eq!(body["data"][1]["rating"], json!(6));
    assert_eq!(body["pagination"]["next"]["page"], json!(2));
}

#[tokio::test]
async fn list_queries_filter_sort_select_and_paginate() {
    let fx = test_app();
    let admin = admin_token(&fx).await;

    for (name, housing) in [("Alpha", true), ("Bravo", false), ("Charlie", true)] {
        let mut input = bootcamp_input(name);
        input["housing"] = json!(housing);
        let (status, _) = send(&fx.app, "POST", "/api/v1/bootcamps", Some(&admin), Some(input)).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    // Filter.
    let (status, body) = send(&fx.app, "GET", "/api/v1/bootcamps?housing=true", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], json!(2));

    // Sort + pagination.
    let (_, body) = send(
        &fx.app,
        "GET",
        "/api/v1/bootcamps?sort=-name&limit=2&page=1",
        None,
        None,
    )
    .await;
    assert_eq!(body["data"][0]["name"], json!("Charlie"));
    assert_eq!(body["pagination"]["next"]["page"], json!(2));
    assert!(body["pagination"].get("prev").is_none());

    let (_, body) = send(
        &fx.app,
        "GET",
        "/api/v1/bootcamps?sort=-name&limit=2&page=2",
        None,
        None,
    )
    .await;
    assert_eq!(body["count"], json!(1));
    assert_eq!(body["pagination"]["prev"]["page"], json!(1));

    // Select projection keeps only the requested fields plus id.
    let (_, body) = send(&fx.app, "GET", "/api/v1/bootcamps?select=name", None, None).await;
    let first = body["data"][0].as_object().unwrap();
    assert!(first.contains_key("name") && first.contains_key("id"));
    assert!(!first.contains_key("description"));

    // Unknown fields and operators are rejected.
    let (status, _) = send(&fx.app, "GET", "/api/v1/bootcamps?password=x", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = send(
        &fx.app,
        "GET",
        "/api/v1/bootcamps?name%5Bregex%5D=x",
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_and_unknown_ids_both_read_as_not_found() {
    let fx = test_app();

    let (status, body) = send(&fx.app, "GET", "/api/v1/bootcamps/not-a-uuid", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], json!(false));

    let (status, _) = send(
        &fx.app,
        "GET",
        &format!("/api/v1/bootcamps/{}", uuid::Uuid::new_v4()),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleting_a_bootcamp_cascades_to_children() {
    let fx = test_app();
    let publisher = register(&fx.app, "Pub", "pub@devcamper.io", "publisher").await;
    let (_, body) = send(
        &fx.app,
        "POST",
        "/api/v1/bootcamps",
        Some(&publisher),
        Some(bootcamp_input("Devworks")),
    )
    .await;
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (_, body) = send(
        &fx.app,
        "POST",
        &format!("/api/v1/bootcamps/{}/courses", id),
        Some(&publisher),
        Some(json!({
            "title": "Course",
            "description": "desc",
            "weeks": "8",
            "tuition": 5000.0,
            "minimumSkill": "beginner",
        })),
    )
    .await;
    let course_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &fx.app,
        "DELETE",
        &format!("/api/v1/bootcamps/{}", id),
        Some(&publisher),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!({}));

    let (status, _) = send(
        &fx.app,
        "GET",
        &format!("/api/v1/courses/{}", course_id),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn user_administration_is_admin_only() {
    let fx = test_app();
    let user = register(&fx.app, "User", "user@devcamper.io", "user").await;

    let (status, _) = send(&fx.app, "GET", "/api/v1/users", Some(&user), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let admin = admin_token(&fx).await;
    let (status, body) = send(
        &fx.app,
        "POST",
        "/api/v1/users",
        Some(&admin),
        Some(json!({
            "name": "Managed",
            "email": "managed@devcamper.io",
            "password": "secret123",
            "role": "publisher",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &fx.app,
        "PUT",
        &format!("/api/v1/users/{}", id),
        Some(&admin),
        Some(json!({"role": "admin"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["role"], json!("admin"));

    let (status, _) = send(
        &fx.app,
        "DELETE",
        &format!("/api/v1/users/{}", id),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn radius_search_returns_nearby_bootcamps() {
    let fx = test_app();
    let publisher = register(&fx.app, "Pub", "pub@devcamper.io", "publisher").await;

    let mut input = bootcamp_input("Devworks");
    // A few miles from the fixed geocoder location.
    input["location"] = json!({"lat": 42.34, "lng": -71.09});
    send(&fx.app, "POST", "/api/v1/bootcamps", Some(&publisher), Some(input)).await;

    let (status, body) = send(&fx.app, "GET", "/api/v1/bootcamps/radius/02108/10", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], json!(1));

    let (status, body) = send(&fx.app, "GET", "/api/v1/bootcamps/radius/02108/1", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], json!(0));

    let (status, _) = send(&fx.app, "GET", "/api/v1/bootcamps/radius/02108/abc", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn change_password_requires_the_current_one() {
    let fx = test_app();
    let token = register(&fx.app, "John", "john@devcamper.io", "user").await;

    let (status, _) = send(
        &fx.app,
        "PUT",
        "/api/v1/auth/changepassword",
        Some(&token),
        Some(json!({"currentPassword": "wrong", "newPassword": "brandnew1"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(
        &fx.app,
        "PUT",
        "/api/v1/auth/changepassword",
        Some(&token),
        Some(json!({"currentPassword": "secret123", "newPassword": "brandnew1"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["token"].is_string());

    let (status, _) = send(
        &fx.app,
        "POST",
        "/api/v1/auth/login",
        None,
        Some(json!({"email": "john@devcamper.io", "password": "brandnew1"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn password_reset_round_trips_through_email() {
    let fx = test_app();
    register(&fx.app, "John", "john@devcamper.io", "user").await;

    let (status, _) = send(
        &fx.app,
        "POST",
        "/api/v1/auth/forgotpassword",
        None,
        Some(json!({"email": "john@devcamper.io"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Pull the raw token out of the reset link in the captured email.
    let body = fx.mailer.bodies.lock().unwrap().last().unwrap().clone();
    let token = body.rsplit('/').next().unwrap().trim().to_string();

    let (status, body) = send(
        &fx.app,
        "PUT",
        &format!("/api/v1/auth/resetpassword/{}", token),
        None,
        Some(json!({"password": "brandnew1"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["token"].is_string());

    let (status, _) = send(
        &fx.app,
        "POST",
        "/api/v1/auth/login",
        None,
        Some(json!({"email": "john@devcamper.io", "password": "brandnew1"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}
