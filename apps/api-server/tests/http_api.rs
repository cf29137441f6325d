//! End-to-end HTTP flows against the full route table over in-memory stores.

use actix_web::http::{StatusCode, header};
use actix_web::{App, HttpResponse, test, web};
use serde_json::{Value, json};

use api_server::handlers::configure_routes;
use api_server::middleware::AdminIdentity;
use api_server::state::AppState;
use quill_infra::JwtConfig;

fn jwt_config() -> JwtConfig {
    JwtConfig {
        secret: Some("http-test-secret".to_string()),
        ..JwtConfig::default()
    }
}

async fn admin_only(AdminIdentity(admin): AdminIdentity) -> HttpResponse {
    HttpResponse::Ok().json(json!({ "admin": admin.username }))
}

macro_rules! test_app {
    () => {
        test_app!(jwt_config())
    };
    ($jwt:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(AppState::in_memory($jwt)))
                .configure(configure_routes)
                .route("/admin-only", web::get().to(admin_only)),
        )
        .await
    };
}

/// Send a request and decode the JSON body.
macro_rules! send {
    ($app:expr, $req:expr) => {{
        let resp = test::call_service(&$app, $req.to_request()).await;
        let status = resp.status();
        let body: Value = test::read_body_json(resp).await;
        (status, body)
    }};
}

macro_rules! register {
    ($app:expr, $username:expr, $email:expr, $password:expr) => {
        register!($app, $username, $email, $password, false)
    };
    ($app:expr, $username:expr, $email:expr, $password:expr, $admin:expr) => {
        send!(
            $app,
            test::TestRequest::post().uri("/users/register").set_json(json!({
                "username": $username,
                "email": $email,
                "password": $password,
                "isAdmin": $admin,
            }))
        )
    };
}

macro_rules! login {
    ($app:expr, $email:expr, $password:expr) => {
        send!(
            $app,
            test::TestRequest::post()
                .uri("/users/login")
                .set_json(json!({ "email": $email, "password": $password }))
        )
    };
}

/// Register and log in, returning the bearer header value and the user id.
macro_rules! sign_in {
    ($app:expr, $username:expr) => {
        sign_in!($app, $username, false)
    };
    ($app:expr, $username:expr, $admin:expr) => {{
        let email = format!("{}@x.com", $username);
        let (status, _) = register!($app, $username, &email, "pw", $admin);
        assert_eq!(status, StatusCode::CREATED);
        let (status, body) = login!($app, &email, "pw");
        assert_eq!(status, StatusCode::OK);
        (
            format!("Bearer {}", body["token"].as_str().unwrap()),
            body["id"].as_str().unwrap().to_string(),
        )
    }};
}

macro_rules! create_post {
    ($app:expr, $bearer:expr) => {{
        let (status, body) = send!(
            $app,
            test::TestRequest::post()
                .uri("/posts")
                .insert_header((header::AUTHORIZATION, $bearer.clone()))
                .set_json(json!({ "title": "Hello", "content": "First post" }))
        );
        assert_eq!(status, StatusCode::CREATED);
        body["id"].as_str().unwrap().to_string()
    }};
}

#[actix_web::test]
async fn test_health() {
    let app = test_app!();

    let (status, body) = send!(app, test::TestRequest::get().uri("/health"));

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["timestamp"].is_string());
}

#[actix_web::test]
async fn test_register_then_duplicate_email() {
    let app = test_app!();

    let (status, body) = register!(app, "alice", "a@x.com", "pw1");
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "User registered successfully");

    let (status, body) = register!(app, "alice2", "a@x.com", "pw2");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Email already in use");
}

#[actix_web::test]
async fn test_register_requires_all_fields() {
    let app = test_app!();

    let (status, body) = send!(
        app,
        test::TestRequest::post()
            .uri("/users/register")
            .set_json(json!({ "username": "alice", "email": "a@x.com" }))
    );

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "All fields are required");
}

#[actix_web::test]
async fn test_malformed_body_is_bad_request() {
    let app = test_app!();

    let (status, body) = send!(
        app,
        test::TestRequest::post()
            .uri("/users/login")
            .insert_header((header::CONTENT_TYPE, "application/json"))
            .set_payload("{not json")
    );

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
}

#[actix_web::test]
async fn test_login() {
    let app = test_app!();
    register!(app, "alice", "a@x.com", "pw1");

    let (status, body) = login!(app, "a@x.com", "wrong");
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["detail"], "Invalid credentials");

    let (status, body) = login!(app, "nobody@x.com", "pw1");
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["detail"], "User not found");

    let (status, body) = login!(app, "a@x.com", "pw1");
    assert_eq!(status, StatusCode::OK);
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
    assert_eq!(body["username"], "alice");
    assert_eq!(body["email"], "a@x.com");
    assert_eq!(body["isAdmin"], false);
    assert_eq!(body["expiresIn"], 7 * 24 * 3600);
    assert!(body.get("password").is_none());
}

#[actix_web::test]
async fn test_login_without_secret_is_server_error() {
    let app = test_app!(JwtConfig::default());
    let (status, _) = register!(app, "alice", "a@x.com", "pw1");
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = login!(app, "a@x.com", "pw1");

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["detail"], "Server error: Missing JWT secret");
}

#[actix_web::test]
async fn test_protected_route_requires_valid_token() {
    let app = test_app!();
    let post = json!({ "title": "t", "content": "c" });

    let (status, body) = send!(
        app,
        test::TestRequest::post().uri("/posts").set_json(post.clone())
    );
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["detail"], "No token provided");

    let (status, body) = send!(
        app,
        test::TestRequest::post()
            .uri("/posts")
            .insert_header((header::AUTHORIZATION, "Bearer not-a-token"))
            .set_json(post)
    );
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["detail"], "Invalid token");
}

#[actix_web::test]
async fn test_post_ownership() {
    let app = test_app!();
    let (alice, alice_id) = sign_in!(app, "alice");
    let (bob, _) = sign_in!(app, "bob");

    let (status, body) = send!(
        app,
        test::TestRequest::post()
            .uri("/posts")
            .insert_header((header::AUTHORIZATION, alice.clone()))
            .set_json(json!({ "title": "Hello", "content": "First post" }))
    );
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["author"]["id"], alice_id.as_str());
    assert_eq!(body["author"]["username"], "alice");
    let post_id = body["id"].as_str().unwrap().to_string();

    let (status, body) = send!(
        app,
        test::TestRequest::delete()
            .uri(&format!("/posts/{post_id}"))
            .insert_header((header::AUTHORIZATION, bob))
    );
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["detail"], "Unauthorized to delete this post");

    let (status, _) = send!(
        app,
        test::TestRequest::get().uri(&format!("/posts/{post_id}"))
    );
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send!(
        app,
        test::TestRequest::delete()
            .uri(&format!("/posts/{post_id}"))
            .insert_header((header::AUTHORIZATION, alice))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Post deleted successfully");

    let (status, body) = send!(
        app,
        test::TestRequest::get().uri(&format!("/posts/{post_id}"))
    );
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Post not found");
}

#[actix_web::test]
async fn test_create_post_requires_title_and_content() {
    let app = test_app!();
    let (alice, _) = sign_in!(app, "alice");

    let (status, body) = send!(
        app,
        test::TestRequest::post()
            .uri("/posts")
            .insert_header((header::AUTHORIZATION, alice))
            .set_json(json!({ "title": "only a title" }))
    );

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Title and content are required");
}

#[actix_web::test]
async fn test_listings() {
    let app = test_app!();
    let (alice, alice_id) = sign_in!(app, "alice");
    let (bob, _) = sign_in!(app, "bob");

    let first = create_post!(app, alice);
    create_post!(app, bob);
    let second = create_post!(app, alice);

    let (status, body) = send!(app, test::TestRequest::get().uri("/posts"));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 3);

    let (status, body) = send!(
        app,
        test::TestRequest::get().uri(&format!("/posts/user/{alice_id}"))
    );
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec![first.as_str(), second.as_str()]);
}

#[actix_web::test]
async fn test_comment_ownership() {
    let app = test_app!();
    let (alice, _) = sign_in!(app, "alice");
    let (bob, bob_id) = sign_in!(app, "bob");
    let post_id = create_post!(app, alice);

    let (status, body) = send!(
        app,
        test::TestRequest::post()
            .uri(&format!("/comments/{post_id}"))
            .insert_header((header::AUTHORIZATION, bob.clone()))
            .set_json(json!({ "content": "hi" }))
    );
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["content"], "hi");
    assert_eq!(body["post"], post_id.as_str());
    assert_eq!(body["author"]["id"], bob_id.as_str());
    let comment_id = body["id"].as_str().unwrap().to_string();

    let (status, body) = send!(
        app,
        test::TestRequest::get().uri(&format!("/posts/{post_id}"))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["comments"][0]["id"], comment_id.as_str());
    assert_eq!(body["comments"][0]["author"]["username"], "bob");

    let (status, body) = send!(
        app,
        test::TestRequest::delete()
            .uri(&format!("/comments/{post_id}/{comment_id}"))
            .insert_header((header::AUTHORIZATION, alice))
    );
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["detail"], "Unauthorized to delete this comment");

    let (status, body) = send!(
        app,
        test::TestRequest::delete()
            .uri(&format!("/posts/{post_id}/comments/{comment_id}"))
            .insert_header((header::AUTHORIZATION, bob))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Comment deleted successfully");

    let (status, body) = send!(
        app,
        test::TestRequest::get().uri(&format!("/comments/{post_id}"))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[actix_web::test]
async fn test_comment_validation_and_missing_post() {
    let app = test_app!();
    let (alice, _) = sign_in!(app, "alice");
    let post_id = create_post!(app, alice);

    let (status, body) = send!(
        app,
        test::TestRequest::post()
            .uri(&format!("/comments/{post_id}"))
            .insert_header((header::AUTHORIZATION, alice.clone()))
            .set_json(json!({ "content": "   " }))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Comment cannot be empty");

    let missing = uuid::Uuid::new_v4();
    let (status, body) = send!(
        app,
        test::TestRequest::post()
            .uri(&format!("/comments/{missing}"))
            .insert_header((header::AUTHORIZATION, alice.clone()))
            .set_json(json!({ "content": "hi" }))
    );
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Post not found");

    let (status, body) = send!(
        app,
        test::TestRequest::delete()
            .uri(&format!("/comments/{post_id}/{missing}"))
            .insert_header((header::AUTHORIZATION, alice))
    );
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Comment not found");
}

#[actix_web::test]
async fn test_malformed_ids() {
    let app = test_app!();
    let (alice, _) = sign_in!(app, "alice");
    let post_id = create_post!(app, alice);

    let (status, body) = send!(app, test::TestRequest::get().uri("/posts/not-a-uuid"));
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Invalid post id");

    let (status, body) = send!(app, test::TestRequest::get().uri("/posts/user/42"));
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Invalid user id");

    let (status, body) = send!(
        app,
        test::TestRequest::delete()
            .uri(&format!("/comments/{post_id}/nope"))
            .insert_header((header::AUTHORIZATION, alice))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Invalid comment id");
}

#[actix_web::test]
async fn test_admin_privileges() {
    let app = test_app!();
    let (alice, _) = sign_in!(app, "alice");
    let (root, _) = sign_in!(app, "root", true);
    let post_id = create_post!(app, alice);

    let (status, body) = send!(
        app,
        test::TestRequest::get()
            .uri("/admin-only")
            .insert_header((header::AUTHORIZATION, alice))
    );
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["detail"], "Access denied. Admins only.");

    let (status, body) = send!(
        app,
        test::TestRequest::get()
            .uri("/admin-only")
            .insert_header((header::AUTHORIZATION, root.clone()))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["admin"], "root");

    let (status, _) = send!(
        app,
        test::TestRequest::delete()
            .uri(&format!("/posts/{post_id}"))
            .insert_header((header::AUTHORIZATION, root))
    );
    assert_eq!(status, StatusCode::OK);
}
