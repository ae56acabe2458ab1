use actix_web::{http::StatusCode, test, test::TestRequest, web, web::ServiceConfig, App};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2,
};
use coinkeeper_engine::UserApi;
use log::*;
use serde_json::json;

use super::{
    helpers::{auth_header, user_fixture, user_from_new},
    mocks::MockUserManager,
};
use crate::{
    auth::{TokenIssuer, TokenVerifier},
    config::AuthConfig,
    data_objects::AuthResponse,
    routes::{CheckTokenRoute, LoginRoute, RegisterRoute},
};

fn configure_app(config: AuthConfig, user_manager: MockUserManager) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        let api = UserApi::new(user_manager);
        cfg.app_data(web::Data::new(api))
            .app_data(web::Data::new(TokenIssuer::new(&config)))
            .app_data(web::Data::new(TokenVerifier::new(&config)))
            .service(RegisterRoute::<MockUserManager>::new())
            .service(LoginRoute::<MockUserManager>::new())
            .service(CheckTokenRoute::new());
    }
}

fn hash_of(password: &str) -> String {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default().hash_password(password.as_bytes(), &salt).unwrap().to_string()
}

#[actix_web::test]
async fn register_issues_a_token() {
    let _ = env_logger::try_init().ok();
    let mut manager = MockUserManager::new();
    manager.expect_fetch_user_by_email().returning(|_| Ok(None));
    manager.expect_create_user().returning(|new_user| Ok(user_from_new(1, new_user)));
    let config = AuthConfig::default();
    let app = test::init_service(App::new().configure(configure_app(config.clone(), manager))).await;

    let req = TestRequest::post()
        .uri("/auth/register")
        .set_json(json!({"name": "Alice", "email": "Alice@Example.com", "password": "hunter2hunter2"}))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: AuthResponse = test::read_body_json(res).await;
    assert_eq!(body.user.id, 1);
    assert_eq!(body.user.email, "alice@example.com");
    let claims = TokenVerifier::new(&config).validate_token(&body.token).expect("token did not verify");
    assert_eq!(claims.sub, 1);
    assert_eq!(claims.email, "alice@example.com");
}

#[actix_web::test]
async fn register_with_missing_fields_is_rejected() {
    let _ = env_logger::try_init().ok();
    // No expectations: the backend must never be touched
    let manager = MockUserManager::new();
    let app = test::init_service(App::new().configure(configure_app(AuthConfig::default(), manager))).await;

    let req = TestRequest::post()
        .uri("/auth/register")
        .set_json(json!({"name": "  ", "email": "alice@example.com", "password": "hunter2hunter2"}))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = String::from_utf8_lossy(&test::read_body(res).await).into_owned();
    assert!(body.contains("All fields are required"), "was: {body}");
}

#[actix_web::test]
async fn register_with_taken_email_is_rejected() {
    let _ = env_logger::try_init().ok();
    let mut manager = MockUserManager::new();
    manager
        .expect_fetch_user_by_email()
        .returning(|email| Ok(Some(user_fixture(7, "Alice", email, "not-a-real-hash"))));
    let app = test::init_service(App::new().configure(configure_app(AuthConfig::default(), manager))).await;

    let req = TestRequest::post()
        .uri("/auth/register")
        .set_json(json!({"name": "Alice", "email": "alice@example.com", "password": "hunter2hunter2"}))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = String::from_utf8_lossy(&test::read_body(res).await).into_owned();
    assert!(body.contains("already registered"), "was: {body}");
}

#[actix_web::test]
async fn login_with_valid_credentials_issues_a_token() {
    let _ = env_logger::try_init().ok();
    let hash = hash_of("open sesame 99");
    let mut manager = MockUserManager::new();
    manager.expect_fetch_user_by_email().returning(move |email| Ok(Some(user_fixture(3, "Bob", email, &hash))));
    let config = AuthConfig::default();
    let app = test::init_service(App::new().configure(configure_app(config.clone(), manager))).await;

    let req = TestRequest::post()
        .uri("/auth/login")
        .set_json(json!({"email": "bob@example.com", "password": "open sesame 99"}))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: AuthResponse = test::read_body_json(res).await;
    let claims = TokenVerifier::new(&config).validate_token(&body.token).expect("token did not verify");
    assert_eq!(claims.sub, 3);
}

#[actix_web::test]
async fn login_failures_are_indistinguishable() {
    let _ = env_logger::try_init().ok();
    let hash = hash_of("the right password");
    let mut manager = MockUserManager::new();
    manager.expect_fetch_user_by_email().returning(move |email| {
        if email == "bob@example.com" {
            Ok(Some(user_fixture(3, "Bob", email, &hash)))
        } else {
            Ok(None)
        }
    });
    let app = test::init_service(App::new().configure(configure_app(AuthConfig::default(), manager))).await;

    // Wrong password for a known user
    let req = TestRequest::post()
        .uri("/auth/login")
        .set_json(json!({"email": "bob@example.com", "password": "the wrong password"}))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let wrong_password_body = String::from_utf8_lossy(&test::read_body(res).await).into_owned();

    // Unknown user entirely
    let req = TestRequest::post()
        .uri("/auth/login")
        .set_json(json!({"email": "nobody@example.com", "password": "the right password"}))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let unknown_user_body = String::from_utf8_lossy(&test::read_body(res).await).into_owned();

    debug!("Login failure body: {wrong_password_body}");
    assert_eq!(wrong_password_body, unknown_user_body);
    assert!(wrong_password_body.contains("Invalid email or password"), "was: {wrong_password_body}");
}

#[actix_web::test]
async fn check_token_accepts_a_valid_token() {
    let _ = env_logger::try_init().ok();
    let config = AuthConfig::default();
    let app = test::init_service(App::new().configure(configure_app(config.clone(), MockUserManager::new()))).await;

    let req = TestRequest::get()
        .uri("/auth/check_token")
        .insert_header(auth_header(&config, 5, "carol@example.com"))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = String::from_utf8_lossy(&test::read_body(res).await).into_owned();
    assert_eq!(body, "Token is valid.");
}

#[actix_web::test]
async fn requests_without_a_token_are_unauthorized() {
    let _ = env_logger::try_init().ok();
    let app =
        test::init_service(App::new().configure(configure_app(AuthConfig::default(), MockUserManager::new()))).await;

    let req = TestRequest::get().uri("/auth/check_token").to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body = String::from_utf8_lossy(&test::read_body(res).await).into_owned();
    assert!(body.contains("No access token provided"), "was: {body}");
}

#[actix_web::test]
async fn forged_tokens_are_unauthorized() {
    let _ = env_logger::try_init().ok();
    let config = AuthConfig::default();
    let app = test::init_service(App::new().configure(configure_app(config, MockUserManager::new()))).await;

    // Signed under a different secret
    let foreign = auth_header(&AuthConfig::default(), 5, "carol@example.com");
    let req = TestRequest::get().uri("/auth/check_token").insert_header(foreign).to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let req = TestRequest::get()
        .uri("/auth/check_token")
        .insert_header(("Authorization", "Bearer made-up-nonsense"))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}
