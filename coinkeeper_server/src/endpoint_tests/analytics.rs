use actix_web::{http::StatusCode, test, test::TestRequest, web, web::ServiceConfig, App};
use coinkeeper_engine::AnalyticsApi;
use serde_json::{json, Value};

use super::{
    helpers::{auth_header, budget_fixture, expense_fixture},
    mocks::MockLedger,
};
use crate::{
    auth::TokenVerifier,
    config::AuthConfig,
    routes::{BudgetAlertsRoute, BudgetComparisonRoute, CategoryTotalsRoute, SpendingTrendsRoute},
};

const USER_ID: i64 = 42;

fn configure_app(config: AuthConfig, ledger: MockLedger) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        let api = AnalyticsApi::new(ledger);
        cfg.app_data(web::Data::new(api))
            .app_data(web::Data::new(TokenVerifier::new(&config)))
            .service(BudgetAlertsRoute::<MockLedger>::new())
            .service(SpendingTrendsRoute::<MockLedger>::new())
            .service(CategoryTotalsRoute::<MockLedger>::new())
            .service(BudgetComparisonRoute::<MockLedger>::new());
    }
}

#[actix_web::test]
async fn alerts_classify_each_budget() {
    let _ = env_logger::try_init().ok();
    let mut ledger = MockLedger::new();
    ledger.expect_fetch_budgets_for_user().returning(|user_id| {
        Ok(vec![budget_fixture(1, user_id, "Food", 10_000), budget_fixture(2, user_id, "Transport", 5000)])
    });
    ledger.expect_search_expenses().returning(|filter| {
        let user_id = filter.user_id.unwrap_or_default();
        Ok(vec![
            expense_fixture(1, user_id, "Groceries", "Food", 9500, "2024-06-03T12:00:00Z"),
            expense_fixture(2, user_id, "Bus pass", "Transport", 6000, "2024-06-04T08:00:00Z"),
        ])
    });
    let config = AuthConfig::default();
    let app = test::init_service(App::new().configure(configure_app(config.clone(), ledger))).await;

    let req = TestRequest::get()
        .uri("/budgets/alerts")
        .insert_header(auth_header(&config, USER_ID, "user@example.com"))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["has_budgets"], true);
    let food = &body["categories"][0];
    assert_eq!(food["category"], "Food");
    assert_eq!(food["status"], "near_limit");
    assert_eq!(food["is_near_limit"], true);
    assert_eq!(food["percent_used"], 95);
    assert_eq!(food["remaining"], json!(5.0));
    let transport = &body["categories"][1];
    assert_eq!(transport["status"], "over_budget");
    assert_eq!(transport["is_over_budget"], true);
    assert_eq!(transport["percent_used"], 120);
}

#[actix_web::test]
async fn alerts_without_budgets_say_so() {
    let _ = env_logger::try_init().ok();
    let mut ledger = MockLedger::new();
    ledger.expect_fetch_budgets_for_user().returning(|_| Ok(vec![]));
    // No search_expenses expectation: the expense query must be skipped entirely
    let config = AuthConfig::default();
    let app = test::init_service(App::new().configure(configure_app(config.clone(), ledger))).await;

    let req = TestRequest::get()
        .uri("/budgets/alerts")
        .insert_header(auth_header(&config, USER_ID, "user@example.com"))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["has_budgets"], false);
    assert_eq!(body["categories"].as_array().map(Vec::len), Some(0));
}

#[actix_web::test]
async fn trends_bucket_expenses_by_week() {
    let _ = env_logger::try_init().ok();
    let mut ledger = MockLedger::new();
    ledger.expect_search_expenses().returning(|filter| {
        let user_id = filter.user_id.unwrap_or_default();
        Ok(vec![
            // Week of Sunday Jun 2 and week of Sunday Jun 9, 2024
            expense_fixture(1, user_id, "Lunch", "Food", 1250, "2024-06-03T12:00:00Z"),
            expense_fixture(2, user_id, "Cinema", "Leisure", 1500, "2024-06-08T20:00:00Z"),
            expense_fixture(3, user_id, "Taxi", "Transport", 800, "2024-06-10T09:00:00Z"),
        ])
    });
    let config = AuthConfig::default();
    let app = test::init_service(App::new().configure(configure_app(config.clone(), ledger))).await;

    let req = TestRequest::get()
        .uri("/analytics/trends")
        .insert_header(auth_header(&config, USER_ID, "user@example.com"))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body.as_array().map(Vec::len), Some(2));
    assert_eq!(body[0]["week"], "Jun 2");
    assert_eq!(body[0]["total"], json!(27.5));
    assert_eq!(body[1]["week"], "Jun 9");
    assert_eq!(body[1]["total"], json!(8.0));
}

#[actix_web::test]
async fn category_totals_group_the_month() {
    let _ = env_logger::try_init().ok();
    let mut ledger = MockLedger::new();
    ledger.expect_search_expenses().returning(|filter| {
        let user_id = filter.user_id.unwrap_or_default();
        Ok(vec![
            expense_fixture(1, user_id, "Lunch", "Food", 1250, "2024-06-03T12:00:00Z"),
            expense_fixture(2, user_id, "Dinner", "Food", 2250, "2024-06-05T19:00:00Z"),
            expense_fixture(3, user_id, "Taxi", "Transport", 800, "2024-06-04T09:00:00Z"),
        ])
    });
    let config = AuthConfig::default();
    let app = test::init_service(App::new().configure(configure_app(config.clone(), ledger))).await;

    let req = TestRequest::get()
        .uri("/analytics/categories")
        .insert_header(auth_header(&config, USER_ID, "user@example.com"))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body.as_array().map(Vec::len), Some(2));
    assert_eq!(body[0]["category"], "Food");
    assert_eq!(body[0]["amount"], json!(35.0));
    assert_eq!(body[1]["category"], "Transport");
    assert_eq!(body[1]["amount"], json!(8.0));
}

#[actix_web::test]
async fn comparison_pairs_budgets_with_actuals() {
    let _ = env_logger::try_init().ok();
    let mut ledger = MockLedger::new();
    ledger.expect_fetch_budgets_for_user().returning(|user_id| {
        Ok(vec![budget_fixture(1, user_id, "Food", 10_000), budget_fixture(2, user_id, "Rent", 100_000)])
    });
    ledger.expect_search_expenses().returning(|filter| {
        let user_id = filter.user_id.unwrap_or_default();
        Ok(vec![expense_fixture(1, user_id, "Groceries", "Food", 2500, "2024-06-03T12:00:00Z")])
    });
    let config = AuthConfig::default();
    let app = test::init_service(App::new().configure(configure_app(config.clone(), ledger))).await;

    let req = TestRequest::get()
        .uri("/analytics/budget-comparison")
        .insert_header(auth_header(&config, USER_ID, "user@example.com"))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body.as_array().map(Vec::len), Some(2));
    assert_eq!(body[0]["category"], "Food");
    assert_eq!(body[0]["budget"], json!(100.0));
    assert_eq!(body[0]["actual"], json!(25.0));
    assert_eq!(body[1]["category"], "Rent");
    assert_eq!(body[1]["actual"], json!(0.0));
}
