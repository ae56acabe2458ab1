use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use coinkeeper_engine::{run_migrations, AnalyticsApi, BudgetApi, ExpenseApi, SqliteDatabase, UserApi};

use crate::{
    auth::{TokenIssuer, TokenVerifier},
    config::ServerConfig,
    errors::ServerError,
    routes::{
        health,
        BudgetAlertsRoute,
        BudgetComparisonRoute,
        CategoryTotalsRoute,
        CheckTokenRoute,
        DeleteBudgetRoute,
        DeleteExpenseRoute,
        LoginRoute,
        MyBudgetsRoute,
        MyExpensesRoute,
        NewBudgetRoute,
        NewExpenseRoute,
        RegisterRoute,
        SpendingTrendsRoute,
    },
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    run_migrations(db.pool()).await.map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let srv = create_server_instance(config, db)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(config: ServerConfig, db: SqliteDatabase) -> Result<Server, ServerError> {
    let host = config.host.clone();
    let port = config.port;
    let srv = HttpServer::new(move || {
        let user_api = UserApi::new(db.clone());
        let expense_api = ExpenseApi::new(db.clone());
        let budget_api = BudgetApi::new(db.clone());
        let analytics_api = AnalyticsApi::new(db.clone());
        let jwt_signer = TokenIssuer::new(&config.auth);
        let jwt_verifier = TokenVerifier::new(&config.auth);
        // Resources match in registration order, so the literal /budgets/alerts path must come before
        // /budgets/{id}.
        let api_scope = web::scope("/api")
            .service(RegisterRoute::<SqliteDatabase>::new())
            .service(LoginRoute::<SqliteDatabase>::new())
            .service(CheckTokenRoute::new())
            .service(MyExpensesRoute::<SqliteDatabase>::new())
            .service(NewExpenseRoute::<SqliteDatabase>::new())
            .service(DeleteExpenseRoute::<SqliteDatabase>::new())
            .service(BudgetAlertsRoute::<SqliteDatabase>::new())
            .service(MyBudgetsRoute::<SqliteDatabase>::new())
            .service(NewBudgetRoute::<SqliteDatabase>::new())
            .service(DeleteBudgetRoute::<SqliteDatabase>::new())
            .service(SpendingTrendsRoute::<SqliteDatabase>::new())
            .service(CategoryTotalsRoute::<SqliteDatabase>::new())
            .service(BudgetComparisonRoute::<SqliteDatabase>::new());
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("ck::access_log"))
            .app_data(web::Data::new(user_api))
            .app_data(web::Data::new(expense_api))
            .app_data(web::Data::new(budget_api))
            .app_data(web::Data::new(analytics_api))
            .app_data(web::Data::new(jwt_signer))
            .app_data(web::Data::new(jwt_verifier))
            .service(health)
            .service(api_scope)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((host.as_str(), port))?
    .run();
    Ok(srv)
}
