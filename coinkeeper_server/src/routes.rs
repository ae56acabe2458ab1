//! Request handler definitions
//!
//! Define each route and it handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will cause the
//! current worker to stop processing new requests. For this reason, any long, non-cpu-bound operation (e.g. I/O,
//! database operations, etc.) should be expressed as futures or asynchronous functions. Async handlers get executed
//! concurrently by worker threads and thus don't block execution.
use actix_web::{get, web, HttpResponse, Responder};
use chrono::Utc;
use ck_common::Cents;
use coinkeeper_engine::{
    db_types::{NewBudget, NewExpense},
    traits::{BudgetManagement, ExpenseManagement, UserManagement},
    AnalyticsApi,
    BudgetApi,
    ExpenseApi,
    UserApi,
};
use log::*;

use crate::{
    auth::{JwtClaims, TokenIssuer},
    data_objects::{
        AuthResponse,
        JsonResponse,
        LoginRequest,
        NewBudgetRequest,
        NewExpenseRequest,
        RegisterRequest,
    },
    errors::ServerError,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal) => {
        paste::paste! { pub struct [<$name:camel Route>];}
        paste::paste! {
                impl [<$name:camel Route>] {
                #[allow(clippy::new_without_default)]
                pub fn new() -> Self { Self }
            }
        }
        paste::paste! {
            impl actix_web::dev::HttpServiceFactory for [<$name:camel Route>] {
                fn register(self, config: &mut actix_web::dev::AppService) {
                    let res = actix_web::Resource::new($path)
                        .name(stringify!($name))
                        .guard(actix_web::guard::$method())
                        .to($name);
                    actix_web::dev::HttpServiceFactory::register(res, config);
                }
            }
        }
    };

    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]<A>(core::marker::PhantomData<fn() -> A>);}
        paste::paste! { impl<A> [<$name:camel Route>]<A> {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self(core::marker::PhantomData::<fn() -> A>)
            }
        }}
        paste::paste! { impl<A> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<A>
        where
            A: $($bounds +)+ 'static,
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::<A>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Auth  ----------------------------------------------------
route!(register => Post "/auth/register" impl UserManagement);
/// Route handler for the registration endpoint
///
/// Creates a new user account from a `{name, email, password}` body and immediately issues an access token, so
/// clients don't need a follow-up login call. All three fields are required; a duplicate email is a 400.
pub async fn register<B: UserManagement>(
    body: web::Json<RegisterRequest>,
    api: web::Data<UserApi<B>>,
    signer: web::Data<TokenIssuer>,
) -> Result<HttpResponse, ServerError> {
    let RegisterRequest { name, email, password } = body.into_inner();
    if name.trim().is_empty() || email.trim().is_empty() || password.is_empty() {
        return Err(ServerError::InvalidRequestBody("All fields are required".to_string()));
    }
    debug!("💻️ POST register for {}", email.trim());
    let user = api.register(&name, &email, &password).await?;
    let token = signer.issue_token(user.id, &user.email)?;
    Ok(HttpResponse::Created().json(AuthResponse { token, user: user.into() }))
}

route!(login => Post "/auth/login" impl UserManagement);
/// Route handler for the login endpoint
///
/// Verifies an `{email, password}` pair and issues an access token. Unknown email and wrong password produce the
/// same 401, so the response never reveals whether the address is registered.
pub async fn login<B: UserManagement>(
    body: web::Json<LoginRequest>,
    api: web::Data<UserApi<B>>,
    signer: web::Data<TokenIssuer>,
) -> Result<HttpResponse, ServerError> {
    let LoginRequest { email, password } = body.into_inner();
    debug!("💻️ POST login for {}", email.trim());
    let user = api.verify_credentials(&email, &password).await?;
    let token = signer.issue_token(user.id, &user.email)?;
    Ok(HttpResponse::Ok().json(AuthResponse { token, user: user.into() }))
}

route!(check_token => Get "/auth/check_token");
pub async fn check_token(claims: JwtClaims) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET check_token for user {}", claims.sub);
    Ok(HttpResponse::Ok().body("Token is valid."))
}

//----------------------------------------------   Expenses  ----------------------------------------------------
route!(my_expenses => Get "/expenses" impl ExpenseManagement);
/// Route handler for the expenses listing
///
/// Authenticated users fetch their own expenses using this endpoint. The user id is taken from the access token
/// supplied in the `Authorization` header; there is no way to read another user's records.
pub async fn my_expenses<B: ExpenseManagement>(
    claims: JwtClaims,
    api: web::Data<ExpenseApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET my_expenses for user {}", claims.sub);
    let result = api.expenses_for_user(claims.sub).await?;
    Ok(HttpResponse::Ok().json(result))
}

route!(new_expense => Post "/expenses" impl ExpenseManagement);
/// Route handler for recording an expense
///
/// Title, category, amount and date are all required. The amount may not be negative. If the user has a budget for
/// the (trimmed) category, the stored expense is linked to it.
pub async fn new_expense<B: ExpenseManagement>(
    claims: JwtClaims,
    body: web::Json<NewExpenseRequest>,
    api: web::Data<ExpenseApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let NewExpenseRequest { title, category, amount, date } = body.into_inner();
    if title.trim().is_empty() || category.trim().is_empty() {
        return Err(ServerError::InvalidRequestBody("All fields are required".to_string()));
    }
    if amount < Cents::ZERO {
        return Err(ServerError::InvalidRequestBody("Amount cannot be negative".to_string()));
    }
    debug!("💻️ POST new_expense [{}] for user {}", title.trim(), claims.sub);
    let expense = api.add_expense(NewExpense::new(claims.sub, title, category, amount, date.0)).await?;
    Ok(HttpResponse::Created().json(expense))
}

route!(delete_expense => Delete "/expenses/{id}" impl ExpenseManagement);
/// Route handler for deleting an expense
///
/// The expense must exist (404 otherwise) and belong to the authenticated user (403 otherwise).
pub async fn delete_expense<B: ExpenseManagement>(
    claims: JwtClaims,
    path: web::Path<i64>,
    api: web::Data<ExpenseApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let expense_id = path.into_inner();
    debug!("💻️ DELETE expense {expense_id} for user {}", claims.sub);
    api.delete_expense(claims.sub, expense_id).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::success("Expense deleted")))
}

//----------------------------------------------   Budgets  ----------------------------------------------------
route!(my_budgets => Get "/budgets" impl BudgetManagement);
pub async fn my_budgets<B: BudgetManagement>(
    claims: JwtClaims,
    api: web::Data<BudgetApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET my_budgets for user {}", claims.sub);
    let budgets = api.budgets_for_user(claims.sub).await?;
    Ok(HttpResponse::Ok().json(budgets))
}

route!(new_budget => Post "/budgets" impl BudgetManagement);
/// Route handler for creating a budget
///
/// A user can hold one budget per category; a duplicate is a 400. The limit may not be negative.
pub async fn new_budget<B: BudgetManagement>(
    claims: JwtClaims,
    body: web::Json<NewBudgetRequest>,
    api: web::Data<BudgetApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let NewBudgetRequest { category, limit } = body.into_inner();
    if category.trim().is_empty() {
        return Err(ServerError::InvalidRequestBody("All fields are required".to_string()));
    }
    if limit < Cents::ZERO {
        return Err(ServerError::InvalidRequestBody("Limit cannot be negative".to_string()));
    }
    debug!("💻️ POST new_budget [{}] for user {}", category.trim(), claims.sub);
    let budget = api.add_budget(NewBudget::new(claims.sub, category, limit)).await?;
    Ok(HttpResponse::Created().json(budget))
}

route!(delete_budget => Delete "/budgets/{id}" impl BudgetManagement);
/// Route handler for deleting a budget
///
/// Expenses that were linked to the budget are unlinked, not deleted.
pub async fn delete_budget<B: BudgetManagement>(
    claims: JwtClaims,
    path: web::Path<i64>,
    api: web::Data<BudgetApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let budget_id = path.into_inner();
    debug!("💻️ DELETE budget {budget_id} for user {}", claims.sub);
    api.delete_budget(claims.sub, budget_id).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::success("Budget deleted successfully")))
}

route!(budget_alerts => Get "/budgets/alerts" impl ExpenseManagement, BudgetManagement);
/// Route handler for the budget alerts endpoint
///
/// Classifies each of the user's budgets against the current month's spending as over budget, near the limit
/// (80% or more), or on track. When the user has no budgets at all, the response says so instead of returning an
/// empty classification.
pub async fn budget_alerts<B: ExpenseManagement + BudgetManagement>(
    claims: JwtClaims,
    api: web::Data<AnalyticsApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET budget_alerts for user {}", claims.sub);
    let alerts = api.budget_alerts(claims.sub, Utc::now()).await?;
    Ok(HttpResponse::Ok().json(alerts))
}

//----------------------------------------------   Analytics  ----------------------------------------------------
route!(spending_trends => Get "/analytics/trends" impl ExpenseManagement, BudgetManagement);
/// Route handler for the spending trends endpoint
///
/// Returns weekly spending totals over the trailing 12 weeks, bucketed by the Sunday starting each week.
pub async fn spending_trends<B: ExpenseManagement + BudgetManagement>(
    claims: JwtClaims,
    api: web::Data<AnalyticsApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET spending_trends for user {}", claims.sub);
    let trends = api.spending_trends(claims.sub, Utc::now()).await?;
    Ok(HttpResponse::Ok().json(trends))
}

route!(category_totals => Get "/analytics/categories" impl ExpenseManagement, BudgetManagement);
/// Route handler for the category totals endpoint
///
/// Returns the current calendar month's spending, summed per category.
pub async fn category_totals<B: ExpenseManagement + BudgetManagement>(
    claims: JwtClaims,
    api: web::Data<AnalyticsApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET category_totals for user {}", claims.sub);
    let totals = api.category_totals(claims.sub, Utc::now()).await?;
    Ok(HttpResponse::Ok().json(totals))
}

route!(budget_comparison => Get "/analytics/budget-comparison" impl ExpenseManagement, BudgetManagement);
/// Route handler for the budget comparison endpoint
///
/// Returns, for each budget, the limit and the actual spend in its category for the current calendar month.
pub async fn budget_comparison<B: ExpenseManagement + BudgetManagement>(
    claims: JwtClaims,
    api: web::Data<AnalyticsApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET budget_comparison for user {}", claims.sub);
    let comparison = api.budget_comparison(claims.sub, Utc::now()).await?;
    Ok(HttpResponse::Ok().json(comparison))
}
