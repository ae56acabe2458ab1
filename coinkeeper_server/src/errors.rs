use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use coinkeeper_engine::{
    traits::{BudgetError, ExpenseError, UserAccountError},
    AnalyticsError,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("Could not read request path: {0}")]
    InvalidRequestPath(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
    #[error("Authentication Error. {0}")]
    AuthenticationError(#[from] AuthError),
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("The data was not found. {0}")]
    NoRecordFound(String),
    #[error("Insufficient Permissions. {0}")]
    InsufficientPermissions(String),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::InvalidRequestPath(_) => StatusCode::BAD_REQUEST,
            Self::AuthenticationError(e) => match e {
                AuthError::TokenCreation(_) => StatusCode::INTERNAL_SERVER_ERROR,
                _ => StatusCode::UNAUTHORIZED,
            },
            Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NoRecordFound(_) => StatusCode::NOT_FOUND,
            Self::InsufficientPermissions(_) => StatusCode::FORBIDDEN,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "error": self.to_string() }).to_string())
    }
}

#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("No access token provided.")]
    MissingToken,
    #[error("Authorization header is not in the correct format. {0}")]
    PoorlyFormattedHeader(String),
    #[error("Access token is invalid. {0}")]
    ValidationError(String),
    #[error("Session expired. Please log in again.")]
    TokenExpired,
    #[error("Could not create access token. {0}")]
    TokenCreation(String),
}

impl From<UserAccountError> for ServerError {
    fn from(e: UserAccountError) -> Self {
        match e {
            UserAccountError::EmailTaken(_) => Self::InvalidRequestBody(e.to_string()),
            UserAccountError::InvalidCredentials => Self::InvalidCredentials,
            UserAccountError::UserNotFound(_) => Self::NoRecordFound(e.to_string()),
            UserAccountError::DatabaseError(e) => Self::BackendError(format!("Database error: {e}")),
            UserAccountError::PasswordHash(e) => Self::BackendError(format!("Password hashing error: {e}")),
        }
    }
}

impl From<ExpenseError> for ServerError {
    fn from(e: ExpenseError) -> Self {
        match e {
            ExpenseError::ExpenseNotFound(_) => Self::NoRecordFound(e.to_string()),
            ExpenseError::NotOwnedByUser(_) => Self::InsufficientPermissions(e.to_string()),
            ExpenseError::DatabaseError(e) => Self::BackendError(format!("Database error: {e}")),
        }
    }
}

impl From<BudgetError> for ServerError {
    fn from(e: BudgetError) -> Self {
        match e {
            BudgetError::DuplicateCategory(_) => Self::InvalidRequestBody(e.to_string()),
            BudgetError::BudgetNotFound(_) => Self::NoRecordFound(e.to_string()),
            BudgetError::NotOwnedByUser(_) => Self::InsufficientPermissions(e.to_string()),
            BudgetError::DatabaseError(e) => Self::BackendError(format!("Database error: {e}")),
        }
    }
}

impl From<AnalyticsError> for ServerError {
    fn from(e: AnalyticsError) -> Self {
        match e {
            AnalyticsError::Expense(e) => e.into(),
            AnalyticsError::Budget(e) => e.into(),
        }
    }
}
