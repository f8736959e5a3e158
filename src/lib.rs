//! Wallet is a REST API for tracking personal income and expenses.
//!
//! Transactions are recorded per user in a SQLite ledger and served as JSON,
//! along with aggregate reports: lifetime totals, a per-category expense
//! breakdown, a month-over-month comparison, and period-scoped summaries.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod app_state;
mod category;
mod client;
mod db;
mod endpoints;
mod logging;
mod rate_limit;
mod report;
mod routing;
mod transaction;

pub use app_state::AppState;
pub use category::{FALLBACK_ICON, icon_for_category};
pub use client::TransactionsClient;
pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use rate_limit::{RateLimitConfig, RateLimiter};
pub use report::{CategorySummary, MonthlyComparison, Period, Summary};
pub use routing::build_router;
pub use transaction::Transaction;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// An empty string was used for a transaction title.
    #[error("transaction title cannot be empty")]
    EmptyTitle,

    /// An empty string was used for a transaction category.
    #[error("transaction category cannot be empty")]
    EmptyCategory,

    /// An empty string was used for the ID of the user that owns a
    /// transaction.
    #[error("user id cannot be empty")]
    EmptyUserId,

    /// The amount used to create a transaction was not a finite, non-zero
    /// number.
    ///
    /// The sign of the amount is the only signal of transaction direction
    /// (negative = expense, positive = income), so an amount of zero is
    /// rejected rather than stored as a directionless row.
    #[error("invalid transaction amount: {0}")]
    InvalidAmount(String),

    /// The period query parameter was not one of `week`, `month` or `year`.
    #[error("invalid report period \"{0}\", expected one of week, month or year")]
    InvalidPeriod(String),

    /// Tried to delete a transaction that does not exist.
    ///
    /// Repeated deletes of the same ID fail with this error rather than
    /// succeeding as a no-op, so that caller bugs surface.
    #[error("tried to delete a transaction that is not in the database")]
    DeleteMissingTransaction,

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// Could not acquire the database lock.
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status_code, message) = match self {
            Error::EmptyTitle
            | Error::EmptyCategory
            | Error::EmptyUserId
            | Error::InvalidAmount(_)
            | Error::InvalidPeriod(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            Error::DeleteMissingTransaction | Error::NotFound => {
                (StatusCode::NOT_FOUND, self.to_string())
            }
            // Storage and lock failures are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_owned(),
                )
            }
        };

        let body = Json(json!({ "error": message }));

        (status_code, body).into_response()
    }
}

#[cfg(test)]
mod error_tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use crate::Error;

    #[test]
    fn validation_errors_map_to_bad_request() {
        let response = Error::EmptyTitle.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = Error::InvalidPeriod("decade".to_owned()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn missing_resources_map_to_not_found() {
        let response = Error::DeleteMissingTransaction.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = Error::NotFound.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn storage_errors_map_to_internal_server_error() {
        let response = Error::DatabaseLockError.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn no_rows_converts_to_not_found() {
        let error: Error = rusqlite::Error::QueryReturnedNoRows.into();
        assert_eq!(error, Error::NotFound);
    }
}
