//! A minimal personal finance tracker.
//!
//! The library provides a JSON REST API for recording income and expense
//! transactions, listing them and computing budgeting alerts, plus a single
//! HTML page that renders the transactions, their totals and a form for
//! adding new ones.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod alert;
mod api_response;
mod app_state;
mod dashboard;
mod database_id;
mod db;
mod endpoints;
mod health;
mod html;
mod logging;
mod not_found;
mod routing;
mod transaction;

pub use alert::{AlertRule, compute_alerts};
pub use api_response::ApiResponse;
pub use app_state::AppState;
pub use database_id::TransactionId;
pub use db::initialize as initialize_db;
pub use logging::logging_middleware;
pub use routing::build_router;
pub use transaction::{
    Totals, Transaction, TransactionBuilder, TransactionType, create_transaction,
    get_all_transactions,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("Could not listen for the ctrl+c signal: {error}");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
            }
            Err(error) => {
                tracing::error!("Could not install the terminate signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
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
    /// A field that every transaction needs was not included in the request,
    /// or was empty.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// The transaction type was something other than "income" or "expense".
    #[error("Invalid transaction type \"{0}\", expected \"income\" or \"expense\"")]
    InvalidTransactionType(String),

    /// A transaction amount was below zero.
    ///
    /// Whether money was earned or spent is recorded by the transaction type,
    /// so amounts are always non-negative.
    #[error("amount must not be negative, got {0}")]
    NegativeAmount(f64),

    /// A transaction amount was NaN or infinite.
    #[error("amount must be a finite number")]
    NonFiniteAmount,

    /// The request body could not be parsed as the expected JSON object.
    #[error("Invalid request body: {0}")]
    InvalidRequestBody(String),

    /// The requested resource was not found.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(error: rusqlite::Error) -> Self {
        tracing::error!("an unhandled SQL error occurred: {}", error);
        Error::SqlError(error)
    }
}

impl Error {
    /// The HTTP status code the client should receive for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::MissingField(_)
            | Error::InvalidTransactionType(_)
            | Error::NegativeAmount(_)
            | Error::NonFiniteAmount
            | Error::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::SqlError(_) | Error::DatabaseLockError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Convert the error into a JSON failure response with the summary `message`.
    ///
    /// Validation errors are passed on to the client verbatim so that it can
    /// tell which field to fix. Storage errors are logged and replaced with a
    /// generic description.
    pub fn into_api_response(self, message: &str) -> Response {
        let status_code = self.status_code();

        let description = if status_code.is_server_error() {
            tracing::error!("{message}: {self}");
            "An unexpected error occurred, check the server logs for more details.".to_owned()
        } else {
            tracing::debug!("{message}: {self}");
            self.to_string()
        };

        (
            status_code,
            Json(ApiResponse::<()>::failure(description, message)),
        )
            .into_response()
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let message = match self.status_code() {
            StatusCode::BAD_REQUEST => "Invalid request",
            StatusCode::NOT_FOUND => "Not found",
            _ => "Something went wrong",
        };

        self.into_api_response(message)
    }
}
