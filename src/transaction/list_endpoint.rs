//! Defines the endpoint for listing every transaction.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error, api_response::ApiResponse, transaction::core::get_all_transactions,
};

const FAILURE_MESSAGE: &str = "Failed to retrieve transactions";

/// The state needed to list transactions.
#[derive(Debug, Clone)]
pub struct ListTransactionsState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ListTransactionsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler that responds with all transactions, newest first.
pub async fn list_transactions_endpoint(State(state): State<ListTransactionsState>) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(_) => return Error::DatabaseLockError.into_api_response(FAILURE_MESSAGE),
    };

    match get_all_transactions(&connection) {
        Ok(transactions) => Json(ApiResponse::success(
            transactions,
            "Transactions retrieved successfully",
        ))
        .into_response(),
        Err(error) => error.into_api_response(FAILURE_MESSAGE),
    }
}
