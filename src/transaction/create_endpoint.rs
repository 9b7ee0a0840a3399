//! Defines the endpoint for creating a new transaction.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::Deserialize;
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    api_response::ApiResponse,
    transaction::{Transaction, TransactionBuilder, TransactionType, core::create_transaction},
};

const INVALID_DATA_MESSAGE: &str = "Invalid transaction data";
const FAILURE_MESSAGE: &str = "Failed to create transaction";

/// The state needed to create a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The JSON body for creating a transaction.
///
/// Every field is optional here so that a missing field can be reported by
/// name instead of as a generic deserialization error.
#[derive(Debug, Default, Deserialize)]
pub struct TransactionRequest {
    /// Either "income" or "expense".
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
    /// The value of the transaction.
    pub amount: Option<f64>,
    /// A label such as "Rent" or "Salary".
    pub category: Option<String>,
    /// Text detailing the transaction.
    pub description: Option<String>,
    /// When the transaction occurred, as an RFC 3339 timestamp.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub date: Option<OffsetDateTime>,
}

impl TransactionRequest {
    /// Check the required fields are present and convert the request into a builder.
    ///
    /// Fields are checked in the order type, amount, category. Empty or
    /// whitespace-only strings count as missing.
    ///
    /// # Errors
    /// Returns [Error::MissingField] naming the first missing field, or
    /// [Error::InvalidTransactionType] if the type is not "income" or "expense".
    pub fn into_builder(self) -> Result<TransactionBuilder, Error> {
        let transaction_type = self
            .transaction_type
            .filter(|transaction_type| !transaction_type.trim().is_empty())
            .ok_or(Error::MissingField("type"))?;
        let amount = self.amount.ok_or(Error::MissingField("amount"))?;
        let category = self
            .category
            .filter(|category| !category.trim().is_empty())
            .ok_or(Error::MissingField("category"))?;

        let transaction_type: TransactionType = transaction_type.parse()?;
        let description = self
            .description
            .filter(|description| !description.trim().is_empty());

        Ok(Transaction::build(transaction_type, amount, &category)
            .description(description)
            .date(self.date))
    }
}

/// A route handler for creating a new transaction.
///
/// Responds with 201 and the stored transaction on success, 400 if the body
/// is invalid and 500 if the transaction could not be stored.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    request: Result<Json<TransactionRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match request {
        Ok(request) => request,
        Err(rejection) => {
            return Error::InvalidRequestBody(rejection.body_text())
                .into_api_response(INVALID_DATA_MESSAGE);
        }
    };

    let builder = match request.into_builder() {
        Ok(builder) => builder,
        Err(error) => return error.into_api_response(INVALID_DATA_MESSAGE),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(_) => return Error::DatabaseLockError.into_api_response(FAILURE_MESSAGE),
    };

    match create_transaction(builder, &connection) {
        Ok(transaction) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(
                transaction,
                "Transaction created successfully",
            )),
        )
            .into_response(),
        Err(error) if error.status_code() == StatusCode::BAD_REQUEST => {
            error.into_api_response(INVALID_DATA_MESSAGE)
        }
        Err(error) => error.into_api_response(FAILURE_MESSAGE),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Json,
        body::{Body, to_bytes},
        extract::State,
        http::{Response, StatusCode},
    };
    use rusqlite::Connection;
    use serde_json::Value;
    use time::macros::datetime;

    use crate::{
        Error,
        api_response::ApiResponse,
        db::initialize,
        transaction::{
            Transaction, TransactionType, count_transactions,
            create_endpoint::{CreateTransactionState, TransactionRequest},
            create_transaction_endpoint, get_all_transactions,
        },
    };

    fn get_test_state() -> CreateTransactionState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        CreateTransactionState {
            db_connection: Arc::new(Mutex::new(conn)),
        }
    }

    fn valid_request() -> TransactionRequest {
        TransactionRequest {
            transaction_type: Some("expense".to_owned()),
            amount: Some(300.0),
            category: Some("Food".to_owned()),
            description: Some("Lunch from Café".to_owned()),
            date: None,
        }
    }

    async fn parse_body(response: Response<Body>) -> Value {
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[test]
    fn request_with_all_fields_becomes_builder() {
        let date = datetime!(2025-06-01 08:00 UTC);
        let request = TransactionRequest {
            date: Some(date),
            ..valid_request()
        };

        let builder = request.into_builder().unwrap();

        assert_eq!(
            builder,
            Transaction::build(TransactionType::Expense, 300.0, "Food")
                .description(Some("Lunch from Café".to_owned()))
                .date(Some(date))
        );
    }

    #[test]
    fn reports_first_missing_field() {
        let cases = [
            (
                TransactionRequest {
                    transaction_type: None,
                    ..valid_request()
                },
                "type",
            ),
            (
                TransactionRequest {
                    amount: None,
                    ..valid_request()
                },
                "amount",
            ),
            (
                TransactionRequest {
                    category: None,
                    ..valid_request()
                },
                "category",
            ),
            (
                TransactionRequest {
                    category: Some("  ".to_owned()),
                    ..valid_request()
                },
                "category",
            ),
            (
                TransactionRequest {
                    transaction_type: Some(String::new()),
                    ..valid_request()
                },
                "type",
            ),
            (
                TransactionRequest {
                    transaction_type: Some(" \t".to_owned()),
                    ..valid_request()
                },
                "type",
            ),
            (TransactionRequest::default(), "type"),
        ];

        for (request, want_field) in cases {
            assert_eq!(
                request.into_builder(),
                Err(Error::MissingField(want_field))
            );
        }
    }

    #[test]
    fn rejects_unknown_type() {
        let request = TransactionRequest {
            transaction_type: Some("transfer".to_owned()),
            ..valid_request()
        };

        assert_eq!(
            request.into_builder(),
            Err(Error::InvalidTransactionType("transfer".to_owned()))
        );
    }

    #[test]
    fn blank_description_is_dropped() {
        let request = TransactionRequest {
            description: Some(String::new()),
            ..valid_request()
        };

        assert_eq!(request.into_builder().unwrap().description, None);
    }

    #[tokio::test]
    async fn can_create_transaction() {
        let state = get_test_state();

        let response =
            create_transaction_endpoint(State(state.clone()), Ok(Json(valid_request()))).await;

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: ApiResponse<Transaction> = serde_json::from_slice(&body).unwrap();
        assert!(body.success);
        assert_eq!(body.message, "Transaction created successfully");
        let created = body.data.expect("response should contain the transaction");

        let connection = state.db_connection.lock().unwrap();
        let stored = get_all_transactions(&connection).unwrap();
        assert_eq!(stored, vec![created]);
    }

    #[tokio::test]
    async fn missing_field_is_bad_request() {
        let state = get_test_state();
        let request = TransactionRequest {
            amount: None,
            ..valid_request()
        };

        let response = create_transaction_endpoint(State(state.clone()), Ok(Json(request))).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = parse_body(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Missing required field: amount");
        assert_eq!(body["message"], "Invalid transaction data");
        let connection = state.db_connection.lock().unwrap();
        assert_eq!(count_transactions(&connection), Ok(0));
    }

    #[tokio::test]
    async fn negative_amount_is_bad_request() {
        let state = get_test_state();
        let request = TransactionRequest {
            amount: Some(-1.0),
            ..valid_request()
        };

        let response = create_transaction_endpoint(State(state.clone()), Ok(Json(request))).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = parse_body(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Invalid transaction data");
    }

    #[tokio::test]
    async fn zero_amount_is_accepted() {
        let state = get_test_state();
        let request = TransactionRequest {
            amount: Some(0.0),
            ..valid_request()
        };

        let response = create_transaction_endpoint(State(state), Ok(Json(request))).await;

        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn storage_failure_is_internal_server_error() {
        // A database without the transaction table makes every insert fail.
        let state = CreateTransactionState {
            db_connection: Arc::new(Mutex::new(Connection::open_in_memory().unwrap())),
        };

        let response = create_transaction_endpoint(State(state), Ok(Json(valid_request()))).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = parse_body(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Failed to create transaction");
    }
}
