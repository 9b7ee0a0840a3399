//! Budgeting alerts computed from all transactions.
//!
//! An alert is raised when the money recorded against one category, rent by
//! default, takes up more than a set share of total income.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    api_response::ApiResponse,
    transaction::{Transaction, TransactionType, get_all_transactions},
};

const FAILURE_MESSAGE: &str = "Failed to retrieve alerts";

/// Decides when spending in a category is too high relative to income.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertRule {
    /// The category to watch, matched case-insensitively.
    pub category: String,
    /// The share of total income, between 0 and 1, that the category total
    /// must exceed to raise an alert.
    pub max_share_of_income: f64,
}

impl Default for AlertRule {
    fn default() -> Self {
        Self {
            category: "rent".to_owned(),
            max_share_of_income: 0.5,
        }
    }
}

impl AlertRule {
    /// Create a rule for `category` that fires above `max_share_of_income`.
    pub fn new(category: &str, max_share_of_income: f64) -> Self {
        Self {
            category: category.to_owned(),
            max_share_of_income,
        }
    }

    fn matches(&self, transaction: &Transaction) -> bool {
        transaction.category.to_lowercase() == self.category.to_lowercase()
    }

    fn is_triggered(&self, total_income: f64, category_total: f64) -> bool {
        total_income > 0.0 && category_total > self.max_share_of_income * total_income
    }

    /// The alert text, e.g. "⚠️ Rent is more than 50% of your income."
    pub fn message(&self) -> String {
        let mut chars = self.category.chars();
        let category: String = match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        };

        let percent = self.max_share_of_income * 100.0;
        let percent = if percent.fract() == 0.0 {
            format!("{percent:.0}")
        } else {
            format!("{percent:.1}")
        };

        format!("⚠️ {category} is more than {percent}% of your income.")
    }
}

/// Compute the alerts for `transactions` under `rule`.
///
/// Income is the sum of all income transactions. The category total includes
/// every transaction in the rule's category regardless of its type.
pub fn compute_alerts(transactions: &[Transaction], rule: &AlertRule) -> Vec<String> {
    let total_income: f64 = transactions
        .iter()
        .filter(|transaction| transaction.transaction_type == TransactionType::Income)
        .map(|transaction| transaction.amount)
        .sum();

    let category_total: f64 = transactions
        .iter()
        .filter(|transaction| rule.matches(transaction))
        .map(|transaction| transaction.amount)
        .sum();

    if rule.is_triggered(total_income, category_total) {
        tracing::debug!(
            "{} total {category_total} exceeds {} of income {total_income}",
            rule.category,
            rule.max_share_of_income
        );
        vec![rule.message()]
    } else {
        Vec::new()
    }
}

/// Load every transaction and compute the alerts for them under `rule`.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn get_alerts(connection: &Connection, rule: &AlertRule) -> Result<Vec<String>, Error> {
    let transactions = get_all_transactions(connection)?;

    Ok(compute_alerts(&transactions, rule))
}

/// The payload of the alerts endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alerts {
    /// The alert messages, empty if there is nothing to warn about.
    pub alerts: Vec<String>,
}

/// The state needed to compute alerts.
#[derive(Debug, Clone)]
pub struct AlertsState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The rule deciding when to raise an alert.
    pub alert_rule: AlertRule,
}

impl FromRef<AppState> for AlertsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            alert_rule: state.alert_rule.clone(),
        }
    }
}

/// A route handler that responds with the current budgeting alerts.
pub async fn get_alerts_endpoint(State(state): State<AlertsState>) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(_) => return Error::DatabaseLockError.into_api_response(FAILURE_MESSAGE),
    };

    match get_alerts(&connection, &state.alert_rule) {
        Ok(alerts) => Json(ApiResponse::success(
            Alerts { alerts },
            "Alerts retrieved successfully",
        ))
        .into_response(),
        Err(error) => error.into_api_response(FAILURE_MESSAGE),
    }
}
