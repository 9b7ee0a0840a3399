//! Defines the core data models and database queries for transactions.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    Connection, Row,
    types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, UtcOffset};

use crate::{Error, database_id::TransactionId};

// ============================================================================
// MODELS
// ============================================================================

/// Whether money was earned or spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money that was earned, e.g. a salary payment.
    Income,
    /// Money that was spent, e.g. rent.
    Expense,
}

impl TransactionType {
    /// The name used for the type in JSON and in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            other => Err(Error::InvalidTransactionType(other.to_owned())),
        }
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error| FromSqlError::Other(Box::new(error)))
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// Whether the money was earned or spent.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// The amount of money spent or earned in this transaction, never negative.
    pub amount: f64,
    /// A free-text label such as "Salary" or "Rent".
    pub category: String,
    /// A text description of what the transaction was for.
    pub description: Option<String>,
    /// When the transaction happened, in UTC.
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(
        transaction_type: TransactionType,
        amount: f64,
        category: &str,
    ) -> TransactionBuilder {
        TransactionBuilder {
            transaction_type,
            amount,
            category: category.to_owned(),
            description: None,
            date: None,
        }
    }
}

/// A builder for creating [Transaction] instances.
///
/// Pass the finished builder to [create_transaction] to store it.
///
/// # Examples
///
/// ```ignore
/// use time::macros::datetime;
///
/// let transaction = Transaction::build(TransactionType::Expense, 45.99, "Food")
///     .description(Some("Lunch".to_owned()))
///     .date(Some(datetime!(2025-01-15 12:00 UTC)));
/// ```
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    /// Whether the money was earned or spent.
    pub transaction_type: TransactionType,

    /// The monetary amount of the transaction.
    ///
    /// Must be zero or positive, the direction of the money is given by
    /// `transaction_type`.
    pub amount: f64,

    /// The category of the transaction, e.g. "Groceries", "Transport", "Rent".
    pub category: String,

    /// An optional human-readable description of the transaction.
    pub description: Option<String>,

    /// When the transaction occurred.
    ///
    /// Defaults to the time the transaction is stored if not specified.
    pub date: Option<OffsetDateTime>,
}

impl TransactionBuilder {
    /// Set the description for the transaction.
    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    /// Set the date for the transaction.
    pub fn date(mut self, date: Option<OffsetDateTime>) -> Self {
        self.date = date;
        self
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create a new transaction in the database from a builder.
///
/// If the builder has no date, the current time is used. Dates are stored in UTC.
///
/// # Errors
/// This function will return a:
/// - [Error::NonFiniteAmount] if the amount is NaN or infinite,
/// - or [Error::NegativeAmount] if the amount is less than zero,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    if !builder.amount.is_finite() {
        return Err(Error::NonFiniteAmount);
    }

    if builder.amount < 0.0 {
        return Err(Error::NegativeAmount(builder.amount));
    }

    let date = builder
        .date
        .unwrap_or_else(OffsetDateTime::now_utc)
        .to_offset(UtcOffset::UTC);

    let transaction = connection
        .prepare(
            "INSERT INTO \"transaction\" (type, amount, category, description, date)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING id, type, amount, category, description, date",
        )?
        .query_row(
            (
                builder.transaction_type,
                builder.amount,
                builder.category,
                builder.description,
                date,
            ),
            map_transaction_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_CHECK,
                },
                _,
            ) => Error::NegativeAmount(builder.amount),
            error => error.into(),
        })?;

    tracing::debug!(
        "Created {} transaction {} for {}",
        transaction.transaction_type,
        transaction.id,
        transaction.amount
    );

    Ok(transaction)
}

/// Retrieve every transaction in the database, newest first.
///
/// Transactions with the same date are ordered by most recently created.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn get_all_transactions(connection: &Connection) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(
            "SELECT id, type, amount, category, description, date FROM \"transaction\"
             ORDER BY date DESC, id DESC",
        )?
        .query_map([], map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
        .collect()
}

/// Get the total number of transactions in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
#[cfg(test)]
pub fn count_transactions(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM \"transaction\";", [], |row| {
            row.get(0)
        })
        .map_err(|error| error.into())
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                type TEXT NOT NULL CHECK (type IN ('income', 'expense')),
                amount REAL NOT NULL CHECK (amount >= 0),
                category TEXT NOT NULL,
                description TEXT,
                date TEXT NOT NULL
                )",
        (),
    )?;

    // Listing transactions sorts by date.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_date ON \"transaction\"(date);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let transaction_type = row.get(1)?;
    let amount = row.get(2)?;
    let category = row.get(3)?;
    let description = row.get(4)?;
    let date = row.get(5)?;

    Ok(Transaction {
        id,
        transaction_type,
        amount,
        category,
        description,
        date,
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod model_tests {
    use serde_json::json;
    use time::macros::datetime;

    use crate::{
        Error,
        transaction::{Transaction, TransactionType},
    };

    #[test]
    fn parses_transaction_types() {
        assert_eq!("income".parse::<TransactionType>(), Ok(TransactionType::Income));
        assert_eq!("expense".parse::<TransactionType>(), Ok(TransactionType::Expense));
    }

    #[test]
    fn rejects_unknown_transaction_type() {
        let result = "refund".parse::<TransactionType>();

        assert_eq!(
            result,
            Err(Error::InvalidTransactionType("refund".to_owned()))
        );
    }

    #[test]
    fn serializes_with_type_field_and_rfc3339_date() {
        let transaction = Transaction {
            id: 7,
            transaction_type: TransactionType::Expense,
            amount: 300.0,
            category: "Food".to_owned(),
            description: Some("Lunch".to_owned()),
            date: datetime!(2025-01-15 12:30 UTC),
        };

        let json = serde_json::to_value(&transaction).unwrap();

        assert_eq!(
            json,
            json!({
                "id": 7,
                "type": "expense",
                "amount": 300.0,
                "category": "Food",
                "description": "Lunch",
                "date": "2025-01-15T12:30:00Z",
            })
        );
    }
}
