//! Database ID type definition.

/// Alias for the integer type the store assigns to transactions.
pub type TransactionId = i64;
