//! Transaction management for the finance tracker.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and `TransactionBuilder` for creating transactions
//! - Database functions for storing and listing transactions
//! - The JSON route handlers for creating and listing transactions
//! - Income and expense totals

mod core;
mod create_endpoint;
mod list_endpoint;
mod totals;

pub use core::{
    Transaction, TransactionBuilder, TransactionType, create_transaction,
    create_transaction_table, get_all_transactions,
};
pub use create_endpoint::create_transaction_endpoint;
pub use list_endpoint::list_transactions_endpoint;
pub use totals::Totals;

#[cfg(test)]
pub use core::count_transactions;
