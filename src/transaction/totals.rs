//! Aggregate income and expense figures.

use crate::transaction::{Transaction, TransactionType};

/// The sums of income and expenses over a set of transactions.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Totals {
    /// Sum of all income amounts.
    pub income: f64,
    /// Sum of all expense amounts.
    pub expense: f64,
    /// Income minus expenses.
    pub net: f64,
}

impl Totals {
    /// Add up the income and expenses in `transactions`.
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        let (income, expense) =
            transactions
                .iter()
                .fold((0.0, 0.0), |(income, expense), transaction| {
                    match transaction.transaction_type {
                        TransactionType::Income => (income + transaction.amount, expense),
                        TransactionType::Expense => (income, expense + transaction.amount),
                    }
                });

        Self {
            income,
            expense,
            net: income - expense,
        }
    }
}
