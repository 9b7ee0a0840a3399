//! The API endpoints URIs.

/// The page with the transaction form, totals and alerts.
pub const ROOT: &str = "/";
/// The route for checking that the server is up.
pub const HEALTH: &str = "/health";
/// The route to create and list transactions.
pub const TRANSACTIONS_API: &str = "/api/transactions";
/// The route for budgeting alerts.
pub const ALERTS_API: &str = "/api/alerts";
