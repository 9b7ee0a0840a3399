//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{Error, alert::AlertRule, db::initialize};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The rule used to decide when to warn about spending in a category.
    pub alert_rule: AlertRule,

    /// The database connection
    pub db_connection: Arc<Mutex<Connection>>,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the domain models.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(db_connection: Connection, alert_rule: AlertRule) -> Result<Self, Error> {
        initialize(&db_connection)?;

        Ok(Self {
            alert_rule,
            db_connection: Arc::new(Mutex::new(db_connection)),
        })
    }
}
