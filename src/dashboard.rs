//! The page for adding transactions and viewing totals and alerts.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use maud::{Markup, PreEscaped, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    alert::{AlertRule, compute_alerts},
    endpoints,
    html::{EXPENSE_STYLE, INCOME_STYLE, base, error_view, format_currency},
    transaction::{Totals, Transaction, TransactionType, get_all_transactions},
};

/// Posts the form as JSON and reloads the page to show the new transaction.
const FORM_SCRIPT: &str = r#"
document.getElementById("transaction-form").addEventListener("submit", async (event) => {
    event.preventDefault();
    const form = event.target;
    const data = new FormData(form);
    const errorMessage = document.getElementById("form-error");
    const body = {
        type: data.get("type"),
        amount: Number(data.get("amount")),
        category: data.get("category"),
        description: data.get("description") || undefined,
    };

    try {
        const response = await fetch(form.dataset.endpoint, {
            method: "POST",
            headers: { "Content-Type": "application/json" },
            body: JSON.stringify(body),
        });
        const result = await response.json();

        if (response.ok && result.success) {
            window.location.reload();
        } else {
            errorMessage.textContent = result.error || result.message || "Failed to add transaction";
        }
    } catch (error) {
        errorMessage.textContent = "Could not reach the server";
    }
});
"#;

/// The state needed for the [get_dashboard_page] route handler.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The rule deciding when to show an alert.
    pub alert_rule: AlertRule,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            alert_rule: state.alert_rule.clone(),
        }
    }
}

/// Display the transaction form, totals, alerts and the list of transactions.
pub async fn get_dashboard_page(State(state): State<DashboardState>) -> Response {
    let transactions = match state.db_connection.lock() {
        Ok(connection) => get_all_transactions(&connection),
        Err(_) => Err(Error::DatabaseLockError),
    };

    let transactions = match transactions {
        Ok(transactions) => transactions,
        Err(error) => {
            tracing::error!("Could not load transactions for the dashboard: {error}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(
                    error_view(
                        "Internal Server Error",
                        "500",
                        "Sorry, something went wrong.",
                        "Try again later or check the server logs",
                    )
                    .into_string(),
                ),
            )
                .into_response();
        }
    };

    let totals = Totals::from_transactions(&transactions);
    let alerts = compute_alerts(&transactions, &state.alert_rule);

    dashboard_view(&transactions, &totals, &alerts).into_response()
}

fn dashboard_view(transactions: &[Transaction], totals: &Totals, alerts: &[String]) -> Markup {
    let content = html!(
        main
        {
            @if !alerts.is_empty()
            {
                section class="alerts" id="alerts"
                {
                    @for alert in alerts
                    {
                        p { (alert) }
                    }
                }
            }

            h1 { "Finance Tracker" }

            (totals_view(totals))

            (form_view())

            h2 { "All Transactions" }

            (transaction_list_view(transactions))
        }

        script { (PreEscaped(FORM_SCRIPT)) }
    );

    base("Dashboard", &content)
}

fn totals_view(totals: &Totals) -> Markup {
    html!(
        section class="totals" id="totals"
        {
            div style=(INCOME_STYLE)
            {
                span { "Income" }
                b id="total-income" { (format_currency(totals.income)) }
            }
            div style=(EXPENSE_STYLE)
            {
                span { "Expense" }
                b id="total-expense" { (format_currency(totals.expense)) }
            }
            div
            {
                span { "Net Total" }
                b id="total-net" { (format_currency(totals.net)) }
            }
        }
    )
}

fn form_view() -> Markup {
    html!(
        form id="transaction-form" data-endpoint=(endpoints::TRANSACTIONS_API) autocomplete="off"
        {
            select name="type" required
            {
                option value="income" selected { "Income" }
                option value="expense" { "Expense" }
            }
            input type="number" name="amount" min="0" step="0.01" placeholder="Amount" required;
            input type="text" name="category" placeholder="Category" required;
            input type="text" name="description" placeholder="Description";
            button type="submit" { "Add Transaction" }
            p class="form-error" id="form-error" {}
        }
    )
}

fn transaction_list_view(transactions: &[Transaction]) -> Markup {
    html!(
        @if transactions.is_empty()
        {
            p { "No transactions yet." }
        }
        @else
        {
            ul id="transactions"
            {
                @for transaction in transactions
                {
                    @let (sign, style) = amount_sign_and_style(transaction.transaction_type);

                    li
                    {
                        span
                        {
                            (transaction.category)
                            @if let Some(description) = &transaction.description
                            {
                                " (" (description) ")"
                            }
                            br;
                            small { time datetime=(transaction.date.date()) { (transaction.date.date()) } }
                        }
                        b style=(style) { (sign) (format_currency(transaction.amount)) }
                    }
                }
            }
        }
    )
}

fn amount_sign_and_style(transaction_type: TransactionType) -> (&'static str, &'static str) {
    match transaction_type {
        TransactionType::Income => ("+", INCOME_STYLE),
        TransactionType::Expense => ("-", EXPENSE_STYLE),
    }
}

#[cfg(test)]
mod tests {
    use axum::{Router, routing::get};
    use axum_test::TestServer;
    use rusqlite::Connection;
    use scraper::{Html, Selector};
    use time::macros::datetime;

    use crate::{
        AppState,
        alert::AlertRule,
        dashboard::get_dashboard_page,
        transaction::{Transaction, TransactionType, create_transaction},
    };

    fn get_test_server(transactions: &[(TransactionType, f64, &str)]) -> TestServer {
        let conn = Connection::open_in_memory().unwrap();
        let state = AppState::new(conn, AlertRule::default()).unwrap();

        {
            let connection = state.db_connection.lock().unwrap();
            for (day, (transaction_type, amount, category)) in transactions.iter().enumerate() {
                create_transaction(
                    Transaction::build(*transaction_type, *amount, category).date(Some(
                        datetime!(2025-01-01 00:00 UTC) + time::Duration::days(day as i64),
                    )),
                    &connection,
                )
                .unwrap();
            }
        }

        let app = Router::new()
            .route("/", get(get_dashboard_page))
            .with_state(state);

        TestServer::try_new(app).expect("Could not create test server.")
    }

    fn select_text(document: &Html, selector_text: &str) -> String {
        let selector = Selector::parse(selector_text).unwrap();
        document
            .select(&selector)
            .next()
            .unwrap_or_else(|| panic!("could not find element {selector_text}"))
            .text()
            .collect()
    }

    #[tokio::test]
    async fn shows_totals() {
        let server = get_test_server(&[
            (TransactionType::Income, 500.0, "Salary"),
            (TransactionType::Expense, 120.5, "Food"),
        ]);

        let response = server.get("/").await;

        response.assert_status_ok();
        let document = Html::parse_document(&response.text());
        assert_eq!(select_text(&document, "#total-income"), "₹500.00");
        assert_eq!(select_text(&document, "#total-expense"), "₹120.50");
        assert_eq!(select_text(&document, "#total-net"), "₹379.50");
    }

    #[tokio::test]
    async fn lists_transactions_newest_first() {
        let server = get_test_server(&[
            (TransactionType::Income, 500.0, "Salary"),
            (TransactionType::Expense, 120.5, "Food"),
        ]);

        let response = server.get("/").await;

        let document = Html::parse_document(&response.text());
        let selector = Selector::parse("#transactions li").unwrap();
        let items: Vec<String> = document
            .select(&selector)
            .map(|item| item.text().collect())
            .collect();
        assert_eq!(items.len(), 2);
        assert!(items[0].contains("Food"), "want Food first, got {items:?}");
        assert!(items[1].contains("Salary"), "want Salary last, got {items:?}");
    }

    #[tokio::test]
    async fn shows_alert_when_rent_is_too_high() {
        let server = get_test_server(&[
            (TransactionType::Income, 500.0, "Salary"),
            (TransactionType::Expense, 300.0, "Rent"),
        ]);

        let response = server.get("/").await;

        let document = Html::parse_document(&response.text());
        assert_eq!(
            select_text(&document, "#alerts p"),
            "⚠️ Rent is more than 50% of your income."
        );
    }

    #[tokio::test]
    async fn hides_alerts_when_there_are_none() {
        let server = get_test_server(&[(TransactionType::Income, 500.0, "Salary")]);

        let response = server.get("/").await;

        let document = Html::parse_document(&response.text());
        let selector = Selector::parse("#alerts").unwrap();
        assert_eq!(document.select(&selector).count(), 0);
    }

    #[tokio::test]
    async fn has_transaction_form() {
        let server = get_test_server(&[]);

        let response = server.get("/").await;

        let document = Html::parse_document(&response.text());
        let form_selector = Selector::parse("form#transaction-form").unwrap();
        let form = document
            .select(&form_selector)
            .next()
            .expect("could not find the transaction form");
        assert_eq!(form.value().attr("data-endpoint"), Some("/api/transactions"));

        for name in ["type", "amount", "category"] {
            let selector = Selector::parse(&format!("[name={name}]")).unwrap();
            let input = form
                .select(&selector)
                .next()
                .unwrap_or_else(|| panic!("could not find the {name} input"));
            assert!(
                input.value().attr("required").is_some(),
                "want {name} input to be required"
            );
        }
        assert_eq!(select_text(&document, "main > p"), "No transactions yet.");
    }
}
