use maud::{DOCTYPE, Markup, PreEscaped, html};

use std::sync::OnceLock;

use numfmt::{Formatter, Precision};

/// The symbol printed in front of monetary amounts.
pub const CURRENCY_SYMBOL: &str = "₹";

// Text colours for amounts
pub const INCOME_STYLE: &str = "color: #06a77d;";
pub const EXPENSE_STYLE: &str = "color: #e84a5f;";

const PAGE_STYLE: &str = r#"
    body {
        font-family: system-ui, sans-serif;
        background: #f4f6fb;
        color: #1f2937;
        margin: 0;
    }
    main {
        max-width: 32rem;
        margin: 2rem auto;
        padding: 1.5rem;
        background: white;
        border-radius: 0.5rem;
        box-shadow: 0 1px 4px rgba(0, 0, 0, 0.1);
    }
    .alerts {
        background: #fff4e5;
        border: 1px solid #f5a623;
        border-radius: 0.375rem;
        padding: 0.75rem;
        margin-bottom: 1rem;
    }
    .totals {
        display: flex;
        justify-content: space-between;
        gap: 1rem;
        margin-bottom: 1.5rem;
    }
    .totals div {
        display: flex;
        flex-direction: column;
    }
    form {
        display: flex;
        flex-direction: column;
        gap: 0.5rem;
    }
    input, select, button {
        padding: 0.5rem;
        font-size: 1rem;
        border: 1px solid #d1d5db;
        border-radius: 0.375rem;
    }
    button {
        background: #2563eb;
        color: white;
        cursor: pointer;
    }
    .form-error {
        color: #e84a5f;
        min-height: 1.25rem;
    }
    ul {
        list-style: none;
        padding: 0;
    }
    li {
        display: flex;
        justify-content: space-between;
        padding: 0.5rem 0;
        border-bottom: 1px solid #e5e7eb;
    }
"#;

pub fn base(title: &str, content: &Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en"
        {
            head
            {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " - Finance Tracker" }
                style { (PreEscaped(PAGE_STYLE)) }
            }

            body
            {
                (content)
            }
        }
    }
}

pub fn error_view(title: &str, header: &str, description: &str, fix: &str) -> Markup {
    let content = html!(
        main
        {
            h1 { (header) }
            p { strong { (description) } }
            p { (fix) }
            a href="/" { "Back to Homepage" }
        }
    );

    base(title, &content)
}

/// Format `number` as an amount of money with two decimal places, e.g. "₹1,234.50".
pub fn format_currency(number: f64) -> String {
    static FORMATTER: OnceLock<Option<Formatter>> = OnceLock::new();

    let formatter = FORMATTER.get_or_init(|| {
        Formatter::currency(CURRENCY_SYMBOL)
            .ok()
            .map(|formatter| formatter.precision(Precision::Decimals(2)))
    });

    let magnitude = number.abs();

    let formatted_string = match formatter {
        // Zero is hardcoded as "0", so we must specify the formatted string for zero
        _ if magnitude == 0.0 => format!("{CURRENCY_SYMBOL}0.00"),
        Some(formatter) => pad_decimals(formatter.fmt_string(magnitude)),
        None => format!("{CURRENCY_SYMBOL}{magnitude:.2}"),
    };

    if number < 0.0 {
        format!("-{formatted_string}")
    } else {
        formatted_string
    }
}

/// numfmt omits trailing zeros, e.g. "12.30" is rendered as "12.3", so add them back.
fn pad_decimals(mut formatted: String) -> String {
    match formatted.rfind('.') {
        Some(dot) => {
            let decimals = formatted.len() - dot - 1;
            for _ in decimals..2 {
                formatted.push('0');
            }
            formatted
        }
        None => format!("{formatted}.00"),
    }
}

#[cfg(test)]
mod tests {
    use super::{format_currency, pad_decimals};

    #[test]
    fn formats_zero() {
        assert_eq!(format_currency(0.0), "₹0.00");
    }

    #[test]
    fn formats_with_two_decimals() {
        assert_eq!(format_currency(12.3), "₹12.30");
        assert_eq!(format_currency(12.34), "₹12.34");
    }

    #[test]
    fn formats_negative_numbers() {
        assert_eq!(format_currency(-12.3), "-₹12.30");
    }

    #[test]
    fn pads_missing_decimals() {
        assert_eq!(pad_decimals("₹5".to_owned()), "₹5.00");
        assert_eq!(pad_decimals("₹5.5".to_owned()), "₹5.50");
        assert_eq!(pad_decimals("₹5.55".to_owned()), "₹5.55");
    }
}
