use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Duration, OffsetDateTime};

use finance_tracker::{Transaction, TransactionType, create_transaction, initialize_db};

/// A utility for creating a database filled with demo transactions.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating demo transactions...");

    let now = OffsetDateTime::now_utc();
    let demo_transactions = [
        (TransactionType::Income, 50_000.0, "Salary", "Monthly pay", 6),
        (TransactionType::Expense, 18_000.0, "Rent", "Apartment", 5),
        (TransactionType::Expense, 4_200.0, "Groceries", "Weekly shop", 3),
        (TransactionType::Expense, 300.0, "Food", "Lunch from Café", 1),
        (TransactionType::Income, 2_500.0, "Freelance", "Logo design", 0),
    ];

    for (transaction_type, amount, category, description, days_ago) in demo_transactions {
        create_transaction(
            Transaction::build(transaction_type, amount, category)
                .description(Some(description.to_owned()))
                .date(Some(now - Duration::days(days_ago))),
            &conn,
        )?;
    }

    println!("Success!");

    Ok(())
}
