use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Duration, OffsetDateTime};

use ledger_rs::{Transaction, create_transaction, initialize_db, parse_amount};

/// A utility for creating a test database for the ledger web server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// The number of months of sample transactions to create.
    #[arg(long, default_value_t = 3)]
    months: u32,
}

/// A recurring sample transaction: days before today, notes, debit, credit,
/// category and payment method.
const MONTHLY_TRANSACTIONS: [(i64, &str, &str, &str, &str, &str); 8] = [
    (1, "Salary", "0", "3200.00", "Income", "Transfer"),
    (2, "Rent", "1450.00", "0", "Housing", "Transfer"),
    (4, "Groceries", "132.45", "0", "Food", "Card"),
    (8, "Power bill", "96.10", "0", "Utilities", "Direct debit"),
    (11, "Coffee with Sam", "6.50", "0", "Food", "Card"),
    (15, "Bus pass", "50.00", "0", "Transport", "Card"),
    (19, "Refund from store", "0", "24.99", "Shopping", "Card"),
    (24, "Groceries", "118.20", "0", "Food", "Card"),
];

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

    println!("Creating sample transactions...");

    let today = OffsetDateTime::now_utc().date();
    let mut created = 0;

    for month in 0..i64::from(args.months) {
        for (days_ago, notes, debit, credit, category, payment_method) in MONTHLY_TRANSACTIONS {
            let date = today - Duration::days(month * 30 + days_ago);

            create_transaction(
                Transaction::build(date, notes)
                    .debit(parse_amount(debit))
                    .credit(parse_amount(credit))
                    .category(Some(category.to_owned()))
                    .payment_method(Some(payment_method.to_owned())),
                &conn,
            )?;
            created += 1;
        }
    }

    println!("Created {created} transactions.");
    println!("Success!");

    Ok(())
}
