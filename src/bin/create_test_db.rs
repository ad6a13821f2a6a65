use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Date, Duration, OffsetDateTime};

use spendwise::{
    Category, NewMonthlyBudget, Transaction, TransactionType, YearMonth, create_budget,
    create_transaction, initialize_db,
};

/// A utility for creating a test database for the REST API server of spendwise.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// The number of months of sample data to create, ending with the current month.
    #[arg(long, short, default_value_t = 3)]
    months: u8,
}

/// Monthly budgets created for every month.
const SAMPLE_BUDGETS: [(Category, f64); 4] = [
    (Category::Food, 600.0),
    (Category::Transportation, 150.0),
    (Category::Housing, 1800.0),
    (Category::Utilities, 250.0),
];

/// Expenses created for every month as (day of month, category, amount, description).
const SAMPLE_EXPENSES: [(u8, Category, f64, &str); 6] = [
    (1, Category::Housing, 1800.0, "Rent"),
    (3, Category::Food, 142.37, "Supermarket"),
    (9, Category::Transportation, 60.0, "Fuel"),
    (14, Category::Utilities, 189.9, "Power bill"),
    (17, Category::Entertainment, 35.0, "Cinema"),
    (24, Category::Food, 88.15, "Takeaways"),
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

    let today = OffsetDateTime::now_utc().date();

    for month in sample_months(today, args.months) {
        println!("Creating budgets and transactions for {month}...");

        for (category, amount) in SAMPLE_BUDGETS {
            create_budget(
                NewMonthlyBudget {
                    amount,
                    month,
                    category,
                },
                &conn,
            )?;
        }

        for (day, category, amount, description) in SAMPLE_EXPENSES {
            let date = Date::from_calendar_date(month.year(), month.month(), day)?;

            if date > today {
                continue;
            }

            create_transaction(
                Transaction::build(amount, date, description).category(category),
                &conn,
            )?;
        }

        create_transaction(
            Transaction::build(200.0, month.first_day(), "Holiday savings")
                .category(Category::Other)
                .transaction_type(TransactionType::Budget),
            &conn,
        )?;
    }

    println!("Success!");

    Ok(())
}

/// The `count` months ending with the month containing `today`, oldest first.
fn sample_months(today: Date, count: u8) -> Vec<YearMonth> {
    let mut months = Vec::with_capacity(count as usize);
    let mut first_day = YearMonth::from_date(today).first_day();

    for _ in 0..count {
        months.push(YearMonth::from_date(first_day));
        first_day = YearMonth::from_date(first_day - Duration::days(1)).first_day();
    }

    months.reverse();
    months
}
