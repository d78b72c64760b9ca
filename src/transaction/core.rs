//! Defines the core data model and database queries for transactions.

use rusqlite::{Connection, Row};
use time::Date;

use crate::{Error, database_id::TransactionId};

// ============================================================================
// MODELS
// ============================================================================

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// Who the money went to, or came from.
    pub payee: String,
    /// The amount of money spent or earned in this transaction.
    pub amount: f64,
    /// When the transaction happened.
    pub date: Date,
    /// Any commentary associated with the transaction.
    pub notes: String,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(amount: f64, date: Date, payee: &str) -> TransactionBuilder {
        TransactionBuilder {
            payee: payee.to_owned(),
            amount,
            date,
            notes: String::new(),
        }
    }
}

/// The fields of a [Transaction] that has not been saved to the database yet.
///
/// Also used for updates, where the database row keeps its ID and takes all
/// other fields from the builder.
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    /// Who the money went to, or came from.
    pub payee: String,

    /// The monetary amount of the transaction.
    ///
    /// Positive values represent income/credits, negative values represent
    /// expenses/debits. This follows standard accounting conventions where
    /// money flowing into your account is positive.
    pub amount: f64,

    /// The date when the transaction occurred.
    ///
    /// This represents the actual transaction date (when money moved), not
    /// when it was recorded. The date must not be in the future, which route
    /// handlers enforce against the configured local timezone.
    pub date: Date,

    /// Any commentary associated with the transaction.
    pub notes: String,
}

impl TransactionBuilder {
    /// Set the notes for the transaction.
    pub fn notes(mut self, notes: &str) -> Self {
        self.notes = notes.to_owned();
        self
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create a new transaction in the database from a builder.
///
/// The ID is assigned by SQLite, never computed by the application.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn create_transaction(
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "INSERT INTO \"transaction\" (payee, amount, date, notes)
             VALUES (?1, ?2, ?3, ?4)
             RETURNING id, payee, amount, date, notes",
        )?
        .query_row(
            (builder.payee, builder.amount, builder.date, builder.notes),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Retrieve a transaction from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_transaction(id: TransactionId, connection: &Connection) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare("SELECT id, payee, amount, date, notes FROM \"transaction\" WHERE id = :id")?
        .query_one(&[(":id", &id)], map_transaction_row)?;

    Ok(transaction)
}

/// Retrieve one page of transactions, newest first.
///
/// `page` is one-based. Ties on the date are broken by descending ID so that
/// the most recently recorded transaction comes first.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn get_transaction_page(
    page: u64,
    page_size: u64,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    // A negative offset would disable OFFSET entirely, so clamp instead of
    // letting an absurd page number wrap around.
    let offset = i64::try_from(page.saturating_sub(1).saturating_mul(page_size))
        .unwrap_or(i64::MAX);

    connection
        .prepare(
            "SELECT id, payee, amount, date, notes FROM \"transaction\"
             ORDER BY date DESC, id DESC
             LIMIT :limit OFFSET :offset",
        )?
        .query_map(
            &[(":limit", &(page_size as i64)), (":offset", &offset)],
            map_transaction_row,
        )?
        .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
        .collect()
}

/// Get the total number of transactions in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn count_transactions(connection: &Connection) -> Result<u64, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM \"transaction\";", [], |row| {
            row.get::<_, i64>(0)
        })
        .map(|count| count as u64)
        .map_err(|error| error.into())
}

/// Overwrite the transaction `id` with the fields from `builder`.
///
/// # Errors
/// This function will return a:
/// - [Error::UpdateMissingTransaction] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_transaction(
    id: TransactionId,
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE \"transaction\" SET payee = ?1, amount = ?2, date = ?3, notes = ?4 WHERE id = ?5",
        (builder.payee, builder.amount, builder.date, builder.notes, id),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingTransaction);
    }

    Ok(())
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
            id INTEGER PRIMARY KEY,
            payee TEXT NOT NULL,
            amount REAL NOT NULL,
            date TEXT NOT NULL,
            notes TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_transaction_date ON \"transaction\"(date);",
    )?;

    Ok(())
}

fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let payee = row.get(1)?;
    let amount = row.get(2)?;
    let date = row.get(3)?;
    let notes = row.get(4)?;

    Ok(Transaction {
        id,
        payee,
        amount,
        date,
        notes,
    })
}

// ============================================================================
// TESTS
// ============================================================================
