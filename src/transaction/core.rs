//! Defines the core data model and database queries for transactions.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::Error;

// ============================================================================
// MODELS
// ============================================================================

/// An expense or income, i.e. an event where money was either spent or earned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: i64,
    /// The ID of the user that owns the transaction.
    pub user_id: String,
    /// A short label describing what the transaction was for.
    pub title: String,
    /// The amount of money spent or earned in this transaction.
    ///
    /// Negative amounts are expenses, positive amounts are income. The sign
    /// is the only signal of transaction direction.
    pub amount: f64,
    /// The category the transaction belongs to, e.g. "Food & Drinks".
    pub category: String,
    /// When the transaction was recorded (UTC).
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// The validated data needed to record a new transaction.
///
/// Use [NewTransaction::new] so that invalid field combinations cannot reach
/// the database.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// The ID of the user recording the transaction.
    pub user_id: String,
    /// A short label describing what the transaction is for.
    pub title: String,
    /// The signed amount, negative for expenses and positive for income.
    pub amount: f64,
    /// The category the transaction belongs to.
    pub category: String,
}

impl NewTransaction {
    /// Validate the fields for a new transaction.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::EmptyUserId] if `user_id` is empty or whitespace,
    /// - [Error::EmptyTitle] if `title` is empty or whitespace,
    /// - [Error::EmptyCategory] if `category` is empty or whitespace,
    /// - [Error::InvalidAmount] if `amount` is not a finite, non-zero number.
    pub fn new(
        user_id: String,
        title: String,
        amount: f64,
        category: String,
    ) -> Result<Self, Error> {
        if user_id.trim().is_empty() {
            return Err(Error::EmptyUserId);
        }

        if title.trim().is_empty() {
            return Err(Error::EmptyTitle);
        }

        if category.trim().is_empty() {
            return Err(Error::EmptyCategory);
        }

        if !amount.is_finite() {
            return Err(Error::InvalidAmount(format!(
                "{amount} is not a finite number"
            )));
        }

        if amount == 0.0 {
            return Err(Error::InvalidAmount(
                "amount must not be zero".to_owned(),
            ));
        }

        Ok(Self {
            user_id,
            title,
            amount,
            category,
        })
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create a new transaction in the database.
///
/// `created_at` is always supplied by the server (the route handler passes
/// the current instant), never by the client, so that client clock skew
/// cannot corrupt period bucketing.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn create_transaction(
    new_transaction: NewTransaction,
    created_at: OffsetDateTime,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "INSERT INTO \"transaction\" (user_id, title, amount, category, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING id, user_id, title, amount, category, created_at",
        )?
        .query_row(
            (
                new_transaction.user_id,
                new_transaction.title,
                new_transaction.amount,
                new_transaction.category,
                created_at,
            ),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Retrieve the transactions owned by `user_id`, most recent first.
///
/// An unknown user ID produces an empty list, not an error.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn get_transactions_by_user(
    user_id: &str,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, title, amount, category, created_at FROM \"transaction\"
             WHERE user_id = :user_id
             ORDER BY created_at DESC, id DESC",
        )?
        .query_map(&[(":user_id", &user_id)], map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
        .collect()
}

/// Delete the transaction with `id` from the database.
///
/// # Errors
/// This function will return a:
/// - [Error::DeleteMissingTransaction] if `id` does not refer to a
///   transaction in the database, including a repeated delete of an ID that
///   was already removed,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_transaction(id: i64, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM \"transaction\" WHERE id = :id",
        &[(":id", &id)],
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingTransaction);
    }

    Ok(())
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL,
                title TEXT NOT NULL,
                amount REAL NOT NULL,
                category TEXT NOT NULL,
                created_at TEXT NOT NULL
                )",
        (),
    )?;

    // Ensure the sequence starts at 1
    connection.execute(
        "INSERT OR IGNORE INTO sqlite_sequence (name, seq) VALUES ('transaction', 0)",
        (),
    )?;

    // Covers the list and report queries, which always filter by owner.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_user_created ON \"transaction\"(user_id, created_at);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let user_id = row.get(1)?;
    let title = row.get(2)?;
    let amount = row.get(3)?;
    let category = row.get(4)?;
    let created_at = row.get(5)?;

    Ok(Transaction {
        id,
        user_id,
        title,
        amount,
        category,
        created_at,
    })
}

// ============================================================================
// TESTS
// ============================================================================
