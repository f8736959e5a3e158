//! The route handler for recording a new transaction.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::Deserialize;
use serde_json::Value;
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    transaction::{NewTransaction, create_transaction},
};

/// The state needed to create a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The expected fields for the create transaction request body.
#[derive(Debug, Deserialize)]
pub struct CreateTransactionPayload {
    /// The ID of the user recording the transaction.
    pub user_id: String,
    /// A short label describing what the transaction is for.
    pub title: String,
    /// The signed amount, negative for expenses and positive for income.
    ///
    /// Clients send this as either a JSON number or a numeric string, so it
    /// is accepted as a raw value and parsed in the handler.
    pub amount: Value,
    /// The category the transaction belongs to.
    pub category: String,
}

/// A route handler for recording a new transaction.
///
/// The creation time is set server side to the current instant, never taken
/// from the request.
///
/// # Errors
/// Returns a 400 response if the title, category or user ID is empty, or if
/// the amount is not a finite, non-zero number.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    Json(payload): Json<CreateTransactionPayload>,
) -> Result<Response, Error> {
    let amount = parse_amount(&payload.amount)?;
    let new_transaction =
        NewTransaction::new(payload.user_id, payload.title, amount, payload.category)?;

    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;
    let transaction = create_transaction(new_transaction, OffsetDateTime::now_utc(), &connection)?;

    Ok((StatusCode::CREATED, Json(transaction)).into_response())
}

/// Parse the amount field of the request body.
fn parse_amount(amount: &Value) -> Result<f64, Error> {
    match amount {
        Value::Number(number) => number
            .as_f64()
            .ok_or_else(|| Error::InvalidAmount(format!("{number} is not representable as f64"))),
        Value::String(text) => text
            .trim()
            .parse::<f64>()
            .map_err(|_| Error::InvalidAmount(format!("could not parse \"{text}\" as a number"))),
        other => Err(Error::InvalidAmount(format!(
            "expected a number, got {other}"
        ))),
    }
}
