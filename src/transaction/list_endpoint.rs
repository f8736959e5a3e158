//! The route handler for listing a user's transactions.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    transaction::{Transaction, get_transactions_by_user},
};

/// The state needed to list a user's transactions.
#[derive(Debug, Clone)]
pub struct ListTransactionsState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ListTransactionsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for listing the transactions owned by a user, most recent
/// first.
///
/// The list is unpaginated. An unknown user ID produces an empty list, not a
/// 404, so that new users see an empty ledger rather than an error.
pub async fn get_transactions_endpoint(
    State(state): State<ListTransactionsState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<Transaction>>, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let transactions = get_transactions_by_user(&user_id, &connection)?;

    Ok(Json(transactions))
}
