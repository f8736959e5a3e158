//! The route handler for deleting a transaction.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
};
use rusqlite::Connection;
use serde_json::{Value, json};

use crate::{AppState, Error, transaction::delete_transaction};

/// The state needed to delete a transaction.
#[derive(Debug, Clone)]
pub struct DeleteTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting a transaction by its ID.
///
/// # Errors
/// Returns a 404 response if `transaction_id` does not refer to a transaction
/// in the database. Deleting the same ID twice fails the second time.
pub async fn delete_transaction_endpoint(
    State(state): State<DeleteTransactionState>,
    Path(transaction_id): Path<i64>,
) -> Result<Json<Value>, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    delete_transaction(transaction_id, &connection)?;

    Ok(Json(json!({ "success": true })))
}

#[cfg(test)]
mod tests {
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::{Value, json};
    use time::macros::datetime;

    use crate::{
        AppState, Transaction, build_router, endpoints,
        endpoints::format_endpoint,
        rate_limit::RateLimitConfig,
        transaction::{NewTransaction, create_transaction},
    };

    fn get_test_server_and_transaction() -> (TestServer, Transaction) {
        let conn = Connection::open_in_memory().expect("Could not open database in memory.");
        let state = AppState::new(conn, RateLimitConfig::default())
            .expect("Could not initialize app state.");

        let transaction = {
            let connection = state.db_connection.lock().unwrap();
            create_transaction(
                NewTransaction::new(
                    "user_1".to_owned(),
                    "Groceries".to_owned(),
                    -42.5,
                    "Food & Drinks".to_owned(),
                )
                .unwrap(),
                datetime!(2025-10-05 12:00 UTC),
                &connection,
            )
            .unwrap()
        };

        let server = TestServer::new(build_router(state));

        (server, transaction)
    }

    #[tokio::test]
    async fn delete_transaction_succeeds() {
        let (server, transaction) = get_test_server_and_transaction();

        let response = server
            .delete(&format_endpoint(
                endpoints::TRANSACTION,
                &transaction.id.to_string(),
            ))
            .await;

        response.assert_status_ok();
        assert_eq!(response.json::<Value>(), json!({ "success": true }));
    }

    #[tokio::test]
    async fn deleted_transaction_no_longer_appears_in_list() {
        let (server, transaction) = get_test_server_and_transaction();

        server
            .delete(&format_endpoint(
                endpoints::TRANSACTION,
                &transaction.id.to_string(),
            ))
            .await
            .assert_status_ok();

        let transactions = server
            .get(&format_endpoint(endpoints::TRANSACTION, "user_1"))
            .await
            .json::<Vec<Transaction>>();

        assert!(transactions.iter().all(|t| t.id != transaction.id));
    }

    #[tokio::test]
    async fn delete_transaction_fails_on_unknown_id() {
        let (server, _) = get_test_server_and_transaction();

        let response = server
            .delete(&format_endpoint(endpoints::TRANSACTION, "1337"))
            .await;

        response.assert_status_not_found();
    }

    #[tokio::test]
    async fn repeated_delete_fails() {
        let (server, transaction) = get_test_server_and_transaction();
        let path = format_endpoint(endpoints::TRANSACTION, &transaction.id.to_string());

        server.delete(&path).await.assert_status_ok();

        server.delete(&path).await.assert_status_not_found();
    }
}
