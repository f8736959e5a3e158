//! Create, list and delete operations for the transaction ledger, and their
//! route handlers.

mod core;
mod create_endpoint;
mod delete_endpoint;
mod list_endpoint;

pub use core::{
    NewTransaction, Transaction, create_transaction, create_transaction_table, delete_transaction,
    get_transactions_by_user, map_transaction_row,
};
pub use create_endpoint::create_transaction_endpoint;
pub use delete_endpoint::delete_transaction_endpoint;
pub use list_endpoint::get_transactions_endpoint;
