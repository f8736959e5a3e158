//! Route handlers for the aggregate report endpoints.
//!
//! Each handler reads the user's ledger at call time and hands it to the
//! pure aggregation functions in [crate::report::core], using the current
//! instant as the reference "now".

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, Query, State},
};
use rusqlite::Connection;
use serde::Deserialize;
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    report::{
        CategorySummary, MonthlyComparison, Period, Summary, compute_category_summary,
        compute_monthly_comparison, compute_summary, compute_summary_report,
    },
    transaction::{Transaction, get_transactions_by_user},
};

/// The state needed to compute reports.
#[derive(Debug, Clone)]
pub struct ReportState {
    /// The database connection holding the transaction ledger.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ReportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for the lifetime balance, income and expense totals of a
/// user's ledger.
pub async fn get_summary_endpoint(
    State(state): State<ReportState>,
    Path(user_id): Path<String>,
) -> Result<Json<Summary>, Error> {
    let transactions = fetch_ledger(&state, &user_id)?;

    Ok(Json(compute_summary(&transactions)))
}

/// A route handler for the per-category expense breakdown of a user's ledger.
pub async fn get_category_summary_endpoint(
    State(state): State<ReportState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<CategorySummary>>, Error> {
    let transactions = fetch_ledger(&state, &user_id)?;

    Ok(Json(compute_category_summary(&transactions)))
}

/// A route handler comparing the current and previous calendar months'
/// expenses for a user.
pub async fn get_monthly_comparison_endpoint(
    State(state): State<ReportState>,
    Path(user_id): Path<String>,
) -> Result<Json<MonthlyComparison>, Error> {
    let transactions = fetch_ledger(&state, &user_id)?;

    Ok(Json(compute_monthly_comparison(
        &transactions,
        OffsetDateTime::now_utc(),
    )))
}

/// The query parameters for the summary report endpoint.
#[derive(Debug, Deserialize)]
pub struct SummaryReportQuery {
    /// The period preset to report on. Defaults to `month` when absent.
    pub period: Option<String>,
}

/// A route handler for a user's summary scoped to a period window.
///
/// # Errors
/// Returns a 400 response if the period query parameter is present but not
/// one of `week`, `month` or `year`.
pub async fn get_summary_report_endpoint(
    State(state): State<ReportState>,
    Path(user_id): Path<String>,
    Query(query): Query<SummaryReportQuery>,
) -> Result<Json<Summary>, Error> {
    let period = match query.period.as_deref() {
        Some(value) => value.parse::<Period>()?,
        None => Period::Month,
    };

    let transactions = fetch_ledger(&state, &user_id)?;

    Ok(Json(compute_summary_report(
        &transactions,
        period,
        OffsetDateTime::now_utc(),
    )))
}

fn fetch_ledger(state: &ReportState, user_id: &str) -> Result<Vec<Transaction>, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    get_transactions_by_user(user_id, &connection)
}
