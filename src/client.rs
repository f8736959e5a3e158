//! A client for the wallet REST API that mirrors the mobile app's data hook.
//!
//! The client holds the last successful fetch of each query. Mutations
//! trigger a refetch of the transaction list and lifetime summary; changing
//! the report period refetches only the summary report. A failed fetch logs
//! the error and leaves the previously fetched state in place, so a
//! transient backend failure does not blank the dashboard.

use serde::de::DeserializeOwned;
use serde_json::json;

use crate::{
    endpoints::{self, format_endpoint},
    report::{CategorySummary, MonthlyComparison, Period, Summary},
    transaction::Transaction,
};

/// A client for the wallet REST API, scoped to a single user.
#[derive(Debug)]
pub struct TransactionsClient {
    base_url: String,
    user_id: String,
    http_client: reqwest::Client,

    /// The most recently fetched transaction list, most recent first.
    pub transactions: Vec<Transaction>,
    /// The most recently fetched lifetime summary.
    pub summary: Summary,
    /// The most recently fetched per-category expense breakdown.
    pub category_summary: Vec<CategorySummary>,
    /// The most recently fetched month-over-month comparison.
    pub monthly_comparison: MonthlyComparison,
    /// The most recently fetched period-scoped summary report.
    pub summary_report: Summary,
}

impl TransactionsClient {
    /// Create a client for the API at `base_url` (scheme and authority, e.g.
    /// `http://localhost:3000`), scoped to `user_id`.
    ///
    /// # Panics
    /// Panics if the underlying HTTP client cannot be constructed.
    pub fn new(base_url: &str, user_id: &str) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(15))
            .build()
            .expect("Could not build the HTTP client.");

        Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            user_id: user_id.to_owned(),
            http_client,
            transactions: Vec::new(),
            summary: Summary::default(),
            category_summary: Vec::new(),
            monthly_comparison: MonthlyComparison::default(),
            summary_report: Summary::default(),
        }
    }

    /// Fetch the transaction list and lifetime summary.
    pub async fn load_data(&mut self) {
        self.fetch_transactions().await;
        self.fetch_summary().await;
    }

    /// Fetch the report queries: the category breakdown, the monthly
    /// comparison and the summary report for `period`.
    pub async fn load_report(&mut self, period: Period) {
        self.fetch_category_summary().await;
        self.fetch_monthly_comparison().await;
        self.fetch_summary_report(period).await;
    }

    /// Record a new transaction, then refetch the list and summary.
    ///
    /// `amount` must already carry the correct sign: negative for expenses,
    /// positive for income.
    ///
    /// # Errors
    /// Returns an error if the request fails or the server rejects the
    /// transaction.
    pub async fn create_transaction(
        &mut self,
        title: &str,
        amount: f64,
        category: &str,
    ) -> Result<Transaction, reqwest::Error> {
        let transaction = self
            .http_client
            .post(format!("{}{}", self.base_url, endpoints::TRANSACTIONS))
            .json(&json!({
                "user_id": self.user_id,
                "title": title,
                "amount": amount,
                "category": category,
            }))
            .send()
            .await?
            .error_for_status()?
            .json::<Transaction>()
            .await?;

        self.load_data().await;

        Ok(transaction)
    }

    /// Delete a transaction, then refetch the list and summary.
    ///
    /// # Errors
    /// Returns an error if the request fails or the transaction does not
    /// exist.
    pub async fn delete_transaction(&mut self, id: i64) -> Result<(), reqwest::Error> {
        let path = format_endpoint(endpoints::TRANSACTION, &id.to_string());
        self.http_client
            .delete(format!("{}{}", self.base_url, path))
            .send()
            .await?
            .error_for_status()?;

        self.load_data().await;

        Ok(())
    }

    /// Fetch the summary report for `period`, e.g. after a period selector
    /// change. The other report queries are left as they are.
    pub async fn fetch_summary_report(&mut self, period: Period) {
        let path = format!(
            "{}?period={}",
            format_endpoint(endpoints::SUMMARY_REPORT, &self.user_id),
            period.as_query_value()
        );

        match self.get_json::<Summary>(&path).await {
            Ok(report) => self.summary_report = report,
            Err(error) => tracing::error!("Error fetching summary report: {error}"),
        }
    }

    async fn fetch_transactions(&mut self) {
        let path = format_endpoint(endpoints::TRANSACTION, &self.user_id);

        match self.get_json::<Vec<Transaction>>(&path).await {
            Ok(transactions) => self.transactions = transactions,
            Err(error) => tracing::error!("Error fetching transactions: {error}"),
        }
    }

    async fn fetch_summary(&mut self) {
        let path = format_endpoint(endpoints::SUMMARY, &self.user_id);

        match self.get_json::<Summary>(&path).await {
            Ok(summary) => self.summary = summary,
            Err(error) => tracing::error!("Error fetching summary: {error}"),
        }
    }

    async fn fetch_category_summary(&mut self) {
        let path = format_endpoint(endpoints::CATEGORIES, &self.user_id);

        match self.get_json::<Vec<CategorySummary>>(&path).await {
            Ok(categories) => self.category_summary = categories,
            Err(error) => tracing::error!("Error fetching category summary: {error}"),
        }
    }

    async fn fetch_monthly_comparison(&mut self) {
        let path = format_endpoint(endpoints::COMPARISON, &self.user_id);

        match self.get_json::<MonthlyComparison>(&path).await {
            Ok(comparison) => self.monthly_comparison = comparison,
            Err(error) => tracing::error!("Error fetching monthly comparison: {error}"),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, reqwest::Error> {
        self.http_client
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await?
            .error_for_status()?
            .json::<T>()
            .await
    }
}
