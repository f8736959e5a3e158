//! The API endpoint URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/transactions/{id}', use
//! [format_endpoint].

/// The route for checking that the API is up.
pub const HEALTH: &str = "/api/health";
/// The route to create a transaction.
pub const TRANSACTIONS: &str = "/api/transactions";
/// The route to list a user's transactions (GET) or delete a transaction by
/// its ID (DELETE).
pub const TRANSACTION: &str = "/api/transactions/{id}";
/// The route for a user's lifetime summary.
pub const SUMMARY: &str = "/api/transactions/summary/{user_id}";
/// The route for a user's per-category expense breakdown.
pub const CATEGORIES: &str = "/api/transactions/categories/{user_id}";
/// The route for a user's month-over-month expense comparison.
pub const COMPARISON: &str = "/api/transactions/comparison/{user_id}";
/// The route for a user's period-scoped summary report.
pub const SUMMARY_REPORT: &str = "/api/transactions/summary-report/{user_id}";

/// Replace the parameter in `endpoint_path` with `param`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/api/transactions/{id}', '{id}' is the
/// parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, param: &str) -> String {
    let mut param_start = None;
    let mut param_end = None;

    for (i, c) in endpoint_path.chars().enumerate() {
        if c == '{' {
            param_start = Some(i);
        } else if param_start.is_some() && c == '}' {
            param_end = Some(i + 1);
            break;
        }
    }

    let param_start = match param_start {
        Some(start) => start,
        None => return endpoint_path.to_string(),
    };

    let param_end = param_end.unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        param,
        &endpoint_path[param_end..]
    )
}
