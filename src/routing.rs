//! Application router configuration.

use axum::{
    Json, Router,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;

use crate::{
    AppState, endpoints,
    logging::logging_middleware,
    rate_limit::rate_limit_middleware,
    report::{
        get_category_summary_endpoint, get_monthly_comparison_endpoint, get_summary_endpoint,
        get_summary_report_endpoint,
    },
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, get_transactions_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::HEALTH, get(get_health))
        .route(endpoints::TRANSACTIONS, post(create_transaction_endpoint))
        .route(
            endpoints::TRANSACTION,
            get(get_transactions_endpoint).delete(delete_transaction_endpoint),
        )
        .route(endpoints::SUMMARY, get(get_summary_endpoint))
        .route(endpoints::CATEGORIES, get(get_category_summary_endpoint))
        .route(endpoints::COMPARISON, get(get_monthly_comparison_endpoint))
        .route(
            endpoints::SUMMARY_REPORT,
            get(get_summary_report_endpoint),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        .layer(middleware::from_fn(logging_middleware))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// Report that the API is up.
async fn get_health() -> Response {
    Json(json!({ "status": "ok" })).into_response()
}

/// The JSON response for requests that match no route.
async fn get_404_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "the requested resource could not be found" })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::Value;

    use crate::{AppState, build_router, endpoints, rate_limit::RateLimitConfig};

    fn get_test_server() -> TestServer {
        let conn = Connection::open_in_memory().expect("Could not open database in memory.");
        let state = AppState::new(conn, RateLimitConfig::default())
            .expect("Could not initialize app state.");

        TestServer::new(build_router(state))
    }

    #[tokio::test]
    async fn health_route_reports_ok() {
        let server = get_test_server();

        let response = server.get(endpoints::HEALTH).await;

        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["status"], "ok");
    }

    #[tokio::test]
    async fn unknown_routes_return_not_found_json() {
        let server = get_test_server();

        let response = server.get("/api/does-not-exist").await;

        response.assert_status_not_found();
        assert!(response.json::<Value>().get("error").is_some());
    }
}
