//! Request counting middleware

use crate::state::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use std::time::Instant;

/// Counts every request and every 4xx/5xx response, and logs latency
pub async fn metrics_middleware(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    state.increment_requests();
    let response = next.run(request).await;

    let status = response.status();
    if is_failure(status.as_u16()) {
        state.increment_errors();
    }

    tracing::debug!(
        %method,
        path = %path,
        status = status.as_u16(),
        latency_ms = start.elapsed().as_millis() as u64,
        "Request completed"
    );

    response
}

fn is_failure(status: u16) -> bool {
    status >= 400
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_failure() {
        assert!(!is_failure(200));
        assert!(!is_failure(304));
        assert!(is_failure(400));
        assert!(is_failure(500));
    }
}
