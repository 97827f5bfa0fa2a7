use axum::response::Response;
use serde::{Deserialize, Serialize};

use crate::store::{MAX_PAGE_SIZE, Page};
use crate::utils::response::{empty_success, success};

pub mod events;
pub mod tickets;
pub mod users;

/// Query parameters shared by all list endpoints.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

impl From<PageQuery> for Page {
    fn from(query: PageQuery) -> Self {
        Page::new(
            query.offset.unwrap_or(0),
            query.limit.unwrap_or(MAX_PAGE_SIZE),
        )
    }
}

#[derive(Serialize)]
struct HealthPayload {
    status: &'static str,
    service: &'static str,
}

pub async fn health_check() -> Response {
    let payload = HealthPayload {
        status: "ok",
        service: "boxoffice-api",
    };

    success(payload, "Health check successful")
}

// Sanity check kept at the root path for compatibility with older clients.
pub async fn root() -> Response {
    empty_success("Ticket API is working")
}
