use axum::routing::{get, patch, post};
use axum::Router;

use crate::config::create_cors_layer;
use crate::handlers::{self, events, tickets, users};
use crate::middleware::RequestLogLayer;
use crate::state::AppState;

pub fn create_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        .route("/user", post(users::create_user).get(users::list_users))
        .route("/user/:id", get(users::get_user))
        .route("/event", post(events::create_event).get(events::list_events))
        .route("/event/:id", get(events::get_event))
        .route("/ticket", get(tickets::list_tickets))
        .route("/ticket/:id", get(tickets::get_ticket))
        .route("/ticket/buy/:user_id/:event_id", post(tickets::buy_ticket))
        .route(
            "/ticket/reserve/:user_id/:event_id",
            post(tickets::reserve_ticket),
        )
        .route("/ticket/pay/:id", patch(tickets::pay_ticket))
        .route("/ticket/use/:id", patch(tickets::use_ticket))
        .route("/ticket/cancel/:id", patch(tickets::cancel_ticket))
        .layer(RequestLogLayer::new())
        .layer(create_cors_layer())
        .with_state(state)
}
