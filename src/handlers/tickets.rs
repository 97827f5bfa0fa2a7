use axum::extract::{Path, Query, State};
use axum::response::Response;

use crate::handlers::PageQuery;
use crate::models::{NewTicket, Ticket, TicketAction, TicketStatus};
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{created, success};

/// Checks that the referenced user and event both exist, then persists a
/// ticket in the given initial status. Nothing is written when either
/// reference is missing.
async fn create_with_status(
    state: &AppState,
    user_id: i64,
    event_id: i64,
    status: TicketStatus,
) -> Result<Ticket, AppError> {
    state
        .store
        .get_user(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user with id '{user_id}' was not found")))?;
    state
        .store
        .get_event(event_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("event with id '{event_id}' was not found")))?;

    let ticket = state
        .store
        .create_ticket(NewTicket {
            user_id,
            event_id,
            status,
        })
        .await?;

    tracing::info!(
        ticket_id = ticket.id,
        user_id,
        event_id,
        status = %ticket.status,
        "ticket created"
    );

    Ok(ticket)
}

/// Runs one lifecycle action through the state machine and persists the
/// outcome with a guarded swap. A swap miss means a concurrent request moved
/// the ticket first; the guard is then re-evaluated against the fresh state.
/// The lifecycle graph is acyclic with at most two hops from any state, so
/// the loop always terminates.
async fn apply_action(
    state: &AppState,
    id: i64,
    action: TicketAction,
) -> Result<Ticket, AppError> {
    loop {
        let ticket = state
            .store
            .get_ticket(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("ticket with id '{id}' was not found")))?;

        let next = ticket.status.apply(action)?;

        if let Some(updated) = state
            .store
            .update_ticket_status(id, ticket.status, next)
            .await?
        {
            tracing::info!(
                ticket_id = id,
                from = %ticket.status,
                to = %updated.status,
                "ticket transition"
            );
            return Ok(updated);
        }
    }
}

pub async fn buy_ticket(
    State(state): State<AppState>,
    Path((user_id, event_id)): Path<(i64, i64)>,
) -> Result<Response, AppError> {
    let ticket = create_with_status(&state, user_id, event_id, TicketStatus::Purchased).await?;
    Ok(created(ticket, "Ticket purchased"))
}

pub async fn reserve_ticket(
    State(state): State<AppState>,
    Path((user_id, event_id)): Path<(i64, i64)>,
) -> Result<Response, AppError> {
    let ticket = create_with_status(&state, user_id, event_id, TicketStatus::Reserved).await?;
    Ok(created(ticket, "Ticket reserved"))
}

pub async fn pay_ticket(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let ticket = apply_action(&state, id, TicketAction::Pay).await?;
    Ok(success(ticket, "Ticket paid"))
}

pub async fn use_ticket(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let ticket = apply_action(&state, id, TicketAction::Use).await?;
    Ok(success(ticket, "Ticket used"))
}

pub async fn cancel_ticket(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let ticket = apply_action(&state, id, TicketAction::Cancel).await?;
    Ok(success(ticket, "Ticket canceled"))
}

pub async fn get_ticket(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let ticket = state
        .store
        .get_ticket(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("ticket with id '{id}' was not found")))?;

    Ok(success(ticket, "Ticket found"))
}

pub async fn list_tickets(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Response, AppError> {
    let tickets = state.store.list_tickets(query.into()).await?;
    Ok(success(tickets, "Tickets listed"))
}
