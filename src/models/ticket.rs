use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;

/// Lifecycle state of a ticket. Persisted as the string values below; every
/// transition matches exhaustively on this enum so an added state cannot
/// silently fall through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "ticket_status", rename_all = "UPPERCASE")]
pub enum TicketStatus {
    /// Paid for, not yet used. Initial state of a bought ticket, and the
    /// result of paying a reserved one.
    Purchased,
    /// Held but not paid. Initial state of a reserved ticket.
    Reserved,
    /// Voided. Terminal.
    Canceled,
    /// Consumed at entry. Terminal.
    Used,
}

impl TicketStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TicketStatus::Purchased => "PURCHASED",
            TicketStatus::Reserved => "RESERVED",
            TicketStatus::Canceled => "CANCELED",
            TicketStatus::Used => "USED",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, TicketStatus::Canceled | TicketStatus::Used)
    }

    /// Evaluates one lifecycle action against the current status and returns
    /// the successor status, or the reason the action is not allowed.
    ///
    /// The whole transition table lives in this single match: PAY moves
    /// RESERVED to PURCHASED, USE moves PURCHASED to USED, CANCEL moves
    /// either non-terminal state to CANCELED. Everything else is rejected
    /// without mutating anything.
    pub fn apply(self, action: TicketAction) -> Result<TicketStatus, TransitionError> {
        use TicketAction::*;
        use TicketStatus::*;

        match (action, self) {
            (Pay, Reserved) => Ok(Purchased),
            (Pay, Purchased) => Err(TransitionError::AlreadyPaid),
            (Pay, Used) => Err(TransitionError::AlreadyUsed),
            (Pay, Canceled) => Err(TransitionError::CanceledCannotPay),

            (Use, Purchased) => Ok(Used),
            (Use, Reserved) => Err(TransitionError::PaymentRequired),
            (Use, Used) => Err(TransitionError::AlreadyUsed),
            (Use, Canceled) => Err(TransitionError::CanceledCannotUse),

            (Cancel, Purchased) | (Cancel, Reserved) => Ok(Canceled),
            (Cancel, Canceled) => Err(TransitionError::AlreadyCanceled),
            (Cancel, Used) => Err(TransitionError::UsedCannotCancel),
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The three lifecycle operations callable on an existing ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketAction {
    Pay,
    Use,
    Cancel,
}

/// Why a lifecycle action was rejected. `PaymentRequired` is the one case
/// surfaced as 402; the rest are plain conflicts (400).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("ticket is already paid")]
    AlreadyPaid,
    #[error("ticket must be paid before it can be used")]
    PaymentRequired,
    #[error("ticket is already used")]
    AlreadyUsed,
    #[error("ticket is already canceled")]
    AlreadyCanceled,
    #[error("ticket is canceled and cannot be paid")]
    CanceledCannotPay,
    #[error("ticket is canceled and cannot be used")]
    CanceledCannotUse,
    #[error("ticket is already used and cannot be canceled")]
    UsedCannotCancel,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Ticket {
    pub id: i64,
    pub user_id: i64,
    pub event_id: i64,
    pub status: TicketStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Store input for a new ticket. The status is fixed by the endpoint that
/// creates it: buy starts at PURCHASED, reserve at RESERVED.
#[derive(Debug, Clone, Copy)]
pub struct NewTicket {
    pub user_id: i64,
    pub event_id: i64,
    pub status: TicketStatus,
}
