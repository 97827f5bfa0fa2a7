pub mod event;
pub mod ticket;
pub mod user;

pub use event::{Event, NewEvent};
pub use ticket::{NewTicket, Ticket, TicketAction, TicketStatus, TransitionError};
pub use user::{NewUser, User};
