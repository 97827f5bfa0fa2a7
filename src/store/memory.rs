use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use crate::models::{Event, NewEvent, NewTicket, NewUser, Ticket, TicketStatus, User};
use crate::store::{Page, Store, StoreError};

/// In-memory store used by the test suite and for running the service
/// without a database. Ids are assigned from 1 upward per entity, matching
/// the BIGSERIAL columns of the Postgres schema.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    users: BTreeMap<i64, User>,
    events: BTreeMap<i64, Event>,
    tickets: BTreeMap<i64, Ticket>,
    next_user_id: i64,
    next_event_id: i64,
    next_ticket_id: i64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn paginate<T: Clone>(map: &BTreeMap<i64, T>, page: Page) -> Vec<T> {
    map.values()
        .skip(page.offset() as usize)
        .take(page.limit() as usize)
        .cloned()
        .collect()
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_user(&self, new: NewUser) -> Result<User, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.next_user_id += 1;
        let now = Utc::now();
        let user = User {
            id: inner.next_user_id,
            username: new.username,
            password: new.password,
            created_at: now,
            updated_at: now,
        };
        inner.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get_user(&self, id: i64) -> Result<Option<User>, StoreError> {
        Ok(self.inner.lock().unwrap().users.get(&id).cloned())
    }

    async fn list_users(&self, page: Page) -> Result<Vec<User>, StoreError> {
        Ok(paginate(&self.inner.lock().unwrap().users, page))
    }

    async fn create_event(&self, new: NewEvent) -> Result<Event, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.next_event_id += 1;
        let now = Utc::now();
        let event = Event {
            id: inner.next_event_id,
            name: new.name,
            price: new.price,
            created_at: now,
            updated_at: now,
        };
        inner.events.insert(event.id, event.clone());
        Ok(event)
    }

    async fn get_event(&self, id: i64) -> Result<Option<Event>, StoreError> {
        Ok(self.inner.lock().unwrap().events.get(&id).cloned())
    }

    async fn list_events(&self, page: Page) -> Result<Vec<Event>, StoreError> {
        Ok(paginate(&self.inner.lock().unwrap().events, page))
    }

    async fn create_ticket(&self, new: NewTicket) -> Result<Ticket, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.next_ticket_id += 1;
        let now = Utc::now();
        let ticket = Ticket {
            id: inner.next_ticket_id,
            user_id: new.user_id,
            event_id: new.event_id,
            status: new.status,
            created_at: now,
            updated_at: now,
        };
        inner.tickets.insert(ticket.id, ticket.clone());
        Ok(ticket)
    }

    async fn get_ticket(&self, id: i64) -> Result<Option<Ticket>, StoreError> {
        Ok(self.inner.lock().unwrap().tickets.get(&id).cloned())
    }

    async fn list_tickets(&self, page: Page) -> Result<Vec<Ticket>, StoreError> {
        Ok(paginate(&self.inner.lock().unwrap().tickets, page))
    }

    async fn update_ticket_status(
        &self,
        id: i64,
        expected: TicketStatus,
        next: TicketStatus,
    ) -> Result<Option<Ticket>, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let Some(ticket) = inner.tickets.get_mut(&id) else {
            return Ok(None);
        };
        // Same compare-and-swap contract as the SQL UPDATE ... WHERE status.
        if ticket.status != expected {
            return Ok(None);
        }
        ticket.status = next;
        ticket.updated_at = Utc::now();
        Ok(Some(ticket.clone()))
    }
}
