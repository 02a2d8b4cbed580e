//! Request state for one asynchronous slot
//!
//! [`RequestState`] is the observable lifecycle of a request. The enum form
//! makes the data/error invariants structural: only `Success` carries data
//! and only `Error` carries a message. It serialises to the flat
//! `{status, data, error}` shape the frontend expects.
//!
//! [`Slot`] adds call identity. Every `start` hands out a [`Ticket`]; a
//! completion is applied only if its ticket is still the slot's current one,
//! so the last call *started* wins regardless of resolution order.

use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Idle,
    Loading,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestState<T> {
    Idle,
    Loading,
    Success(T),
    Error(String),
}

impl<T> Default for RequestState<T> {
    fn default() -> Self {
        RequestState::Idle
    }
}

impl<T> RequestState<T> {
    pub fn status(&self) -> Status {
        match self {
            RequestState::Idle => Status::Idle,
            RequestState::Loading => Status::Loading,
            RequestState::Success(_) => Status::Success,
            RequestState::Error(_) => Status::Error,
        }
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            RequestState::Success(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            RequestState::Error(message) => Some(message),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, RequestState::Loading)
    }
}

impl<T: Serialize> Serialize for RequestState<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Flat<'a, T> {
            status: Status,
            data: Option<&'a T>,
            error: Option<&'a str>,
        }

        Flat {
            status: self.status(),
            data: self.data(),
            error: self.error(),
        }
        .serialize(serializer)
    }
}

/// Identity of one started call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Whether a completed call reached its slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Resolution {
    Applied,
    /// A newer call started (or the slot was reset) before this one resolved
    Stale,
}

#[derive(Debug)]
pub struct Slot<T> {
    state: RequestState<T>,
    generation: u64,
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self {
            state: RequestState::Idle,
            generation: 0,
        }
    }
}

impl<T> Slot<T> {
    pub fn state(&self) -> &RequestState<T> {
        &self.state
    }

    /// idle | success | error | loading -> loading
    pub fn start(&mut self) -> Ticket {
        self.generation += 1;
        self.state = RequestState::Loading;
        Ticket(self.generation)
    }

    /// Back to idle; any call still in flight becomes stale
    pub fn reset(&mut self) {
        self.generation += 1;
        self.state = RequestState::Idle;
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.generation
    }

    /// loading -> success | error, for the current ticket only
    pub fn complete(&mut self, ticket: Ticket, outcome: Result<T, String>) -> Resolution {
        if !self.is_current(ticket) {
            return Resolution::Stale;
        }
        self.state = match outcome {
            Ok(data) => RequestState::Success(data),
            Err(message) => RequestState::Error(message),
        };
        Resolution::Applied
    }
}
