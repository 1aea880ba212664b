//! Allocation events for passive observers.
//!
//! The network narrates each request, rationing decision and round to any
//! subscribed listener. Listeners are read-only and cannot influence the
//! allocation. With no listeners subscribed, events are never constructed.

use crate::id::{ProviderId, RequesterId};
use crate::quantity::Quantity;

/// Something that happened while resolving a network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllocationEvent {
    /// A requester asked the provider at its frontier for its remaining demand.
    RequestSent {
        requester: RequesterId,
        provider: ProviderId,
        position: usize,
        amount: Quantity,
    },
    /// Registered requests at a provider exceeded its capacity.
    Oversubscribed {
        provider: ProviderId,
        requested: Quantity,
        capacity: Quantity,
    },
    /// A provider wrote an amount into one requester slot.
    Fulfilled {
        provider: ProviderId,
        requester: RequesterId,
        position: usize,
        amount: Quantity,
    },
    /// Every requester stepped once. `round` starts at 1.
    RoundCompleted { round: usize, progressed: bool },
    /// A round made no progress; the allocation is stable.
    Converged { rounds: usize, contacts: usize },
}

/// Discriminant tag for event filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AllocationEventKind {
    RequestSent,
    Oversubscribed,
    Fulfilled,
    RoundCompleted,
    Converged,
}

impl AllocationEvent {
    pub fn kind(&self) -> AllocationEventKind {
        match self {
            AllocationEvent::RequestSent { .. } => AllocationEventKind::RequestSent,
            AllocationEvent::Oversubscribed { .. } => AllocationEventKind::Oversubscribed,
            AllocationEvent::Fulfilled { .. } => AllocationEventKind::Fulfilled,
            AllocationEvent::RoundCompleted { .. } => AllocationEventKind::RoundCompleted,
            AllocationEvent::Converged { .. } => AllocationEventKind::Converged,
        }
    }
}

/// A passive listener receives events read-only.
pub type AllocationListener = Box<dyn FnMut(&AllocationEvent)>;
