//! Capacity-bounded supply points.
//!
//! A provider remembers the latest amount each requester asked it for. When
//! the sum of those registrations exceeds its capacity, every registration is
//! scaled by `capacity / total` and re-announced, because admitting one new
//! request can shrink the share of everyone already registered.
//!
//! Providers never write into requester state. [`Provider::receive_request`]
//! returns [`FulfillmentUpdate`] records and the owning network applies them.

use std::collections::BTreeMap;

use num_traits::{Signed, Zero};
use tracing::{debug, trace};

use crate::id::{ProviderId, RequesterId};
use crate::location::Location;
use crate::quantity::Quantity;

// ---------------------------------------------------------------------------
// Update records
// ---------------------------------------------------------------------------

/// A new fulfillment for one requester slot, produced by rationing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FulfillmentUpdate {
    /// Requester whose slot is rewritten.
    pub requester: RequesterId,
    /// This provider's position in that requester's preference order.
    pub position: usize,
    /// Amount granted to that slot.
    pub fulfilled: Quantity,
    /// Frontier the requester must reach at least (`position + 1`).
    pub frontier: usize,
}

/// Outcome of one [`Provider::receive_request`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rationing {
    /// Sum of all registered requests after recording the new one.
    pub total_requested: Quantity,
    /// `capacity / total_requested` when oversubscribed, `None` otherwise.
    pub scale: Option<Quantity>,
    /// Slots to rewrite. One entry for the caller when not oversubscribed,
    /// one per registered requester otherwise.
    pub updates: Vec<FulfillmentUpdate>,
}

impl Rationing {
    pub fn is_oversubscribed(&self) -> bool {
        self.scale.is_some()
    }
}

// ---------------------------------------------------------------------------
// Provider
// ---------------------------------------------------------------------------

/// The latest request a requester registered with a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub amount: Quantity,
    pub position: usize,
}

/// A supply point with fixed capacity.
#[derive(Debug, Clone)]
pub struct Provider {
    id: ProviderId,
    location: Location,
    capacity: Quantity,
    /// Keyed by requester so rationing visits requesters in a stable order.
    requests: BTreeMap<RequesterId, Registration>,
}

impl Provider {
    /// Create a provider. Capacity is validated by the builder.
    pub(crate) fn new(id: ProviderId, location: Location, capacity: Quantity) -> Self {
        Self {
            id,
            location,
            capacity,
            requests: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> ProviderId {
        self.id
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn capacity(&self) -> &Quantity {
        &self.capacity
    }

    /// The latest amount registered by `requester`, if it ever asked.
    pub fn requested(&self, requester: RequesterId) -> Option<&Quantity> {
        self.requests.get(&requester).map(|r| &r.amount)
    }

    /// Requesters that have contacted this provider, in id order.
    pub fn requesters(&self) -> impl Iterator<Item = RequesterId> + '_ {
        self.requests.keys().copied()
    }

    /// Sum of all registered request amounts.
    pub fn total_requested(&self) -> Quantity {
        self.requests
            .values()
            .fold(Quantity::zero(), |acc, r| acc + &r.amount)
    }

    pub fn is_oversubscribed(&self) -> bool {
        self.total_requested() > self.capacity
    }

    /// Register `amount` from `requester`, which ranks this provider at
    /// `position`, and ration capacity across all registrations.
    pub fn receive_request(
        &mut self,
        requester: RequesterId,
        position: usize,
        amount: Quantity,
    ) -> Rationing {
        debug_assert!(!amount.is_negative(), "request amount must be >= 0");
        trace!(provider = %self.id, requester = %requester, %amount, "request received");

        self.requests.insert(
            requester,
            Registration {
                amount: amount.clone(),
                position,
            },
        );
        let total_requested = self.total_requested();

        if total_requested > self.capacity {
            let scale = &self.capacity / &total_requested;
            debug!(
                provider = %self.id,
                total = %total_requested,
                capacity = %self.capacity,
                %scale,
                "oversubscribed, rationing all registrations"
            );
            let updates = self
                .requests
                .iter()
                .map(|(&rid, reg)| FulfillmentUpdate {
                    requester: rid,
                    position: reg.position,
                    fulfilled: &reg.amount * &scale,
                    frontier: reg.position + 1,
                })
                .collect();
            return Rationing {
                total_requested,
                scale: Some(scale),
                updates,
            };
        }

        Rationing {
            total_requested,
            scale: None,
            updates: vec![FulfillmentUpdate {
                requester,
                position,
                fulfilled: amount,
                frontier: position + 1,
            }],
        }
    }
}
