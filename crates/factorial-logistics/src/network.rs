//! The logistics network and its convergence loop.
//!
//! Providers and requesters live in flat arenas indexed by [`ProviderId`] and
//! [`RequesterId`]. The network is the only place where rationing results
//! are applied: a provider hands back update records, the network writes
//! them into the addressed requesters.
//!
//! # Termination
//!
//! A step that contacts a provider always receives an update for its own
//! slot, which moves its frontier past that provider. Frontiers never move
//! backwards, so each (requester, provider) pair is contacted at most once
//! and a run performs at most `Σ len(requester.providers)` contacts.

use std::fmt;

use num_traits::Zero;
use tracing::{debug, trace};

use crate::event::{AllocationEvent, AllocationListener};
use crate::id::{ProviderId, RequesterId};
use crate::provider::Provider;
use crate::quantity::Quantity;
use crate::report::AllocationReport;
use crate::requester::{RequestStep, Requester};

/// Statistics of one [`Network::resolve`] run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Convergence {
    /// Rounds executed, including the final round that made no progress.
    pub rounds: usize,
    /// Provider contacts made during the run.
    pub contacts: usize,
}

/// A frozen set of providers and requesters. Built by
/// [`NetworkBuilder`](crate::builder::NetworkBuilder).
pub struct Network {
    providers: Vec<Provider>,
    requesters: Vec<Requester>,
    listeners: Vec<AllocationListener>,
    /// Rounds run over the network's lifetime.
    rounds: usize,
    /// Contacts made over the network's lifetime.
    contacts: usize,
}

impl fmt::Debug for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Network")
            .field("providers", &self.providers)
            .field("requesters", &self.requesters)
            .field("rounds", &self.rounds)
            .field("contacts", &self.contacts)
            .finish_non_exhaustive()
    }
}

impl Network {
    pub(crate) fn new(providers: Vec<Provider>, requesters: Vec<Requester>) -> Self {
        Self {
            providers,
            requesters,
            listeners: Vec::new(),
            rounds: 0,
            contacts: 0,
        }
    }

    // -----------------------------------------------------------------------
    // Inspection
    // -----------------------------------------------------------------------

    pub fn provider(&self, id: ProviderId) -> Option<&Provider> {
        self.providers.get(id.index())
    }

    pub fn requester(&self, id: RequesterId) -> Option<&Requester> {
        self.requesters.get(id.index())
    }

    pub fn providers(&self) -> &[Provider] {
        &self.providers
    }

    pub fn requesters(&self) -> &[Requester] {
        &self.requesters
    }

    pub fn provider_count(&self) -> usize {
        self.providers.len()
    }

    pub fn requester_count(&self) -> usize {
        self.requesters.len()
    }

    /// Upper bound on contacts a full resolution can make.
    pub fn contact_bound(&self) -> usize {
        self.requesters.iter().map(|r| r.providers().len()).sum()
    }

    /// True when no requester would contact a provider on its next step.
    pub fn is_stable(&self) -> bool {
        self.requesters
            .iter()
            .all(|r| !r.next_request().makes_progress())
    }

    /// Register a passive listener for allocation events.
    pub fn subscribe(&mut self, listener: AllocationListener) {
        self.listeners.push(listener);
    }

    // -----------------------------------------------------------------------
    // Request protocol
    // -----------------------------------------------------------------------

    /// Let one requester contact the provider at its frontier and apply the
    /// resulting rationing. Returns `false` when the requester is exhausted
    /// or already satisfied.
    pub fn make_requests_from_frontier(&mut self, id: RequesterId) -> bool {
        let Some(requester) = self.requesters.get(id.index()) else {
            return false;
        };
        let request = match requester.next_request() {
            RequestStep::Request(request) => request,
            RequestStep::Exhausted => {
                trace!(requester = %id, "no providers left");
                return false;
            }
            RequestStep::Satisfied => {
                trace!(requester = %id, "demand met");
                return false;
            }
        };

        notify(&mut self.listeners, || AllocationEvent::RequestSent {
            requester: id,
            provider: request.provider,
            position: request.position,
            amount: request.amount.clone(),
        });

        let provider = &mut self.providers[request.provider.index()];
        let rationing = provider.receive_request(id, request.position, request.amount);

        if rationing.is_oversubscribed() {
            let provider = &self.providers[request.provider.index()];
            notify(&mut self.listeners, || AllocationEvent::Oversubscribed {
                provider: provider.id(),
                requested: rationing.total_requested.clone(),
                capacity: provider.capacity().clone(),
            });
        }

        for update in &rationing.updates {
            trace!(
                provider = %request.provider,
                requester = %update.requester,
                position = update.position,
                fulfilled = %update.fulfilled,
                "fulfillment written"
            );
            self.requesters[update.requester.index()].apply(update);
            notify(&mut self.listeners, || AllocationEvent::Fulfilled {
                provider: request.provider,
                requester: update.requester,
                position: update.position,
                amount: update.fulfilled.clone(),
            });
        }

        self.contacts += 1;
        true
    }

    /// Step every requester once, in insertion order. Returns whether any
    /// requester contacted a provider.
    pub fn run_round(&mut self) -> bool {
        let mut progressed = false;
        for i in 0..self.requesters.len() {
            progressed |= self.make_requests_from_frontier(RequesterId(i as u32));
        }
        self.rounds += 1;

        let round = self.rounds;
        debug!(round, progressed, "round completed");
        notify(&mut self.listeners, || AllocationEvent::RoundCompleted {
            round,
            progressed,
        });
        progressed
    }

    /// Run rounds until one makes no progress.
    pub fn resolve(&mut self) -> Convergence {
        let start_contacts = self.contacts;
        let mut rounds = 0;
        loop {
            rounds += 1;
            if !self.run_round() {
                break;
            }
        }
        let contacts = self.contacts - start_contacts;
        debug_assert!(
            self.contacts <= self.contact_bound(),
            "contacts {} exceed bound {}",
            self.contacts,
            self.contact_bound()
        );

        debug!(rounds, contacts, "allocation converged");
        notify(&mut self.listeners, || AllocationEvent::Converged {
            rounds,
            contacts,
        });
        Convergence { rounds, contacts }
    }

    // -----------------------------------------------------------------------
    // Cost
    // -----------------------------------------------------------------------

    /// Resolve the allocation and return its total transportation cost.
    ///
    /// A network is a single-use computation. Calling this again continues
    /// from the already-advanced frontiers; build a fresh network to
    /// evaluate from scratch.
    pub fn cost(&mut self) -> Quantity {
        self.resolve();
        self.total_cost()
    }

    /// Σ distance x fulfillment over every requester slot, as things stand.
    pub fn total_cost(&self) -> Quantity {
        self.requesters
            .iter()
            .fold(Quantity::zero(), |acc, r| acc + self.cost_of(r))
    }

    /// One requester's share of the total cost.
    pub fn requester_cost(&self, id: RequesterId) -> Option<Quantity> {
        self.requester(id).map(|r| self.cost_of(r))
    }

    fn cost_of(&self, requester: &Requester) -> Quantity {
        let origin = requester.location();
        requester
            .providers()
            .iter()
            .zip(requester.fulfillments())
            .fold(Quantity::zero(), |acc, (p, amount)| {
                let distance = origin.distance(&self.providers[p.index()].location());
                acc + distance * amount
            })
    }

    /// Sum of fulfillments `id` currently holds across all requesters.
    pub fn granted(&self, id: ProviderId) -> Option<Quantity> {
        self.provider(id)?;
        Some(
            self.requesters
                .iter()
                .filter_map(|r| r.fulfillment_from(id))
                .fold(Quantity::zero(), |acc, f| acc + f),
        )
    }

    /// Serializable summary of the current allocation.
    pub fn allocation_report(&self) -> AllocationReport {
        AllocationReport::from_network(self)
    }
}

fn notify(listeners: &mut [AllocationListener], make: impl FnOnce() -> AllocationEvent) {
    if listeners.is_empty() {
        return;
    }
    let event = make();
    for listener in listeners.iter_mut() {
        listener(&event);
    }
}
