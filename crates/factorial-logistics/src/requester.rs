//! Demand points and their stepwise request protocol.
//!
//! A requester walks its provider preference list one position at a time.
//! The *frontier* is the first position it has not been granted anything at
//! yet; it only ever moves forward, either because the requester's own
//! request was answered or because a provider re-rationed after another
//! requester's request.

use num_traits::Zero;

use crate::id::{ProviderId, RequesterId};
use crate::location::Location;
use crate::provider::FulfillmentUpdate;
use crate::quantity::{self, Quantity};

/// A request a requester wants delivered to the provider at its frontier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub requester: RequesterId,
    pub provider: ProviderId,
    /// Frontier position the provider occupies in the preference order.
    pub position: usize,
    /// Remaining demand: `demand - Σ fulfillments[..position]`.
    pub amount: Quantity,
}

/// What a requester does on its next step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestStep {
    /// Every provider has been passed; nothing left to ask.
    Exhausted,
    /// Slots before the frontier already add up to the demand.
    Satisfied,
    /// Contact the provider at the frontier.
    Request(Request),
}

impl RequestStep {
    /// Whether this step contacts a provider.
    pub fn makes_progress(&self) -> bool {
        matches!(self, RequestStep::Request(_))
    }
}

/// A demand point with a fixed, nearest-first provider ordering.
#[derive(Debug, Clone)]
pub struct Requester {
    id: RequesterId,
    location: Location,
    demand: Quantity,
    /// Preference order, fixed at build time.
    providers: Vec<ProviderId>,
    /// Parallel to `providers`.
    fulfillments: Vec<Quantity>,
    /// Indexed by provider id: that provider's position in `providers`.
    positions: Vec<usize>,
    frontier: usize,
}

impl Requester {
    /// Create a requester with a fixed preference order. `providers` must be
    /// a permutation of the network's provider ids.
    pub(crate) fn new(
        id: RequesterId,
        location: Location,
        demand: Quantity,
        providers: Vec<ProviderId>,
    ) -> Self {
        let mut positions = vec![0; providers.len()];
        for (position, provider) in providers.iter().enumerate() {
            positions[provider.index()] = position;
        }
        let fulfillments = vec![Quantity::zero(); providers.len()];
        Self {
            id,
            location,
            demand,
            providers,
            fulfillments,
            positions,
            frontier: 0,
        }
    }

    pub fn id(&self) -> RequesterId {
        self.id
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn demand(&self) -> &Quantity {
        &self.demand
    }

    /// Providers in preference order.
    pub fn providers(&self) -> &[ProviderId] {
        &self.providers
    }

    /// Fulfillment per preference position.
    pub fn fulfillments(&self) -> &[Quantity] {
        &self.fulfillments
    }

    /// Index of the next provider this requester has not yet passed.
    pub fn frontier(&self) -> usize {
        self.frontier
    }

    /// Position of `provider` in this requester's preference order.
    pub fn position_of(&self, provider: ProviderId) -> Option<usize> {
        self.positions.get(provider.index()).copied()
    }

    /// Fulfillment currently held from `provider`.
    pub fn fulfillment_from(&self, provider: ProviderId) -> Option<&Quantity> {
        self.position_of(provider).map(|i| &self.fulfillments[i])
    }

    /// Total granted across all providers.
    pub fn fulfilled(&self) -> Quantity {
        quantity::sum(&self.fulfillments)
    }

    /// Demand not covered by current fulfillments.
    pub fn unmet(&self) -> Quantity {
        &self.demand - self.fulfilled()
    }

    /// Decide the next step from the current frontier.
    pub fn next_request(&self) -> RequestStep {
        let position = self.frontier;
        if position == self.providers.len() {
            return RequestStep::Exhausted;
        }

        let already_fulfilled = quantity::sum(&self.fulfillments[..position]);
        if already_fulfilled == self.demand {
            return RequestStep::Satisfied;
        }

        RequestStep::Request(Request {
            requester: self.id,
            provider: self.providers[position],
            position,
            amount: &self.demand - already_fulfilled,
        })
    }

    /// Apply a rationing result addressed to this requester.
    pub fn apply(&mut self, update: &FulfillmentUpdate) {
        debug_assert_eq!(update.requester, self.id);
        self.fulfillments[update.position] = update.fulfilled.clone();
        self.frontier = self.frontier.max(update.frontier);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{int, qty};

    fn requester(demand: Quantity, order: &[u32]) -> Requester {
        Requester::new(
            RequesterId(0),
            Location::new(0, 0),
            demand,
            order.iter().map(|&i| ProviderId(i)).collect(),
        )
    }

    fn update(position: usize, fulfilled: Quantity) -> FulfillmentUpdate {
        FulfillmentUpdate {
            requester: RequesterId(0),
            position,
            fulfilled,
            frontier: position + 1,
        }
    }

    #[test]
    fn new_requester_starts_at_zero() {
        let r = requester(int(3), &[2, 0, 1]);
        assert_eq!(r.frontier(), 0);
        assert_eq!(r.fulfillments(), &[int(0), int(0), int(0)]);
        assert_eq!(r.position_of(ProviderId(2)), Some(0));
        assert_eq!(r.position_of(ProviderId(1)), Some(2));
        assert_eq!(r.position_of(ProviderId(9)), None);
    }

    #[test]
    fn first_request_asks_for_full_demand() {
        let r = requester(int(3), &[1, 0]);
        assert_eq!(
            r.next_request(),
            RequestStep::Request(Request {
                requester: RequesterId(0),
                provider: ProviderId(1),
                position: 0,
                amount: int(3),
            })
        );
    }

    #[test]
    fn next_request_asks_for_remaining_demand() {
        let mut r = requester(int(3), &[0, 1, 2]);
        r.apply(&update(0, int(2)));

        match r.next_request() {
            RequestStep::Request(req) => {
                assert_eq!(req.provider, ProviderId(1));
                assert_eq!(req.position, 1);
                assert_eq!(req.amount, int(1));
            }
            other => panic!("expected a request, got {other:?}"),
        }
    }

    #[test]
    fn satisfied_requester_stops_before_contacting() {
        let mut r = requester(int(3), &[0, 1]);
        r.apply(&update(0, int(3)));
        assert_eq!(r.next_request(), RequestStep::Satisfied);
        assert!(!r.next_request().makes_progress());
        assert_eq!(r.unmet(), int(0));
    }

    #[test]
    fn exhausted_requester_has_no_providers_left() {
        let mut r = requester(int(3), &[0]);
        r.apply(&update(0, qty(1, 2)));
        assert_eq!(r.next_request(), RequestStep::Exhausted);
        assert_eq!(r.unmet(), qty(5, 2));
    }

    #[test]
    fn requester_without_providers_is_exhausted_immediately() {
        let r = requester(int(1), &[]);
        assert_eq!(r.next_request(), RequestStep::Exhausted);
        assert_eq!(r.fulfilled(), int(0));
    }

    #[test]
    fn frontier_never_moves_backwards() {
        let mut r = requester(int(5), &[0, 1, 2]);
        r.apply(&update(2, int(1)));
        assert_eq!(r.frontier(), 3);

        // A later rescale of an earlier slot rewrites the amount only.
        r.apply(&update(0, qty(1, 4)));
        assert_eq!(r.frontier(), 3);
        assert_eq!(r.fulfillments()[0], qty(1, 4));
        assert_eq!(r.fulfillment_from(ProviderId(0)), Some(&qty(1, 4)));
    }
}
