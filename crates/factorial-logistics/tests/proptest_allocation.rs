//! Property-based tests for allocation resolution.
//!
//! Generates random networks on a small grid and checks structural
//! invariants of the rationing protocol.

use std::collections::BTreeSet;

use factorial_logistics::test_utils::{loc, qty};
use factorial_logistics::{Location, Network, NetworkBuilder, Quantity, RequesterId};
use num_traits::Zero;
use proptest::prelude::*;

// ===========================================================================
// Generators
// ===========================================================================

/// (x, y, numerator, denominator) of a provider capacity or requester demand.
type Spec = (i64, i64, i64, i64);

fn arb_spec() -> impl Strategy<Value = Spec> {
    (-6i64..6, -6i64..6, 1i64..8, 1i64..4)
}

fn arb_network_specs() -> impl Strategy<Value = (Vec<Spec>, Vec<Spec>)> {
    (
        proptest::collection::vec(arb_spec(), 0..7),
        proptest::collection::vec(arb_spec(), 0..6),
    )
}

fn build(providers: &[Spec], requesters: &[Spec]) -> Network {
    let mut b = NetworkBuilder::new();
    for &(x, y, n, d) in providers {
        b.add_provider(loc(x, y), qty(n, d)).unwrap();
    }
    for &(x, y, n, d) in requesters {
        b.add_requester(loc(x, y), qty(n, d)).unwrap();
    }
    b.build()
}

fn frontiers(network: &Network) -> Vec<usize> {
    network.requesters().iter().map(|r| r.frontier()).collect()
}

fn ordering_key(origin: Location, at: Location) -> (u128, i64, i64) {
    (origin.manhattan_distance(&at), at.x, at.y)
}

// ===========================================================================
// Properties
// ===========================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// No provider hands out more than its capacity once converged.
    #[test]
    fn capacity_is_conserved((providers, requesters) in arb_network_specs()) {
        let mut network = build(&providers, &requesters);
        network.cost();

        for provider in network.providers() {
            let granted = network.granted(provider.id()).unwrap();
            prop_assert!(&granted <= provider.capacity());
        }
    }

    /// A requester never receives more than it asked for in total.
    #[test]
    fn fulfillment_never_exceeds_demand((providers, requesters) in arb_network_specs()) {
        let mut network = build(&providers, &requesters);
        network.cost();

        for requester in network.requesters() {
            prop_assert!(&requester.fulfilled() <= requester.demand());
            prop_assert!(requester.fulfillments().iter().all(|f| *f >= Quantity::zero()));
        }
    }

    /// Frontiers never move backwards, step by step.
    #[test]
    fn frontier_is_monotonic((providers, requesters) in arb_network_specs()) {
        let mut network = build(&providers, &requesters);
        let mut previous = frontiers(&network);

        loop {
            let mut progressed = false;
            for i in 0..network.requester_count() {
                progressed |= network.make_requests_from_frontier(RequesterId(i as u32));
                let current = frontiers(&network);
                for (before, after) in previous.iter().zip(&current) {
                    prop_assert!(before <= after);
                }
                previous = current;
            }
            if !progressed {
                break;
            }
        }
        prop_assert!(network.is_stable());
    }

    /// Resolution makes at most one contact per (requester, provider) pair.
    #[test]
    fn resolution_terminates_within_bound((providers, requesters) in arb_network_specs()) {
        let mut network = build(&providers, &requesters);
        let bound = providers.len() * requesters.len();
        prop_assert_eq!(network.contact_bound(), bound);

        let convergence = network.resolve();
        prop_assert!(convergence.contacts <= bound);
        prop_assert!(convergence.rounds <= convergence.contacts + 1);
        prop_assert!(network.is_stable());
    }

    /// Preference orders are sorted by (distance, x, y).
    #[test]
    fn preference_order_is_sorted((providers, requesters) in arb_network_specs()) {
        let network = build(&providers, &requesters);

        for requester in network.requesters() {
            let keys: Vec<_> = requester
                .providers()
                .iter()
                .map(|&p| ordering_key(requester.location(), network.provider(p).unwrap().location()))
                .collect();
            prop_assert!(keys.windows(2).all(|w| w[0] <= w[1]));
            prop_assert_eq!(keys.len(), network.provider_count());
        }
    }

    /// With distinct provider locations, build order does not change the
    /// sequence of locations a requester visits, nor the resulting cost.
    #[test]
    fn reversed_build_order_is_equivalent((providers, requesters) in arb_network_specs()) {
        let mut seen = BTreeSet::new();
        let distinct: Vec<Spec> = providers
            .into_iter()
            .filter(|&(x, y, _, _)| seen.insert((x, y)))
            .collect();
        let mut reversed = distinct.clone();
        reversed.reverse();

        let mut forward = build(&distinct, &requesters);
        let mut backward = build(&reversed, &requesters);

        for (a, b) in forward.requesters().iter().zip(backward.requesters()) {
            let seq_a: Vec<Location> = a.providers().iter().map(|&p| forward.provider(p).unwrap().location()).collect();
            let seq_b: Vec<Location> = b.providers().iter().map(|&p| backward.provider(p).unwrap().location()).collect();
            prop_assert_eq!(seq_a, seq_b);
        }

        prop_assert_eq!(forward.cost(), backward.cost());
    }

    /// Total cost is the sum of per-requester costs and never negative.
    #[test]
    fn cost_decomposes_by_requester((providers, requesters) in arb_network_specs()) {
        let mut network = build(&providers, &requesters);
        let total = network.cost();

        let parts = (0..network.requester_count() as u32)
            .map(|i| network.requester_cost(RequesterId(i)).unwrap())
            .fold(Quantity::zero(), |acc, c| acc + c);
        prop_assert_eq!(&parts, &total);
        prop_assert!(total >= Quantity::zero());
    }
}
