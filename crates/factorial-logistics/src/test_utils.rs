//! Shared test helpers for unit tests, integration tests and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]`.

use std::cell::RefCell;
use std::rc::Rc;

use num_bigint::BigInt;

use crate::builder::NetworkBuilder;
use crate::event::AllocationEvent;
use crate::location::Location;
use crate::network::Network;
use crate::quantity::Quantity;

// ===========================================================================
// Value helpers
// ===========================================================================

pub fn qty(numer: i64, denom: i64) -> Quantity {
    Quantity::new(BigInt::from(numer), BigInt::from(denom))
}

pub fn int(n: i64) -> Quantity {
    Quantity::from_integer(BigInt::from(n))
}

pub fn loc(x: i64, y: i64) -> Location {
    Location::new(x, y)
}

// ===========================================================================
// Reference networks
// ===========================================================================

/// Three providers of capacity 2 on a line, two requesters of demand 3
/// between them. Resolves to a total cost of 7.
pub fn scenario_a() -> NetworkBuilder {
    let mut b = NetworkBuilder::new();
    for x in [0, 2, 4] {
        b.add_provider(loc(x, 0), int(2)).unwrap();
    }
    b.add_requester(loc(1, 0), int(3)).unwrap();
    b.add_requester(loc(3, 0), int(3)).unwrap();
    b
}

/// Five providers (one shared, two off-axis) and the same two requesters
/// as [`scenario_a`].
pub fn scenario_b() -> NetworkBuilder {
    let mut b = NetworkBuilder::new();
    b.add_provider(loc(0, 0), int(1)).unwrap();
    b.add_provider(loc(2, 0), int(2)).unwrap();
    b.add_provider(loc(4, 0), int(1)).unwrap();
    b.add_provider(loc(1, 1), int(1)).unwrap();
    b.add_provider(loc(3, 1), int(1)).unwrap();
    b.add_requester(loc(1, 0), int(3)).unwrap();
    b.add_requester(loc(3, 0), int(3)).unwrap();
    b
}

/// Providers and requesters interleaved on the x axis: provider `i` at
/// `x = 2i`, requester `j` at `x = 2j + 1`.
pub fn line_network(
    providers: usize,
    requesters: usize,
    capacity: Quantity,
    demand: Quantity,
) -> NetworkBuilder {
    let mut b = NetworkBuilder::new();
    for i in 0..providers {
        b.add_provider(loc(2 * i as i64, 0), capacity.clone()).unwrap();
    }
    for j in 0..requesters {
        b.add_requester(loc(2 * j as i64 + 1, 0), demand.clone()).unwrap();
    }
    b
}

/// A `side` x `side` grid with a provider on even cells and a requester on
/// odd cells (checkerboard).
pub fn checkerboard_network(side: i64, capacity: Quantity, demand: Quantity) -> NetworkBuilder {
    let mut b = NetworkBuilder::new();
    for x in 0..side {
        for y in 0..side {
            if (x + y) % 2 == 0 {
                b.add_provider(loc(x, y), capacity.clone()).unwrap();
            } else {
                b.add_requester(loc(x, y), demand.clone()).unwrap();
            }
        }
    }
    b
}

// ===========================================================================
// Event capture
// ===========================================================================

/// Subscribe a recorder and return the shared log it appends to.
pub fn record_events(network: &mut Network) -> Rc<RefCell<Vec<AllocationEvent>>> {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    network.subscribe(Box::new(move |event: &AllocationEvent| {
        sink.borrow_mut().push(event.clone())
    }));
    log
}
