//! Factorial Logistics -- proportional rationing between supply points and
//! consumers on a 2D grid.
//!
//! A logistics network is a fixed set of capacity-bounded **providers** and
//! demand-bounded **requesters**. Each requester ranks every provider
//! nearest-first and draws from them one at a time; a provider whose
//! registered requests exceed its capacity scales *every* registration down
//! proportionally. The network repeats request rounds until nothing moves
//! and then reports the total transportation cost (distance x amount).
//!
//! All quantities are exact rationals ([`quantity::Quantity`]), so
//! comparisons such as "is this requester fully supplied?" never suffer from
//! rounding.
//!
//! # Resolution Pipeline
//!
//! 1. **Build** -- [`builder::NetworkBuilder`] validates quantities and fixes
//!    each requester's provider preference order.
//! 2. **Rounds** -- [`network::Network::run_round`] lets every requester
//!    contact the provider at its frontier once.
//! 3. **Rationing** -- [`provider::Provider::receive_request`] returns update
//!    records; the network applies them to the affected requesters.
//! 4. **Convergence** -- rounds stop once no requester made a request.
//! 5. **Cost** -- [`network::Network::total_cost`] sums distance x amount.
//!
//! ```rust,ignore
//! let mut builder = NetworkBuilder::new();
//! builder.add_provider(Location::new(0, 0), Quantity::from_integer(2.into()))?;
//! builder.add_requester(Location::new(1, 0), Quantity::from_integer(3.into()))?;
//! let mut network = builder.build();
//! let cost = network.cost();
//! ```
//!
//! # Key Types
//!
//! - [`network::Network`] -- Owns the provider/requester arenas and drives
//!   convergence.
//! - [`provider::Provider`] -- Registers requests and rations capacity.
//! - [`requester::Requester`] -- Tracks fulfillments and the frontier.
//! - [`event::AllocationEvent`] -- Optional observability stream.
//! - [`report::AllocationReport`] -- Serializable summary of a resolved
//!   network.

pub mod builder;
pub mod error;
pub mod event;
pub mod id;
pub mod location;
pub mod network;
pub mod provider;
pub mod quantity;
pub mod report;
pub mod requester;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use builder::NetworkBuilder;
pub use error::LogisticsError;
pub use id::{ProviderId, RequesterId};
pub use location::Location;
pub use network::{Convergence, Network};
pub use quantity::Quantity;
