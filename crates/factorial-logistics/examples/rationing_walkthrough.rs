//! Resolve a small contended network and print every rationing step.
//!
//! Run with `RUST_LOG=factorial_logistics=trace` to see the library's own
//! tracing output alongside the event narration.

use factorial_logistics::event::AllocationEvent;
use factorial_logistics::quantity::{to_f64, whole};
use factorial_logistics::{Location, LogisticsError, NetworkBuilder};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), LogisticsError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut builder = NetworkBuilder::new();
    for (x, y, capacity) in [(0, 0, 1), (2, 0, 2), (4, 0, 1), (1, 1, 1), (3, 1, 1)] {
        builder.add_provider(Location::new(x, y), whole(capacity))?;
    }
    builder.add_requester(Location::new(1, 0), whole(3))?;
    builder.add_requester(Location::new(3, 0), whole(3))?;

    let mut network = builder.build();
    network.subscribe(Box::new(|event: &AllocationEvent| match event {
        AllocationEvent::RequestSent {
            requester,
            provider,
            amount,
            ..
        } => println!("{requester} asks {provider} for {amount}"),
        AllocationEvent::Oversubscribed {
            provider,
            requested,
            capacity,
        } => println!("{provider} oversubscribed: {requested} requested, {capacity} available"),
        AllocationEvent::Fulfilled {
            provider,
            requester,
            amount,
            ..
        } => println!("  {provider} grants {amount} to {requester}"),
        AllocationEvent::RoundCompleted { round, progressed } => {
            println!("-- round {round} (progress: {progressed})")
        }
        AllocationEvent::Converged { rounds, contacts } => {
            println!("converged after {rounds} rounds, {contacts} contacts")
        }
    }));

    let cost = network.cost();
    println!("total cost: {cost} (~{:.4})", to_f64(&cost));

    let report = network.allocation_report();
    for requester in report.short_requesters() {
        println!("{} is short by {}", requester.id, requester.unmet);
    }
    Ok(())
}
