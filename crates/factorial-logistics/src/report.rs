//! Serializable allocation summaries.
//!
//! Quantities are written in exact text form (`"3/2"`) so a report can be
//! read back without loss.

use num_traits::Zero;
use serde::{Deserialize, Serialize};

use crate::id::{ProviderId, RequesterId};
use crate::location::Location;
use crate::network::Network;
use crate::quantity::{Quantity, serde_str};

/// One non-zero slot of a requester's allocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationLine {
    pub provider: ProviderId,
    #[serde(with = "serde_str")]
    pub distance: Quantity,
    #[serde(with = "serde_str")]
    pub amount: Quantity,
}

/// Per-requester summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequesterReport {
    pub id: RequesterId,
    pub location: Location,
    #[serde(with = "serde_str")]
    pub demand: Quantity,
    #[serde(with = "serde_str")]
    pub fulfilled: Quantity,
    #[serde(with = "serde_str")]
    pub unmet: Quantity,
    #[serde(with = "serde_str")]
    pub cost: Quantity,
    pub frontier: usize,
    /// Non-zero slots in preference order.
    pub allocations: Vec<AllocationLine>,
}

/// Per-provider summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderReport {
    pub id: ProviderId,
    pub location: Location,
    #[serde(with = "serde_str")]
    pub capacity: Quantity,
    /// Sum of currently registered requests.
    #[serde(with = "serde_str")]
    pub requested: Quantity,
    /// Sum of fulfillments currently held by requesters.
    #[serde(with = "serde_str")]
    pub granted: Quantity,
}

/// Snapshot of a network's allocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationReport {
    #[serde(with = "serde_str")]
    pub total_cost: Quantity,
    pub requesters: Vec<RequesterReport>,
    pub providers: Vec<ProviderReport>,
}

impl AllocationReport {
    pub fn from_network(network: &Network) -> Self {
        let requesters = network
            .requesters()
            .iter()
            .map(|r| {
                let allocations = r
                    .providers()
                    .iter()
                    .zip(r.fulfillments())
                    .filter(|(_, amount)| !amount.is_zero())
                    .filter_map(|(&provider, amount)| {
                        let at = network.provider(provider)?.location();
                        Some(AllocationLine {
                            provider,
                            distance: r.location().distance(&at),
                            amount: amount.clone(),
                        })
                    })
                    .collect();
                RequesterReport {
                    id: r.id(),
                    location: r.location(),
                    demand: r.demand().clone(),
                    fulfilled: r.fulfilled(),
                    unmet: r.unmet(),
                    cost: network.requester_cost(r.id()).unwrap_or_else(Quantity::zero),
                    frontier: r.frontier(),
                    allocations,
                }
            })
            .collect();

        let providers = network
            .providers()
            .iter()
            .map(|p| ProviderReport {
                id: p.id(),
                location: p.location(),
                capacity: p.capacity().clone(),
                requested: p.total_requested(),
                granted: network.granted(p.id()).unwrap_or_else(Quantity::zero),
            })
            .collect();

        Self {
            total_cost: network.total_cost(),
            requesters,
            providers,
        }
    }

    /// Requesters left with unmet demand.
    pub fn short_requesters(&self) -> impl Iterator<Item = &RequesterReport> {
        self.requesters.iter().filter(|r| !r.unmet.is_zero())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{int, scenario_a};

    #[test]
    fn report_matches_resolved_scenario() {
        let mut network = scenario_a().build();
        network.cost();
        let report = network.allocation_report();

        assert_eq!(report.total_cost, int(7));
        assert_eq!(report.requesters.len(), 2);
        assert_eq!(report.providers.len(), 3);

        let first = &report.requesters[0];
        assert_eq!(first.fulfilled, int(3));
        assert_eq!(first.cost, int(4));
        assert_eq!(first.allocations.len(), 3);

        // The second requester never draws from its farthest provider.
        let second = &report.requesters[1];
        assert_eq!(second.allocations.len(), 2);
        assert_eq!(second.cost, int(3));

        for provider in &report.providers {
            assert!(provider.granted <= provider.capacity);
        }
        assert_eq!(report.short_requesters().count(), 0);
    }

    #[test]
    fn report_round_trips_through_json() {
        let mut network = scenario_a().build();
        network.cost();
        let report = network.allocation_report();

        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains(r#""total_cost":"7""#));
        assert!(json.contains(r#""amount":"1/2""#));

        let back: AllocationReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
    }
}
