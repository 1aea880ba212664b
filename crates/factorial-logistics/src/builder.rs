use tracing::debug;

use crate::error::LogisticsError;
use crate::id::{ProviderId, RequesterId};
use crate::location::Location;
use crate::network::Network;
use crate::provider::Provider;
use crate::quantity::{Quantity, require_positive};
use crate::requester::Requester;

#[derive(Debug, Clone)]
struct ProviderSpec {
    location: Location,
    capacity: Quantity,
}

#[derive(Debug, Clone)]
struct RequesterSpec {
    location: Location,
    demand: Quantity,
}

/// Builder for a [`Network`].
/// Two-phase lifecycle: registration -> freeze.
#[derive(Debug, Clone, Default)]
pub struct NetworkBuilder {
    providers: Vec<ProviderSpec>,
    requesters: Vec<RequesterSpec>,
}

impl NetworkBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider. Capacity must be strictly positive.
    pub fn add_provider(
        &mut self,
        location: Location,
        capacity: Quantity,
    ) -> Result<ProviderId, LogisticsError> {
        require_positive("capacity", &capacity)?;
        let id = ProviderId(self.providers.len() as u32);
        self.providers.push(ProviderSpec { location, capacity });
        Ok(id)
    }

    /// Register a requester. Demand must be strictly positive.
    pub fn add_requester(
        &mut self,
        location: Location,
        demand: Quantity,
    ) -> Result<RequesterId, LogisticsError> {
        require_positive("demand", &demand)?;
        let id = RequesterId(self.requesters.len() as u32);
        self.requesters.push(RequesterSpec { location, demand });
        Ok(id)
    }

    pub fn provider_count(&self) -> usize {
        self.providers.len()
    }

    pub fn requester_count(&self) -> usize {
        self.requesters.len()
    }

    /// Freeze the topology. Each requester gets its preference order and a
    /// zeroed fulfillment slot per provider.
    pub fn build(self) -> Network {
        let locations: Vec<Location> = self.providers.iter().map(|p| p.location).collect();

        let providers: Vec<Provider> = self
            .providers
            .into_iter()
            .enumerate()
            .map(|(i, spec)| Provider::new(ProviderId(i as u32), spec.location, spec.capacity))
            .collect();

        let requesters: Vec<Requester> = self
            .requesters
            .into_iter()
            .enumerate()
            .map(|(i, spec)| {
                let order = preference_order(spec.location, &locations);
                Requester::new(RequesterId(i as u32), spec.location, spec.demand, order)
            })
            .collect();

        debug!(
            providers = providers.len(),
            requesters = requesters.len(),
            "logistics network built"
        );
        Network::new(providers, requesters)
    }
}

/// Rank providers for a requester at `origin`: ascending by
/// (manhattan distance, x, y). `locations` is indexed by provider id.
/// Providers sharing a location keep insertion order.
pub fn preference_order(origin: Location, locations: &[Location]) -> Vec<ProviderId> {
    let mut order: Vec<ProviderId> = (0..locations.len() as u32).map(ProviderId).collect();
    order.sort_by_key(|id| {
        let loc = locations[id.index()];
        (origin.manhattan_distance(&loc), loc.x, loc.y)
    });
    order
}
