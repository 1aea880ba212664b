//! Serde schema for network definition files.

use factorial_logistics::quantity::serde_str;
use factorial_logistics::{Location, NetworkBuilder, Quantity};
use serde::{Deserialize, Serialize};

use crate::loader::DataLoadError;

/// A provider entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderData {
    pub location: Location,
    #[serde(with = "serde_str")]
    pub capacity: Quantity,
}

/// A requester entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequesterData {
    pub location: Location,
    #[serde(with = "serde_str")]
    pub demand: Quantity,
}

/// Top-level network definition. Entry order becomes id order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkData {
    #[serde(default)]
    pub providers: Vec<ProviderData>,
    #[serde(default)]
    pub requesters: Vec<RequesterData>,
}

impl NetworkData {
    /// Register every entry with a fresh builder, in file order.
    pub fn into_builder(self) -> Result<NetworkBuilder, DataLoadError> {
        let mut builder = NetworkBuilder::new();
        for (index, p) in self.providers.into_iter().enumerate() {
            builder
                .add_provider(p.location, p.capacity)
                .map_err(|source| DataLoadError::InvalidEntry {
                    kind: "provider",
                    index,
                    source,
                })?;
        }
        for (index, r) in self.requesters.into_iter().enumerate() {
            builder
                .add_requester(r.location, r.demand)
                .map_err(|source| DataLoadError::InvalidEntry {
                    kind: "requester",
                    index,
                    source,
                })?;
        }
        Ok(builder)
    }
}
