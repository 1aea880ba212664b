//! Data-driven logistics network definitions.
//!
//! Networks can be described in RON, TOML or JSON and loaded into a
//! [`factorial_logistics::NetworkBuilder`]. Quantities may be written as
//! integers, finite decimals or exact fraction strings (`"3/2"`).

pub mod loader;
pub mod schema;

pub use loader::{
    DataLoadError, Format, detect_format, find_network_file, load_network_file, parse_network_str,
    read_network_file,
};
pub use schema::{NetworkData, ProviderData, RequesterData};
