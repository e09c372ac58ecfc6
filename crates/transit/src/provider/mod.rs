//! Transit dataset providers.

pub mod geojson_loader;
pub mod static_provider;

pub use static_provider::{StaticTransitProvider, DEFAULT_LINE_PROPERTY};
