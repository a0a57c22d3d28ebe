//! Request metrics for the greeting service.
//!
//! Holds the latency histogram and request counter behind an explicitly
//! constructed [`Registry`] and renders them in the Prometheus text
//! exposition format on demand.

pub mod error;
pub mod registry;
pub mod sample;

pub use error::{RegistryError, Result};
pub use registry::{
    CONTENT_TYPE, DEFAULT_BUCKETS, REQUEST_COUNT, REQUEST_LATENCY, Registry, UPKEEP_INTERVAL,
};
pub use sample::Sample;
