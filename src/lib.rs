//! Artemis Arrow - traffic-mirroring sensor
//!
//! Captures packets on the host's non-control interfaces, encapsulates each
//! frame in a VXLAN header (RFC 7348), and forwards it over UDP to a
//! collector. Both directions of a conversation leave the sensor from the
//! same flow-hashed source port, so collector-side load balancing keeps
//! flows together.

pub mod capture;
pub mod config;
pub mod error;
pub mod events;
pub mod export;
pub mod filter;
pub mod flow;
pub mod frame;
pub mod iface;
pub mod vxlan;

// Re-exports for convenience
pub use config::{Config, FilterConfig, Protocol};
pub use error::{ArrowError, ArrowResult};
pub use events::{Event, Reporter};
pub use export::{resolve_collector, Exporter};
pub use filter::CaptureFilter;
pub use frame::{FrameSummary, Transport};
pub use iface::Verdict;
