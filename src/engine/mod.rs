// src/engine/mod.rs
//! Signal routing, finding synthesis and prioritization.

pub mod findings;
pub mod router;
pub mod scorer;
pub mod signal;

pub use findings::generate_findings;
pub use router::{matches_condition, Router, RoutingResult};
pub use scorer::{
    filter_by_area, filter_by_confidence, group_by_severity, prioritize, score, SeverityGroups,
};
pub use signal::Signal;
