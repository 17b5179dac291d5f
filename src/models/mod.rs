pub mod gig;
pub mod report;

pub use gig::*;
pub use report::*;

/// Marker written for absent optional fields in every output format.
pub const MISSING_VALUE: &str = "N/A";
