// Provenance resolution
pub mod provenance;

pub use provenance::{BatchResolver, ProvenanceService};
