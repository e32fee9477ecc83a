//! Response shapes served at the API boundary.

pub mod provenance;

pub use provenance::{
    normalize, CertificationEntry, Overview, ProcessingEntry, ProvenanceRecord, ShippingEntry,
    StorageEntry,
};
