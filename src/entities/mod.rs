//! Relation graph entities read by the provenance resolver.
//!
//! Every entity is reachable from [`batch`] only through the chains
//! Product→Type→Category, Farm→Province→Country (+ certifications),
//! Processing→Facility, StorageAssignment→Warehouse and
//! ShipmentBatch→Shipment→{TransportLeg→CarrierCompany, Distributor}→Vendor.

pub mod batch;
pub mod carrier_company;
pub mod category;
pub mod country;
pub mod distributor;
pub mod facility;
pub mod farm;
pub mod farm_certification;
pub mod processing;
pub mod product;
pub mod product_type;
pub mod province;
pub mod shipment;
pub mod shipment_batch;
pub mod storage_assignment;
pub mod transport_leg;
pub mod vendor;
pub mod vendor_retail;
pub mod warehouse;
