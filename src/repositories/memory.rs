use async_trait::async_trait;
use sea_orm::DbErr;

use super::RelationGraph;
use crate::entities::{
    batch, carrier_company, category, country, distributor, facility, farm, farm_certification,
    processing, product, product_type, province, shipment, shipment_batch, storage_assignment,
    transport_leg, vendor, vendor_retail, warehouse,
};

/// Relation graph held in plain vectors, for fixtures and demos.
///
/// Rows are returned in primary-key order regardless of insertion order, the
/// same ordering [`super::SeaOrmRelationGraph`] applies.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRelationGraph {
    pub batches: Vec<batch::Model>,
    pub products: Vec<product::Model>,
    pub product_types: Vec<product_type::Model>,
    pub categories: Vec<category::Model>,
    pub farms: Vec<farm::Model>,
    pub provinces: Vec<province::Model>,
    pub countries: Vec<country::Model>,
    pub certifications: Vec<farm_certification::Model>,
    pub processing: Vec<processing::Model>,
    pub facilities: Vec<facility::Model>,
    pub storage: Vec<storage_assignment::Model>,
    pub warehouses: Vec<warehouse::Model>,
    pub shipment_batches: Vec<shipment_batch::Model>,
    pub shipments: Vec<shipment::Model>,
    pub transport_legs: Vec<transport_leg::Model>,
    pub carrier_companies: Vec<carrier_company::Model>,
    pub distributors: Vec<distributor::Model>,
    pub vendors: Vec<vendor::Model>,
    pub retail_formats: Vec<vendor_retail::Model>,
    /// Name of one accessor that answers with a database error instead of data.
    pub failing_accessor: Option<&'static str>,
}

impl InMemoryRelationGraph {
    pub fn new() -> Self {
        Self::default()
    }

    fn check(&self, accessor: &'static str) -> Result<(), DbErr> {
        match self.failing_accessor {
            Some(failing) if failing == accessor => Err(DbErr::Custom(format!(
                "{} unavailable in fixture",
                accessor
            ))),
            _ => Ok(()),
        }
    }
}

fn find_by<T: Clone>(rows: &[T], pred: impl Fn(&T) -> bool) -> Option<T> {
    rows.iter().find(|row| pred(row)).cloned()
}

fn select_sorted<T: Clone, K: Ord>(
    rows: &[T],
    pred: impl Fn(&T) -> bool,
    key: impl Fn(&T) -> K,
) -> Vec<T> {
    let mut selected: Vec<T> = rows.iter().filter(|row| pred(row)).cloned().collect();
    selected.sort_by_key(|row| key(row));
    selected
}

#[async_trait]
impl RelationGraph for InMemoryRelationGraph {
    async fn batch_by_code(&self, code: &str) -> Result<Option<batch::Model>, DbErr> {
        self.check("batch_by_code")?;
        Ok(find_by(&self.batches, |b| b.code == code))
    }

    async fn product(&self, id: i32) -> Result<Option<product::Model>, DbErr> {
        self.check("product")?;
        Ok(find_by(&self.products, |p| p.id == id))
    }

    async fn product_type(&self, id: i32) -> Result<Option<product_type::Model>, DbErr> {
        self.check("product_type")?;
        Ok(find_by(&self.product_types, |t| t.id == id))
    }

    async fn category(&self, id: i32) -> Result<Option<category::Model>, DbErr> {
        self.check("category")?;
        Ok(find_by(&self.categories, |c| c.id == id))
    }

    async fn farm(&self, id: i32) -> Result<Option<farm::Model>, DbErr> {
        self.check("farm")?;
        Ok(find_by(&self.farms, |f| f.id == id))
    }

    async fn province(&self, id: i32) -> Result<Option<province::Model>, DbErr> {
        self.check("province")?;
        Ok(find_by(&self.provinces, |p| p.id == id))
    }

    async fn country(&self, id: i32) -> Result<Option<country::Model>, DbErr> {
        self.check("country")?;
        Ok(find_by(&self.countries, |c| c.id == id))
    }

    async fn farm_certifications(
        &self,
        farm_id: i32,
    ) -> Result<Vec<farm_certification::Model>, DbErr> {
        self.check("farm_certifications")?;
        Ok(select_sorted(
            &self.certifications,
            |c| c.farm_id == farm_id,
            |c| c.id,
        ))
    }

    async fn processing_with_facility(
        &self,
        batch_id: i32,
    ) -> Result<Vec<(processing::Model, Option<facility::Model>)>, DbErr> {
        self.check("processing_with_facility")?;
        Ok(
            select_sorted(&self.processing, |p| p.batch_id == batch_id, |p| p.id)
                .into_iter()
                .map(|step| {
                    let facility = find_by(&self.facilities, |f| f.id == step.facility_id);
                    (step, facility)
                })
                .collect(),
        )
    }

    async fn storage_with_warehouse(
        &self,
        batch_id: i32,
    ) -> Result<Vec<(storage_assignment::Model, Option<warehouse::Model>)>, DbErr> {
        self.check("storage_with_warehouse")?;
        Ok(
            select_sorted(&self.storage, |s| s.batch_id == batch_id, |s| s.id)
                .into_iter()
                .map(|assignment| {
                    let warehouse = find_by(&self.warehouses, |w| w.id == assignment.warehouse_id);
                    (assignment, warehouse)
                })
                .collect(),
        )
    }

    async fn shipments_for_batch(&self, batch_id: i32) -> Result<Vec<shipment::Model>, DbErr> {
        self.check("shipments_for_batch")?;
        Ok(
            select_sorted(&self.shipment_batches, |m| m.batch_id == batch_id, |m| m.id)
                .into_iter()
                .filter_map(|membership| {
                    find_by(&self.shipments, |s| s.id == membership.shipment_id)
                })
                .collect(),
        )
    }

    async fn transport_legs(&self, shipment_id: i32) -> Result<Vec<transport_leg::Model>, DbErr> {
        self.check("transport_legs")?;
        Ok(select_sorted(
            &self.transport_legs,
            |l| l.shipment_id == shipment_id,
            |l| l.id,
        ))
    }

    async fn carrier_company(
        &self,
        vendor_id: i32,
    ) -> Result<Option<carrier_company::Model>, DbErr> {
        self.check("carrier_company")?;
        Ok(find_by(&self.carrier_companies, |c| c.vendor_id == vendor_id))
    }

    async fn distributor(&self, vendor_id: i32) -> Result<Option<distributor::Model>, DbErr> {
        self.check("distributor")?;
        Ok(find_by(&self.distributors, |d| d.vendor_id == vendor_id))
    }

    async fn vendor(&self, id: i32) -> Result<Option<vendor::Model>, DbErr> {
        self.check("vendor")?;
        Ok(find_by(&self.vendors, |v| v.id == id))
    }

    async fn retail_formats(&self, vendor_id: i32) -> Result<Vec<vendor_retail::Model>, DbErr> {
        self.check("retail_formats")?;
        Ok(select_sorted(
            &self.retail_formats,
            |r| r.vendor_id == vendor_id,
            |r| r.id,
        ))
    }
}
