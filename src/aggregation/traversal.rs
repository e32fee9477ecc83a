use super::{
    AggregateError, DistributionRow, OverviewRow, ProcessingRow, ProvenanceAggregator,
    RawSections, StorageRow, Strategy,
};
use crate::entities::{batch, farm, shipment};
use crate::repositories::RelationGraph;
use async_trait::async_trait;
use rust_decimal::prelude::ToPrimitive;
use sea_orm::DbErr;
use std::sync::Arc;
use strum::Display;
use tracing::{debug, instrument};

/// A relation hop that pointed at a row which could not be loaded.
///
/// Carries the dangling foreign key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum MissingLink {
    Product(i32),
    ProductType(i32),
    Category(i32),
    Farm(i32),
    Province(i32),
    Country(i32),
    Facility(i32),
    Warehouse(i32),
    Distributor(i32),
    DistributorVendor(i32),
    CarrierCompany(i32),
    CarrierVendor(i32),
}

/// Sections assembled by a traversal together with every hop that was absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Traversal {
    pub sections: RawSections,
    pub gaps: Vec<MissingLink>,
}

impl Traversal {
    fn note(&mut self, link: MissingLink) {
        debug!(missing = %link, "relation hop absent");
        self.gaps.push(link);
    }
}

/// Strategy B: walks the relation graph hop by hop.
///
/// Where a shipment has several transport legs, or a distributor several
/// retail formats, the row with the lowest id is used.
#[derive(Clone)]
pub struct LiveTraversalAggregator {
    graph: Arc<dyn RelationGraph>,
}

impl LiveTraversalAggregator {
    pub fn new(graph: Arc<dyn RelationGraph>) -> Self {
        Self { graph }
    }

    /// Walks the graph for `code` and reports absent hops alongside the sections.
    #[instrument(skip(self))]
    pub async fn collect(&self, code: &str) -> Result<Traversal, AggregateError> {
        let root = self
            .graph
            .batch_by_code(code)
            .await?
            .ok_or_else(|| AggregateError::NotFound(code.to_string()))?;

        let mut traversal = Traversal::default();

        let farm = self.graph.farm(root.farm_id).await?;
        if farm.is_none() {
            traversal.note(MissingLink::Farm(root.farm_id));
        }

        let overview = self.overview(&root, farm.as_ref(), &mut traversal).await?;
        traversal.sections.overview = Some(overview);

        if let Some(farm) = &farm {
            traversal.sections.certifications = self
                .graph
                .farm_certifications(farm.id)
                .await?
                .into_iter()
                .map(|c| c.certification)
                .collect();
        }

        traversal.sections.processing_logs = self.processing(&root, &mut traversal).await?;
        traversal.sections.storage_logs = self.storage(&root, &mut traversal).await?;

        for shipment in self.graph.shipments_for_batch(root.id).await? {
            let row = self.distribution(shipment, &mut traversal).await?;
            traversal.sections.distribution_logs.push(row);
        }

        debug!(
            gaps = traversal.gaps.len(),
            shipments = traversal.sections.distribution_logs.len(),
            "traversal complete"
        );
        Ok(traversal)
    }

    async fn overview(
        &self,
        root: &batch::Model,
        farm: Option<&farm::Model>,
        traversal: &mut Traversal,
    ) -> Result<OverviewRow, DbErr> {
        let mut row = OverviewRow {
            code: root.code.clone(),
            harvest_date: Some(root.harvest_date.to_string()),
            grade: root.grade.clone(),
            seed_batch: root.seed_batch.clone(),
            created_by: root.created_by.clone(),
            ..Default::default()
        };

        match self.graph.product(root.product_id).await? {
            Some(product) => {
                row.product_name = Some(product.name);
                row.product_image = product.image_url;
                match self.graph.product_type(product.type_id).await? {
                    Some(kind) => {
                        row.variety = Some(kind.name);
                        match self.graph.category(kind.category_id).await? {
                            Some(category) => row.category = Some(category.name),
                            None => traversal.note(MissingLink::Category(kind.category_id)),
                        }
                    }
                    None => traversal.note(MissingLink::ProductType(product.type_id)),
                }
            }
            None => traversal.note(MissingLink::Product(root.product_id)),
        }

        if let Some(farm) = farm {
            row.farm_name = Some(farm.name.clone());
            row.farm_owner = farm.owner_name.clone();
            row.farm_contact = farm.contact_info.clone();
            row.region = self.region(farm.province_id, traversal).await?;
        }

        Ok(row)
    }

    // "<province>, <country>", or the province alone when the country is gone.
    async fn region(
        &self,
        province_id: i32,
        traversal: &mut Traversal,
    ) -> Result<Option<String>, DbErr> {
        let Some(province) = self.graph.province(province_id).await? else {
            traversal.note(MissingLink::Province(province_id));
            return Ok(None);
        };

        match self.graph.country(province.country_id).await? {
            Some(country) => Ok(Some(format!("{}, {}", province.name, country.name))),
            None => {
                traversal.note(MissingLink::Country(province.country_id));
                Ok(Some(province.name))
            }
        }
    }

    async fn processing(
        &self,
        root: &batch::Model,
        traversal: &mut Traversal,
    ) -> Result<Vec<ProcessingRow>, DbErr> {
        let steps = self.graph.processing_with_facility(root.id).await?;
        let mut rows = Vec::with_capacity(steps.len());

        for (step, facility) in steps {
            if facility.is_none() {
                traversal.note(MissingLink::Facility(step.facility_id));
            }
            let (facility_name, facility_address, license_number) = match facility {
                Some(f) => (Some(f.name), f.address, f.license_number),
                None => (None, None, None),
            };
            rows.push(ProcessingRow {
                facility_name,
                facility_address,
                license_number,
                processing_date: step.processing_date.map(|d| d.to_string()),
                packaging_date: step.packaging_date.map(|d| d.to_string()),
                packaging_type: step.packaging_type,
                weight_per_unit: step.weight_per_unit.and_then(|w| w.to_f64()),
                processed_by: step.processed_by,
            });
        }

        Ok(rows)
    }

    async fn storage(
        &self,
        root: &batch::Model,
        traversal: &mut Traversal,
    ) -> Result<Vec<StorageRow>, DbErr> {
        let assignments = self.graph.storage_with_warehouse(root.id).await?;
        let mut rows = Vec::with_capacity(assignments.len());

        for (assignment, warehouse) in assignments {
            if warehouse.is_none() {
                traversal.note(MissingLink::Warehouse(assignment.warehouse_id));
            }
            let (warehouse_address, store_condition) = match warehouse {
                Some(w) => (w.address, w.store_condition),
                None => (None, None),
            };
            rows.push(StorageRow {
                warehouse_address,
                store_condition,
                quantity: assignment.quantity.to_f64(),
                check_in: assignment.start_date.map(|d| d.to_string()),
                check_out: assignment.end_date.map(|d| d.to_string()),
            });
        }

        Ok(rows)
    }

    async fn distribution(
        &self,
        shipment: shipment::Model,
        traversal: &mut Traversal,
    ) -> Result<DistributionRow, DbErr> {
        let mut row = DistributionRow {
            shipment_status: Some(shipment.status),
            destination: Some(shipment.destination),
            ..Default::default()
        };

        let legs = self.graph.transport_legs(shipment.id).await?;
        if let Some(leg) = legs.into_iter().next() {
            row.driver_name = leg.driver_name;
            row.temperature_profile = leg.temperature_profile;
            row.route_description = leg.route_description;

            match self.graph.carrier_company(leg.carrier_company_id).await? {
                Some(carrier) => match self.graph.vendor(carrier.vendor_id).await? {
                    Some(vendor) => row.carrier_company = Some(vendor.name),
                    None => traversal.note(MissingLink::CarrierVendor(carrier.vendor_id)),
                },
                None => traversal.note(MissingLink::CarrierCompany(leg.carrier_company_id)),
            }
        }

        match self.graph.distributor(shipment.distributor_id).await? {
            Some(distributor) => {
                row.distributor_type = distributor.distributor_type;
                match self.graph.vendor(distributor.vendor_id).await? {
                    Some(vendor) => {
                        row.distributor_name = Some(vendor.name);
                        row.distributor_contact = vendor.contact_info;
                        row.retail_format = self
                            .graph
                            .retail_formats(vendor.id)
                            .await?
                            .into_iter()
                            .next()
                            .map(|r| r.retail_format);
                    }
                    None => traversal.note(MissingLink::DistributorVendor(distributor.vendor_id)),
                }
            }
            None => traversal.note(MissingLink::Distributor(shipment.distributor_id)),
        }

        Ok(row)
    }
}

#[async_trait]
impl ProvenanceAggregator for LiveTraversalAggregator {
    fn strategy(&self) -> Strategy {
        Strategy::LiveTraversal
    }

    async fn aggregate(&self, code: &str) -> Result<RawSections, AggregateError> {
        Ok(self.collect(code).await?.sections)
    }
}
