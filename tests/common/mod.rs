#![allow(dead_code)]

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use chrono::{NaiveDate, TimeZone, Utc};
use farmtrace_api::{
    aggregation::{
        AggregationFailure, LiveTraversalAggregator, PrecomputedAggregator, ProvenanceAggregator,
        RawSections, TraceRoutine, TraceRoutineRow,
    },
    config::AppConfig,
    entities::{
        batch, carrier_company, category, country, distributor, facility, farm,
        farm_certification, processing, product, product_type, province, shipment,
        shipment_batch, storage_assignment, transport_leg, vendor, vendor_retail, warehouse,
    },
    repositories::{InMemoryRelationGraph, RelationGraph},
    services::{BatchResolver, ProvenanceService},
    AppState,
};
use rust_decimal::Decimal;
use serde_json::Value;
use tower::ServiceExt;

pub const BATCH_CODE: &str = "BATCH-001";

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

/// BATCH-001 from Green Valley farm, certified VietGAP and Organic, with no
/// processing, storage or shipments yet.
pub fn green_valley_graph() -> InMemoryRelationGraph {
    let mut g = InMemoryRelationGraph::new();
    g.batches.push(batch::Model {
        id: 1,
        code: BATCH_CODE.into(),
        product_id: 10,
        farm_id: 20,
        harvest_date: date(2024, 5, 2),
        grade: Some("A".into()),
        seed_batch: Some("SEED-7".into()),
        created_by: Some("an.nguyen".into()),
        created_at: Utc
            .with_ymd_and_hms(2024, 5, 2, 8, 0, 0)
            .single()
            .expect("valid timestamp"),
    });
    g.products.push(product::Model {
        id: 10,
        name: "Arabica Coffee".into(),
        type_id: 11,
        image_url: Some("https://cdn.example.vn/arabica.png".into()),
    });
    g.product_types.push(product_type::Model {
        id: 11,
        name: "Catimor".into(),
        category_id: 12,
    });
    g.categories.push(category::Model {
        id: 12,
        name: "Coffee".into(),
    });
    g.farms.push(farm::Model {
        id: 20,
        name: "Green Valley".into(),
        owner_name: Some("Tran Van B".into()),
        contact_info: Some("+84 263 555 0101".into()),
        address: None,
        province_id: 21,
    });
    g.provinces.push(province::Model {
        id: 21,
        name: "Lam Dong".into(),
        country_id: 22,
    });
    g.countries.push(country::Model {
        id: 22,
        name: "Vietnam".into(),
    });
    g.certifications.extend([
        farm_certification::Model {
            id: 1,
            farm_id: 20,
            certification: "VietGAP".into(),
        },
        farm_certification::Model {
            id: 2,
            farm_id: 20,
            certification: "Organic".into(),
        },
    ]);
    g
}

/// Green Valley batch after processing, cold storage and one shipment with
/// two transport legs and a distributor with two retail formats.
pub fn shipped_graph() -> InMemoryRelationGraph {
    let mut g = green_valley_graph();
    g.facilities.push(facility::Model {
        id: 30,
        name: "Da Lat Packing".into(),
        address: Some("1 Phu Dong, Da Lat".into()),
        license_number: Some("LIC-30".into()),
    });
    g.processing.push(processing::Model {
        id: 1,
        batch_id: 1,
        facility_id: 30,
        processing_date: Some(date(2024, 5, 4)),
        packaging_date: Some(date(2024, 5, 5)),
        packaging_type: Some("vacuum bag".into()),
        weight_per_unit: Some(Decimal::new(5, 1)),
        processed_by: Some("Le Thi D".into()),
    });
    g.warehouses.push(warehouse::Model {
        id: 40,
        name: "Cold Store".into(),
        address: Some("12 Kho Lanh".into()),
        store_condition: Some("chilled".into()),
    });
    g.storage.push(storage_assignment::Model {
        id: 1,
        batch_id: 1,
        warehouse_id: 40,
        quantity: Decimal::new(300, 0),
        start_date: Some(date(2024, 5, 6)),
        end_date: Some(date(2024, 5, 9)),
    });
    g.vendors.extend([
        vendor::Model {
            id: 50,
            name: "Nam Viet Logistics".into(),
            contact_info: None,
            address: None,
        },
        vendor::Model {
            id: 60,
            name: "Saigon Fresh".into(),
            contact_info: Some("orders@saigonfresh.vn".into()),
            address: None,
        },
    ]);
    g.carrier_companies.push(carrier_company::Model {
        vendor_id: 50,
        license_number: Some("TR-50".into()),
    });
    g.distributors.push(distributor::Model {
        vendor_id: 60,
        distributor_type: Some("wholesale".into()),
    });
    g.retail_formats.extend([
        vendor_retail::Model {
            id: 1,
            vendor_id: 60,
            retail_format: "supermarket".into(),
        },
        vendor_retail::Model {
            id: 2,
            vendor_id: 60,
            retail_format: "online".into(),
        },
    ]);
    g.shipments.push(shipment::Model {
        id: 70,
        distributor_id: 60,
        status: "delivered".into(),
        destination: "Ho Chi Minh City".into(),
    });
    g.shipment_batches.push(shipment_batch::Model {
        id: 1,
        shipment_id: 70,
        batch_id: 1,
    });
    g.transport_legs.extend([
        transport_leg::Model {
            id: 80,
            shipment_id: 70,
            carrier_company_id: 50,
            driver_name: Some("Le Van C".into()),
            temperature_profile: Some("2-8C".into()),
            route_description: Some("Da Lat - QL20 - HCMC".into()),
        },
        transport_leg::Model {
            id: 81,
            shipment_id: 70,
            carrier_company_id: 50,
            driver_name: Some("Pham Van E".into()),
            temperature_profile: Some("2-8C".into()),
            route_description: Some("HCMC depot - store".into()),
        },
    ]);
    g
}

/// Encodes raw sections the way the stored routine returns them.
pub fn routine_row(status: &str, sections: &RawSections) -> TraceRoutineRow {
    fn encode<T: serde::Serialize>(value: &T) -> Option<String> {
        Some(serde_json::to_string(value).expect("encodable section"))
    }
    TraceRoutineRow {
        status: status.into(),
        overview: encode(&sections.overview),
        certifications: encode(&sections.certifications),
        processing_logs: encode(&sections.processing_logs),
        storage_logs: encode(&sections.storage_logs),
        distribution_logs: encode(&sections.distribution_logs),
    }
}

/// What the stored routine returns for BATCH-001 before it leaves the farm.
pub fn green_valley_routine_row() -> TraceRoutineRow {
    TraceRoutineRow {
        status: "ok".into(),
        overview: Some(
            r#"{
                "code": "BATCH-001",
                "harvest_date": "2024-05-02",
                "grade": "A",
                "seed_batch": "SEED-7",
                "created_by": "an.nguyen",
                "product_name": "Arabica Coffee",
                "product_image": "https://cdn.example.vn/arabica.png",
                "variety": "Catimor",
                "category": "Coffee",
                "farm_name": "Green Valley",
                "farm_owner": "Tran Van B",
                "farm_contact": "+84 263 555 0101",
                "region": "Lam Dong, Vietnam"
            }"#
            .into(),
        ),
        certifications: Some(
            r#"[{"certification": "VietGAP"}, {"certification": "Organic"}]"#.into(),
        ),
        processing_logs: None,
        storage_logs: Some("[]".into()),
        distribution_logs: None,
    }
}

/// What the stored routine returns for BATCH-001 once it matches [`shipped_graph`].
pub fn shipped_routine_row() -> TraceRoutineRow {
    TraceRoutineRow {
        processing_logs: Some(
            r#"[{
                "facility_name": "Da Lat Packing",
                "facility_address": "1 Phu Dong, Da Lat",
                "license_number": "LIC-30",
                "processing_date": "2024-05-04",
                "packaging_date": "2024-05-05",
                "packaging_type": "vacuum bag",
                "weight_per_unit": 0.5,
                "processed_by": "Le Thi D"
            }]"#
            .into(),
        ),
        storage_logs: Some(
            r#"[{
                "warehouse_address": "12 Kho Lanh",
                "store_condition": "chilled",
                "quantity": 300,
                "check_in": "2024-05-06",
                "check_out": "2024-05-09"
            }]"#
            .into(),
        ),
        distribution_logs: Some(
            r#"[{
                "shipment_status": "delivered",
                "destination": "Ho Chi Minh City",
                "driver_name": "Le Van C",
                "temperature_profile": "2-8C",
                "route_description": "Da Lat - QL20 - HCMC",
                "carrier_company": "Nam Viet Logistics",
                "distributor_name": "Saigon Fresh",
                "distributor_contact": "orders@saigonfresh.vn",
                "distributor_type": "wholesale",
                "retail_format": "supermarket"
            }]"#
            .into(),
        ),
        ..green_valley_routine_row()
    }
}

/// The routine's answer for a code no batch carries.
pub fn not_found_routine_row() -> TraceRoutineRow {
    TraceRoutineRow {
        status: "not_found".into(),
        ..Default::default()
    }
}

/// Stored routine stand-in that answers with a fixed row and counts calls.
pub struct FixtureRoutine {
    row: Result<Option<TraceRoutineRow>, String>,
    pub calls: AtomicUsize,
}

impl FixtureRoutine {
    pub fn returning(row: Option<TraceRoutineRow>) -> Self {
        Self {
            row: Ok(row),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn unsupported(reason: &str) -> Self {
        Self {
            row: Err(reason.into()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TraceRoutine for FixtureRoutine {
    async fn invoke(&self, _code: &str) -> Result<Option<TraceRoutineRow>, AggregationFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.row {
            Ok(row) => Ok(row.clone()),
            Err(reason) => Err(AggregationFailure::Unsupported(reason.clone())),
        }
    }
}

/// Resolver wired like production: routine first, graph traversal as fallback.
pub fn service(graph: Arc<InMemoryRelationGraph>, routine: Arc<FixtureRoutine>) -> ProvenanceService {
    let graph: Arc<dyn RelationGraph> = graph;
    let primary: Arc<dyn ProvenanceAggregator> = Arc::new(PrecomputedAggregator::new(routine));
    ProvenanceService::new(
        BatchResolver::new(graph.clone()),
        Some(primary),
        Arc::new(LiveTraversalAggregator::new(graph)),
    )
}

/// Application router over an in-memory SQLite pool and a fixture service.
pub struct TestApp {
    router: Router,
    pub state: AppState,
}

impl TestApp {
    pub async fn new(provenance: ProvenanceService) -> Self {
        let cfg = AppConfig::new(
            "sqlite::memory:".to_string(),
            "127.0.0.1".to_string(),
            18_080,
            "test".to_string(),
        );
        let db = farmtrace_api::db::establish_connection_from_app_config(&cfg)
            .await
            .expect("sqlite pool");

        let state = AppState {
            db: Arc::new(db),
            config: cfg,
            provenance: Arc::new(provenance),
        };
        let router = farmtrace_api::build_router(state.clone());
        Self { router, state }
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, &[]).await
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        headers: &[(&str, &str)],
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let request = builder.body(Body::empty()).expect("failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request");
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("readable body");
        let json = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).expect("json body")
        };
        (status, json)
    }
}
