use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};

use stockroom_auth::UserProfile;
use stockroom_catalog::{NewProduct, Product, ProductPatch, ProductStatus, WeightUnit};
use stockroom_infra::{MovementOutcome, MovementView, ProductSummary};
use stockroom_movements::MovementRecord;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub sku: String,
    pub name: String,
    pub category: String,
    pub description: Option<String>,
    pub quantity: Option<i64>,
    pub reorder_level: Option<i64>,
    pub unit_price: Option<f64>,
    pub supplier: Option<String>,
    pub location: Option<String>,
    pub weight_value: Option<f64>,
    pub weight_unit: Option<WeightUnit>,
}

impl CreateProductRequest {
    pub fn into_new_product(self) -> NewProduct {
        NewProduct {
            sku: self.sku,
            name: self.name,
            category: self.category,
            description: self.description,
            quantity: self.quantity,
            reorder_level: self.reorder_level,
            unit_price: self.unit_price,
            supplier: self.supplier,
            location: self.location,
            weight_value: self.weight_value,
            weight_unit: self.weight_unit,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct UpdateProductRequest {
    pub sku: Option<String>,
    pub name: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub reorder_level: Option<i64>,
    pub unit_price: Option<f64>,
    pub supplier: Option<String>,
    pub location: Option<String>,
    pub weight_value: Option<f64>,
    pub weight_unit: Option<WeightUnit>,
    pub status: Option<ProductStatus>,
}

impl UpdateProductRequest {
    pub fn into_patch(self) -> ProductPatch {
        ProductPatch {
            sku: self.sku,
            name: self.name,
            category: self.category,
            description: self.description,
            reorder_level: self.reorder_level,
            unit_price: self.unit_price,
            supplier: self.supplier,
            location: self.location,
            weight_value: self.weight_value,
            weight_unit: self.weight_unit,
            status: self.status,
        }
    }
}

/// Body for the fixed-type endpoints (`/stock/in`, `/stock/out`,
/// `/stock/damage`).
#[derive(Debug, Deserialize)]
pub struct StockRequest {
    pub product_id: String,
    pub quantity: i64,
    pub reason: String,
    pub reference: Option<String>,
    pub notes: Option<String>,
}

/// Body for the generic `/stock/movements` endpoint (type in the payload).
#[derive(Debug, Deserialize)]
pub struct CreateMovementRequest {
    pub product_id: String,
    #[serde(rename = "type")]
    pub movement_type: String,
    pub quantity: i64,
    pub reason: String,
    pub reference: Option<String>,
    pub notes: Option<String>,
}

/// Query string for `GET /stock/movements`.
#[derive(Debug, Deserialize, Default)]
pub struct MovementQuery {
    #[serde(rename = "type")]
    pub movement_type: Option<String>,
    pub product_id: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Default)]
pub struct TrendsQuery {
    pub days: Option<i64>,
}

#[derive(Debug, Deserialize, Default)]
pub struct TopSkusQuery {
    pub limit: Option<usize>,
}

// -------------------------
// Response mapping
// -------------------------

pub fn product_to_json(product: &Product) -> Value {
    json!({
        "id": product.id.to_string(),
        "sku": product.sku,
        "name": product.name,
        "category": product.category,
        "description": product.description,
        "quantity": product.quantity,
        "reorder_level": product.reorder_level,
        "total_in": product.total_in,
        "total_out": product.total_out,
        "last_movement_date": product.last_movement_date,
        "unit_price": product.unit_price,
        "supplier": product.supplier,
        "location": product.location,
        "weight_value": product.weight_value,
        "weight_unit": product.weight_unit,
        "status": product.status,
        "low_stock": product.is_low_stock(),
        "created_at": product.created_at,
        "updated_at": product.updated_at,
    })
}

pub fn product_summary_to_json(summary: &ProductSummary) -> Value {
    json!({
        "id": summary.id.to_string(),
        "sku": summary.sku,
        "name": summary.name,
        "quantity": summary.quantity,
        "total_in": summary.total_in,
        "total_out": summary.total_out,
        "last_movement_date": summary.last_movement_date,
    })
}

fn profile_to_json(profile: &UserProfile) -> Value {
    json!({
        "id": profile.id.to_string(),
        "name": profile.name,
        "email": profile.email,
    })
}

fn record_to_json(record: &MovementRecord) -> Value {
    json!({
        "id": record.id.to_string(),
        "product_id": record.product_id.to_string(),
        "type": record.movement_type,
        "quantity": record.quantity,
        "reason": record.reason,
        "reference": record.reference,
        "notes": record.notes,
        "date": record.date,
        "previous_stock": record.previous_stock,
        "new_stock": record.new_stock,
    })
}

/// The `{ message, movement, updated_product }` shape returned by every
/// successful stock mutation. The movement carries its resolved product and
/// actor identities.
pub fn outcome_to_json(message: &str, outcome: &MovementOutcome) -> Value {
    let mut movement = record_to_json(&outcome.movement);
    movement["product"] = json!({
        "id": outcome.product.id.to_string(),
        "sku": outcome.product.sku,
        "name": outcome.product.name,
        "category": outcome.product.category,
    });
    movement["performed_by"] = outcome
        .performed_by
        .as_ref()
        .map(profile_to_json)
        .unwrap_or(Value::Null);

    json!({
        "message": message,
        "movement": movement,
        "updated_product": product_summary_to_json(&outcome.product),
    })
}

pub fn movement_view_to_json(view: &MovementView) -> Value {
    let mut movement = record_to_json(&view.movement);
    movement["product"] = view
        .product
        .as_ref()
        .map(|p| {
            json!({
                "id": p.id.to_string(),
                "sku": p.sku,
                "name": p.name,
                "category": p.category,
            })
        })
        .unwrap_or(Value::Null);
    movement["performed_by"] = view
        .performed_by
        .as_ref()
        .map(profile_to_json)
        .unwrap_or(Value::Null);
    movement
}
