use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockroom_core::{DomainError, DomainResult, Entity, ProductId};
use stockroom_movements::MovementType;

/// Product lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    #[default]
    Active,
    Inactive,
    Discontinued,
}

impl ProductStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductStatus::Active => "active",
            ProductStatus::Inactive => "inactive",
            ProductStatus::Discontinued => "discontinued",
        }
    }
}

impl FromStr for ProductStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(ProductStatus::Active),
            "inactive" => Ok(ProductStatus::Inactive),
            "discontinued" => Ok(ProductStatus::Discontinued),
            _ => Err(DomainError::validation(
                "status must be one of: active, inactive, discontinued",
            )),
        }
    }
}

/// Unit for the optional product weight/size metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    #[default]
    Kg,
    G,
    Mg,
    Lb,
    Oz,
    Ton,
    Mm,
    Cm,
    M,
    In,
    Ft,
}

/// Input for catalog creation. Quantity and reorder level fall back to their
/// defaults (0 and 10) when omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
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

/// Catalog edit: descriptive fields only. Quantity and the cumulative
/// counters are owned by the movement protocol and cannot be patched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductPatch {
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

/// The balance snapshot pair produced by applying one movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockChange {
    pub previous_stock: i64,
    pub new_stock: i64,
}

/// A stock-keeping unit in the catalog.
///
/// # Invariants
/// - `quantity >= 0` always; no movement may drive it negative.
/// - `quantity == initial quantity + total_in - total_out`, where `total_out`
///   accumulates both `out` and `damage` movements.
/// - `quantity`, `total_in`, `total_out` and `last_movement_date` change only
///   through [`Product::apply_movement`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub sku: String,
    pub name: String,
    pub category: String,
    pub description: Option<String>,
    pub quantity: i64,
    pub reorder_level: i64,
    pub total_in: i64,
    pub total_out: i64,
    pub last_movement_date: DateTime<Utc>,
    pub unit_price: Option<f64>,
    pub supplier: Option<String>,
    pub location: Option<String>,
    pub weight_value: Option<f64>,
    pub weight_unit: WeightUnit,
    pub status: ProductStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Case-normalize a SKU: trimmed, uppercase.
pub fn normalize_sku(sku: &str) -> String {
    sku.trim().to_uppercase()
}

fn ensure_non_negative(value: i64, field: &str) -> DomainResult<()> {
    if value < 0 {
        return Err(DomainError::validation(format!(
            "{field} cannot be negative"
        )));
    }
    Ok(())
}

fn ensure_non_negative_f64(value: Option<f64>, field: &str) -> DomainResult<()> {
    if let Some(v) = value {
        if !v.is_finite() || v < 0.0 {
            return Err(DomainError::validation(format!(
                "{field} must be a non-negative number"
            )));
        }
    }
    Ok(())
}

impl Product {
    /// Create a catalog product. Validates required fields, normalizes the
    /// SKU, and starts the cumulative counters at zero.
    ///
    /// SKU *uniqueness* is a store concern: the catalog service checks it
    /// before persisting.
    pub fn create(id: ProductId, input: NewProduct, now: DateTime<Utc>) -> DomainResult<Self> {
        let sku = normalize_sku(&input.sku);
        if sku.is_empty() {
            return Err(DomainError::validation("SKU cannot be empty"));
        }
        let name = input.name.trim().to_string();
        if name.is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        let category = input.category.trim().to_string();
        if category.is_empty() {
            return Err(DomainError::validation("category cannot be empty"));
        }

        let quantity = input.quantity.unwrap_or(0);
        ensure_non_negative(quantity, "quantity")?;
        let reorder_level = input.reorder_level.unwrap_or(10);
        ensure_non_negative(reorder_level, "reorder level")?;
        ensure_non_negative_f64(input.unit_price, "unit price")?;
        ensure_non_negative_f64(input.weight_value, "weight value")?;

        Ok(Self {
            id,
            sku,
            name,
            category,
            description: input.description,
            quantity,
            reorder_level,
            total_in: 0,
            total_out: 0,
            last_movement_date: now,
            unit_price: input.unit_price,
            supplier: input.supplier,
            location: input.location,
            weight_value: input.weight_value,
            weight_unit: input.weight_unit.unwrap_or_default(),
            status: ProductStatus::Active,
            created_at: now,
            updated_at: now,
        })
    }

    /// Apply one movement to the running balance.
    ///
    /// All checks happen before any field changes, so a rejected movement
    /// leaves the product untouched. Returns the previous/new snapshot pair
    /// for the ledger entry.
    pub fn apply_movement(
        &mut self,
        movement_type: MovementType,
        quantity: i64,
        at: DateTime<Utc>,
    ) -> DomainResult<StockChange> {
        if quantity < 1 {
            return Err(DomainError::validation("quantity must be at least 1"));
        }

        let previous_stock = self.quantity;
        if movement_type.is_outbound() && previous_stock < quantity {
            return Err(DomainError::insufficient_stock(previous_stock, quantity));
        }

        let new_stock = movement_type.new_stock(previous_stock, quantity);
        self.quantity = new_stock;
        match movement_type {
            MovementType::In => self.total_in += quantity,
            MovementType::Out | MovementType::Damage => self.total_out += quantity,
        }
        self.last_movement_date = at;
        self.updated_at = at;

        Ok(StockChange {
            previous_stock,
            new_stock,
        })
    }

    /// Apply a catalog edit. Validates exactly the fields being changed.
    pub fn apply_patch(&mut self, patch: ProductPatch, now: DateTime<Utc>) -> DomainResult<()> {
        if let Some(sku) = patch.sku {
            let sku = normalize_sku(&sku);
            if sku.is_empty() {
                return Err(DomainError::validation("SKU cannot be empty"));
            }
            self.sku = sku;
        }
        if let Some(name) = patch.name {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(DomainError::validation("name cannot be empty"));
            }
            self.name = name;
        }
        if let Some(category) = patch.category {
            let category = category.trim().to_string();
            if category.is_empty() {
                return Err(DomainError::validation("category cannot be empty"));
            }
            self.category = category;
        }
        if let Some(reorder_level) = patch.reorder_level {
            ensure_non_negative(reorder_level, "reorder level")?;
            self.reorder_level = reorder_level;
        }
        if patch.unit_price.is_some() {
            ensure_non_negative_f64(patch.unit_price, "unit price")?;
            self.unit_price = patch.unit_price;
        }
        if patch.weight_value.is_some() {
            ensure_non_negative_f64(patch.weight_value, "weight value")?;
            self.weight_value = patch.weight_value;
        }
        if let Some(description) = patch.description {
            self.description = Some(description);
        }
        if let Some(supplier) = patch.supplier {
            self.supplier = Some(supplier);
        }
        if let Some(location) = patch.location {
            self.location = Some(location);
        }
        if let Some(weight_unit) = patch.weight_unit {
            self.weight_unit = weight_unit;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        self.updated_at = now;
        Ok(())
    }

    /// Low stock: active and at/below the reorder threshold.
    pub fn is_low_stock(&self) -> bool {
        self.status == ProductStatus::Active && self.quantity <= self.reorder_level
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_product(sku: &str, quantity: i64) -> NewProduct {
        NewProduct {
            sku: sku.to_string(),
            name: "Test Product".to_string(),
            category: "general".to_string(),
            description: None,
            quantity: Some(quantity),
            reorder_level: None,
            unit_price: None,
            supplier: None,
            location: None,
            weight_value: None,
            weight_unit: None,
        }
    }

    fn make(quantity: i64) -> Product {
        Product::create(ProductId::new(), new_product("sku-001", quantity), Utc::now()).unwrap()
    }

    #[test]
    fn create_normalizes_sku_and_applies_defaults() {
        let product = Product::create(
            ProductId::new(),
            new_product("  wid-9 ", 0),
            Utc::now(),
        )
        .unwrap();
        assert_eq!(product.sku, "WID-9");
        assert_eq!(product.reorder_level, 10);
        assert_eq!(product.total_in, 0);
        assert_eq!(product.total_out, 0);
        assert_eq!(product.status, ProductStatus::Active);
        assert_eq!(product.weight_unit, WeightUnit::Kg);
    }

    #[test]
    fn create_rejects_blank_required_fields() {
        let mut input = new_product("   ", 0);
        let err = Product::create(ProductId::new(), input.clone(), Utc::now()).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        input.sku = "SKU-1".to_string();
        input.name = " ".to_string();
        assert!(Product::create(ProductId::new(), input.clone(), Utc::now()).is_err());

        input.name = "Widget".to_string();
        input.category = "".to_string();
        assert!(Product::create(ProductId::new(), input, Utc::now()).is_err());
    }

    #[test]
    fn create_rejects_negative_numbers() {
        let mut input = new_product("SKU-1", -1);
        assert!(Product::create(ProductId::new(), input.clone(), Utc::now()).is_err());

        input.quantity = Some(0);
        input.unit_price = Some(-0.5);
        assert!(Product::create(ProductId::new(), input, Utc::now()).is_err());
    }

    #[test]
    fn inbound_movement_grows_quantity_and_total_in() {
        let mut product = make(100);
        let change = product
            .apply_movement(MovementType::In, 50, Utc::now())
            .unwrap();
        assert_eq!(change.previous_stock, 100);
        assert_eq!(change.new_stock, 150);
        assert_eq!(product.quantity, 150);
        assert_eq!(product.total_in, 50);
        assert_eq!(product.total_out, 0);
    }

    #[test]
    fn outbound_movement_shrinks_quantity_and_total_out() {
        let mut product = make(150);
        let change = product
            .apply_movement(MovementType::Out, 30, Utc::now())
            .unwrap();
        assert_eq!(change.previous_stock, 150);
        assert_eq!(change.new_stock, 120);
        assert_eq!(product.quantity, 120);
        assert_eq!(product.total_out, 30);
    }

    #[test]
    fn damage_accumulates_into_total_out() {
        let mut product = make(10);
        product
            .apply_movement(MovementType::Damage, 4, Utc::now())
            .unwrap();
        assert_eq!(product.quantity, 6);
        assert_eq!(product.total_out, 4);
    }

    #[test]
    fn draining_to_exactly_zero_succeeds() {
        let mut product = make(7);
        let change = product
            .apply_movement(MovementType::Out, 7, Utc::now())
            .unwrap();
        assert_eq!(change.new_stock, 0);
        assert_eq!(product.quantity, 0);
    }

    #[test]
    fn overdraw_is_rejected_and_state_is_unchanged() {
        let mut product = make(120);
        let before = product.clone();

        let err = product
            .apply_movement(MovementType::Damage, 200, Utc::now())
            .unwrap_err();
        assert_eq!(
            err,
            DomainError::InsufficientStock {
                available: 120,
                requested: 200
            }
        );
        assert_eq!(product, before);
    }

    #[test]
    fn zero_and_negative_quantities_are_rejected() {
        let mut product = make(5);
        assert!(product
            .apply_movement(MovementType::In, 0, Utc::now())
            .is_err());
        assert!(product
            .apply_movement(MovementType::Out, -2, Utc::now())
            .is_err());
        assert_eq!(product.quantity, 5);
    }

    #[test]
    fn movement_updates_last_movement_date() {
        let mut product = make(5);
        let at = Utc::now();
        product.apply_movement(MovementType::In, 1, at).unwrap();
        assert_eq!(product.last_movement_date, at);
        assert_eq!(product.updated_at, at);
    }

    #[test]
    fn low_stock_respects_status_and_threshold() {
        let mut product = make(10);
        product.reorder_level = 10;
        assert!(product.is_low_stock());

        product.quantity = 11;
        assert!(!product.is_low_stock());

        product.quantity = 3;
        product.status = ProductStatus::Inactive;
        assert!(!product.is_low_stock());
    }

    #[test]
    fn patch_edits_descriptive_fields_only() {
        let mut product = make(42);
        let patch = ProductPatch {
            name: Some("Renamed".to_string()),
            category: Some("tools".to_string()),
            reorder_level: Some(5),
            status: Some(ProductStatus::Discontinued),
            ..ProductPatch::default()
        };
        product.apply_patch(patch, Utc::now()).unwrap();
        assert_eq!(product.name, "Renamed");
        assert_eq!(product.category, "tools");
        assert_eq!(product.reorder_level, 5);
        assert_eq!(product.status, ProductStatus::Discontinued);
        // untouched by patches
        assert_eq!(product.quantity, 42);
        assert_eq!(product.total_in, 0);
        assert_eq!(product.total_out, 0);
    }

    #[test]
    fn patch_normalizes_renamed_sku() {
        let mut product = make(1);
        let patch = ProductPatch {
            sku: Some(" abc-7 ".to_string()),
            ..ProductPatch::default()
        };
        product.apply_patch(patch, Utc::now()).unwrap();
        assert_eq!(product.sku, "ABC-7");
    }

    #[test]
    fn patch_rejects_blank_name() {
        let mut product = make(1);
        let patch = ProductPatch {
            name: Some("  ".to_string()),
            ..ProductPatch::default()
        };
        assert!(product.apply_patch(patch, Utc::now()).is_err());
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn arbitrary_movement() -> impl Strategy<Value = (MovementType, i64)> {
            (
                prop_oneof![
                    Just(MovementType::In),
                    Just(MovementType::Out),
                    Just(MovementType::Damage),
                ],
                1i64..500,
            )
        }

        proptest! {
            /// Property: for any sequence of movements on a fresh product,
            /// quantity equals initial + total_in - total_out and never goes
            /// negative at any intermediate point.
            #[test]
            fn balance_identity_holds_under_any_sequence(
                initial in 0i64..1000,
                movements in proptest::collection::vec(arbitrary_movement(), 0..40),
            ) {
                let mut product = Product::create(
                    ProductId::new(),
                    NewProduct {
                        sku: "PROP-1".to_string(),
                        name: "Prop".to_string(),
                        category: "general".to_string(),
                        description: None,
                        quantity: Some(initial),
                        reorder_level: None,
                        unit_price: None,
                        supplier: None,
                        location: None,
                        weight_value: None,
                        weight_unit: None,
                    },
                    Utc::now(),
                ).unwrap();

                for (movement_type, quantity) in movements {
                    let before = product.clone();
                    match product.apply_movement(movement_type, quantity, Utc::now()) {
                        Ok(change) => {
                            prop_assert_eq!(
                                change.new_stock,
                                movement_type.new_stock(change.previous_stock, quantity)
                            );
                        }
                        Err(_) => {
                            // A rejected movement must leave the product untouched.
                            prop_assert_eq!(&product, &before);
                        }
                    }
                    prop_assert!(product.quantity >= 0);
                    prop_assert_eq!(
                        product.quantity,
                        initial + product.total_in - product.total_out
                    );
                }
            }

            /// Property: overdrawing is always rejected, draining to zero never is.
            #[test]
            fn overdraw_rejected_drain_accepted(stock in 1i64..500) {
                let mut product = Product::create(
                    ProductId::new(),
                    NewProduct {
                        sku: "PROP-2".to_string(),
                        name: "Prop".to_string(),
                        category: "general".to_string(),
                        description: None,
                        quantity: Some(stock),
                        reorder_level: None,
                        unit_price: None,
                        supplier: None,
                        location: None,
                        weight_value: None,
                        weight_unit: None,
                    },
                    Utc::now(),
                ).unwrap();

                let err = product
                    .apply_movement(MovementType::Out, stock + 1, Utc::now())
                    .unwrap_err();
                prop_assert_eq!(err, DomainError::InsufficientStock {
                    available: stock,
                    requested: stock + 1,
                });

                product.apply_movement(MovementType::Out, stock, Utc::now()).unwrap();
                prop_assert_eq!(product.quantity, 0);
            }
        }
    }
}
