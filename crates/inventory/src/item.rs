use serde::{Deserialize, Serialize};

use barstock_core::{DomainError, DomainResult, Entity, ItemId, KeyedAmounts, LocationId, Registry};

/// On-hand quantity per physical location.
pub type StockByLocation = KeyedAmounts<LocationId>;

/// Inventory item: one beverage (or consumable) tracked across locations.
///
/// Quantities are non-negative by convention only; a manual count may record
/// anything the operator typed in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    id: ItemId,
    name: String,
    category: String,
    unit: String,
    #[serde(default)]
    stock_by_location: StockByLocation,
}

impl InventoryItem {
    pub fn new(
        id: ItemId,
        name: impl Into<String>,
        category: impl Into<String>,
        unit: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            category: category.into(),
            unit: unit.into(),
            stock_by_location: StockByLocation::new(),
        }
    }

    pub fn with_stock(mut self, stock: StockByLocation) -> Self {
        self.stock_by_location = stock;
        self
    }

    pub fn id_typed(&self) -> ItemId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn stock_by_location(&self) -> &StockByLocation {
        &self.stock_by_location
    }

    /// Sum of on-hand stock over every location.
    pub fn total_stock(&self) -> f64 {
        self.stock_by_location.total()
    }

    /// Overwrite the counted quantity at one location.
    pub fn set_stock(&mut self, location: LocationId, quantity: f64) -> DomainResult<()> {
        if !quantity.is_finite() {
            return Err(DomainError::validation("quantity must be a finite number"));
        }
        self.stock_by_location.set(location, quantity);
        Ok(())
    }

    /// Collapse every location into a single zeroed entry at `location`.
    pub fn reset_to(&mut self, location: LocationId) {
        self.stock_by_location = StockByLocation::single(location, 0.0);
    }

    /// Set every known location to zero, keeping the location keys.
    pub fn zero_all_locations(&mut self) {
        self.stock_by_location = self.stock_by_location.zeroed();
    }

    /// Check the item before it is written to a store.
    pub fn validate(&self, locations: &Registry<LocationId>) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        self.stock_by_location.validate_against(locations)
    }
}

impl Entity for InventoryItem {
    type Id = ItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
