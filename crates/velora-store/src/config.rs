//! # Store Configuration
//!
//! Runtime configuration for the storefront services.

use serde::{Deserialize, Serialize};

/// How `CartService::add` treats stock when merging into an existing line.
///
/// The storefront historically validated only the increment being added,
/// not the merged line total, leaving the final word to checkout. Both
/// behaviors are kept behind this knob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddStockPolicy {
    /// Check only the quantity being added against current stock.
    /// The merged line total is validated at checkout.
    RequestedOnly,
    /// Check the merged line total (existing + added) against current stock.
    CombinedTotal,
}

impl Default for AddStockPolicy {
    fn default() -> Self {
        AddStockPolicy::RequestedOnly
    }
}

/// Storefront configuration.
///
/// Read-only after initialization; cheap to clone into services.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Store name shown on receipts and logs.
    pub store_name: String,

    /// Stock policy for repeat adds of the same variant.
    pub add_stock_policy: AddStockPolicy,
}

impl StoreConfig {
    /// Creates a configuration with the given store name and defaults.
    pub fn new(store_name: impl Into<String>) -> Self {
        StoreConfig {
            store_name: store_name.into(),
            add_stock_policy: AddStockPolicy::default(),
        }
    }

    /// Sets the repeat-add stock policy.
    pub fn add_stock_policy(mut self, policy: AddStockPolicy) -> Self {
        self.add_stock_policy = policy;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig::new("Velora")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StoreConfig::default();
        assert_eq!(config.store_name, "Velora");
        assert_eq!(config.add_stock_policy, AddStockPolicy::RequestedOnly);
    }

    #[test]
    fn test_builder() {
        let config = StoreConfig::new("Velora PH").add_stock_policy(AddStockPolicy::CombinedTotal);
        assert_eq!(config.add_stock_policy, AddStockPolicy::CombinedTotal);
    }
}
