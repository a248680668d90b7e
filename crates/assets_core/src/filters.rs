//! The asset-type filter catalog.

use std::collections::BTreeMap;

pub type AssetTypeFilters = BTreeMap<String, bool>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssetType {
    pub key: &'static str,
    pub display_name: &'static str,
}

pub const ASSET_TYPES: &[AssetType] = &[
    AssetType {
        key: "Images",
        display_name: "Images",
    },
    AssetType {
        key: "Documents",
        display_name: "Documents",
    },
    AssetType {
        key: "OTHER",
        display_name: "Other",
    },
];

/// Every known asset type, unselected.
pub fn default_filter_state() -> AssetTypeFilters {
    ASSET_TYPES
        .iter()
        .map(|asset_type| (asset_type.key.to_string(), false))
        .collect()
}

/// Selected keys in key order.
pub fn selected_filters(filters: &AssetTypeFilters) -> Vec<&str> {
    filters
        .iter()
        .filter(|(_, selected)| **selected)
        .map(|(key, _)| key.as_str())
        .collect()
}

pub fn has_selected_filters(filters: &AssetTypeFilters) -> bool {
    filters.values().any(|selected| *selected)
}

/// Defaults overlaid with the given keys marked selected.
pub fn filters_from_selected<'a>(keys: impl IntoIterator<Item = &'a str>) -> AssetTypeFilters {
    let mut filters = default_filter_state();
    for key in keys {
        filters.insert(key.to_string(), true);
    }
    filters
}
