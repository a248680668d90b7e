//! Slices of the composite snapshot held by [`crate::store::AssetStore`].

use serde::Serialize;
use shared::{
    domain::{Asset, SortDirection},
    error::AssetError,
    protocol::ListAssetsResponse,
};

use crate::{
    events::{AssetEvent, ListEvent},
    filters::{default_filter_state, selected_filters, AssetTypeFilters},
};

/// Page value meaning "let the server choose".
pub const NO_PAGE: i64 = -1;
pub const DEFAULT_PAGE_SIZE: u64 = 50;
pub const DEFAULT_API_SORT: &str = "date_added";
pub const DEFAULT_FRONTEND_SORT: &str = "dateAdded";

/// The query the UI currently wants. Speculative until a list response echoes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingRequest {
    /// API attribute name, sent on the wire as-is.
    pub sort: String,
    pub direction: SortDirection,
    pub page: i64,
    pub asset_types: AssetTypeFilters,
}

impl Default for PendingRequest {
    fn default() -> Self {
        Self {
            sort: DEFAULT_API_SORT.to_string(),
            direction: SortDirection::Desc,
            page: 0,
            asset_types: default_filter_state(),
        }
    }
}

impl PendingRequest {
    pub fn selected_asset_types(&self) -> Vec<&str> {
        selected_filters(&self.asset_types)
    }

    /// True when the response's echoed query metadata answers this request.
    pub fn is_echoed_by(&self, response: &ListAssetsResponse) -> bool {
        let mut echoed: Vec<&str> = response.asset_types.iter().map(String::as_str).collect();
        echoed.sort_unstable();
        echoed.dedup();

        self.sort == response.sort
            && self.direction == response.direction
            && (self.page == NO_PAGE || self.page == response.page)
            && self.selected_asset_types() == echoed
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub start: u64,
    pub end: u64,
    pub page: i64,
    pub page_size: u64,
    pub total_count: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            start: 0,
            end: 0,
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
            total_count: 0,
        }
    }
}

impl Pagination {
    pub fn from_response(response: &ListAssetsResponse) -> Self {
        Self {
            start: response.start,
            end: response.end,
            page: response.page,
            page_size: response.page_size,
            total_count: response.total_count,
        }
    }

    pub fn page_count(&self) -> u64 {
        if self.page_size == 0 {
            return 0;
        }
        self.total_count.div_ceil(self.page_size)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Filters {
    pub asset_types: AssetTypeFilters,
}

impl Default for Filters {
    fn default() -> Self {
        Self {
            asset_types: default_filter_state(),
        }
    }
}

/// Confirmed sort, in frontend attribute names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sort {
    pub sort: String,
    pub direction: SortDirection,
}

impl Default for Sort {
    fn default() -> Self {
        Self {
            sort: DEFAULT_FRONTEND_SORT.to_string(),
            direction: SortDirection::Desc,
        }
    }
}

/// Mirror of the most recently dispatched event, for banners and spinners.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Status(pub Option<AssetEvent>);

impl Status {
    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    pub fn event(&self) -> Option<&AssetEvent> {
        self.0.as_ref()
    }

    pub fn is_list_in_flight(&self) -> bool {
        matches!(self.0, Some(AssetEvent::List(ListEvent::Requested)))
    }

    pub fn error(&self) -> Option<&AssetError> {
        self.0.as_ref().and_then(AssetEvent::error)
    }
}

/// The composite snapshot read by collaborators.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AssetsState {
    pub collection: Vec<Asset>,
    pub filters: Filters,
    pub pagination: Pagination,
    pub sort: Sort,
    pub pending_request: PendingRequest,
    pub status: Status,
}

impl AssetsState {
    pub fn asset(&self, asset_id: &shared::domain::AssetId) -> Option<&Asset> {
        self.collection.iter().find(|asset| &asset.id == asset_id)
    }
}
