//! Events dispatched by command handlers, grouped by the command family that emits them.

use serde::Serialize;
use shared::{
    domain::{Asset, AssetId, SortDirection},
    error::AssetError,
};

use crate::state::{Filters, Pagination, Sort};

/// A failed attempt together with the confirmed snapshot to restore.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rejected<T> {
    pub previous: T,
    pub error: AssetError,
}

impl<T> Rejected<T> {
    pub fn new(previous: T, error: AssetError) -> Self {
        Self { previous, error }
    }
}

/// A list response that matched its request, already translated into confirmed slices.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetPage {
    pub assets: Vec<Asset>,
    pub pagination: Pagination,
    pub filters: Filters,
    pub sort: Sort,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ListEvent {
    Requested,
    Succeeded(AssetPage),
    Failed { error: AssetError },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DeleteEvent {
    Succeeded { asset_id: AssetId },
    Failed { asset_id: AssetId, error: AssetError },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LockEvent {
    Started { asset_id: AssetId },
    /// `locked` is the value the server accepted.
    Succeeded { asset_id: AssetId, locked: bool },
    Failed { asset_id: AssetId, error: AssetError },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UploadEvent {
    ExceededMaxSize { limit_mb: u64 },
    ExceededMaxCount { limit: usize },
    Started { count: usize },
    Succeeded { asset: Asset },
    Failed { file_name: String, error: AssetError },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QueryEvent {
    FilterUpdated { key: String, value: bool },
    SortUpdateRequested { sort: String, direction: SortDirection },
    PageUpdateRequested { page: i64 },
    FiltersCleared,
    FilterUpdateFailed(Rejected<Filters>),
    SortUpdateFailed(Rejected<Sort>),
    PageUpdateFailed(Rejected<Pagination>),
    ClearFiltersFailed(Rejected<Filters>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StatusEvent {
    Cleared,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "family", content = "event", rename_all = "snake_case")]
pub enum AssetEvent {
    List(ListEvent),
    Delete(DeleteEvent),
    Lock(LockEvent),
    Upload(UploadEvent),
    Query(QueryEvent),
    Status(StatusEvent),
}

impl AssetEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::List(ListEvent::Requested) => "ASSETS_REQUESTED",
            Self::List(ListEvent::Succeeded(_)) => "ASSETS_REQUEST_SUCCEEDED",
            Self::List(ListEvent::Failed { .. }) => "ASSETS_REQUEST_FAILED",
            Self::Delete(DeleteEvent::Succeeded { .. }) => "ASSET_DELETE_SUCCEEDED",
            Self::Delete(DeleteEvent::Failed { .. }) => "ASSET_DELETE_FAILED",
            Self::Lock(LockEvent::Started { .. }) => "LOCK_TOGGLE_STARTED",
            Self::Lock(LockEvent::Succeeded { .. }) => "LOCK_TOGGLE_SUCCEEDED",
            Self::Lock(LockEvent::Failed { .. }) => "LOCK_TOGGLE_FAILED",
            Self::Upload(UploadEvent::ExceededMaxSize { .. }) => "EXCEEDED_MAX_SIZE",
            Self::Upload(UploadEvent::ExceededMaxCount { .. }) => "EXCEEDED_MAX_COUNT",
            Self::Upload(UploadEvent::Started { .. }) => "UPLOADS_STARTED",
            Self::Upload(UploadEvent::Succeeded { .. }) => "UPLOAD_SUCCEEDED",
            Self::Upload(UploadEvent::Failed { .. }) => "UPLOAD_FAILED",
            Self::Query(QueryEvent::FilterUpdated { .. }) => "FILTER_UPDATED",
            Self::Query(QueryEvent::SortUpdateRequested { .. }) => "SORT_UPDATE_REQUESTED",
            Self::Query(QueryEvent::PageUpdateRequested { .. }) => "PAGE_UPDATE_REQUESTED",
            Self::Query(QueryEvent::FiltersCleared) => "FILTERS_CLEARED",
            Self::Query(QueryEvent::FilterUpdateFailed(_)) => "FILTER_UPDATE_FAILED",
            Self::Query(QueryEvent::SortUpdateFailed(_)) => "SORT_UPDATE_FAILED",
            Self::Query(QueryEvent::PageUpdateFailed(_)) => "PAGE_UPDATE_FAILED",
            Self::Query(QueryEvent::ClearFiltersFailed(_)) => "CLEAR_FILTERS_FAILED",
            Self::Status(StatusEvent::Cleared) => "STATUS_CLEARED",
        }
    }

    /// The error carried by failure events.
    pub fn error(&self) -> Option<&AssetError> {
        match self {
            Self::List(ListEvent::Failed { error })
            | Self::Delete(DeleteEvent::Failed { error, .. })
            | Self::Lock(LockEvent::Failed { error, .. })
            | Self::Upload(UploadEvent::Failed { error, .. }) => Some(error),
            Self::Query(QueryEvent::FilterUpdateFailed(rejected))
            | Self::Query(QueryEvent::ClearFiltersFailed(rejected)) => Some(&rejected.error),
            Self::Query(QueryEvent::SortUpdateFailed(rejected)) => Some(&rejected.error),
            Self::Query(QueryEvent::PageUpdateFailed(rejected)) => Some(&rejected.error),
            _ => None,
        }
    }

    /// True for the events that carry a batch-wide upload guard rejection.
    pub fn is_validation_rejection(&self) -> bool {
        matches!(
            self,
            Self::Upload(UploadEvent::ExceededMaxSize { .. })
                | Self::Upload(UploadEvent::ExceededMaxCount { .. })
        )
    }
}

impl From<ListEvent> for AssetEvent {
    fn from(event: ListEvent) -> Self {
        Self::List(event)
    }
}

impl From<DeleteEvent> for AssetEvent {
    fn from(event: DeleteEvent) -> Self {
        Self::Delete(event)
    }
}

impl From<LockEvent> for AssetEvent {
    fn from(event: LockEvent) -> Self {
        Self::Lock(event)
    }
}

impl From<UploadEvent> for AssetEvent {
    fn from(event: UploadEvent) -> Self {
        Self::Upload(event)
    }
}

impl From<QueryEvent> for AssetEvent {
    fn from(event: QueryEvent) -> Self {
        Self::Query(event)
    }
}

impl From<StatusEvent> for AssetEvent {
    fn from(event: StatusEvent) -> Self {
        Self::Status(event)
    }
}
