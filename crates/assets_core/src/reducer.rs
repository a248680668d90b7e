//! Pure state transitions, one per slice.
//!
//! Each function takes the current slice by value and returns the next one. Confirmed
//! slices (filters, sort, pagination) only change on a matching list response or on
//! their own rollback event.

use std::collections::HashSet;

use shared::domain::{Asset, AssetId, LoadingField};

use crate::{
    events::{AssetEvent, DeleteEvent, ListEvent, LockEvent, QueryEvent, StatusEvent},
    filters::default_filter_state,
    state::{AssetsState, Filters, Pagination, PendingRequest, Sort, Status, NO_PAGE},
};

pub fn reduce(state: AssetsState, event: &AssetEvent) -> AssetsState {
    AssetsState {
        collection: collection(state.collection, event),
        filters: filters(state.filters, event),
        pagination: pagination(state.pagination, event),
        sort: sort(state.sort, event),
        pending_request: pending_request(state.pending_request, event),
        status: status(state.status, event),
    }
}

pub fn collection(state: Vec<Asset>, event: &AssetEvent) -> Vec<Asset> {
    match event {
        AssetEvent::List(ListEvent::Requested) => state,
        AssetEvent::List(ListEvent::Succeeded(page)) => unique_by_id(page.assets.clone()),
        // a list never changes the collection before it is confirmed
        AssetEvent::List(ListEvent::Failed { .. }) => state,
        AssetEvent::Delete(DeleteEvent::Succeeded { asset_id }) => state
            .into_iter()
            .filter(|asset| &asset.id != asset_id)
            .collect(),
        AssetEvent::Delete(DeleteEvent::Failed { .. }) => state,
        AssetEvent::Lock(LockEvent::Started { asset_id }) => update_asset(state, asset_id, |asset| {
            asset.loading_fields.insert(LoadingField::Lock);
        }),
        AssetEvent::Lock(LockEvent::Succeeded { asset_id, locked }) => {
            update_asset(state, asset_id, |asset| {
                asset.loading_fields.remove(&LoadingField::Lock);
                asset.locked = *locked;
            })
        }
        AssetEvent::Lock(LockEvent::Failed { asset_id, .. }) => {
            update_asset(state, asset_id, |asset| {
                asset.loading_fields.remove(&LoadingField::Lock);
            })
        }
        // new uploads arrive through the list refresh that follows them
        AssetEvent::Upload(_) | AssetEvent::Query(_) | AssetEvent::Status(_) => state,
    }
}

pub fn filters(state: Filters, event: &AssetEvent) -> Filters {
    match event {
        AssetEvent::List(ListEvent::Succeeded(page)) => page.filters.clone(),
        AssetEvent::Query(QueryEvent::FilterUpdateFailed(rejected))
        | AssetEvent::Query(QueryEvent::ClearFiltersFailed(rejected)) => rejected.previous.clone(),
        AssetEvent::List(_)
        | AssetEvent::Delete(_)
        | AssetEvent::Lock(_)
        | AssetEvent::Upload(_)
        | AssetEvent::Query(_)
        | AssetEvent::Status(_) => state,
    }
}

pub fn pagination(state: Pagination, event: &AssetEvent) -> Pagination {
    match event {
        AssetEvent::List(ListEvent::Succeeded(page)) => page.pagination.clone(),
        AssetEvent::Query(QueryEvent::PageUpdateFailed(rejected)) => rejected.previous.clone(),
        AssetEvent::List(_)
        | AssetEvent::Delete(_)
        | AssetEvent::Lock(_)
        | AssetEvent::Upload(_)
        | AssetEvent::Query(_)
        | AssetEvent::Status(_) => state,
    }
}

pub fn sort(state: Sort, event: &AssetEvent) -> Sort {
    match event {
        AssetEvent::List(ListEvent::Succeeded(page)) => page.sort.clone(),
        AssetEvent::Query(QueryEvent::SortUpdateFailed(rejected)) => rejected.previous.clone(),
        AssetEvent::List(_)
        | AssetEvent::Delete(_)
        | AssetEvent::Lock(_)
        | AssetEvent::Upload(_)
        | AssetEvent::Query(_)
        | AssetEvent::Status(_) => state,
    }
}

pub fn pending_request(mut state: PendingRequest, event: &AssetEvent) -> PendingRequest {
    match event {
        AssetEvent::Query(QueryEvent::FilterUpdated { key, value }) => {
            state.asset_types.insert(key.clone(), *value);
            state
        }
        AssetEvent::Query(QueryEvent::SortUpdateRequested { sort, direction }) => PendingRequest {
            sort: sort.clone(),
            direction: *direction,
            ..state
        },
        AssetEvent::Query(QueryEvent::PageUpdateRequested { page }) => PendingRequest {
            page: *page,
            ..state
        },
        AssetEvent::Query(QueryEvent::FiltersCleared) => PendingRequest {
            asset_types: default_filter_state(),
            page: NO_PAGE,
            ..state
        },
        AssetEvent::Query(
            QueryEvent::FilterUpdateFailed(_)
            | QueryEvent::SortUpdateFailed(_)
            | QueryEvent::PageUpdateFailed(_)
            | QueryEvent::ClearFiltersFailed(_),
        ) => state,
        AssetEvent::List(_)
        | AssetEvent::Delete(_)
        | AssetEvent::Lock(_)
        | AssetEvent::Upload(_)
        | AssetEvent::Status(_) => state,
    }
}

pub fn status(_state: Status, event: &AssetEvent) -> Status {
    match event {
        AssetEvent::Status(StatusEvent::Cleared) => Status(None),
        other => Status(Some(other.clone())),
    }
}

fn update_asset(
    mut assets: Vec<Asset>,
    asset_id: &AssetId,
    update: impl FnOnce(&mut Asset),
) -> Vec<Asset> {
    if let Some(asset) = assets.iter_mut().find(|asset| &asset.id == asset_id) {
        update(asset);
    }
    assets
}

fn unique_by_id(assets: Vec<Asset>) -> Vec<Asset> {
    let mut seen = HashSet::new();
    assets
        .into_iter()
        .filter(|asset| seen.insert(asset.id.clone()))
        .collect()
}

#[cfg(test)]
#[path = "tests/reducer_tests.rs"]
mod tests;
