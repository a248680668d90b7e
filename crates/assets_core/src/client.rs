//! Command handlers. Each one talks to the API through [`Transport`] and reports what
//! happened by dispatching events to the shared [`AssetStore`].

use std::sync::Arc;

use serde_json::json;
use shared::{
    domain::{AssetId, CourseContext, FilePayload, SortDirection},
    error::AssetError,
    protocol::{ApiRequest, ListAssetsResponse, Method, RequestBody, UploadAssetResponse},
};
use tracing::{debug, info, warn};

use crate::{
    attributes::to_frontend_attribute,
    config::AssetsSettings,
    events::{
        AssetPage, DeleteEvent, ListEvent, LockEvent, QueryEvent, Rejected, StatusEvent,
        UploadEvent,
    },
    filters::filters_from_selected,
    state::{Filters, Pagination, PendingRequest, Sort, NO_PAGE},
    store::AssetStore,
    transport::Transport,
};

/// How a list call ended.
#[derive(Debug, Clone, PartialEq)]
pub enum ListOutcome {
    Applied,
    /// A newer request superseded this one; nothing was applied.
    Stale,
    Failed(AssetError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadOutcome {
    /// A guard refused the whole batch before any request was sent.
    Rejected,
    Completed { succeeded: usize, failed: usize },
}

/// A pending-request change that should be followed by a refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryChange {
    Filter { key: String, value: bool },
    Sort { sort: String, direction: SortDirection },
    Page(i64),
    ClearFilters,
}

enum ConfirmedSlice {
    Filters(Filters),
    Sort(Sort),
    Pagination(Pagination),
}

pub struct AssetsClient {
    transport: Arc<dyn Transport>,
    store: Arc<AssetStore>,
    settings: AssetsSettings,
}

impl AssetsClient {
    pub fn new(
        transport: Arc<dyn Transport>,
        store: Arc<AssetStore>,
        settings: AssetsSettings,
    ) -> Self {
        Self {
            transport,
            store,
            settings,
        }
    }

    pub fn store(&self) -> &Arc<AssetStore> {
        &self.store
    }

    pub fn settings(&self) -> &AssetsSettings {
        &self.settings
    }

    fn course_path(&self, course: &CourseContext) -> String {
        format!("{}{}/", self.settings.assets_root(), course.id)
    }

    fn asset_path(&self, course: &CourseContext, asset_id: &AssetId) -> String {
        format!("{}{}", self.course_path(course), asset_id)
    }

    fn list_request(&self, request: &PendingRequest, course: &CourseContext) -> ApiRequest {
        let mut api_request = ApiRequest::new(Method::Get, self.course_path(course));
        if request.page != NO_PAGE {
            api_request = api_request.with_query("page", request.page.to_string());
        }
        api_request = api_request
            .with_query("page_size", self.settings.page_size.to_string())
            .with_query("sort", request.sort.clone())
            .with_query("direction", request.direction.as_str());
        let selected = request.selected_asset_types();
        if !selected.is_empty() {
            api_request = api_request.with_query("asset_type", selected.join(","));
        }
        api_request
    }

    /// Fetches one page of assets for `request`.
    ///
    /// The response is applied only if it echoes `request` and `request` is still the
    /// store's pending request when the response arrives. Returns `Err` only when the
    /// server echoes a sort attribute outside the known set.
    pub async fn list_assets(
        &self,
        request: &PendingRequest,
        course: &CourseContext,
    ) -> Result<ListOutcome, AssetError> {
        self.store.dispatch(ListEvent::Requested);

        let result = match self.transport.send(self.list_request(request, course)).await {
            Ok(response) => response.json::<ListAssetsResponse>(),
            Err(err) => Err(err),
        };
        let response = match result {
            Ok(response) => response,
            Err(error) => {
                warn!(course_id = %course.id, %error, "asset list request failed");
                self.store.dispatch(ListEvent::Failed {
                    error: error.clone(),
                });
                return Ok(ListOutcome::Failed(error));
            }
        };

        let still_current = self.store.read(|state| state.pending_request == *request);
        if !request.is_echoed_by(&response) || !still_current {
            debug!(
                course_id = %course.id,
                echoed_sort = %response.sort,
                echoed_page = response.page,
                "dropping stale asset list response"
            );
            return Ok(ListOutcome::Stale);
        }

        let sort = Sort {
            sort: to_frontend_attribute(&response.sort)?.to_string(),
            direction: response.direction,
        };
        let page = AssetPage {
            pagination: Pagination::from_response(&response),
            filters: Filters {
                asset_types: filters_from_selected(
                    response.asset_types.iter().map(String::as_str),
                ),
            },
            sort,
            assets: response.assets,
        };
        info!(
            course_id = %course.id,
            count = page.assets.len(),
            total = page.pagination.total_count,
            "asset list applied"
        );
        self.store.dispatch(ListEvent::Succeeded(page));
        Ok(ListOutcome::Applied)
    }

    /// Lists with whatever the store currently holds as the pending request.
    pub async fn refresh(&self, course: &CourseContext) -> Result<ListOutcome, AssetError> {
        let request = self.store.read(|state| state.pending_request.clone());
        self.list_assets(&request, course).await
    }

    pub async fn delete_asset(&self, asset_id: &AssetId, course: &CourseContext) {
        let request = ApiRequest::new(Method::Delete, self.asset_path(course, asset_id));
        let result = match self.transport.send(request).await {
            Ok(response) => response.into_result().map(|_| ()),
            Err(err) => Err(err),
        };

        match result {
            Ok(()) => {
                info!(course_id = %course.id, %asset_id, "asset deleted");
                self.store.dispatch(DeleteEvent::Succeeded {
                    asset_id: asset_id.clone(),
                });
            }
            Err(error) => {
                warn!(course_id = %course.id, %asset_id, %error, "asset delete failed");
                self.store.dispatch(DeleteEvent::Failed {
                    asset_id: asset_id.clone(),
                    error,
                });
            }
        }
    }

    pub async fn toggle_lock_asset(&self, asset_id: &AssetId, course: &CourseContext) {
        let Some(locked) = self
            .store
            .read(|state| state.asset(asset_id).map(|asset| asset.locked))
        else {
            warn!(course_id = %course.id, %asset_id, "cannot toggle lock of unknown asset");
            self.store.dispatch(LockEvent::Failed {
                asset_id: asset_id.clone(),
                error: AssetError::AssetNotFound {
                    asset_id: asset_id.clone(),
                },
            });
            return;
        };

        self.store.dispatch(LockEvent::Started {
            asset_id: asset_id.clone(),
        });

        let request = ApiRequest::new(Method::Put, self.asset_path(course, asset_id)).with_body(
            RequestBody::Json(json!({ "locked": !locked })),
        );
        let result = match self.transport.send(request).await {
            Ok(response) => response.into_result().map(|_| ()),
            Err(err) => Err(err),
        };

        match result {
            Ok(()) => {
                info!(course_id = %course.id, %asset_id, locked = !locked, "asset lock toggled");
                self.store.dispatch(LockEvent::Succeeded {
                    asset_id: asset_id.clone(),
                    locked: !locked,
                });
            }
            Err(error) => {
                warn!(course_id = %course.id, %asset_id, %error, "asset lock toggle failed");
                self.store.dispatch(LockEvent::Failed {
                    asset_id: asset_id.clone(),
                    error,
                });
            }
        }
    }

    /// Checks the batch against the configured limits, size first.
    pub fn validate_upload(&self, files: &[FilePayload]) -> Result<(), AssetError> {
        let max_bytes = self.settings.max_file_size_bytes();
        if files.iter().any(|file| file.size_bytes() > max_bytes) {
            return Err(AssetError::ExceededMaxSize {
                limit_mb: self.settings.max_file_size_mb,
            });
        }
        if files.len() > self.settings.max_file_count {
            return Err(AssetError::ExceededMaxCount {
                limit: self.settings.max_file_count,
            });
        }
        Ok(())
    }

    /// Uploads files one at a time, refreshing the list after each success.
    pub async fn upload_assets(
        &self,
        files: Vec<FilePayload>,
        course: &CourseContext,
    ) -> Result<UploadOutcome, AssetError> {
        if let Err(error) = self.validate_upload(&files) {
            warn!(course_id = %course.id, count = files.len(), %error, "upload batch rejected");
            match error {
                AssetError::ExceededMaxSize { limit_mb } => {
                    self.store.dispatch(UploadEvent::ExceededMaxSize { limit_mb })
                }
                AssetError::ExceededMaxCount { limit } => {
                    self.store.dispatch(UploadEvent::ExceededMaxCount { limit })
                }
                other => return Err(other),
            }
            return Ok(UploadOutcome::Rejected);
        }

        self.store.dispatch(UploadEvent::Started { count: files.len() });

        let mut succeeded = 0;
        let mut failed = 0;
        for file in files {
            let file_name = file.name.clone();
            let request = ApiRequest::new(Method::Post, self.course_path(course))
                .with_body(RequestBody::File(file));
            let result = match self.transport.send(request).await {
                Ok(response) => response.json::<UploadAssetResponse>(),
                Err(err) => Err(err),
            };

            match result {
                Ok(UploadAssetResponse { asset }) => {
                    info!(course_id = %course.id, file = %file_name, asset_id = %asset.id, "asset uploaded");
                    succeeded += 1;
                    self.store.dispatch(UploadEvent::Succeeded { asset });
                    self.refresh(course).await?;
                }
                Err(error) => {
                    warn!(course_id = %course.id, file = %file_name, %error, "asset upload failed");
                    failed += 1;
                    self.store.dispatch(UploadEvent::Failed { file_name, error });
                }
            }
        }

        Ok(UploadOutcome::Completed { succeeded, failed })
    }

    pub fn update_filter(&self, key: impl Into<String>, value: bool) {
        self.store.dispatch(QueryEvent::FilterUpdated {
            key: key.into(),
            value,
        });
    }

    pub fn update_sort(&self, sort: impl Into<String>, direction: SortDirection) {
        self.store.dispatch(QueryEvent::SortUpdateRequested {
            sort: sort.into(),
            direction,
        });
    }

    pub fn update_page(&self, page: i64) {
        self.store.dispatch(QueryEvent::PageUpdateRequested { page });
    }

    pub fn clear_status(&self) {
        self.store.dispatch(StatusEvent::Cleared);
    }

    /// Applies `change` to the pending request and lists with it. If the list call
    /// fails while that request is still pending, the confirmed slice the change
    /// targeted is restored.
    pub async fn change_query(
        &self,
        change: QueryChange,
        course: &CourseContext,
    ) -> Result<ListOutcome, AssetError> {
        let previous = self.store.read(|state| match &change {
            QueryChange::Filter { .. } | QueryChange::ClearFilters => {
                ConfirmedSlice::Filters(state.filters.clone())
            }
            QueryChange::Sort { .. } => ConfirmedSlice::Sort(state.sort.clone()),
            QueryChange::Page(_) => ConfirmedSlice::Pagination(state.pagination.clone()),
        });
        let clearing = matches!(change, QueryChange::ClearFilters);

        match change {
            QueryChange::Filter { key, value } => self.update_filter(key, value),
            QueryChange::Sort { sort, direction } => self.update_sort(sort, direction),
            QueryChange::Page(page) => self.update_page(page),
            QueryChange::ClearFilters => self.store.dispatch(QueryEvent::FiltersCleared),
        }

        let request = self.store.read(|state| state.pending_request.clone());
        let outcome = self.list_assets(&request, course).await?;
        if let ListOutcome::Failed(error) = &outcome {
            let still_current = self.store.read(|state| state.pending_request == request);
            if !still_current {
                debug!(
                    course_id = %course.id,
                    "skipping rollback of superseded query change"
                );
                return Ok(outcome);
            }
            let error = error.clone();
            let rollback = match previous {
                ConfirmedSlice::Filters(filters) if clearing => {
                    QueryEvent::ClearFiltersFailed(Rejected::new(filters, error))
                }
                ConfirmedSlice::Filters(filters) => {
                    QueryEvent::FilterUpdateFailed(Rejected::new(filters, error))
                }
                ConfirmedSlice::Sort(sort) => QueryEvent::SortUpdateFailed(Rejected::new(sort, error)),
                ConfirmedSlice::Pagination(pagination) => {
                    QueryEvent::PageUpdateFailed(Rejected::new(pagination, error))
                }
            };
            self.store.dispatch(rollback);
        }
        Ok(outcome)
    }

    pub async fn clear_filters(&self, course: &CourseContext) -> Result<ListOutcome, AssetError> {
        self.change_query(QueryChange::ClearFilters, course).await
    }
}

#[cfg(test)]
#[path = "tests/client_tests.rs"]
mod tests;
