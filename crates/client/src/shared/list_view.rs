use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use contracts::domain::common::Resource;
use contracts::shared::pagination::page_after_delete;
use contracts::shared::{FilterValue, ListQuery, Page, RecordId, SortSpec};

use crate::shared::edit_session::EditSession;
use crate::shared::error::ApiError;
use crate::shared::resource_client::ResourceClient;

/// What a list screen shows
#[derive(Debug, Clone, PartialEq)]
pub struct ListState<R> {
    pub query: ListQuery,
    pub page: Page<R>,
    pub loading: bool,
    /// Message of the last failed fetch or delete; the previous page stays
    pub error: Option<String>,
}

/// A dispatched fetch. Only the most recent ticket may update the view.
#[derive(Debug, Clone)]
pub struct FetchTicket {
    seq: u64,
    pub query: ListQuery,
}

impl FetchTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }
}

/// Paginated list bound to one collection.
///
/// Every fetch is numbered; a response arriving after a newer fetch was
/// dispatched is dropped, so a slow page 1 can never overwrite page 2.
pub struct ListView<R: Resource> {
    client: ResourceClient<R>,
    state: Mutex<ListState<R>>,
    latest: AtomicU64,
}

impl<R: Resource> ListView<R> {
    pub fn new(client: ResourceClient<R>) -> Self {
        Self::with_query(client, ListQuery::default())
    }

    pub fn with_query(client: ResourceClient<R>, query: ListQuery) -> Self {
        Self {
            client,
            state: Mutex::new(ListState {
                query,
                page: Page::default(),
                loading: false,
                error: None,
            }),
            latest: AtomicU64::new(0),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ListState<R>> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn client(&self) -> &ResourceClient<R> {
        &self.client
    }

    pub fn state(&self) -> ListState<R> {
        self.lock().clone()
    }

    pub fn query(&self) -> ListQuery {
        self.lock().query.clone()
    }

    pub fn total_pages(&self) -> u32 {
        let state = self.lock();
        state.page.total_pages(state.query.page_size)
    }

    // ============================================================================
    // Fetch tickets
    // ============================================================================

    pub fn begin_fetch(&self) -> FetchTicket {
        let seq = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        let mut state = self.lock();
        state.loading = true;
        FetchTicket {
            seq,
            query: state.query.clone(),
        }
    }

    /// Apply a fetch result. Returns `false` when the ticket is stale and the
    /// result was discarded.
    pub fn apply(&self, ticket: &FetchTicket, result: Result<Page<R>, ApiError>) -> bool {
        let mut state = self.lock();
        if ticket.seq < self.latest.load(Ordering::SeqCst) {
            tracing::debug!(
                "{}: dropping stale response #{} (page {})",
                R::collection_name(),
                ticket.seq,
                ticket.query.page
            );
            return false;
        }
        state.loading = false;
        match result {
            Ok(page) => {
                state.page = page;
                state.error = None;
            }
            Err(e) => {
                tracing::error!("{}: list failed: {}", R::collection_name(), e);
                state.error = Some(e.user_message());
            }
        }
        true
    }

    /// Fetch the current page. A failure keeps the previous rows.
    pub async fn refresh(&self) -> Result<(), ApiError> {
        let ticket = self.begin_fetch();
        let result = self.client.list(&ticket.query).await;
        let outcome = result.as_ref().map(|_| ()).map_err(|e| e.clone());
        self.apply(&ticket, result);
        outcome
    }

    // ============================================================================
    // Navigation
    // ============================================================================

    pub async fn set_page(&self, page: u32) -> Result<(), ApiError> {
        self.lock().query.page = page.max(1);
        self.refresh().await
    }

    pub async fn set_page_size(&self, page_size: u32) -> Result<(), ApiError> {
        {
            let mut state = self.lock();
            state.query.page_size = page_size.max(1);
            state.query.page = 1;
        }
        self.refresh().await
    }

    pub async fn set_filter(&self, name: &str, value: impl Into<FilterValue>) -> Result<(), ApiError> {
        {
            let mut state = self.lock();
            state.query.filters.insert(name.to_string(), value.into());
            state.query.page = 1;
        }
        self.refresh().await
    }

    pub async fn clear_filters(&self) -> Result<(), ApiError> {
        {
            let mut state = self.lock();
            state.query.filters.clear();
            state.query.page = 1;
        }
        self.refresh().await
    }

    /// Clicking the same column flips direction
    pub async fn toggle_sort(&self, field: &str) -> Result<(), ApiError> {
        {
            let mut state = self.lock();
            let sort = SortSpec::toggled(state.query.sort.as_ref(), field);
            state.query.sort = Some(sort);
            state.query.page = 1;
        }
        self.refresh().await
    }

    // ============================================================================
    // Mutations
    // ============================================================================

    /// Delete a record and reload, stepping back a page when its last row
    /// was removed.
    pub async fn delete(&self, id: &RecordId) -> Result<(), ApiError> {
        if let Err(e) = self.client.delete(id).await {
            self.lock().error = Some(e.user_message());
            return Err(e);
        }
        {
            let mut state = self.lock();
            let rows = state.page.results.len();
            state.query.page = page_after_delete(state.query.page, rows);
        }
        self.refresh().await
    }

    /// Save the form and reload the current page on success. A failed reload
    /// does not undo the save: it is reported through `state().error`.
    pub async fn submit(&self, form: &EditSession<R>) -> Result<R, ApiError> {
        let saved = form.submit(&self.client).await?;
        if let Err(e) = self.refresh().await {
            tracing::warn!("{}: saved, but reload failed: {}", R::collection_name(), e);
        }
        Ok(saved)
    }

    /// Every record under the current filters and sort (for CSV export)
    pub async fn fetch_all(&self) -> Result<Vec<R>, ApiError> {
        self.client.fetch_all(&self.query()).await
    }
}
