//! Dashboard controller
//!
//! Ties the view state to its collaborators: the key-value store holding
//! the source URL and row cache, and the remote source rows are refreshed
//! from. The view lock is never held while a fetch is in flight.

use moneyview_config::{Config, SourceConfig, WorkTimeConfig};
use moneyview_parser::ingest_rows;
use serde::Serialize;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use crate::error::{CoreError, CoreResult, DefaultErrorLogger, ErrorContext, ErrorLogger};
use crate::reports::{Snapshot, TransactionsResponse};
use crate::source::{DataSource, HttpSource};
use crate::store::{KeyValueStore, CACHE_KEY, LAST_REFRESH_KEY, SOURCE_URL_KEY};
use crate::view_state::{MonthSelection, StateChange, SubscriberError, ViewState, YearSelection};

/// Format of the last-refresh timestamp
pub const LAST_REFRESH_FORMAT: &str = "%d/%m/%Y %H:%M";

/// Result of a refresh
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RefreshOutcome {
    /// New rows were applied
    Updated { rows: usize, rejected: usize },
    /// The fetch failed; the previous data stays in effect
    Failed { message: String },
    /// A newer refresh or a reset came first; this response was discarded
    Stale,
    /// No source URL configured
    NotConfigured,
}

/// Keeps the busy counter raised until dropped
struct BusyGuard<'a>(&'a AtomicUsize);

impl<'a> BusyGuard<'a> {
    fn raise(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Application controller owning the view state
pub struct Dashboard {
    view: RwLock<ViewState>,
    store: Arc<dyn KeyValueStore>,
    source: RwLock<Option<Arc<dyn DataSource>>>,
    source_config: SourceConfig,
    work_time: WorkTimeConfig,
    in_flight: AtomicUsize,
    issued: AtomicU64,
    applied: AtomicU64,
    error_logger: DefaultErrorLogger,
}

impl Dashboard {
    /// Build the controller.
    ///
    /// A source is created from the stored URL; when none is stored, the
    /// URL from the configuration (if any) is stored first.
    pub fn new(config: &Config, store: Arc<dyn KeyValueStore>) -> CoreResult<Self> {
        let dashboard = Self {
            view: RwLock::new(ViewState::new()),
            store,
            source: RwLock::new(None),
            source_config: config.source.clone(),
            work_time: config.work_time.clone(),
            in_flight: AtomicUsize::new(0),
            issued: AtomicU64::new(0),
            applied: AtomicU64::new(0),
            error_logger: DefaultErrorLogger,
        };

        match dashboard.source_url()? {
            Some(url) => dashboard.install_http_source(&url)?,
            None => {
                if let Some(url) = &config.source.url {
                    log::info!("Seeding source URL from configuration");
                    dashboard.configure_source(url)?;
                }
            }
        }

        Ok(dashboard)
    }

    /// Replace the data source, e.g. with a non-HTTP one
    pub fn set_source(&self, source: Arc<dyn DataSource>) {
        *self.source.write().unwrap_or_else(PoisonError::into_inner) = Some(source);
    }

    fn current_source(&self) -> Option<Arc<dyn DataSource>> {
        let guard = self.source.read().unwrap_or_else(PoisonError::into_inner);
        guard.clone()
    }

    fn install_http_source(&self, url: &str) -> CoreResult<()> {
        let source = HttpSource::new(url, Duration::from_secs(self.source_config.timeout_secs))?;
        self.set_source(Arc::new(source));
        Ok(())
    }

    // ==================== Setup ====================

    /// Stored source URL
    pub fn source_url(&self) -> CoreResult<Option<String>> {
        self.store.get(SOURCE_URL_KEY)
    }

    /// True while no source URL is stored
    pub fn needs_setup(&self) -> bool {
        match self.source_url() {
            Ok(url) => url.is_none(),
            Err(e) => {
                self.error_logger.log_error(&e, &ErrorContext::new("needs_setup"));
                true
            }
        }
    }

    /// Validate and persist the source URL
    pub fn configure_source(&self, url: &str) -> CoreResult<()> {
        let url = url.trim();
        if !url.starts_with(&self.source_config.allowed_prefix) {
            return Err(CoreError::InvalidSourceUrl {
                url: url.to_string(),
                expected_prefix: self.source_config.allowed_prefix.clone(),
            });
        }

        self.store.set(SOURCE_URL_KEY, url)?;
        self.install_http_source(url)?;
        log::info!("Source configured");
        Ok(())
    }

    // ==================== Data ====================

    /// Warm start from the row cache.
    ///
    /// Returns whether cached rows were loaded. A corrupt cache is logged
    /// and treated as absent.
    pub fn load_cache(&self) -> bool {
        let raw = match self.store.get(CACHE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return false,
            Err(e) => {
                self.error_logger.log_error(&e, &ErrorContext::new("load_cache"));
                return false;
            }
        };

        let values: Vec<Value> = match serde_json::from_str(&raw) {
            Ok(values) => values,
            Err(e) => {
                let error = CoreError::CacheCorrupt { message: e.to_string() };
                self.error_logger.log_error(&error, &ErrorContext::new("load_cache"));
                return false;
            }
        };

        let ingested = ingest_rows(&values);
        log::info!("Loaded {} cached rows", ingested.rows.len());
        self.write_view().load_data(ingested.rows);
        true
    }

    /// Fetch fresh rows and apply them.
    ///
    /// Each call takes a ticket; a response arriving after a newer one has
    /// been applied, or after a reset, is discarded. On failure the previous data stays.
    pub async fn refresh(&self) -> RefreshOutcome {
        let Some(source) = self.current_source() else {
            log::debug!("Refresh skipped, no source configured");
            return RefreshOutcome::NotConfigured;
        };

        let ticket = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        let _busy = BusyGuard::raise(&self.in_flight);
        log::info!("Refreshing from {} (ticket {})", source.describe(), ticket);
        let context = ErrorContext::new("refresh").with_data("ticket", serde_json::json!(ticket));

        let values = match source.fetch().await {
            Ok(values) => values,
            Err(e) => {
                self.error_logger.log_error(&e, &context);
                return RefreshOutcome::Failed { message: e.to_string() };
            }
        };

        let mut view = self.write_view();
        if ticket <= self.applied.load(Ordering::SeqCst) {
            self.error_logger
                .log_warning("Discarding stale refresh response", &context);
            return RefreshOutcome::Stale;
        }
        self.applied.store(ticket, Ordering::SeqCst);

        match serde_json::to_string(&values) {
            Ok(raw) => {
                if let Err(e) = self.store.set(CACHE_KEY, &raw) {
                    self.error_logger.log_error(&e, &ErrorContext::new("write_cache"));
                }
            }
            Err(e) => log::warn!("Could not serialize rows for the cache: {}", e),
        }
        let stamp = chrono::Local::now().format(LAST_REFRESH_FORMAT).to_string();
        if let Err(e) = self.store.set(LAST_REFRESH_KEY, &stamp) {
            self.error_logger.log_error(&e, &ErrorContext::new("write_last_refresh"));
        }

        let ingested = ingest_rows(&values);
        if ingested.rejected > 0 {
            self.error_logger.log_warning(
                &format!("{} rows rejected", ingested.rejected),
                &context,
            );
        }
        let outcome = RefreshOutcome::Updated {
            rows: ingested.rows.len(),
            rejected: ingested.rejected,
        };
        view.load_data(ingested.rows);
        log::info!("Refresh applied: {:?}", outcome);
        outcome
    }

    /// Forget the source URL, the cache and every loaded row.
    ///
    /// Refreshes already in flight resolve as `Stale`.
    pub fn reset(&self) -> CoreResult<()> {
        let mut view = self.write_view();
        self.applied
            .store(self.issued.load(Ordering::SeqCst), Ordering::SeqCst);
        self.store.clear()?;
        *self.source.write().unwrap_or_else(PoisonError::into_inner) = None;
        view.clear();
        log::info!("Dashboard reset");
        Ok(())
    }

    /// Time of the last successful refresh
    pub fn last_refresh(&self) -> Option<String> {
        self.store.get(LAST_REFRESH_KEY).ok().flatten()
    }

    /// True while at least one refresh is in flight
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    pub fn work_time(&self) -> &WorkTimeConfig {
        &self.work_time
    }

    // ==================== View access ====================

    pub fn view(&self) -> RwLockReadGuard<'_, ViewState> {
        self.view.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_view(&self) -> RwLockWriteGuard<'_, ViewState> {
        self.view.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn subscribe<F>(&self, callback: F)
    where
        F: Fn(&ViewState, StateChange) -> Result<(), SubscriberError> + Send + Sync + 'static,
    {
        self.write_view().subscribe(callback)
    }

    /// Select a year present in the data, or "All"
    pub fn select_year(&self, year: YearSelection) -> CoreResult<()> {
        let mut view = self.write_view();
        if let YearSelection::Year(y) = &year {
            if !view.has_year(y) {
                return Err(CoreError::InvalidSelection { value: y.clone() });
            }
        }
        view.select_year(year);
        Ok(())
    }

    pub fn select_month(&self, month: MonthSelection) {
        self.write_view().select_month(month);
    }

    pub fn toggle_history(&self) -> bool {
        let mut view = self.write_view();
        view.toggle_history();
        view.show_history()
    }

    pub fn set_search_query(&self, query: &str) {
        self.write_view().set_search_query(query);
    }

    pub fn snapshot(&self) -> Snapshot {
        self.view().snapshot(&self.work_time)
    }

    pub fn transactions(&self, query: &str) -> TransactionsResponse {
        self.view().transactions(query)
    }

    /// Listing for the stored search query
    pub fn visible_transactions(&self) -> TransactionsResponse {
        self.view().visible_transactions()
    }
}

// ==================== Tests ====================
