use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use super::debounce::Debouncer;
use super::{catch_task_panic, AppEvent};
use crate::api::{ApiError, CategoryRecord, CategorySource};
use crate::tree::{self, BuildOptions, CategoryStats, TreeNode};

/// Why the tree area has nothing to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmptyState {
    /// First load still in flight.
    Loading,
    /// First load failed; nothing was ever loaded.
    LoadFailed(String),
    /// The server returned zero categories.
    NoCategories,
    /// Categories exist but none match the active search term.
    NoMatches(String),
}

/// State of the category tree screen.
///
/// Holds the source records, the canonical tree built from them and the
/// independent working copy that expand/collapse/search mutate. Every
/// mutation of the working copy publishes a fresh `Arc`, so renderers can
/// detect changes by pointer identity as well as by [`revision`](Self::revision).
///
/// Loads are tagged with a generation number. Starting a load aborts the
/// previous task and results carrying an older generation are dropped, so a
/// slow earlier response can never overwrite a newer one.
pub struct CategoryTreeView {
    records: Vec<CategoryRecord>,
    canonical: Arc<Vec<TreeNode>>,
    working: Arc<Vec<TreeNode>>,
    stats: CategoryStats,
    expand_depth: usize,

    loading: bool,
    loaded_once: bool,
    load_error: Option<String>,
    generation: u64,
    load_handle: Option<JoinHandle<()>>,

    search: Debouncer<String>,
    active_search: String,
    any_visible: bool,
    revision: u64,
}

impl CategoryTreeView {
    pub fn new(expand_depth: usize, search_debounce: Duration) -> Self {
        Self {
            records: Vec::new(),
            canonical: Arc::new(Vec::new()),
            working: Arc::new(Vec::new()),
            stats: CategoryStats::default(),
            expand_depth,
            loading: false,
            loaded_once: false,
            load_error: None,
            generation: 0,
            load_handle: None,
            search: Debouncer::new(search_debounce),
            active_search: String::new(),
            any_visible: false,
            revision: 0,
        }
    }

    // ========================================================================
    // Loading
    // ========================================================================

    /// Mark a new load as started and return its generation token.
    ///
    /// Any in-flight load task is aborted; its result would be stale anyway.
    pub fn begin_load(&mut self) -> u64 {
        if let Some(handle) = self.load_handle.take() {
            handle.abort();
            tracing::debug!(generation = self.generation, "Aborted previous category load");
        }
        self.generation = self.generation.wrapping_add(1);
        self.loading = true;
        self.generation
    }

    /// Start fetching from `source` in the background.
    ///
    /// The result arrives on `event_tx` as [`AppEvent::CategoriesLoaded`] and
    /// must be handed to [`apply_load`](Self::apply_load).
    pub fn spawn_load<S: CategorySource>(
        &mut self,
        source: Arc<S>,
        event_tx: mpsc::Sender<AppEvent>,
    ) -> u64 {
        let generation = self.begin_load();
        tracing::debug!(generation, "Spawning category load");

        self.load_handle = Some(tokio::spawn(async move {
            let event = match catch_task_panic(source.fetch_category_tree()).await {
                Ok(result) => AppEvent::CategoriesLoaded { generation, result },
                Err(error) => AppEvent::TaskPanicked {
                    task: "category load",
                    generation,
                    error,
                },
            };
            if let Err(e) = event_tx.send(event).await {
                tracing::warn!(error = %e, "Failed to send category load result (receiver dropped)");
            }
        }));
        generation
    }

    /// Fetch from `source` and apply the result before returning.
    ///
    /// Same bookkeeping as [`spawn_load`](Self::spawn_load) without the
    /// background task: the loading flag is set while the fetch runs, and a
    /// failure keeps the previous tree. Returns whether the fetch succeeded.
    pub async fn load<S: CategorySource>(&mut self, source: &S) -> bool {
        let generation = self.begin_load();
        let result = source.fetch_category_tree().await;
        self.apply_load(generation, result);
        self.load_error.is_none()
    }

    /// Apply the outcome of load `generation`.
    ///
    /// On success the canonical tree, working tree and stats are rebuilt from
    /// scratch and the active search term is re-applied. On failure the
    /// previous tree is kept and the error is recorded. Stale generations are
    /// ignored; returns whether the result was applied.
    pub fn apply_load(
        &mut self,
        generation: u64,
        result: Result<Vec<CategoryRecord>, ApiError>,
    ) -> bool {
        if generation != self.generation {
            tracing::debug!(
                expected = self.generation,
                got = generation,
                "Ignoring stale category load (generation mismatch)"
            );
            return false;
        }
        self.loading = false;
        self.load_handle = None;

        match result {
            Ok(records) => {
                self.install(records);
                true
            }
            Err(e) => {
                self.fail_load(e.to_string());
                true
            }
        }
    }

    /// Record a load task that died without producing a result.
    pub fn abort_load(&mut self, generation: u64, error: String) -> bool {
        if generation != self.generation {
            return false;
        }
        self.loading = false;
        self.load_handle = None;
        self.fail_load(error);
        true
    }

    fn fail_load(&mut self, error: String) {
        tracing::warn!(
            generation = self.generation,
            error = %error,
            keeping_previous = self.loaded_once,
            "Category load failed"
        );
        self.load_error = Some(error);
    }

    fn install(&mut self, records: Vec<CategoryRecord>) {
        let opts = BuildOptions {
            expand_depth: self.expand_depth,
            now: Utc::now(),
        };
        let canonical = tree::build_with(&records, 0, &opts);
        // Deep copy: the working tree shares no nodes with the canonical one.
        let mut working = canonical.clone();
        self.any_visible = tree::filter(&mut working, &self.active_search);

        self.stats = tree::compute_stats(&records);
        self.records = records;
        self.canonical = Arc::new(canonical);
        self.working = Arc::new(working);
        self.loaded_once = true;
        self.load_error = None;
        self.revision += 1;

        tracing::info!(
            generation = self.generation,
            total = self.stats.total,
            active = self.stats.active,
            "Category tree loaded"
        );
    }

    // ========================================================================
    // Search
    // ========================================================================

    /// Schedule a debounced filter pass for `term`.
    ///
    /// A newer call before the delay elapses replaces this one.
    pub fn on_search_change(&mut self, term: &str) {
        if self.search.schedule(term.to_string()) {
            tracing::trace!("Superseded pending search");
        }
    }

    /// Run the pending search if its quiet period has elapsed.
    ///
    /// Returns true if the working tree changed.
    pub fn poll_search(&mut self, now: Instant) -> bool {
        match self.search.poll(now) {
            Some(term) => {
                self.apply_search(&term);
                true
            }
            None => false,
        }
    }

    /// Run the pending search right away.
    pub fn flush_search(&mut self) -> bool {
        match self.search.flush() {
            Some(term) => {
                self.apply_search(&term);
                true
            }
            None => false,
        }
    }

    /// Drop any pending search and show the whole tree again.
    pub fn clear_search(&mut self) {
        self.search.cancel();
        self.apply_search("");
    }

    pub fn search_deadline(&self) -> Option<Instant> {
        self.search.deadline()
    }

    fn apply_search(&mut self, term: &str) {
        self.active_search = term.trim().to_string();
        let term = self.active_search.clone();
        self.any_visible = self.mutate(|nodes| tree::filter(nodes, &term));
        tracing::debug!(term = %term, any_visible = self.any_visible, "Applied category filter");
    }

    // ========================================================================
    // Expand / collapse
    // ========================================================================

    /// Toggle the node with `id`. Returns whether a node was flipped.
    pub fn toggle_node(&mut self, id: &str) -> bool {
        self.mutate(|nodes| tree::find_node_mut(nodes, id).is_some_and(tree::toggle_node))
    }

    /// Toggle the node at `path` (child indices from the top level).
    pub fn toggle_path(&mut self, path: &[usize]) -> bool {
        self.mutate(|nodes| tree::node_at_path_mut(nodes, path).is_some_and(tree::toggle_node))
    }

    pub fn expand_all(&mut self) {
        self.mutate(|nodes| tree::expand_all(nodes));
    }

    pub fn collapse_all(&mut self) {
        self.mutate(|nodes| tree::collapse_all(nodes));
    }

    /// Mutate the working tree in place and publish it under a new `Arc`.
    ///
    /// If a reader still holds the previous `Arc`, the tree is cloned first so
    /// that reader's snapshot stays unchanged.
    fn mutate<R>(&mut self, f: impl FnOnce(&mut Vec<TreeNode>) -> R) -> R {
        let mut nodes = Arc::unwrap_or_clone(std::mem::take(&mut self.working));
        let out = f(&mut nodes);
        self.working = Arc::new(nodes);
        self.revision += 1;
        out
    }

    // ========================================================================
    // Read-only view
    // ========================================================================

    pub fn working_tree(&self) -> &Arc<Vec<TreeNode>> {
        &self.working
    }

    pub fn canonical_tree(&self) -> &[TreeNode] {
        &self.canonical
    }

    pub fn records(&self) -> &[CategoryRecord] {
        &self.records
    }

    pub fn stats(&self) -> CategoryStats {
        self.stats
    }

    /// Whether any top-level node is visible under the active search.
    pub fn any_visible(&self) -> bool {
        self.any_visible
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    pub fn active_search(&self) -> &str {
        &self.active_search
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Incremented on every change to the working tree.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// What to show instead of the tree, if anything.
    pub fn empty_state(&self) -> Option<EmptyState> {
        if !self.loaded_once {
            return Some(match (&self.load_error, self.loading) {
                (_, true) => EmptyState::Loading,
                (Some(e), false) => EmptyState::LoadFailed(e.clone()),
                (None, false) => EmptyState::NoCategories,
            });
        }
        if self.working.is_empty() {
            Some(EmptyState::NoCategories)
        } else if !self.any_visible {
            Some(EmptyState::NoMatches(self.active_search.clone()))
        } else {
            None
        }
    }
}

impl Drop for CategoryTreeView {
    fn drop(&mut self) {
        if let Some(handle) = self.load_handle.take() {
            handle.abort();
        }
    }
}
