//! Application state.
//!
//! - `view` - the category tree screen state ([`CategoryTreeView`])
//! - `debounce` - trailing-edge debounce used for search input
//!
//! [`App`] wraps the view with terminal-only concerns: cursor position,
//! search input, status line.

mod debounce;
mod view;

use futures::FutureExt;
use std::borrow::Cow;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::Instant;

use crate::api::{ApiError, CategoryClient, CategoryRecord};
use crate::config::Config;
use crate::tree::{visible_rows, VisibleRow};

pub use debounce::{Debouncer, SEARCH_DEBOUNCE};
pub use view::{CategoryTreeView, EmptyState};

/// How long a status message stays on screen.
const STATUS_TTL_SECS: u64 = 3;

/// Events from background tasks
pub enum AppEvent {
    /// A category fetch finished. `generation` identifies the load that
    /// produced it; stale generations are dropped by the view.
    CategoriesLoaded {
        generation: u64,
        result: Result<Vec<CategoryRecord>, ApiError>,
    },
    TaskPanicked {
        task: &'static str,
        generation: u64,
        error: String,
    },
}

/// Run `future`, turning a panic into an `Err` with the panic message.
pub(crate) async fn catch_task_panic<F, T>(future: F) -> Result<T, String>
where
    F: std::future::Future<Output = T>,
{
    AssertUnwindSafe(future)
        .catch_unwind()
        .await
        .map_err(|panic| {
            if let Some(s) = panic.downcast_ref::<&'static str>() {
                s.to_string()
            } else if let Some(s) = panic.downcast_ref::<String>() {
                s.clone()
            } else {
                "Unknown panic".to_string()
            }
        })
}

pub struct App {
    pub view: CategoryTreeView,
    pub client: Arc<CategoryClient>,

    /// Cursor position in the flattened list of visible rows.
    pub selected: usize,

    pub search_mode: bool,
    pub search_input: String,

    pub show_help: bool,
    /// Loading spinner animation frame.
    pub spinner_frame: usize,
    pub status_message: Option<(Cow<'static, str>, Instant)>,
    pub needs_redraw: bool,
}

impl App {
    pub fn new(client: CategoryClient, config: &Config) -> Self {
        Self {
            view: CategoryTreeView::new(config.expand_depth, config.search_debounce()),
            client: Arc::new(client),
            selected: 0,
            search_mode: false,
            search_input: String::new(),
            show_help: false,
            spinner_frame: 0,
            status_message: None,
            needs_redraw: true,
        }
    }

    /// Start (or restart) loading the category tree.
    pub fn reload(&mut self, event_tx: &mpsc::Sender<AppEvent>) {
        self.view
            .spawn_load(Arc::clone(&self.client), event_tx.clone());
        self.set_status("Loading categories...");
    }

    /// Rows currently on screen, in order.
    pub fn rows(&self) -> Vec<VisibleRow<'_>> {
        visible_rows(self.view.working_tree())
    }

    pub fn clamp_selection(&mut self) {
        let len = self.rows().len();
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }

    pub fn nav_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn nav_down(&mut self) {
        let len = self.rows().len();
        if self.selected + 1 < len {
            self.selected += 1;
        }
    }

    pub fn nav_top(&mut self) {
        self.selected = 0;
    }

    pub fn nav_bottom(&mut self) {
        self.selected = self.rows().len().saturating_sub(1);
    }

    /// Toggle the node under the cursor. Returns whether anything changed.
    pub fn toggle_selected(&mut self) -> bool {
        let path = match self.rows().get(self.selected) {
            Some(row) if row.node.has_children() => row.path.clone(),
            _ => return false,
        };
        let changed = self.view.toggle_path(&path);
        self.clamp_selection();
        changed
    }

    /// Expand the node under the cursor, or move into its first child if it
    /// is already expanded.
    pub fn expand_selected(&mut self) {
        let (expanded, has_children) = match self.rows().get(self.selected) {
            Some(row) => (row.node.expanded, row.node.has_children()),
            None => return,
        };
        if !has_children {
            return;
        }
        if expanded {
            self.nav_down();
        } else {
            self.toggle_selected();
        }
    }

    /// Collapse the node under the cursor, or jump to its parent.
    pub fn collapse_selected(&mut self) {
        let (collapse, parent_idx) = {
            let rows = self.rows();
            let Some(row) = rows.get(self.selected) else {
                return;
            };
            if row.node.expanded && row.node.has_children() {
                (true, None)
            } else {
                let parent = &row.path[..row.path.len() - 1];
                (false, rows.iter().position(|r| r.path == parent))
            }
        };
        if collapse {
            self.toggle_selected();
        } else if let Some(idx) = parent_idx {
            self.selected = idx;
        }
    }

    pub fn expand_all(&mut self) {
        self.view.expand_all();
        self.clamp_selection();
    }

    pub fn collapse_all(&mut self) {
        self.view.collapse_all();
        self.clamp_selection();
    }

    /// Apply the debounced search if due. Returns true if the tree changed.
    pub fn tick_search(&mut self, now: Instant) -> bool {
        if self.view.poll_search(now) {
            self.selected = 0;
            true
        } else {
            false
        }
    }

    /// Set status message (will auto-expire after 3 seconds)
    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now()));
    }

    /// Clear status message if expired. Returns true if a message was cleared.
    pub fn clear_expired_status(&mut self) -> bool {
        if let Some((_, time)) = &self.status_message {
            if time.elapsed().as_secs() >= STATUS_TTL_SECS {
                self.status_message = None;
                return true;
            }
        }
        false
    }
}
