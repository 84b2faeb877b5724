//! Application event handling.
//!
//! Background tasks report back over the `AppEvent` channel; this module
//! folds those results into the app state.

use crate::app::{App, AppEvent};

/// Handle application events from background tasks.
pub(super) fn handle_app_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::CategoriesLoaded { generation, result } => {
            let failure = result.as_ref().err().map(|e| e.to_string());
            if !app.view.apply_load(generation, result) {
                return;
            }
            match failure {
                None => {
                    let total = app.view.stats().total;
                    app.set_status(format!("Loaded {} categories", total));
                }
                Some(e) => app.set_status(format!("Failed to load categories: {}", e)),
            }
            app.clamp_selection();
        }
        AppEvent::TaskPanicked {
            task,
            generation,
            error,
        } => {
            tracing::error!(task, generation, error = %error, "Background task panicked");
            if app
                .view
                .abort_load(generation, format!("{} crashed: {}", task, error))
            {
                app.set_status(format!("Error: {} crashed", task));
            }
        }
    }
}
