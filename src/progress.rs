//! Provides functions to set up and update a progress bar over simulation
//! steps.
//!
//! A progress bar has a label, a maximum progress value, and its current
//! progress, which starts at zero. Only one progress bar can be active per
//! process. When no bar has been initialized, updates are a no-op, so
//! library and test runs never draw one.

use progress_bar::{
    finalize_progress_bar, init_progress_bar, set_progress_bar_action, set_progress_bar_progress,
    Color, Style,
};
use std::sync::OnceLock;

static MAX_STEPS: OnceLock<usize> = OnceLock::new();

/// Initialize the progress bar with the total number of steps the run will
/// advance.
pub fn init_step_progress_bar(total_steps: usize) {
    MAX_STEPS
        .set(total_steps)
        .expect("Step progress already initialized");
    init_progress_bar(total_steps);
    set_progress_bar_action("Step", Color::Blue, Style::Bold);
}

/// Updates the progress bar with the number of completed steps. Finalizes
/// the bar when the last step completes.
pub(crate) fn update_step_progress(completed_steps: usize) {
    if let Some(max_steps) = MAX_STEPS.get() {
        let progress = completed_steps.min(*max_steps);
        set_progress_bar_progress(progress);
        if progress == *max_steps {
            finalize_progress_bar();
        }
    }
}
