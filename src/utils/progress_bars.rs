use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tracing::warn;

/// Spinner shown while a background provider task runs, with its percent
/// complete in the message.
pub struct ProgressTracker {
    pub progress_bar: ProgressBar,
    description: String,
}

impl ProgressTracker {
    pub fn new_indeterminate(description: &str) -> Self {
        let progress_bar = ProgressBar::new_spinner();

        let template = "[{elapsed_precise}] {spinner} {msg}";
        match ProgressStyle::with_template(template) {
            Ok(style) => progress_bar.set_style(style.tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")),
            Err(e) => warn!("Falling back to the default spinner style: {}", e),
        }

        progress_bar.set_message(description.to_string());
        progress_bar.enable_steady_tick(Duration::from_millis(100));

        Self {
            progress_bar,
            description: description.to_string(),
        }
    }

    pub fn set_percent(&self, percent: f64) {
        self.progress_bar
            .set_message(format!("{} ({:.0}%)", self.description, percent));
    }

    pub fn finish_with_message(&self, msg: &str) {
        self.progress_bar.finish_with_message(msg.to_string());
    }

    pub fn abandon_with_message(&self, msg: &str) {
        self.progress_bar.abandon_with_message(msg.to_string());
    }
}
