//! # Progress Tracking and Statistics Module
//!
//! Progress bar di un batch e contatori dei risultati.
//!
//! ## Componenti principali:
//! - `ProgressManager`: barra `indicatif` con un tick per file processato
//! - `BatchResult`: contatori totali/successi, solo incrementati
//!
//! ## Visual feedback:
//! ```text
//! ⠋ [00:00:12] [========================>---------------] 6/10 (60%) ✅ voice_03.m4a
//! ```

use indicatif::{ProgressBar, ProgressStyle};
use std::fmt;
use std::time::Duration;

/// Manages progress reporting for one batch
#[derive(Clone)]
pub struct ProgressManager {
    bar: ProgressBar,
}

impl ProgressManager {
    /// Create a new progress manager
    pub fn new(total_files: u64) -> Self {
        let bar = ProgressBar::new(total_files);

        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
        {
            bar.set_style(style.progress_chars("=>-"));
        }

        bar.enable_steady_tick(Duration::from_millis(100));

        Self { bar }
    }

    /// Bar that draws nothing
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    /// Update progress with a message
    pub fn update(&self, message: &str) {
        self.bar.inc(1);
        self.bar.set_message(message.to_string());
    }

    /// Finish with a final message
    pub fn finish(&self, message: &str) {
        self.bar.finish_with_message(message.to_string());
    }
}

/// Outcome counters of one batch
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchResult {
    pub total_count: usize,
    pub success_count: usize,
}

impl BatchResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_success(&mut self) {
        self.total_count += 1;
        self.success_count += 1;
    }

    pub fn add_failure(&mut self) {
        self.total_count += 1;
    }

    pub fn failure_count(&self) -> usize {
        self.total_count - self.success_count
    }

    pub fn format_summary(&self) -> String {
        format!("Converted {} / {} files", self.success_count, self.total_count)
    }
}

impl fmt::Display for BatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_summary())
    }
}
