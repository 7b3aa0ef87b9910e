//! Progress reporting utilities

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Progress reporter for ingestion runs.
#[derive(Debug)]
pub struct ProgressReporter {
    decode_pb: Option<ProgressBar>,
    pub rows_pb: Option<ProgressBar>,
    show_progress: bool,
}

impl ProgressReporter {
    /// Create progress reporter for an ingestion run
    pub fn new_for_ingest() -> Self {
        let decode_pb = create_spinner("Decoding input...");

        Self {
            decode_pb: Some(decode_pb),
            rows_pb: None,
            show_progress: true,
        }
    }

    /// Create minimal progress reporter (no progress bars)
    pub fn new_minimal() -> Self {
        Self {
            decode_pb: None,
            rows_pb: None,
            show_progress: false,
        }
    }

    /// Finish input decoding and start the row-processing bar.
    pub fn finish_decode(&mut self, message: &str, data_rows: u64) {
        if let Some(pb) = self.decode_pb.take() {
            pb.finish_with_message(message.to_string());
        }
        if self.show_progress {
            self.rows_pb = Some(create_progress_bar(data_rows, "Processing rows"));
        }
    }

    /// Update row progress
    pub fn update_rows(&self, processed: u64) {
        if let Some(pb) = &self.rows_pb {
            pb.set_position(processed);
        }
    }

    /// Finish row processing
    pub fn finish_rows(&mut self, message: &str) {
        if let Some(pb) = self.rows_pb.take() {
            pb.finish_with_message(message.to_string());
        }
    }
}

impl Drop for ProgressReporter {
    fn drop(&mut self) {
        // Ensure all progress bars are cleaned up silently
        if let Some(pb) = self.decode_pb.take() {
            pb.finish_and_clear();
        }
        if let Some(pb) = self.rows_pb.take() {
            pb.finish_and_clear();
        }
    }
}

/// Create a spinner progress bar
fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.green} {msg}")
            .expect("Invalid progress template"),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Create a progress bar with known total
fn create_progress_bar(total: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos:>7}/{len:7} {msg}")
            .expect("Invalid progress template")
            .progress_chars("#>-"),
    );
    pb.set_message(message.to_string());
    pb
}
