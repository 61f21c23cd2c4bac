// file: src/pipeline/progress.rs
// description: progress tracking and statistics reporting for ingestion and batch runs
// reference: uses indicatif for progress bars and tracks processing metrics

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Instant;

#[derive(Debug, Clone, Default)]
pub struct PipelineStats {
    pub items_processed: usize,
    pub items_failed: usize,
    pub chunks_created: usize,
    pub total_bytes_processed: u64,
    pub duration_secs: f64,
}

impl PipelineStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items_per_second(&self) -> f64 {
        if self.duration_secs <= 0.0 {
            return 0.0;
        }
        self.items_processed as f64 / self.duration_secs
    }

    pub fn kilobytes_processed(&self) -> f64 {
        self.total_bytes_processed as f64 / 1024.0
    }

    pub fn success_rate(&self) -> f64 {
        let total = self.items_processed + self.items_failed;
        if total == 0 {
            return 0.0;
        }
        (self.items_processed as f64 / total as f64) * 100.0
    }
}

pub struct ProgressTracker {
    main_bar: ProgressBar,
    detail_bar: ProgressBar,
    items_processed: Arc<AtomicUsize>,
    items_failed: Arc<AtomicUsize>,
    chunks_created: Arc<AtomicUsize>,
    bytes_processed: Arc<AtomicU64>,
    start_time: Instant,
}

impl ProgressTracker {
    pub fn new(total_items: usize) -> Self {
        Self::with_target(total_items, ProgressDrawTarget::stderr())
    }

    /// Same counters, nothing drawn.
    pub fn hidden(total_items: usize) -> Self {
        Self::with_target(total_items, ProgressDrawTarget::hidden())
    }

    fn with_target(total_items: usize, target: ProgressDrawTarget) -> Self {
        let multi_progress = MultiProgress::with_draw_target(target);

        let main_bar = create_progress_bar(&multi_progress, total_items as u64);
        let detail_bar = create_detail_bar(&multi_progress);

        Self {
            main_bar,
            detail_bar,
            items_processed: Arc::new(AtomicUsize::new(0)),
            items_failed: Arc::new(AtomicUsize::new(0)),
            chunks_created: Arc::new(AtomicUsize::new(0)),
            bytes_processed: Arc::new(AtomicU64::new(0)),
            start_time: Instant::now(),
        }
    }

    pub fn inc_processed(&self) {
        self.items_processed.fetch_add(1, Ordering::SeqCst);
        self.main_bar.inc(1);
        self.update_detail_bar();
    }

    pub fn inc_failed(&self) {
        self.items_failed.fetch_add(1, Ordering::SeqCst);
        self.main_bar.inc(1);
        self.update_detail_bar();
    }

    pub fn add_chunks(&self, count: usize) {
        self.chunks_created.fetch_add(count, Ordering::SeqCst);
    }

    pub fn add_bytes_processed(&self, bytes: u64) {
        self.bytes_processed.fetch_add(bytes, Ordering::SeqCst);
    }

    pub fn set_message(&self, message: String) {
        self.main_bar.set_message(message);
    }

    /// Prints a line above the bars without tearing them.
    pub fn println(&self, line: &str) {
        self.main_bar.println(line);
    }

    pub fn finish(&self) {
        self.main_bar.finish_with_message("done");
        self.detail_bar.finish_and_clear();
    }

    pub fn get_stats(&self) -> PipelineStats {
        PipelineStats {
            items_processed: self.items_processed.load(Ordering::SeqCst),
            items_failed: self.items_failed.load(Ordering::SeqCst),
            chunks_created: self.chunks_created.load(Ordering::SeqCst),
            total_bytes_processed: self.bytes_processed.load(Ordering::SeqCst),
            duration_secs: self.start_time.elapsed().as_secs_f64(),
        }
    }

    fn update_detail_bar(&self) {
        let chunks = self.chunks_created.load(Ordering::SeqCst);
        let failed = self.items_failed.load(Ordering::SeqCst);

        self.detail_bar
            .set_message(format!("Chunks: {} | Failed: {}", chunks, failed));
    }
}

impl Drop for ProgressTracker {
    fn drop(&mut self) {
        self.finish();
    }
}

fn create_progress_bar(multi_progress: &MultiProgress, total: u64) -> ProgressBar {
    let bar = multi_progress.add(ProgressBar::new(total));
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
    {
        bar.set_style(style.progress_chars("█▓▒░"));
    }
    bar
}

fn create_detail_bar(multi_progress: &MultiProgress) -> ProgressBar {
    let bar = multi_progress.add(ProgressBar::new(0));
    if let Ok(style) = ProgressStyle::default_bar().template("{msg}") {
        bar.set_style(style);
    }
    bar
}
