// file: src/utils/telemetry.rs
// description: latency and throughput measurement for pipeline stages
// reference: std::time::Instant based timers

use std::time::{Duration, Instant};
use tracing::debug;

/// Wall-clock seconds rounded to two decimals, the precision shown to users.
pub fn rounded_secs(duration: Duration) -> f64 {
    (duration.as_secs_f64() * 100.0).round() / 100.0
}

/// Times one named stage and logs its completion at debug level.
pub struct OperationTimer {
    operation: String,
    start: Instant,
}

impl OperationTimer {
    pub fn new(operation: &str) -> Self {
        debug!("Starting {}", operation);
        Self {
            operation: operation.to_string(),
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn checkpoint(&self, message: &str) {
        debug!(
            "{}: {} after {:.2}s",
            self.operation,
            message,
            self.elapsed().as_secs_f64()
        );
    }

    pub fn finish(self) -> Duration {
        let elapsed = self.elapsed();
        debug!("Finished {} in {:.2}s", self.operation, elapsed.as_secs_f64());
        elapsed
    }

    /// Finishes the timer and reports how many `unit`s went through.
    pub fn finish_with_count(self, count: usize, unit: &str) -> PerformanceMetrics {
        let metrics = PerformanceMetrics::new(&self.operation, count, unit, self.elapsed());
        debug!("Finished {}", metrics.format());
        metrics
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceMetrics {
    pub operation: String,
    pub count: usize,
    pub unit: String,
    pub elapsed: Duration,
}

impl PerformanceMetrics {
    pub fn new(operation: &str, count: usize, unit: &str, elapsed: Duration) -> Self {
        Self {
            operation: operation.to_string(),
            count,
            unit: unit.to_string(),
            elapsed,
        }
    }

    /// Units per second; zero when nothing measurable elapsed.
    pub fn throughput(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.count as f64 / secs
        } else {
            0.0
        }
    }

    pub fn avg_ms(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.elapsed.as_secs_f64() * 1000.0 / self.count as f64
    }

    pub fn format(&self) -> String {
        format!(
            "{}: {} {} in {:.2}s ({:.1} {}/s, {:.1}ms each)",
            self.operation,
            self.count,
            self.unit,
            self.elapsed.as_secs_f64(),
            self.throughput(),
            self.unit,
            self.avg_ms()
        )
    }
}
