/// Fetch metrics per extraction operation.
///
/// Tracks success rates, error counts and latency for each operation the
/// API performs against the source site.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationMetrics {
    pub operation: String,
    pub total_requests: u64,
    pub successful_requests: u64,
    pub failed_requests: u64,
    pub timeout_count: u64,
    pub average_response_time_ms: f64,
    pub last_success: Option<DateTime<Utc>>,
    pub last_failure: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    pub total_response_time_ms: u64,
}

impl OperationMetrics {
    pub fn new(operation: String) -> Self {
        Self {
            operation,
            total_requests: 0,
            successful_requests: 0,
            failed_requests: 0,
            timeout_count: 0,
            average_response_time_ms: 0.0,
            last_success: None,
            last_failure: None,
            last_error: None,
            total_response_time_ms: 0,
        }
    }

    pub fn success_rate(&self) -> f64 {
        if self.total_requests == 0 {
            0.0
        } else {
            (self.successful_requests as f64 / self.total_requests as f64) * 100.0
        }
    }

    fn record_success(&mut self, response_time: Duration) {
        self.total_requests += 1;
        self.successful_requests += 1;
        self.last_success = Some(Utc::now());

        self.total_response_time_ms += response_time.as_millis() as u64;
        self.average_response_time_ms =
            self.total_response_time_ms as f64 / self.successful_requests as f64;
    }

    fn record_failure(&mut self, error: String, timed_out: bool) {
        self.total_requests += 1;
        self.failed_requests += 1;
        self.last_failure = Some(Utc::now());
        self.last_error = Some(error);
        if timed_out {
            self.timeout_count += 1;
        }
    }
}

/// Thread-safe tracker shared across request handlers.
#[derive(Clone)]
pub struct MetricsTracker {
    metrics: Arc<Mutex<HashMap<String, OperationMetrics>>>,
}

impl MetricsTracker {
    pub fn new() -> Self {
        Self {
            metrics: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn record_success(&self, operation: &str, response_time: Duration) {
        let mut metrics = self.metrics.lock().unwrap();
        metrics
            .entry(operation.to_string())
            .or_insert_with(|| OperationMetrics::new(operation.to_string()))
            .record_success(response_time);
    }

    pub fn record_failure(&self, operation: &str, error: String, timed_out: bool) {
        let mut metrics = self.metrics.lock().unwrap();
        metrics
            .entry(operation.to_string())
            .or_insert_with(|| OperationMetrics::new(operation.to_string()))
            .record_failure(error, timed_out);
    }

    /// Snapshot of all operations, sorted by name for stable output.
    pub fn snapshot(&self) -> Vec<OperationMetrics> {
        let metrics = self.metrics.lock().unwrap();
        let mut all: Vec<OperationMetrics> = metrics.values().cloned().collect();
        all.sort_by(|a, b| a.operation.cmp(&b.operation));
        all
    }
}

impl Default for MetricsTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_rate_over_mixed_outcomes() {
        let tracker = MetricsTracker::new();
        tracker.record_success("search", Duration::from_millis(100));
        tracker.record_success("search", Duration::from_millis(300));
        tracker.record_failure("search", "network error: dns".into(), false);

        let snapshot = tracker.snapshot();
        assert_eq!(snapshot.len(), 1);
        let search = &snapshot[0];
        assert_eq!(search.total_requests, 3);
        assert_eq!(search.successful_requests, 2);
        assert_eq!(search.failed_requests, 1);
        assert!((search.success_rate() - 66.66).abs() < 1.0);
        assert!((search.average_response_time_ms - 200.0).abs() < f64::EPSILON);
    }

    #[test]
    fn timeouts_are_counted_separately() {
        let tracker = MetricsTracker::new();
        tracker.record_failure("detail", "request timed out after 10000 ms".into(), true);
        tracker.record_failure("detail", "network error: refused".into(), false);

        let snapshot = tracker.snapshot();
        assert_eq!(snapshot[0].failed_requests, 2);
        assert_eq!(snapshot[0].timeout_count, 1);
    }

    #[test]
    fn snapshot_is_sorted_by_operation() {
        let tracker = MetricsTracker::new();
        tracker.record_success("search", Duration::from_millis(1));
        tracker.record_success("detail", Duration::from_millis(1));
        let names: Vec<String> = tracker.snapshot().into_iter().map(|m| m.operation).collect();
        assert_eq!(names, vec!["detail", "search"]);
    }
}
