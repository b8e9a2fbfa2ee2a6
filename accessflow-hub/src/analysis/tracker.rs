//! In-flight tracking for analysis requests
//!
//! Requests may overlap; the tracker only reports whether any are running
//! and keeps the most recently finished report.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::RwLock;

use super::AnalysisReport;

#[derive(Debug, Clone, Default)]
pub struct AnalysisTracker {
    in_flight: Arc<AtomicUsize>,
    last_report: Arc<RwLock<Option<AnalysisReport>>>,
}

impl AnalysisTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark one request as running until the guard drops
    pub fn begin(&self) -> InFlightGuard {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        InFlightGuard {
            in_flight: Arc::clone(&self.in_flight),
        }
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight() > 0
    }

    pub async fn record(&self, report: AnalysisReport) {
        *self.last_report.write().await = Some(report);
    }

    pub async fn last_report(&self) -> Option<AnalysisReport> {
        self.last_report.read().await.clone()
    }
}

/// Decrements the in-flight count on drop, including on task cancellation
#[derive(Debug)]
pub struct InFlightGuard {
    in_flight: Arc<AtomicUsize>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{AnalysisStatus, ANALYSIS_NOT_CONFIGURED};
    use chrono::Utc;

    #[test]
    fn test_guards_count_overlapping_requests() {
        let tracker = AnalysisTracker::new();
        assert!(!tracker.is_busy());

        let first = tracker.begin();
        let second = tracker.begin();
        assert_eq!(tracker.in_flight(), 2);

        drop(first);
        assert!(tracker.is_busy());
        drop(second);
        assert!(!tracker.is_busy());
    }

    #[tokio::test]
    async fn test_last_report_replaced() {
        let tracker = AnalysisTracker::new();
        assert!(tracker.last_report().await.is_none());

        tracker
            .record(AnalysisReport {
                status: AnalysisStatus::NotConfigured,
                text: ANALYSIS_NOT_CONFIGURED.to_string(),
                generated_at: Utc::now(),
            })
            .await;
        tracker
            .record(AnalysisReport {
                status: AnalysisStatus::Ok,
                text: "second".to_string(),
                generated_at: Utc::now(),
            })
            .await;

        let last = tracker.last_report().await.unwrap();
        assert_eq!(last.status, AnalysisStatus::Ok);
        assert_eq!(last.text, "second");
    }
}
