//! Report outcome metrics.

use metrics::increment_counter;

pub const REPORTS_SENT: &str = "job_error_reporter.reports_sent";
pub const REPORTS_FAILED: &str = "job_error_reporter.reports_failed";
pub const REASONS_SKIPPED: &str = "job_error_reporter.reasons_skipped";

pub fn record_report_sent(origin: &str) {
    increment_counter!(REPORTS_SENT, "failure_origin" => origin.to_string());
}

pub fn record_report_failed(origin: &str) {
    increment_counter!(REPORTS_FAILED, "failure_origin" => origin.to_string());
}

pub fn record_reason_skipped(origin: &str) {
    increment_counter!(REASONS_SKIPPED, "failure_origin" => origin.to_string());
}
