//! Preview: validation plus name generation, no persistence.
//!
//! `parent_id` is carried but never looked up; whether the parent exists
//! is only checked at creation time.

use crate::layout::LayoutConfig;
use crate::proto::{PreviewResult, PREVIEW_SAMPLE_SIZE};
use crate::validate::validate;

pub fn preview(config: &LayoutConfig) -> PreviewResult {
    let validated = validate(config);
    let report = validated.report;

    let (sample_names, last_name) = match &validated.plan {
        Some(plan) => (
            plan.sample_names(PREVIEW_SAMPLE_SIZE),
            Some(plan.last_name()),
        ),
        None => (Vec::new(), None),
    };

    tracing::debug!(
        layout = %config.layout_type,
        total = report.total_count,
        valid = report.is_valid(),
        "layout preview"
    );

    PreviewResult {
        sample_names,
        last_name,
        total_count: report.total_count,
        is_valid: report.is_valid(),
        errors: report.error_messages(),
        warnings: report.warnings,
    }
}
