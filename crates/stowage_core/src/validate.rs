//! Layout validation: arity, range ordering, batch size, name distinctness.
//!
//! Validation never touches persistence. It produces a report of errors
//! and warnings plus, when the layout is structurally sound, the checked
//! plan so callers do not resolve the ranges twice.

use std::collections::HashSet;

use serde::Serialize;

use crate::layout::{Layout, LayoutConfig, LayoutError, LayoutPlan};

/// Hard cap on locations created by one request.
pub const MAX_BATCH_SIZE: u64 = 500;

/// Batches larger than this carry a warning.
pub const LARGE_BATCH_WARNING_THRESHOLD: u64 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub errors: Vec<LayoutError>,
    pub warnings: Vec<String>,
    /// Accurate whenever the layout is structurally sound, even if it is
    /// too large to create. Zero when the ranges could not be resolved.
    pub total_count: u64,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }
}

#[derive(Debug, Clone)]
pub struct Validated {
    pub report: ValidationReport,
    pub plan: Option<LayoutPlan>,
}

pub fn validate(config: &LayoutConfig) -> Validated {
    let layout = match Layout::build(config.layout_type, &config.ranges, &config.separators) {
        Ok(layout) => layout,
        Err(errors) => {
            return Validated {
                report: ValidationReport {
                    errors,
                    warnings: Vec::new(),
                    total_count: 0,
                },
                plan: None,
            }
        }
    };

    let plan = LayoutPlan::new(config.prefix.clone(), layout);
    let total_count = plan.total_count();

    let mut errors = Vec::new();
    if total_count > MAX_BATCH_SIZE {
        errors.push(LayoutError::Size {
            total: total_count,
            max: MAX_BATCH_SIZE,
        });
    } else if let Some(name) = first_repeated_name(&plan) {
        errors.push(LayoutError::NamesCollide { name });
    }

    let mut warnings = Vec::new();
    if total_count > LARGE_BATCH_WARNING_THRESHOLD {
        warnings.push(large_batch_warning(total_count));
    }

    Validated {
        report: ValidationReport {
            errors,
            warnings,
            total_count,
        },
        plan: Some(plan),
    }
}

/// First name the expansion produces twice. Only called on plans within
/// the batch cap, so the scan is bounded.
fn first_repeated_name(plan: &LayoutPlan) -> Option<String> {
    let mut seen = HashSet::new();
    plan.names().find(|name| !seen.insert(name.clone()))
}

fn large_batch_warning(total: u64) -> String {
    format!(
        "This layout will create {total} storage locations. Generated locations cannot be \
         deleted later through the normal interface, so review the preview before creating them."
    )
}
