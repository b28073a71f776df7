//! Layout descriptions and name generation.
//!
//! A `LayoutConfig` is the transient request shape: a layout tag plus
//! loose vectors of ranges and separators. `Layout` is the checked form:
//! each variant carries exactly the number of resolved axes and separators
//! its dimensionality requires, so downstream code never re-checks arity.
//!
//! ## Name order
//!
//! Names are produced outer→inner: axis 0 varies slowest, the last axis
//! varies fastest.
//!
//! ```text
//! grid  [a..b] x [1..2], sep "-"   →   a-1, a-2, b-1, b-2
//! ```
//!
//! Generation is index-based (mixed radix over the axis lengths), so the
//! count, the first few names and the last name are available without
//! materializing the whole set.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::location::LocationType;
use crate::range::{self, RangeError, RangeSpec, ResolvedRange};

// ── Layout type ───────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutType {
    Single,
    Row,
    Grid,
    #[serde(rename = "grid_3d")]
    Grid3d,
}

impl LayoutType {
    /// Ranges this layout requires.
    pub const fn range_count(self) -> usize {
        match self {
            Self::Single => 0,
            Self::Row => 1,
            Self::Grid => 2,
            Self::Grid3d => 3,
        }
    }

    /// Separators this layout requires.
    pub const fn separator_count(self) -> usize {
        self.range_count().saturating_sub(1)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Row => "row",
            Self::Grid => "grid",
            Self::Grid3d => "grid_3d",
        }
    }
}

impl std::fmt::Display for LayoutType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Request shape ─────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutConfig {
    #[serde(default)]
    pub prefix: String,
    pub layout_type: LayoutType,
    #[serde(default)]
    pub ranges: Vec<RangeSpec>,
    #[serde(default)]
    pub separators: Vec<String>,
    pub location_type: LocationType,
    #[serde(default)]
    pub single_part_only: bool,
    #[serde(default)]
    pub parent_id: Option<Uuid>,
}

impl LayoutConfig {
    pub fn new(prefix: impl Into<String>, layout_type: LayoutType) -> Self {
        Self {
            prefix: prefix.into(),
            layout_type,
            ranges: Vec::new(),
            separators: Vec::new(),
            location_type: LocationType::Bin,
            single_part_only: false,
            parent_id: None,
        }
    }

    pub fn with_range(mut self, range: RangeSpec) -> Self {
        self.ranges.push(range);
        self
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separators.push(separator.into());
        self
    }

    pub fn with_location_type(mut self, location_type: LocationType) -> Self {
        self.location_type = location_type;
        self
    }

    pub fn with_parent(mut self, parent_id: Uuid) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    pub fn single_part_only(mut self, flag: bool) -> Self {
        self.single_part_only = flag;
        self
    }
}

// ── Errors ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("range {index}: {source}")]
    Range {
        index: usize,
        #[source]
        source: RangeError,
    },

    #[error(
        "{layout} layout requires {expected_ranges} range(s) and {expected_separators} separator(s), \
         got {found_ranges} range(s) and {found_separators} separator(s)"
    )]
    Structural {
        layout: LayoutType,
        expected_ranges: usize,
        found_ranges: usize,
        expected_separators: usize,
        found_separators: usize,
    },

    #[error("layout would generate {total} locations, exceeding the maximum of {max} per batch")]
    Size { total: u64, max: u64 },

    /// Two positions compose to the same string, e.g. `1`+`11` and `11`+`1`
    /// joined by an empty separator.
    #[error("layout generates the name '{name}' more than once; choose separators that keep names distinct")]
    NamesCollide { name: String },
}

// Errors travel over the wire as their messages.
impl Serialize for LayoutError {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ── Checked layout ────────────────────────────────────────────

/// A layout with every axis resolved and arity fixed by the variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Layout {
    Single,
    Row(ResolvedRange),
    Grid([ResolvedRange; 2], [String; 1]),
    Grid3d([ResolvedRange; 3], [String; 2]),
}

impl Layout {
    /// Check arity, then resolve every range. Arity problems are reported
    /// alone; range problems are collected for every offending range.
    pub fn build(
        layout_type: LayoutType,
        ranges: &[RangeSpec],
        separators: &[String],
    ) -> Result<Self, Vec<LayoutError>> {
        let structural = LayoutError::Structural {
            layout: layout_type,
            expected_ranges: layout_type.range_count(),
            found_ranges: ranges.len(),
            expected_separators: layout_type.separator_count(),
            found_separators: separators.len(),
        };
        if ranges.len() != layout_type.range_count()
            || separators.len() != layout_type.separator_count()
        {
            return Err(vec![structural]);
        }

        let mut axes = Vec::with_capacity(ranges.len());
        let mut errors = Vec::new();
        for (index, spec) in ranges.iter().enumerate() {
            match range::resolve(spec) {
                Ok(resolved) => axes.push(resolved),
                Err(source) => errors.push(LayoutError::Range { index, source }),
            }
        }
        if !errors.is_empty() {
            return Err(errors);
        }

        let seps = separators.to_vec();
        let layout = match layout_type {
            LayoutType::Single => Self::Single,
            LayoutType::Row => {
                let [x]: [ResolvedRange; 1] = axes.try_into().map_err(|_| vec![structural])?;
                Self::Row(x)
            }
            LayoutType::Grid => Self::Grid(
                axes.try_into().map_err(|_| vec![structural.clone()])?,
                seps.try_into().map_err(|_| vec![structural])?,
            ),
            LayoutType::Grid3d => Self::Grid3d(
                axes.try_into().map_err(|_| vec![structural.clone()])?,
                seps.try_into().map_err(|_| vec![structural])?,
            ),
        };
        Ok(layout)
    }

    pub fn layout_type(&self) -> LayoutType {
        match self {
            Self::Single => LayoutType::Single,
            Self::Row(_) => LayoutType::Row,
            Self::Grid(..) => LayoutType::Grid,
            Self::Grid3d(..) => LayoutType::Grid3d,
        }
    }

    /// Resolved axes, outermost first.
    pub fn axes(&self) -> &[ResolvedRange] {
        match self {
            Self::Single => &[],
            Self::Row(x) => std::slice::from_ref(x),
            Self::Grid(axes, _) => axes,
            Self::Grid3d(axes, _) => axes,
        }
    }

    /// Separators between adjacent axes.
    pub fn separators(&self) -> &[String] {
        match self {
            Self::Single | Self::Row(_) => &[],
            Self::Grid(_, seps) => seps,
            Self::Grid3d(_, seps) => seps,
        }
    }
}

// ── Name generation ───────────────────────────────────────────

/// A prefix plus a checked layout: everything needed to produce names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutPlan {
    pub prefix: String,
    pub layout: Layout,
}

impl LayoutPlan {
    pub fn new(prefix: impl Into<String>, layout: Layout) -> Self {
        Self {
            prefix: prefix.into(),
            layout,
        }
    }

    /// Product of axis lengths; `single` counts as one. Saturates rather
    /// than overflowing so oversized layouts still report a usable total.
    pub fn total_count(&self) -> u64 {
        self.layout
            .axes()
            .iter()
            .fold(1u64, |acc, axis| acc.saturating_mul(axis.len()))
    }

    /// Name at position `index` of the ordered expansion.
    pub fn name_at(&self, mut index: u64) -> String {
        let axes = self.layout.axes();
        let mut positions = vec![0u64; axes.len()];
        for (slot, axis) in positions.iter_mut().zip(axes).rev() {
            let len = axis.len();
            *slot = index % len;
            index /= len;
        }
        self.compose(axes.iter().zip(&positions).map(|(axis, &i)| axis.token(i)))
    }

    pub fn first_name(&self) -> String {
        self.name_at(0)
    }

    /// Final element of the expansion, composed directly from each axis's
    /// last token.
    pub fn last_name(&self) -> String {
        self.compose(self.layout.axes().iter().map(ResolvedRange::last))
    }

    /// The first `n` names in order.
    pub fn sample_names(&self, n: usize) -> Vec<String> {
        self.names().take(n).collect()
    }

    pub fn names(&self) -> Names<'_> {
        Names {
            plan: self,
            next: 0,
            total: self.total_count(),
        }
    }

    fn compose(&self, tokens: impl Iterator<Item = String>) -> String {
        let mut name = self.prefix.clone();
        for (i, token) in tokens.enumerate() {
            if i > 0 {
                name.push_str(&self.layout.separators()[i - 1]);
            }
            name.push_str(&token);
        }
        name
    }
}

/// Ordered, finite expansion of a plan. Restart by calling `names()` again.
pub struct Names<'a> {
    plan: &'a LayoutPlan,
    next: u64,
    total: u64,
}

impl Iterator for Names<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.next >= self.total {
            return None;
        }
        let name = self.plan.name_at(self.next);
        self.next += 1;
        Some(name)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::try_from(self.total - self.next).unwrap_or(usize::MAX);
        (remaining, Some(remaining))
    }
}

// ── Audit snapshot ────────────────────────────────────────────

/// Immutable record of the resolved configuration a batch was generated
/// from. Stored on every row of the batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutSnapshot {
    pub prefix: String,
    pub layout_type: LayoutType,
    pub ranges: Vec<ResolvedRange>,
    pub separators: Vec<String>,
    pub location_type: LocationType,
    pub single_part_only: bool,
    pub parent_id: Option<Uuid>,
    pub total_count: u64,
}

impl LayoutSnapshot {
    pub fn capture(plan: &LayoutPlan, config: &LayoutConfig) -> Self {
        Self {
            prefix: plan.prefix.clone(),
            layout_type: plan.layout.layout_type(),
            ranges: plan.layout.axes().to_vec(),
            separators: plan.layout.separators().to_vec(),
            location_type: config.location_type,
            single_part_only: config.single_part_only,
            parent_id: config.parent_id,
            total_count: plan.total_count(),
        }
    }
}
