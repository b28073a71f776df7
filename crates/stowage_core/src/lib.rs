//! stowage_core: storage location layouts.
//!
//! Expands a compact layout description (row, grid or 3D grid of letter
//! or number ranges) into uniquely named locations, validates it, previews
//! it, and creates the whole batch atomically through the `LocationStore`
//! port. No sqlx, no HTTP.

pub mod error;
pub mod layout;
pub mod location;
pub mod memory;
pub mod ports;
pub mod preview;
pub mod principal;
pub mod proto;
pub mod range;
pub mod service;
pub mod validate;

pub use error::LocationError;
pub use layout::{Layout, LayoutConfig, LayoutError, LayoutPlan, LayoutSnapshot, LayoutType};
pub use location::{LocationType, NewLocation, StorageLocation};
pub use memory::InMemoryLocationStore;
pub use ports::LocationStore;
pub use principal::Principal;
pub use proto::{BulkCreateError, BulkCreateResult, BulkFailureKind, PreviewResult};
pub use range::{RangeBound, RangeError, RangeSpec, RangeType, ResolvedRange};
pub use service::{LocationService, LocationServiceImpl};
pub use validate::{validate, ValidationReport, LARGE_BATCH_WARNING_THRESHOLD, MAX_BATCH_SIZE};
