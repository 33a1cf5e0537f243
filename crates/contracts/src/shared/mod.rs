//! Shared building blocks for every resource: ids, alias resolution,
//! pagination, money arithmetic and CSV rendering.

pub mod csv_export;
pub mod field_adapter;
pub mod money;
pub mod pagination;
pub mod penalty;
pub mod record_id;

pub use field_adapter::{EntityRef, Payload, RawRecord};
pub use pagination::{FilterValue, ListQuery, Page, SortSpec};
pub use record_id::RecordId;
