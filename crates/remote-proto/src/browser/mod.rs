//! Incremental catalog browser.
//!
//! Turns the server's tree into a flat, filterable list whose row details
//! are resolved only when the list asks for them.

pub mod detail;
pub mod filter;
pub mod navigation;
pub mod row_cache;
pub mod source;
pub mod virtualization;

#[cfg(test)]
mod tests;

pub use detail::RowDetail;
pub use filter::FILTER_QUIET_WINDOW;
pub use navigation::{Browser, Navigated, NavigationTicket};
pub use row_cache::RowCache;
pub use source::{Catalog, DetailResolver, McwsCatalog};
pub use virtualization::{resolve_rows, RenderSignal, ResolvedRows, RowBatch, RowState};
