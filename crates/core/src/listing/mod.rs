//! Property resolution and the spoken answers built from it.
//!
//! Everything here is pure: callers fetch a snapshot of records from a
//! [`PropertySource`](crate::source::PropertySource) and pass it in.

pub mod format;
pub mod resolve;

pub use format::{check_availability, detail, humanize_key, summarize_all};
pub use resolve::resolve;
