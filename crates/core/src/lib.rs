//! Domain core of the leasing desk: property records, the listing matcher and
//! formatter, the property source capability, and configuration.

pub mod catalog;
pub mod config;
pub mod domain;
pub mod errors;
pub mod listing;
pub mod source;

pub use domain::lead::{Lead, LeadId};
pub use domain::property::{group_rows, PropertyFields, PropertyId, PropertyRecord, PropertyRow};
pub use errors::{InterfaceError, SourceError};
pub use source::{PropertySource, StaticListSource};
