//! Leasing desk runtime surface.
//!
//! The hosted voice runtime reaches the property core only through the tools
//! registered here:
//! - `desk` holds the four leasing operations as string-returning calls
//! - `tools` wraps them behind the `Tool` trait with JSON argument handling
//! - `profile` carries the assistant instructions and tool descriptors
//!
//! Every operation answers with a sentence the assistant can speak, even when
//! listings cannot be loaded or no property matches.

pub mod desk;
pub mod profile;
pub mod tools;

pub use desk::LeasingDesk;
pub use profile::AgentProfile;
pub use tools::{Tool, ToolDescriptor, ToolRegistry};
