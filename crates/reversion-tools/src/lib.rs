//! Tool framework for reversion-rs
//!
//! Every screening operation is exposed to the tool-routing layer as a
//! [`Tool`]: a named function taking and returning JSON, described by a JSON
//! schema. Tools are collected in a [`ToolRegistry`] and dispatched by name.

pub mod error;
pub mod registry;
pub mod tool;

pub use error::{Result, ToolError};
pub use registry::ToolRegistry;
pub use tool::{Tool, ToolDefinition, parse_params};
