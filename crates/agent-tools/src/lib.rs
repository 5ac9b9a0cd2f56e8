//! Tool framework shared by the tool server and the agent client
//!
//! A [`Tool`] is a named operation with a JSON-schema described input. The
//! [`ToolRegistry`] keeps tools in registration order, validates arguments
//! and dispatches invocations.

pub mod error;
pub mod registry;
pub mod schema;
pub mod tool;

pub use error::{ToolError, ToolErrorKind, ToolResult};
pub use registry::{OperationInfo, ToolRegistry};
pub use tool::{Tool, parse_arguments};
