//! Tool implementations served by `mcp-server`

pub mod calculator;
pub mod docs;
pub mod product;

pub use calculator::{Arithmetic, CalculatorTool};
pub use docs::ProductApiDocsTool;
pub use product::{QueryProductsTool, SearchDescriptionsTool};
