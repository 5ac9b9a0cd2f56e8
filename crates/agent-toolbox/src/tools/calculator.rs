//! Two-operand arithmetic tools

use agent_tools::{Tool, ToolError, ToolResult, parse_arguments, schema};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Number, Value, json};
use std::sync::Arc;

/// Arithmetic operation exposed as a tool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arithmetic {
    Add,
    Multiply,
    Subtract,
    Divide,
}

impl Arithmetic {
    /// Registration order
    pub const ALL: [Self; 4] = [Self::Add, Self::Multiply, Self::Subtract, Self::Divide];

    pub fn name(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Multiply => "multiply",
            Self::Subtract => "subtract",
            Self::Divide => "divide",
        }
    }

    fn description(self) -> &'static str {
        match self {
            Self::Add => "Add two numbers and return the sum.",
            Self::Multiply => "Multiply two numbers and return the product.",
            Self::Subtract => "Subtract b from a and return the difference.",
            Self::Divide => "Divide a by b and return the quotient. Fails when b is zero.",
        }
    }

    /// Apply the operation
    ///
    /// Whole-number operands give an integer result unless it overflows
    /// `i64`; division always yields a float.
    #[allow(clippy::float_cmp)]
    pub fn apply(self, a: &Number, b: &Number) -> ToolResult<Value> {
        let (x, y) = (as_float(a)?, as_float(b)?);

        match self {
            Self::Add => exact_or_float(a, b, i64::checked_add, x + y),
            Self::Multiply => exact_or_float(a, b, i64::checked_mul, x * y),
            Self::Subtract => exact_or_float(a, b, i64::checked_sub, x - y),
            Self::Divide if y == 0.0 => Err(ToolError::DivisionByZero),
            Self::Divide => finite(x / y),
        }
    }
}

fn exact_or_float(
    a: &Number,
    b: &Number,
    exact: fn(i64, i64) -> Option<i64>,
    float: f64,
) -> ToolResult<Value> {
    match (as_whole(a), as_whole(b)) {
        (Some(i), Some(j)) => match exact(i, j) {
            Some(n) => Ok(json!(n)),
            None => finite(float),
        },
        _ => finite(float),
    }
}

fn as_float(n: &Number) -> ToolResult<f64> {
    n.as_f64()
        .ok_or_else(|| ToolError::InvalidArguments(format!("{n} is not a representable number")))
}

#[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
fn as_whole(n: &Number) -> Option<i64> {
    if let Some(i) = n.as_i64() {
        return Some(i);
    }
    let f = n.as_f64()?;
    // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

fn finite(value: f64) -> ToolResult<Value> {
    Number::from_f64(value)
        .map(Value::Number)
        .ok_or_else(|| ToolError::ExecutionFailed("result is not a finite number".to_string()))
}

#[derive(Debug, Deserialize)]
struct Operands {
    a: Number,
    b: Number,
}

/// Tool wrapper around an [`Arithmetic`] operation
#[derive(Debug, Clone, Copy)]
pub struct CalculatorTool {
    op: Arithmetic,
}

impl CalculatorTool {
    pub fn new(op: Arithmetic) -> Self {
        Self { op }
    }

    /// All four operations in registration order
    pub fn all() -> Vec<Arc<dyn Tool>> {
        Arithmetic::ALL
            .into_iter()
            .map(|op| Arc::new(Self::new(op)) as Arc<dyn Tool>)
            .collect()
    }
}

#[async_trait]
impl Tool for CalculatorTool {
    async fn execute(&self, params: Value) -> ToolResult<Value> {
        let Operands { a, b } = parse_arguments(params)?;
        self.op.apply(&a, &b)
    }

    fn name(&self) -> &str {
        self.op.name()
    }

    fn description(&self) -> &str {
        self.op.description()
    }

    fn input_schema(&self) -> Value {
        let (first, second) = match self.op {
            Arithmetic::Subtract => ("Number to subtract from", "Number to subtract"),
            Arithmetic::Divide => ("Dividend", "Divisor"),
            Arithmetic::Add | Arithmetic::Multiply => ("First number", "Second number"),
        };
        schema::object(
            json!({
                "a": schema::number(Some(first)),
                "b": schema::number(Some(second)),
            }),
            vec!["a", "b"],
        )
    }
}
