//! Error types for values crossing the boundary

use crate::kind::{Operator, ValueKind};

/// A value could not be converted to the requested kind.
///
/// Conversion failures are never fatal: soft conversion substitutes the
/// target kind's default and strict conversion reports a flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Cannot convert {from} to {to}")]
pub struct ConversionError {
    /// Kind of the source value
    pub from: ValueKind,
    /// Requested kind
    pub to: ValueKind,
}

impl ConversionError {
    /// Create a conversion error
    pub fn new(from: ValueKind, to: ValueKind) -> Self {
        ConversionError { from, to }
    }
}

/// Operator evaluation failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum OperatorError {
    /// No rule for this operator and operand kinds
    #[error("Invalid operands {lhs} and {rhs} for operator '{op}'")]
    InvalidOperands {
        /// Operator
        op: Operator,
        /// Left operand kind
        lhs: ValueKind,
        /// Right operand kind
        rhs: ValueKind,
    },

    /// Integer division or modulo by zero
    #[error("Division by zero")]
    DivisionByZero,

    /// Shift count outside `0..64`
    #[error("Invalid shift count: {0}")]
    InvalidShift(i64),
}
