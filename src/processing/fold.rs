//! Row processes: derived fields computed by folding an operator over named columns.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{Number, Row};

/// A row transformation registered with the executor.
///
/// Called once per fetched row, in registration order, before the row is accumulated.
pub type RowProcessFn = Box<dyn Fn(&mut Row) + Send + Sync>;

/// Arithmetic operator of a [`RowProcess`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    /// `+`
    #[serde(rename = "+")]
    Add,
    /// `-`
    #[serde(rename = "-")]
    Sub,
    /// `*`
    #[serde(rename = "*")]
    Mul,
    /// `/`
    #[serde(rename = "/")]
    Div,
}

impl Operator {
    /// The RDL symbol for this operator.
    pub fn symbol(self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Sub => '-',
            Operator::Mul => '*',
            Operator::Div => '/',
        }
    }

    /// Apply the operator to two numbers.
    ///
    /// `+`, `-` and `*` stay integral for integral operands unless the result overflows, in
    /// which case the float result is returned. `/` always yields a float, and division by zero
    /// yields `0`.
    pub fn apply(self, lhs: Number, rhs: Number) -> Number {
        if let (Number::Int(a), Number::Int(b)) = (lhs, rhs) {
            let exact = match self {
                Operator::Add => a.checked_add(b),
                Operator::Sub => a.checked_sub(b),
                Operator::Mul => a.checked_mul(b),
                Operator::Div => None,
            };
            if let Some(v) = exact {
                return Number::Int(v);
            }
        }

        let (a, b) = (lhs.as_f64(), rhs.as_f64());
        Number::Float(match self {
            Operator::Add => a + b,
            Operator::Sub => a - b,
            Operator::Mul => a * b,
            Operator::Div if b == 0.0 => 0.0,
            Operator::Div => a / b,
        })
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Declares a derived field: `output_key = operand_keys[0] op operand_keys[1] op ...`.
///
/// The fold is left-associative. Missing or non-numeric operands count as `0`; this is a lenient
/// policy, not an error. The output key may shadow an existing column, and later processes see
/// the updated value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowProcess {
    /// Key the result is stored at.
    pub output_key: String,
    /// Operand column names, in fold order.
    pub operand_keys: Vec<String>,
    /// Operator folded over the operands.
    pub operator: Operator,
}

impl RowProcess {
    /// Create a row process.
    pub fn new<I, S>(output_key: impl Into<String>, operand_keys: I, operator: Operator) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            output_key: output_key.into(),
            operand_keys: operand_keys.into_iter().map(Into::into).collect(),
            operator,
        }
    }

    /// Fold the operator over the operand values of `row`.
    ///
    /// With no operands the result is `0`.
    pub fn evaluate(&self, row: &Row) -> Number {
        let mut operands = self.operand_keys.iter().map(|key| row.number(key));
        let Some(first) = operands.next() else {
            return Number::ZERO;
        };
        operands.fold(first, |acc, n| self.operator.apply(acc, n))
    }

    /// Evaluate and store the result at `output_key`.
    pub fn apply(&self, row: &mut Row) {
        let result = self.evaluate(row);
        row.insert(self.output_key.clone(), result.into_value());
    }

    /// Turn this declaration into an executor row-process function.
    pub fn compile(&self) -> RowProcessFn {
        let process = self.clone();
        Box::new(move |row: &mut Row| process.apply(row))
    }
}
