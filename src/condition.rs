//! Flag Conditions
//!
//! Parses combined operator+operand tokens such as `">=10"` or `"==1"`
//! and evaluates them against integer flag values.

use std::fmt;

use thiserror::Error;

/// Comparison operators, listed in match order.
/// Two-character operators come first so `">="` is never read as `">"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Ne,
    Ge,
    Le,
    Gt,
    Lt,
}

impl Operator {
    const MATCH_ORDER: [Operator; 6] = [
        Operator::Eq,
        Operator::Ne,
        Operator::Ge,
        Operator::Le,
        Operator::Gt,
        Operator::Lt,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Eq => "==",
            Operator::Ne => "!=",
            Operator::Ge => ">=",
            Operator::Le => "<=",
            Operator::Gt => ">",
            Operator::Lt => "<",
        }
    }

    /// Split a token into its leading operator and the remaining operand text
    pub fn split(token: &str) -> Option<(Operator, &str)> {
        let token = token.trim_start();
        Self::MATCH_ORDER
            .iter()
            .find_map(|op| token.strip_prefix(op.symbol()).map(|rest| (*op, rest)))
    }

    pub fn apply(self, lhs: i32, rhs: i32) -> bool {
        match self {
            Operator::Eq => lhs == rhs,
            Operator::Ne => lhs != rhs,
            Operator::Ge => lhs >= rhs,
            Operator::Le => lhs <= rhs,
            Operator::Gt => lhs > rhs,
            Operator::Lt => lhs < rhs,
        }
    }
}

/// Why a condition token could not be used
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConditionParseError {
    /// No recognised operator at the start of the token
    #[error("no comparison operator in '{0}'")]
    UnknownOperator(String),
    /// Operator found but the operand is not an integer
    #[error("operand '{operand}' after '{}' is not an integer", op.symbol())]
    BadOperand { op: Operator, operand: String },
}

/// A parsed comparison against a fixed operand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Comparison {
    pub op: Operator,
    pub operand: i32,
}

impl Comparison {
    pub fn parse(token: &str) -> Result<Self, ConditionParseError> {
        let (op, rest) = Operator::split(token)
            .ok_or_else(|| ConditionParseError::UnknownOperator(token.to_string()))?;
        let operand = rest
            .trim()
            .parse::<i32>()
            .map_err(|_| ConditionParseError::BadOperand {
                op,
                operand: rest.to_string(),
            })?;
        Ok(Self { op, operand })
    }

    pub fn matches(&self, value: i32) -> bool {
        self.op.apply(value, self.operand)
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.op.symbol(), self.operand)
    }
}
