//! Expression module for the arithmetic subset of SQF emitted by the compiler.
//!
//! This module defines the expression tree used for the bodies of emitted functions:
//!
//! - `Expr`: An enum representing constants, indexed inputs and arithmetic operators
//!
//! An expression tree can be:
//! - Rendered to SQF source text through [`std::fmt::Display`]
//! - Evaluated against an input vector to check what the emitted code computes
//!
//! # Rendering
//! Numeric constants are written with [`format_literal`], using the formatter precision as
//! the number of decimal places (`format!("{expr:.3}")`), falling back to
//! [`DEFAULT_DECIMAL_PLACES`]. Indexed inputs are written as `(_this#i)`, the element `i` of
//! the array passed to the function.
//!
//! Rendering does not normalize signs: summing a negative term produces `+ -`, which is
//! collapsed afterwards by [`crate::format::normalize_signs`] on the whole function body.

use std::fmt;

use itertools::Itertools;

use crate::{config::DEFAULT_DECIMAL_PLACES, errors::EvalError, format::format_literal};

/// An expression tree node of the emitted SQF arithmetic.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A floating point constant, written in scientific notation
    Const(f64),
    /// An integer literal, written as is
    Int(i64),
    /// Element `i` of the function's input array
    Input(u32),
    /// Exponentiation by a non-negative integer constant
    Pow(Box<Expr>, u32),
    /// Product of the factors, in order
    Product(Vec<Expr>),
    /// Sum of the terms, in order
    Sum(Vec<Expr>),
    /// Difference of two expressions, always parenthesized
    Sub(Box<Expr>, Box<Expr>),
    /// Quotient of two expressions
    Div(Box<Expr>, Box<Expr>),
}

impl Expr {
    /// Evaluates the expression for the given input vector.
    ///
    /// # Errors
    /// Returns `EvalError::InputIndex` if the expression reads past the end of `input`.
    ///
    /// # Example
    /// ```
    /// use sqf_export::expr::Expr;
    ///
    /// let square = Expr::Pow(Box::new(Expr::Input(1)), 2);
    /// assert_eq!(square.eval(&[5.0, 3.0]).unwrap(), 9.0);
    /// ```
    pub fn eval(&self, input: &[f64]) -> Result<f64, EvalError> {
        match self {
            Expr::Const(value) => Ok(*value),
            Expr::Int(value) => Ok(*value as f64),
            Expr::Input(index) => {
                input
                    .get(*index as usize)
                    .copied()
                    .ok_or(EvalError::InputIndex {
                        index: *index,
                        len: input.len(),
                    })
            }
            Expr::Pow(base, exp) => Ok(base.eval(input)?.powi(*exp as i32)),
            Expr::Product(factors) => factors
                .iter()
                .try_fold(1.0, |acc, factor| Ok(acc * factor.eval(input)?)),
            Expr::Sum(terms) => terms
                .iter()
                .try_fold(0.0, |acc, term| Ok(acc + term.eval(input)?)),
            Expr::Sub(left, right) => Ok(left.eval(input)? - right.eval(input)?),
            Expr::Div(left, right) => Ok(left.eval(input)? / right.eval(input)?),
        }
    }

    /// Returns the highest input index read by the expression, if any.
    pub fn max_input_index(&self) -> Option<u32> {
        match self {
            Expr::Const(_) | Expr::Int(_) => None,
            Expr::Input(index) => Some(*index),
            Expr::Pow(base, _) => base.max_input_index(),
            Expr::Product(items) | Expr::Sum(items) => {
                items.iter().filter_map(Expr::max_input_index).max()
            }
            Expr::Sub(left, right) | Expr::Div(left, right) => {
                left.max_input_index().max(right.max_input_index())
            }
        }
    }
}

/// Writes the expression as SQF source.
///
/// - Constants use scientific notation at the formatter precision
/// - Inputs are written as `(_this#i)`
/// - Products join factors with `*`, sums join terms with ` + `
/// - Differences are parenthesized, quotients are not
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let places = f.precision().unwrap_or(DEFAULT_DECIMAL_PLACES);
        match self {
            Expr::Const(value) => write!(f, "{}", format_literal(*value, places)),
            Expr::Int(value) => write!(f, "{value}"),
            Expr::Input(index) => write!(f, "(_this#{index})"),
            Expr::Pow(base, exp) => write!(f, "{base:.places$}^{exp}"),
            Expr::Product(factors) => write!(
                f,
                "{}",
                factors.iter().map(|e| format!("{e:.places$}")).join("*")
            ),
            Expr::Sum(terms) => write!(
                f,
                "{}",
                terms.iter().map(|e| format!("{e:.places$}")).join(" + ")
            ),
            Expr::Sub(left, right) => write!(f, "({left:.places$} - {right:.places$})"),
            Expr::Div(left, right) => write!(f, "{left:.places$} / {right:.places$}"),
        }
    }
}
