//! Error types for the sqf-export crate.
//!
//! This module defines the error types that can occur while describing a fitted model,
//! exporting it to SQF, and interpreting a compiled program. The main error types are:
//!
//! - `ModelError`: Fitted parameters that are missing, empty, or of inconsistent shape
//! - `ExportError`: High-level errors returned by the export entry points
//! - `EvalError`: Errors while interpreting a compiled `Program` on an input value
//!
//! Each error type implements the standard Error trait and provides detailed error messages.

use thiserror::Error;

/// Errors that can occur when building or validating the fitted parameters of a model.
///
/// These are raised by the validating constructors in [`crate::model`] and again by the
/// compiler before a node is turned into code, since the model fields are public and may
/// have been edited after construction.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    /// Error when two parameter vectors that must align have different lengths
    #[error("{estimator}: {left} has length {left_len} but {right} has length {right_len}")]
    LengthMismatch {
        estimator: &'static str,
        left: &'static str,
        left_len: usize,
        right: &'static str,
        right_len: usize,
    },
    /// Error when the rows of an exponent table do not all have the same width
    #[error("exponent table row {row} has {got} columns, expected {expected}")]
    RaggedTable {
        row: usize,
        expected: usize,
        got: usize,
    },
    /// Error when a required fitted attribute holds no values at all
    #[error("{estimator}: {attribute} is empty")]
    Empty {
        estimator: &'static str,
        attribute: &'static str,
    },
    /// Error when a pipeline step name cannot be used inside an SQF identifier
    #[error("invalid pipeline step name: {0:?}")]
    InvalidStepName(String),
    /// Error when two steps of the same pipeline share a name
    #[error("duplicate pipeline step name: {0:?}")]
    DuplicateStepName(String),
    /// Error when a search wrapper carries no refitted best estimator
    #[error("search wrapper has no best estimator (was it fitted with refit disabled?)")]
    MissingBestEstimator,
}

/// High-level errors that can occur when exporting a model to SQF.
///
/// Either the full program is produced or one of these is returned; there is never
/// partial output.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExportError {
    /// Error when a model node matches none of the compilation rules
    #[error("unsupported model kind: {0}")]
    UnsupportedModelKind(String),
    /// Error when a node's fitted attributes are missing or of the wrong shape
    #[error("malformed model data: {0}")]
    MalformedModelData(#[from] ModelError),
    /// Error when the requested function name is not a valid SQF identifier
    #[error("invalid function name: {0:?}")]
    InvalidFunctionName(String),
    /// Error when two emitted functions would end up with the same name
    #[error("function {0:?} is defined more than once")]
    DuplicateFunctionName(String),
    /// Error when a chaining function calls a function that is not defined before it
    #[error("function {caller:?} calls {callee:?} before it is defined")]
    UndefinedCallee { caller: String, callee: String },
    /// Error when the formatting configuration cannot produce any output
    #[error("invalid export configuration: {0}")]
    InvalidConfig(String),
}

/// Errors that can occur when interpreting a compiled program.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    /// Error when a chain statement calls a function the program does not define
    #[error("undefined function: {0}")]
    UndefinedFunction(String),
    /// Error when an expression indexes past the end of its input vector
    #[error("input index {index} out of range for input of length {len}")]
    InputIndex { index: u32, len: usize },
    /// Error when a function that indexes its input is called with a scalar
    #[error("function {0} expects a vector input")]
    ExpectedVector(String),
    /// Error when evaluating a program without any function
    #[error("program is empty")]
    EmptyProgram,
}
