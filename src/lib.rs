//! Export of fitted regression models to SQF functions.
//!
//! This crate compiles fitted regression pipelines into source code for SQF, the scripting
//! language of the Arma 3 engine, so that a model trained offline can be evaluated inside a
//! mission. Supported building blocks are polynomial feature expansion, standard scaling,
//! linear regressors, pipelines chaining them, and hyper-parameter searches wrapping them.
//!
//! # Features
//!
//! - Deterministic output: fixed scientific notation for every numeric literal
//! - Bodies wrapped to a configurable line length
//! - One SQF function per step, named after the pipeline steps
//! - An interpreter for compiled programs to check them against the model
//! - `ndarray`, `nalgebra` and `serde` support behind cargo features
//!
//! # Example
//!
//! ```rust
//! use sqf_export::model::{LinearModel, Model, Pipeline, StandardScaler};
//! use sqf_export::{export_estimator, ExportConfig};
//!
//! let model = Model::from(Pipeline::new([
//!     ("scaler", Model::from(StandardScaler::new(&[0.0], &[1.0]).unwrap())),
//!     ("regressor", Model::from(LinearModel::new(&[2.0], 1.0))),
//! ]).unwrap());
//!
//! let code = export_estimator(&model, "predict", &ExportConfig::default()).unwrap();
//! assert!(code.ends_with(
//!     "predict = {\n    _this = _this call predict_scaler;\n    \
//!      _this = _this call predict_regressor;\n    _this\n};\n"
//! ));
//! ```

pub use config::ExportConfig;
pub use export::{compile, export_estimator};
pub use model::Model;

pub mod prelude {
    pub use crate::backends::matrix::Matrix;
    pub use crate::backends::vector::Vector;
    pub use crate::config::ExportConfig;
    pub use crate::export::{compile, export_estimator};
    pub use crate::model::{
        GridSearch, LinearModel, Model, Pipeline, PolynomialFeatures, StandardScaler,
    };
    pub use crate::program::{Program, Value};
}

/// Containers fitted parameters can be read from
pub mod backends {
    pub mod matrix;
    pub mod vector;
}
/// Formatting configuration
pub mod config;
/// Conversion of leaf estimators into function bodies
pub mod convert;
/// Error types for the various failure modes
pub mod errors;
/// Model dispatch and pipeline compilation
pub mod export;
/// Expression tree of the emitted arithmetic
pub mod expr;
/// Numeric literal formatting, sign normalization and line wrapping
pub mod format;
/// Fitted model graph
pub mod model;
/// Compiled programs: rendering and evaluation
pub mod program;
