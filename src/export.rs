//! Export of fitted models to SQF source code.
//!
//! The main entry points are:
//! - `export_estimator()` - Compiles a model and renders it to SQF text
//! - `compile()` - Compiles a model into a [`Program`] without rendering it
//!
//! Compilation dispatches on the kind of each node. Search wrappers are replaced by their
//! best estimator, pipelines compile every step under a derived name and chain the results,
//! and leaf estimators become a single function. Unsupported kinds are rejected rather than
//! skipped, so a successful export always reproduces the whole model.

use log::{debug, trace};
use rayon::prelude::*;

use crate::{
    config::ExportConfig,
    convert::{linear_body, polynomial_body, scaler_body},
    errors::ExportError,
    model::{is_identifier, Model, Pipeline},
    program::{Body, Function, Program},
};

/// Exports a fitted model as SQF code defining `function_name`.
///
/// The returned text defines one function per leaf estimator and one per pipeline, callees
/// first, with `function_name` defined last. Calling it with an input array evaluates the
/// model's prediction.
///
/// # Arguments
/// * `model` - The fitted model graph to export
/// * `function_name` - Name of the top-level SQF function, also the prefix of step functions
/// * `config` - Decimal places, indent and line length of the emitted code
///
/// # Errors
/// Returns `ExportError` if the configuration or name is invalid, a node is of an
/// unsupported kind, or a node's fitted data is malformed. Nothing is emitted in that case.
///
/// # Example
/// ```
/// use sqf_export::model::{LinearModel, Model};
/// use sqf_export::{export_estimator, ExportConfig};
///
/// let model = Model::from(LinearModel::new(&[1.5, -2.0], 0.5));
/// let code = export_estimator(&model, "predict", &ExportConfig::default()).unwrap();
/// assert_eq!(
///     code,
///     "predict = {\n    1.500000e+00*(_this#0) - 2.000000e+00*(_this#1) + 5.000000e-01\n};\n"
/// );
/// ```
pub fn export_estimator(
    model: &Model,
    function_name: &str,
    config: &ExportConfig,
) -> Result<String, ExportError> {
    config.validate()?;
    debug!("exporting {} as {function_name}", model.kind());
    let program = compile(model, function_name)?;
    let code = program.render(config);
    debug!(
        "exported {function_name}: {} functions, {} bytes",
        program.functions().len(),
        code.len()
    );
    Ok(code)
}

/// Compiles a fitted model into an ordered list of SQF functions.
///
/// # Errors
/// Returns `ExportError::InvalidFunctionName` if `function_name` is not an SQF identifier,
/// `ExportError::UnsupportedModelKind` for a node without a compilation rule and
/// `ExportError::MalformedModelData` for inconsistent fitted data.
pub fn compile(model: &Model, function_name: &str) -> Result<Program, ExportError> {
    if !is_identifier(function_name) {
        return Err(ExportError::InvalidFunctionName(function_name.to_string()));
    }
    match model {
        Model::GridSearch(search) => {
            trace!("{function_name}: unwrapping search to its best estimator");
            compile(search.best_estimator()?, function_name)
        }
        Model::Pipeline(pipeline) => compile_pipeline(pipeline, function_name),
        Model::PolynomialFeatures(poly) => leaf(function_name, polynomial_body(poly)?),
        Model::StandardScaler(scaler) => leaf(function_name, scaler_body(scaler)?),
        Model::Linear(linear) => leaf(function_name, linear_body(linear)?),
        Model::Unsupported { estimator } => {
            Err(ExportError::UnsupportedModelKind(estimator.clone()))
        }
    }
}

fn leaf(function_name: &str, body: Body) -> Result<Program, ExportError> {
    let mut program = Program::new();
    program.push(Function::new(function_name, body))?;
    Ok(program)
}

/// Compiles every step as `{function_name}_{step}` and chains them in step order.
///
/// Steps are compiled in parallel; their programs are appended in declaration order,
/// followed by the chaining function.
fn compile_pipeline(pipeline: &Pipeline, function_name: &str) -> Result<Program, ExportError> {
    pipeline.validate()?;
    let step_names: Vec<String> = pipeline
        .step_names()
        .map(|step| format!("{function_name}_{step}"))
        .collect();
    trace!("{function_name}: pipeline of {} steps", step_names.len());

    let steps = pipeline
        .steps
        .par_iter()
        .zip(step_names.par_iter())
        .map(|(step, name)| compile(&step.estimator, name))
        .collect::<Result<Vec<_>, _>>()?;

    let mut program = Program::new();
    for step in steps {
        program.extend(step)?;
    }
    program.push(Function::new(function_name, Body::Chain(step_names)))?;
    Ok(program)
}
