//! Fitted model graph consumed by the compiler.
//!
//! This module defines [`Model`], the closed set of estimator kinds the compiler knows how
//! to export, and the fitted parameters each kind carries:
//!
//! - [`Pipeline`]: ordered, named steps applied one after another
//! - [`GridSearch`]: a cross-validated search wrapping its refitted best estimator
//! - [`PolynomialFeatures`]: monomial expansion driven by an exponent table
//! - [`StandardScaler`]: per-feature `(x - mean) / scale`
//! - [`LinearModel`]: dot product with a coefficient vector plus an intercept
//!
//! The graph is built by the caller (typically from parameters exported by the training
//! library) and is only ever borrowed by the compiler. Constructors validate shapes up
//! front; since fields are public, the compiler validates every node again before emitting
//! code for it.
//!
//! # Example
//!
//! ```
//! use sqf_export::model::{LinearModel, Model, Pipeline, StandardScaler};
//!
//! let model = Model::from(Pipeline::new([
//!     ("scaler", Model::from(StandardScaler::new(&[1.0, 2.0], &[0.5, 4.0])?)),
//!     ("regressor", Model::from(LinearModel::new(&[3.0, -1.0], 0.25))),
//! ])?);
//! assert_eq!(model.kind(), "Pipeline");
//! # Ok::<(), sqf_export::errors::ModelError>(())
//! ```

use std::collections::HashSet;
use std::fmt;

use colored::Colorize;
use itertools::Itertools;

use crate::backends::matrix::{check_rectangular, Matrix};
use crate::backends::vector::Vector;
use crate::errors::ModelError;

/// A node of a fitted model graph.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "type", rename_all = "snake_case")
)]
pub enum Model {
    /// Sequential composition of named steps
    Pipeline(Pipeline),
    /// Cross-validated search; only its best estimator is exported
    GridSearch(GridSearch),
    /// Polynomial feature expansion
    PolynomialFeatures(PolynomialFeatures),
    /// Per-feature standardization
    StandardScaler(StandardScaler),
    /// Linear regressor (ordinary least squares, ridge, lasso, ...)
    Linear(LinearModel),
    /// An estimator the compiler has no rule for, identified by its class name
    Unsupported { estimator: String },
}

/// One named step of a [`Pipeline`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Step {
    pub name: String,
    pub estimator: Model,
}

/// Ordered steps, each fed the output of the previous one.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pipeline {
    pub steps: Vec<Step>,
}

/// A fitted hyper-parameter search.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridSearch {
    /// The estimator refitted with the best parameters; `None` when refit was disabled
    pub best_estimator: Option<Box<Model>>,
}

/// Polynomial feature expansion.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PolynomialFeatures {
    /// Exponent table: one row per output feature, one column per input feature
    pub powers: Vec<Vec<u32>>,
}

/// Per-feature standardization.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

/// Single-target linear regressor.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LinearModel {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

/// Returns true if `name` is usable as an SQF identifier.
pub(crate) fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

impl Model {
    /// Returns the kind of the node, or the class name of an unsupported estimator.
    pub fn kind(&self) -> &str {
        match self {
            Model::Pipeline(_) => "Pipeline",
            Model::GridSearch(_) => "GridSearch",
            Model::PolynomialFeatures(_) => "PolynomialFeatures",
            Model::StandardScaler(_) => "StandardScaler",
            Model::Linear(_) => "LinearModel",
            Model::Unsupported { estimator } => estimator,
        }
    }

    /// Creates a node for an estimator the compiler cannot export.
    pub fn unsupported(estimator: impl Into<String>) -> Self {
        Model::Unsupported {
            estimator: estimator.into(),
        }
    }

    fn write_tree(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let pad = "  ".repeat(depth);
        match self {
            Model::Pipeline(pipeline) => {
                writeln!(f, "{pad}{}", self.kind().cyan())?;
                for step in &pipeline.steps {
                    writeln!(f, "{pad}  {}:", step.name.bold())?;
                    step.estimator.write_tree(f, depth + 2)?;
                }
                Ok(())
            }
            Model::GridSearch(search) => {
                writeln!(f, "{pad}{}", self.kind().cyan())?;
                match &search.best_estimator {
                    Some(best) => best.write_tree(f, depth + 1),
                    None => writeln!(f, "{pad}  {}", "<no best estimator>".red()),
                }
            }
            Model::PolynomialFeatures(poly) => writeln!(
                f,
                "{pad}{} ({} -> {} features)",
                self.kind().cyan(),
                poly.n_input_features(),
                poly.n_output_features()
            ),
            Model::StandardScaler(scaler) => writeln!(
                f,
                "{pad}{} ({} features)",
                self.kind().cyan(),
                scaler.mean.len()
            ),
            Model::Linear(linear) => writeln!(
                f,
                "{pad}{} ({} coefficients, intercept {})",
                self.kind().cyan(),
                linear.coefficients.len(),
                linear.intercept
            ),
            Model::Unsupported { estimator } => {
                writeln!(f, "{pad}{} (unsupported)", estimator.red())
            }
        }
    }
}

/// Writes the graph as an indented tree, one node per line, with kind names highlighted.
impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_tree(f, 0)
    }
}

impl From<Pipeline> for Model {
    fn from(pipeline: Pipeline) -> Self {
        Model::Pipeline(pipeline)
    }
}

impl From<GridSearch> for Model {
    fn from(search: GridSearch) -> Self {
        Model::GridSearch(search)
    }
}

impl From<PolynomialFeatures> for Model {
    fn from(poly: PolynomialFeatures) -> Self {
        Model::PolynomialFeatures(poly)
    }
}

impl From<StandardScaler> for Model {
    fn from(scaler: StandardScaler) -> Self {
        Model::StandardScaler(scaler)
    }
}

impl From<LinearModel> for Model {
    fn from(linear: LinearModel) -> Self {
        Model::Linear(linear)
    }
}

impl Pipeline {
    /// Creates a pipeline from `(name, estimator)` pairs, keeping their order.
    ///
    /// # Errors
    /// Returns `ModelError` if there are no steps, a name is not a valid identifier
    /// fragment, or two steps share a name.
    pub fn new<S, I>(steps: I) -> Result<Self, ModelError>
    where
        S: Into<String>,
        I: IntoIterator<Item = (S, Model)>,
    {
        let pipeline = Self {
            steps: steps
                .into_iter()
                .map(|(name, estimator)| Step {
                    name: name.into(),
                    estimator,
                })
                .collect(),
        };
        pipeline.validate()?;
        Ok(pipeline)
    }

    /// Checks the step list without looking into the steps themselves.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.steps.is_empty() {
            return Err(ModelError::Empty {
                estimator: "Pipeline",
                attribute: "steps",
            });
        }
        let mut seen = HashSet::new();
        for step in &self.steps {
            // Step names are appended to a parent name after `_`, so a leading digit is fine.
            if step.name.is_empty()
                || !step.name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
            {
                return Err(ModelError::InvalidStepName(step.name.clone()));
            }
            if !seen.insert(step.name.as_str()) {
                return Err(ModelError::DuplicateStepName(step.name.clone()));
            }
        }
        Ok(())
    }

    /// Returns the step names in order.
    pub fn step_names(&self) -> impl Iterator<Item = &str> {
        self.steps.iter().map(|step| step.name.as_str())
    }
}

impl GridSearch {
    pub fn new(best_estimator: Model) -> Self {
        Self {
            best_estimator: Some(Box::new(best_estimator)),
        }
    }

    /// Returns the refitted best estimator.
    ///
    /// # Errors
    /// Returns `ModelError::MissingBestEstimator` if the search was not refitted.
    pub fn best_estimator(&self) -> Result<&Model, ModelError> {
        self.best_estimator
            .as_deref()
            .ok_or(ModelError::MissingBestEstimator)
    }
}

impl PolynomialFeatures {
    /// Creates the expansion from a fitted exponent table.
    ///
    /// # Errors
    /// Returns `ModelError` if the table has no rows or is ragged.
    pub fn new<M: Matrix + ?Sized>(powers: &M) -> Result<Self, ModelError> {
        let poly = Self {
            powers: powers.to_rows()?,
        };
        poly.validate()?;
        Ok(poly)
    }

    /// Builds the exponent table a fitted expansion of `n_features` inputs up to `degree`
    /// would have.
    ///
    /// Rows come in the same order as scikit-learn's `powers_`: the bias row (if
    /// `include_bias`), then all degree-1 terms, then degree-2 terms as combinations with
    /// replacement in lexicographic order, and so on. With `interaction_only` no feature
    /// appears twice in one term.
    ///
    /// # Example
    /// ```
    /// use sqf_export::model::PolynomialFeatures;
    ///
    /// let poly = PolynomialFeatures::generate(2, 2, true, false);
    /// assert_eq!(
    ///     poly.powers,
    ///     vec![vec![0, 0], vec![1, 0], vec![0, 1], vec![2, 0], vec![1, 1], vec![0, 2]]
    /// );
    /// ```
    pub fn generate(
        n_features: usize,
        degree: u32,
        include_bias: bool,
        interaction_only: bool,
    ) -> Self {
        let mut powers = Vec::new();
        if include_bias {
            powers.push(vec![0; n_features]);
        }
        for d in 1..=degree as usize {
            let terms: Vec<Vec<usize>> = if interaction_only {
                (0..n_features).combinations(d).collect()
            } else {
                (0..n_features).combinations_with_replacement(d).collect()
            };
            for term in terms {
                let mut row = vec![0; n_features];
                for feature in term {
                    row[feature] += 1;
                }
                powers.push(row);
            }
        }
        Self { powers }
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        if self.powers.is_empty() {
            return Err(ModelError::Empty {
                estimator: "PolynomialFeatures",
                attribute: "powers",
            });
        }
        check_rectangular(&self.powers)
    }

    pub fn n_input_features(&self) -> usize {
        self.powers.first().map_or(0, Vec::len)
    }

    pub fn n_output_features(&self) -> usize {
        self.powers.len()
    }
}

impl StandardScaler {
    /// Creates the scaler from fitted per-feature means and scales.
    ///
    /// # Errors
    /// Returns `ModelError` if the vectors are empty or of different lengths.
    pub fn new<M, S>(mean: &M, scale: &S) -> Result<Self, ModelError>
    where
        M: Vector + ?Sized,
        S: Vector + ?Sized,
    {
        let scaler = Self {
            mean: mean.to_values(),
            scale: scale.to_values(),
        };
        scaler.validate()?;
        Ok(scaler)
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        if self.mean.len() != self.scale.len() {
            return Err(ModelError::LengthMismatch {
                estimator: "StandardScaler",
                left: "mean",
                left_len: self.mean.len(),
                right: "scale",
                right_len: self.scale.len(),
            });
        }
        if self.mean.is_empty() {
            return Err(ModelError::Empty {
                estimator: "StandardScaler",
                attribute: "mean",
            });
        }
        Ok(())
    }
}

impl LinearModel {
    pub fn new<V: Vector + ?Sized>(coefficients: &V, intercept: f64) -> Self {
        Self {
            coefficients: coefficients.to_values(),
            intercept,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linear() -> Model {
        LinearModel::new(&[1.0], 0.0).into()
    }

    #[test]
    fn test_identifiers() {
        assert!(is_identifier("predict"));
        assert!(is_identifier("_f2"));
        assert!(is_identifier("TAG_fnc_predict"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("2f"));
        assert!(!is_identifier("f-g"));
        assert!(!is_identifier("f g"));
    }

    #[test]
    fn test_pipeline_validation() {
        assert!(Pipeline::new([("a", linear()), ("b", linear())]).is_ok());
        assert!(Pipeline::new([("0", linear())]).is_ok());
        assert_eq!(
            Pipeline::new(Vec::<(String, Model)>::new()),
            Err(ModelError::Empty {
                estimator: "Pipeline",
                attribute: "steps"
            })
        );
        assert_eq!(
            Pipeline::new([("a", linear()), ("a", linear())]),
            Err(ModelError::DuplicateStepName("a".to_string()))
        );
        assert_eq!(
            Pipeline::new([("bad name", linear())]),
            Err(ModelError::InvalidStepName("bad name".to_string()))
        );
    }

    #[test]
    fn test_pipeline_keeps_order() {
        let pipeline = Pipeline::new([("z", linear()), ("a", linear()), ("m", linear())]).unwrap();
        assert_eq!(pipeline.step_names().collect::<Vec<_>>(), vec!["z", "a", "m"]);
    }

    #[test]
    fn test_scaler_validation() {
        assert_eq!(
            StandardScaler::new(&[1.0, 2.0], &[1.0]),
            Err(ModelError::LengthMismatch {
                estimator: "StandardScaler",
                left: "mean",
                left_len: 2,
                right: "scale",
                right_len: 1
            })
        );
        assert!(matches!(
            StandardScaler::new(&Vec::<f64>::new(), &Vec::<f64>::new()),
            Err(ModelError::Empty { .. })
        ));
    }

    #[test]
    fn test_polynomial_validation() {
        assert!(matches!(
            PolynomialFeatures::new(&Vec::<Vec<u32>>::new()),
            Err(ModelError::Empty { .. })
        ));
        assert!(matches!(
            PolynomialFeatures::new(&vec![vec![0u32, 1], vec![1]]),
            Err(ModelError::RaggedTable { .. })
        ));
        let poly = PolynomialFeatures::new(&[[0u32, 0, 0], [0, 1, 2]]).unwrap();
        assert_eq!(poly.n_input_features(), 3);
        assert_eq!(poly.n_output_features(), 2);
    }

    #[test]
    fn test_generate_without_bias() {
        let poly = PolynomialFeatures::generate(3, 2, false, false);
        assert_eq!(
            poly.powers,
            vec![
                vec![1, 0, 0],
                vec![0, 1, 0],
                vec![0, 0, 1],
                vec![2, 0, 0],
                vec![1, 1, 0],
                vec![1, 0, 1],
                vec![0, 2, 0],
                vec![0, 1, 1],
                vec![0, 0, 2],
            ]
        );
    }

    #[test]
    fn test_generate_interaction_only() {
        let poly = PolynomialFeatures::generate(3, 3, true, true);
        assert_eq!(
            poly.powers,
            vec![
                vec![0, 0, 0],
                vec![1, 0, 0],
                vec![0, 1, 0],
                vec![0, 0, 1],
                vec![1, 1, 0],
                vec![1, 0, 1],
                vec![0, 1, 1],
                vec![1, 1, 1],
            ]
        );
    }

    #[test]
    fn test_grid_search_best_estimator() {
        let search = GridSearch::new(linear());
        assert_eq!(search.best_estimator().unwrap().kind(), "LinearModel");

        let unrefitted = GridSearch {
            best_estimator: None,
        };
        assert_eq!(
            unrefitted.best_estimator(),
            Err(ModelError::MissingBestEstimator)
        );
    }

    #[test]
    fn test_display_tree() {
        colored::control::set_override(false);
        let model = Model::from(
            Pipeline::new([
                (
                    "poly",
                    Model::from(PolynomialFeatures::generate(2, 2, true, false)),
                ),
                (
                    "search",
                    Model::from(GridSearch::new(LinearModel::new(&[0.0; 6], 1.5).into())),
                ),
            ])
            .unwrap(),
        );
        assert_eq!(
            model.to_string(),
            "Pipeline\n  poly:\n    PolynomialFeatures (2 -> 6 features)\n  search:\n    \
             GridSearch\n      LinearModel (6 coefficients, intercept 1.5)\n"
        );
        assert_eq!(
            Model::unsupported("RandomForestRegressor").to_string(),
            "RandomForestRegressor (unsupported)\n"
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_model() {
        let json = r#"{
            "type": "pipeline",
            "steps": [
                {"name": "scaler", "estimator": {"type": "standard_scaler", "mean": [0.0], "scale": [1.0]}},
                {"name": "search", "estimator": {"type": "grid_search", "best_estimator":
                    {"type": "linear", "coefficients": [2.0], "intercept": 1.0}}},
                {"name": "forest", "estimator": {"type": "unsupported", "estimator": "RandomForestRegressor"}}
            ]
        }"#;
        let model: Model = serde_json::from_str(json).unwrap();
        let Model::Pipeline(pipeline) = &model else {
            panic!("expected a pipeline, got {}", model.kind());
        };
        assert_eq!(
            pipeline.step_names().collect::<Vec<_>>(),
            vec!["scaler", "search", "forest"]
        );
        assert_eq!(pipeline.steps[2].estimator.kind(), "RandomForestRegressor");
    }
}
