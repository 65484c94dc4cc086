//! Conversion of leaf estimators into SQF function bodies.
//!
//! Each leaf kind of [`crate::model::Model`] turns into one [`Body`]:
//!
//! - Polynomial features → an array of monomials, one per exponent table row
//! - Standard scaler → an array of `(x_i - mean_i) / scale_i`
//! - Linear model → a sum of `coef_i * x_i` terms plus the intercept
//!
//! The fitted parameters are validated first, so a body is only built from consistent data.

use log::trace;

use crate::{
    errors::ModelError,
    expr::Expr,
    model::{LinearModel, PolynomialFeatures, StandardScaler},
    program::Body,
};

/// Builds the monomial array of a polynomial expansion.
///
/// For each row of the exponent table, every column with exponent 1 contributes the bare
/// input, every column with a higher exponent contributes the input raised to it, and
/// columns with exponent 0 contribute nothing. A row without any factor is the bias
/// term `1`.
pub fn polynomial_body(poly: &PolynomialFeatures) -> Result<Body, ModelError> {
    poly.validate()?;
    trace!(
        "polynomial features: {} -> {}",
        poly.n_input_features(),
        poly.n_output_features()
    );
    let terms = poly
        .powers
        .iter()
        .map(|row| {
            let factors: Vec<Expr> = row
                .iter()
                .enumerate()
                .filter_map(|(column, &power)| {
                    let input = Expr::Input(column as u32);
                    match power {
                        0 => None,
                        1 => Some(input),
                        _ => Some(Expr::Pow(Box::new(input), power)),
                    }
                })
                .collect();
            if factors.is_empty() {
                Expr::Int(1)
            } else {
                Expr::Product(factors)
            }
        })
        .collect();
    Ok(Body::Vector(terms))
}

/// Builds the standardized array `((_this#i) - mean_i) / scale_i`.
///
/// A zero scale is emitted as is.
pub fn scaler_body(scaler: &StandardScaler) -> Result<Body, ModelError> {
    scaler.validate()?;
    trace!("standard scaler: {} features", scaler.mean.len());
    let terms = scaler
        .mean
        .iter()
        .zip(&scaler.scale)
        .enumerate()
        .map(|(i, (&mean, &scale))| {
            Expr::Div(
                Box::new(Expr::Sub(
                    Box::new(Expr::Input(i as u32)),
                    Box::new(Expr::Const(mean)),
                )),
                Box::new(Expr::Const(scale)),
            )
        })
        .collect();
    Ok(Body::Vector(terms))
}

/// Builds the weighted sum of a linear model.
///
/// Terms with a coefficient of exactly zero are left out; the intercept is always the last
/// term.
pub fn linear_body(linear: &LinearModel) -> Result<Body, ModelError> {
    let mut terms: Vec<Expr> = linear
        .coefficients
        .iter()
        .enumerate()
        .filter(|&(_, &coef)| coef != 0.0)
        .map(|(i, &coef)| Expr::Product(vec![Expr::Const(coef), Expr::Input(i as u32)]))
        .collect();
    trace!(
        "linear model: {} of {} coefficients non-zero",
        terms.len(),
        linear.coefficients.len()
    );
    terms.push(Expr::Const(linear.intercept));
    Ok(Body::Scalar(Expr::Sum(terms)))
}
