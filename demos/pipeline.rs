//! Exports a small polynomial regression pipeline and checks the compiled program against a
//! prediction computed by hand.
//!
//! Run with: `cargo run --example pipeline`

use sqf_export::prelude::*;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // y = 0.5 + 1.5*a - 2*b + 0.75*a*b, with a, b the standardized inputs
    let model = Model::from(Pipeline::new([
        (
            "scaler",
            Model::from(StandardScaler::new(&[10.0, 2.0], &[5.0, 0.5])?),
        ),
        (
            "poly",
            Model::from(PolynomialFeatures::generate(2, 2, true, true)),
        ),
        (
            "ridge",
            Model::from(GridSearch::new(Model::from(LinearModel::new(
                &[0.0, 1.5, -2.0, 0.75],
                0.5,
            )))),
        ),
    ])?);

    println!("{model}");

    let config = ExportConfig::default();
    let code = export_estimator(&model, "TAG_fnc_predict", &config)?;
    println!("{code}");

    let input = [12.0, 1.0];
    let (a, b) = ((input[0] - 10.0) / 5.0, (input[1] - 2.0) / 0.5);
    let expected = 0.5 + 1.5 * a - 2.0 * b + 0.75 * a * b;

    let program = compile(&model, "TAG_fnc_predict")?;
    let got = program.eval(&Value::Vector(input.to_vec()))?;
    println!("prediction for {input:?}: {got:?} (expected {expected})");

    Ok(())
}
