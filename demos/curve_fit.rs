use downhill::{from_fn, NelderMead, NelderMeadOptions};

// Noise-free samples of y = 2.5 * exp(-1.3 * t) + 0.4.
fn samples() -> Vec<(f64, f64)> {
    (0..20)
        .map(|i| {
            let t = i as f64 * 0.25;
            (t, 2.5 * (-1.3 * t).exp() + 0.4)
        })
        .collect()
}

fn main() -> Result<(), String> {
    let data = samples();

    // Sum of squared residuals of the model a * exp(-k * t) + c.
    let f = from_fn(|p: &[f64]| {
        data.iter()
            .map(|(t, y)| (p[0] * (-p[1] * t).exp() + p[2] - y).powi(2))
            .sum::<f64>()
    });

    let mut options = NelderMeadOptions::default();
    options
        .set_function_tolerance(1e-12)
        .set_max_evaluations(20_000);

    let minimum = NelderMead::with_options(&f, options)
        .minimize_from_point_with_deltas(&f, &[1.0, 1.0, 0.0], &[0.5, 0.5, 0.1])
        .map_err(|error| format!("{error}"))?;

    let x = minimum.x();
    println!(
        "a = {:.6}\tk = {:.6}\tc = {:.6}\tresidual = {:e}\tevaluations = {}",
        x[0],
        x[1],
        x[2],
        minimum.value(),
        minimum.evaluations()
    );

    Ok(())
}
