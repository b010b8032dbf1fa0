/// Prints the range of a corrected series and how many samples it holds.
pub fn print_series_statistics(name: &str, floor: f64, values: &[f64]) {
    let valid_values: Vec<f64> = values.iter().filter(|v| !v.is_nan()).cloned().collect();
    let zeroed = valid_values.iter().filter(|&&v| v == 0.0).count();

    println!("{} - dark count: {:.6}", name, floor);

    if valid_values.is_empty() {
        println!("  No valid samples");
        return;
    }

    println!(
        "  Min: {:.6}",
        valid_values.iter().fold(f64::INFINITY, |a, &b| a.min(b))
    );
    println!(
        "  Max: {:.6}",
        valid_values.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b))
    );
    println!(
        "  Mean: {:.6}",
        valid_values.iter().sum::<f64>() / valid_values.len() as f64
    );
    println!(
        "  Valid samples: {} / {} ({:.1}%), clamped to zero: {}",
        valid_values.len(),
        values.len(),
        100.0 * valid_values.len() as f64 / values.len() as f64,
        zeroed
    );
}
