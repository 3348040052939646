/// Rounds `value` to `decimals` places, halves away from zero.
///
/// Rounding works on the shortest decimal form of the value, the one `{}`
/// prints, so `1.005` rounds to `1.01` and `0.004999999999` to `0.0` as
/// decimal arithmetic would.
pub fn round_to(value: f64, decimals: usize) -> f64 {
    if !value.is_finite() {
        return value;
    }

    let repr = format!("{}", value.abs());
    let (whole, fraction) = repr.split_once('.').unwrap_or((repr.as_str(), ""));
    if fraction.len() <= decimals {
        return value;
    }

    let kept = &fraction[..decimals];
    let round_up = fraction.as_bytes()[decimals] >= b'5';

    let Ok(mut scaled) = format!("{whole}{kept}").parse::<f64>() else {
        return value;
    };
    if round_up {
        scaled += 1.0;
    }

    value.signum() * scaled / 10f64.powi(decimals as i32)
}

/// Mean of a running sum, rounded to 2 decimals. NaN when `count` is zero.
pub fn average(sum: f64, count: u64) -> f64 {
    if count == 0 {
        return f64::NAN;
    }
    round_to(sum / count as f64, 2)
}

/// Turns a free-form label into a stable key: uppercase, with spaces and
/// slashes replaced by underscores.
pub fn normalize_label(label: &str) -> String {
    label.to_uppercase().replace([' ', '/'], "_")
}

/// Normalizes a list of labels, keeping the first label seen for each key.
pub fn normalize_labels<S: AsRef<str>>(labels: &[S]) -> Vec<(String, String)> {
    let mut out: Vec<(String, String)> = Vec::new();
    for label in labels {
        let key = normalize_label(label.as_ref());
        if !out.iter().any(|(k, _)| *k == key) {
            out.push((key, label.as_ref().to_string()));
        }
    }
    out
}
