//! Display strings handed to the renderer.

/// Passive rate with K/M/B suffix compression, two decimals.
pub fn format_rate(per_hour: u64) -> String {
    let n = per_hour as f64;
    if per_hour >= 1_000_000_000 {
        format!("+{:.2}B", n / 1e9)
    } else if per_hour >= 1_000_000 {
        format!("+{:.2}M", n / 1e6)
    } else if per_hour >= 1_000 {
        format!("+{:.2}K", n / 1e3)
    } else {
        format!("+{per_hour}")
    }
}

/// Point total with comma thousands separators.
pub fn format_points(points: u64) -> String {
    let digits = points.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
