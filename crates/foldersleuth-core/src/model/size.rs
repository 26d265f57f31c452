/// Display formatting for byte counts, item counts and shares.
///
/// All internal sizes are `u64` bytes. Floating point is only used
/// at the display-formatting boundary.

/// Binary units labelled with the short forms users expect (KB, MB, ...).
const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Format a byte count into a human-readable string.
///
/// Kilobytes and megabytes get one decimal, larger units two.
pub fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{bytes} B");
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let decimals = if unit <= 2 { 1 } else { 2 };
    format!("{value:.decimals$} {}", UNITS[unit])
}

/// Format a count with thousand separators.
pub fn format_count(count: u64) -> String {
    let digits = count.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// `part` as a percentage of `whole`, 0.0 when `whole` is zero.
pub fn percent_of(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}
