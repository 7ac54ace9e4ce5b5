//! Formatting helpers for report output.

const SI_POSTFIX: [&str; 7] = ["", "K", "M", "G", "T", "P", "E"];

/// Formats `n` with base-1000 SI postfixes (K, M, G, ...). Values that
/// reduce to a single digit keep one decimal.
#[must_use]
pub fn to_si(n: u64) -> String {
    with_base(n as f64, 1000.0)
}

/// Formats `n` as a byte count with base-1024 postfixes, e.g. "2.3MB".
#[must_use]
pub fn to_si_bytes(n: u64) -> String {
    format!("{}B", with_base(n as f64, 1024.0))
}

fn with_base(mut value: f64, base: f64) -> String {
    let mut magnitude = 0;
    while value >= base && magnitude + 1 < SI_POSTFIX.len() {
        value /= base;
        magnitude += 1;
    }
    if magnitude == 0 {
        format!("{value:.0}")
    } else if value >= 9.95 {
        format!("{:.0}{}", value, SI_POSTFIX[magnitude])
    } else {
        format!("{:.1}{}", value, SI_POSTFIX[magnitude])
    }
}
