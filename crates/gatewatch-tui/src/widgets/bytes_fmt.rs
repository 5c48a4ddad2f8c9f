//! Human-readable byte formatting helpers.

/// Unit scale for [`format_bytes`]. Values past the last slot clamp to it
/// (scale exhaustion) -- a counter that large renders as a huge TB figure
/// rather than panicking.
const UNITS: &[&str] = &["Bytes", "KB", "MB", "GB", "TB"];

/// Format a byte count with adaptive 1024-based units: `0` -> "0 Bytes",
/// `1024` -> "1 KB", `1536` -> "1.5 KB".
///
/// The value is rounded to `decimals` fractional digits and trailing
/// zeros are trimmed, so whole values print without a fraction.
#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
pub fn format_bytes(bytes: u64, decimals: usize) -> String {
    if bytes == 0 {
        return "0 Bytes".into();
    }

    // floor(log1024(bytes)) in integer math, clamped to the unit table.
    let idx = ((bytes.ilog2() / 10) as usize).min(UNITS.len() - 1);
    #[allow(clippy::cast_possible_truncation)]
    let scaled = bytes as f64 / 1024f64.powi(idx as i32);

    let formatted = format!("{scaled:.decimals$}");
    let trimmed = if formatted.contains('.') {
        formatted.trim_end_matches('0').trim_end_matches('.')
    } else {
        formatted.as_str()
    };
    format!("{trimmed} {}", UNITS[idx])
}

/// Fixed two-decimal megabyte rendering for table cells: `1048576` ->
/// "1.00 MB". Uniform units scan better in a column than adaptive ones.
#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
pub fn fmt_mb(bytes: u64) -> String {
    format!("{:.2} MB", bytes as f64 / 1024.0 / 1024.0)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn zero_is_a_literal() {
        assert_eq!(format_bytes(0, 2), "0 Bytes");
    }

    #[test]
    fn unit_boundaries() {
        assert_eq!(format_bytes(1023, 2), "1023 Bytes");
        assert_eq!(format_bytes(1024, 2), "1 KB");
        assert_eq!(format_bytes(1_048_576, 2), "1 MB");
    }

    #[test]
    fn fractions_are_trimmed_not_padded() {
        assert_eq!(format_bytes(1536, 2), "1.5 KB");
        assert_eq!(format_bytes(1536, 0), "2 KB");
        assert_eq!(format_bytes(1_572_864, 2), "1.5 MB");
    }

    #[test]
    fn scale_exhaustion_clamps_to_the_largest_unit() {
        assert!(format_bytes(1 << 62, 2).ends_with(" TB"));
        // Must not panic anywhere in the representable range.
        assert!(format_bytes(u64::MAX, 2).ends_with(" TB"));
    }

    #[test]
    fn table_cells_use_fixed_two_decimal_megabytes() {
        assert_eq!(fmt_mb(1_048_576), "1.00 MB");
        assert_eq!(fmt_mb(524_288), "0.50 MB");
        assert_eq!(fmt_mb(0), "0.00 MB");
    }
}
