//! Computed CSS length resolution.
//!
//! Hosts report `min-width`/`max-width` (or the height pair) as computed
//! style strings. Widths are always pixels once computed, but the min/max
//! properties keep percentages, so they are resolved here against the
//! container's main-axis length.

/// Parse the leading decimal number of `text`, ignoring any unit suffix.
fn leading_number(text: &str) -> Option<f64> {
    let bytes = text.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let digits_start = end;
    while end < bytes.len() && (bytes[end].is_ascii_digit() || bytes[end] == b'.') {
        end += 1;
    }
    if end < bytes.len()
        && end > digits_start
        && matches!(bytes[end], b'e' | b'E')
        && bytes
            .get(end + 1)
            .is_some_and(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-'))
    {
        let mut exp_end = end + 1;
        if matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits {
            end = exp_end;
        }
    }
    text[..end].parse().ok()
}

/// Resolve a computed length (`"12px"`, `"12"`, `"30%"`) to pixels.
///
/// Percentages resolve against `container_size`. Keywords and unparsable
/// values yield `None`.
#[must_use]
pub fn resolve_length(value: &str, container_size: f64) -> Option<f64> {
    let value = value.trim();
    if let Some(percentage) = value.strip_suffix('%') {
        let percentage: f64 = percentage.trim().parse().ok()?;
        return Some(percentage / 100.0 * container_size);
    }
    leading_number(value).filter(|pixels| pixels.is_finite())
}

/// Resolve a computed `min-width`/`min-height`. `auto` and anything
/// unparsable resolve to zero.
#[must_use]
pub fn resolve_min_length(value: &str, container_size: f64) -> f64 {
    resolve_length(value, container_size).map_or(0.0, |pixels| pixels.max(0.0))
}

/// Resolve a computed `max-width`/`max-height`. `none`, `auto` and anything
/// unparsable resolve to `f64::INFINITY`.
#[must_use]
pub fn resolve_max_length(value: &str, container_size: f64) -> f64 {
    match value.trim() {
        "none" | "auto" | "" => f64::INFINITY,
        other => resolve_length(other, container_size).unwrap_or(f64::INFINITY),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixels_and_bare_numbers() {
        assert_eq!(resolve_length("120px", 1000.0), Some(120.0));
        assert_eq!(resolve_length("12.5", 1000.0), Some(12.5));
        assert_eq!(resolve_length(" 0px ", 1000.0), Some(0.0));
    }

    #[test]
    fn percentages_resolve_against_container() {
        assert_eq!(resolve_length("20%", 1000.0), Some(200.0));
        assert_eq!(resolve_length("40%", 500.0), Some(200.0));
    }

    #[test]
    fn keywords_are_not_lengths() {
        assert_eq!(resolve_length("none", 1000.0), None);
        assert_eq!(resolve_length("auto", 1000.0), None);
        assert_eq!(resolve_length("px", 1000.0), None);
    }

    #[test]
    fn exponent_forms_parse() {
        assert_eq!(resolve_length("1e2px", 0.0), Some(100.0));
        assert_eq!(resolve_length("2em", 0.0), Some(2.0));
    }

    #[test]
    fn min_defaults_to_zero() {
        assert_eq!(resolve_min_length("auto", 1000.0), 0.0);
        assert_eq!(resolve_min_length("garbage", 1000.0), 0.0);
        assert_eq!(resolve_min_length("-5px", 1000.0), 0.0);
        assert_eq!(resolve_min_length("20%", 1000.0), 200.0);
    }

    #[test]
    fn max_defaults_to_unbounded() {
        assert_eq!(resolve_max_length("none", 1000.0), f64::INFINITY);
        assert_eq!(resolve_max_length("auto", 1000.0), f64::INFINITY);
        assert_eq!(resolve_max_length("40%", 1000.0), 400.0);
        assert_eq!(resolve_max_length("300px", 1000.0), 300.0);
    }
}
