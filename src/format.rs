//! Text helpers for emitted SQF code.
//!
//! - `format_literal`: fixed scientific notation for numeric literals
//! - `normalize_signs`: collapses `+ -` and `- -` produced by joining signed terms
//! - `wrap`: greedy line wrapping on whitespace
//! - `wrap_units`: greedy line wrapping of pre-split units, for array elements
//!
//! All of them are pure functions of their input, so the emitted text never depends on the
//! host's float-to-string conversion or on any global state.

use itertools::Itertools;

/// Formats a number in scientific notation with `decimal_places` digits after the point.
///
/// The exponent always carries a sign and at least two digits (`1.500000e+00`,
/// `5.000000e-01`, `1.000000e+100`). Non-finite values are written as Rust prints them.
///
/// # Example
/// ```
/// use sqf_export::format::format_literal;
///
/// assert_eq!(format_literal(1.5, 6), "1.500000e+00");
/// assert_eq!(format_literal(-0.00125, 2), "-1.25e-03");
/// ```
pub fn format_literal(value: f64, decimal_places: usize) -> String {
    let text = format!("{value:.decimal_places$e}");
    match text.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => text,
    }
}

/// Collapses `+ -` into `- ` and `- -` into `+ `.
///
/// Applying it twice yields the same text as applying it once.
///
/// # Example
/// ```
/// use sqf_export::format::normalize_signs;
///
/// assert_eq!(normalize_signs("a + -1 + b"), "a - 1 + b");
/// assert_eq!(normalize_signs("(a - -1)"), "(a + 1)");
/// ```
pub fn normalize_signs(text: &str) -> String {
    text.replace("+ -", "- ").replace("- -", "+ ")
}

/// Greedily packs the whitespace-separated tokens of `text` into lines of at most `width`
/// characters.
///
/// Tokens are never split: one longer than `width` is placed on a line of its own. Because
/// only token boundaries are used, wrapping text that was already wrapped at the same width
/// (and rejoined with any whitespace) yields the same lines again.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    wrap_units(text.split_whitespace(), width)
}

/// Greedily packs `units` into lines of at most `width` characters, separated by one space.
///
/// Each unit is kept whole even if it contains spaces itself, so a line break only ever
/// falls between two units.
///
/// # Example
/// ```
/// use sqf_export::format::wrap_units;
///
/// let lines = wrap_units(["(a - 1) / 2,", "(b - 3) / 4]"], 16);
/// assert_eq!(lines, vec!["(a - 1) / 2,", "(b - 3) / 4]"]);
/// ```
pub fn wrap_units<I, S>(units: I, width: usize) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut lines = Vec::new();
    let mut line = String::new();
    for unit in units {
        let unit = unit.as_ref();
        if line.is_empty() {
            line.push_str(unit);
        } else if line.chars().count() + 1 + unit.chars().count() <= width {
            line.push(' ');
            line.push_str(unit);
        } else {
            lines.push(std::mem::take(&mut line));
            line.push_str(unit);
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Wraps `text` to `width` and joins the lines with a newline followed by `indent`.
pub(crate) fn wrap_indented(text: &str, width: usize, indent: &str) -> String {
    wrap(text, width).iter().join(&format!("\n{indent}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_literal() {
        assert_eq!(format_literal(2.0, 6), "2.000000e+00");
        assert_eq!(format_literal(4.0, 6), "4.000000e+00");
        assert_eq!(format_literal(0.5, 6), "5.000000e-01");
        assert_eq!(format_literal(-2.0, 6), "-2.000000e+00");
        assert_eq!(format_literal(0.0, 3), "0.000e+00");
        assert_eq!(format_literal(123456.0, 2), "1.23e+05");
        assert_eq!(format_literal(1e100, 1), "1.0e+100");
        assert_eq!(format_literal(1e-7, 0), "1e-07");
    }

    #[test]
    fn test_format_literal_non_finite() {
        assert_eq!(format_literal(f64::INFINITY, 6), "inf");
        assert_eq!(format_literal(f64::NAN, 6), "NaN");
    }

    #[test]
    fn test_normalize_signs_idempotent() {
        let text = "1.0e+00*(_this#0) + -2.0e+00*(_this#1) + 5.0e-01";
        let once = normalize_signs(text);
        assert_eq!(once, "1.0e+00*(_this#0) - 2.0e+00*(_this#1) + 5.0e-01");
        assert_eq!(normalize_signs(&once), once);
    }

    #[test]
    fn test_wrap_greedy() {
        let lines = wrap("aaa bbb ccc dd", 7);
        assert_eq!(lines, vec!["aaa bbb", "ccc dd"]);
    }

    #[test]
    fn test_wrap_keeps_long_tokens_whole() {
        let lines = wrap("(_this#0)*(_this#1)^2, 1", 5);
        assert_eq!(lines, vec!["(_this#0)*(_this#1)^2,", "1"]);
    }

    #[test]
    fn test_wrap_units_keeps_inner_spaces() {
        let units = [
            "((_this#0) - 1.0e+00) / 2.0e+00,",
            "((_this#1) - 3.0e+00) / 4.0e+00,",
            "(_this#2)]",
        ];
        let lines = wrap_units(units, 50);
        assert_eq!(
            lines,
            vec![
                "((_this#0) - 1.0e+00) / 2.0e+00,",
                "((_this#1) - 3.0e+00) / 4.0e+00, (_this#2)]"
            ]
        );
        assert!(wrap_units(Vec::<String>::new(), 10).is_empty());
    }

    #[test]
    fn test_wrap_empty() {
        assert!(wrap("", 10).is_empty());
        assert!(wrap("   ", 10).is_empty());
    }

    #[test]
    fn test_wrap_idempotent() {
        let text = (0..40)
            .map(|i| format!("{}*(_this#{i})", format_literal(i as f64 * 0.37, 6)))
            .join(" + ");
        let once = wrap_indented(&text, 36, "    ");
        let twice = wrap_indented(&once, 36, "    ");
        assert_eq!(once, twice);
        assert!(once.lines().all(|line| line.trim_start().len() <= 36));
    }
}
