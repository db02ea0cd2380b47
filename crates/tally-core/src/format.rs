//! Display formatting — thousands grouping for on-screen numbers.
//!
//! Formatting works on operand *text*, not on floats: `0.` and `0.50`
//! must render exactly as typed. The integer portion is grouped in threes
//! with a separator; the fractional portion is appended verbatim after
//! the decimal point, never grouped.

/// Longest fractional part that is rendered; further digits are cut off.
pub const MAX_FRACTION_DIGITS: usize = 20;

/// The separator used when no locale preference is known.
pub const DEFAULT_SEPARATOR: char = ',';

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

/// Format operand text for display.
///
/// The integer portion is grouped in threes with `separator`; the
/// fractional portion (if any) follows the `.` verbatim, truncated at
/// [`MAX_FRACTION_DIGITS`]. Empty text stays empty. The canonical
/// non-finite forms render as `∞`, `-∞`, and `NaN`.
#[must_use]
pub fn display_operand(text: &str, separator: char) -> String {
    match text {
        "" => return String::new(),
        "inf" => return "∞".to_string(),
        "-inf" => return "-∞".to_string(),
        "NaN" => return "NaN".to_string(),
        _ => {}
    }

    match text.split_once('.') {
        None => group_integer(text, separator),
        Some((integer, fraction)) => {
            let fraction = &fraction[..fraction.len().min(MAX_FRACTION_DIGITS)];
            format!("{}.{fraction}", group_integer(integer, separator))
        }
    }
}

/// Format an optional value for display.
///
/// An absent value formats as the empty string — a cleared secondary
/// operand leaves its display region blank.
#[must_use]
pub fn display_value(value: Option<f64>, separator: char) -> String {
    value.map_or_else(String::new, |v| display_operand(&v.to_string(), separator))
}

/// Group an integer's digits in threes, preserving a leading sign.
///
/// Anything that is not a plain (optionally signed) digit run is returned
/// untouched — grouping only ever applies to text this crate produced.
fn group_integer(text: &str, separator: char) -> String {
    let (sign, digits) = text
        .strip_prefix('-')
        .map_or(("", text), |rest| ("-", rest));

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len() + digits.len() / 3);
    out.push_str(sign);
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(digit);
    }
    out
}

// ---------------------------------------------------------------------------
// Locale
// ---------------------------------------------------------------------------

/// The thousands separator for the ambient locale.
///
/// Reads `LC_ALL`, `LC_NUMERIC`, then `LANG` (the POSIX precedence order)
/// and falls back to [`DEFAULT_SEPARATOR`] when none is set. Only the
/// separator is localized; the decimal point is always `.`.
#[must_use]
pub fn locale_separator() -> char {
    ["LC_ALL", "LC_NUMERIC", "LANG"]
        .into_iter()
        .find_map(|name| std::env::var(name).ok().filter(|v| !v.is_empty()))
        .map_or(DEFAULT_SEPARATOR, |locale| separator_for_locale(&locale))
}

/// The thousands separator for a locale string like `de_DE.UTF-8`.
///
/// Comma-grouping locales keep `,`. Everything else groups with a space:
/// most of those locales natively group with `.` or a narrow space, and a
/// plain space avoids colliding with the fixed `.` decimal point.
#[must_use]
pub fn separator_for_locale(locale: &str) -> char {
    let language = locale
        .split(['_', '.', '-', '@'])
        .next()
        .unwrap_or("")
        .to_ascii_lowercase();

    match language.as_str() {
        "" | "c" | "posix" | "en" | "ja" | "ko" | "zh" | "he" | "th" => DEFAULT_SEPARATOR,
        _ => ' ',
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // -- Integer grouping ---------------------------------------------------

    #[test]
    fn small_integers_are_untouched() {
        assert_eq!(display_operand("0", ','), "0");
        assert_eq!(display_operand("999", ','), "999");
    }

    #[test]
    fn thousands_are_grouped() {
        assert_eq!(display_operand("1000", ','), "1,000");
        assert_eq!(display_operand("1234567", ','), "1,234,567");
    }

    #[test]
    fn negative_numbers_keep_the_sign_ungrouped() {
        assert_eq!(display_operand("-1234", ','), "-1,234");
        assert_eq!(display_operand("-999", ','), "-999");
    }

    #[test]
    fn alternate_separator() {
        assert_eq!(display_operand("1234567", ' '), "1 234 567");
    }

    // -- Fractions ----------------------------------------------------------

    #[test]
    fn fraction_is_verbatim_and_ungrouped() {
        assert_eq!(display_operand("1234.56789", ','), "1,234.56789");
    }

    #[test]
    fn trailing_point_is_preserved() {
        assert_eq!(display_operand("0.", ','), "0.");
    }

    #[test]
    fn trailing_zeros_are_preserved() {
        assert_eq!(display_operand("1.500", ','), "1.500");
    }

    #[test]
    fn fraction_is_cut_at_twenty_digits() {
        let text = format!("1.{}", "9".repeat(30));
        let shown = display_operand(&text, ',');
        assert_eq!(shown, format!("1.{}", "9".repeat(20)));
    }

    // -- Special values -----------------------------------------------------

    #[test]
    fn empty_text_stays_empty() {
        assert_eq!(display_operand("", ','), "");
    }

    #[test]
    fn non_finite_forms() {
        assert_eq!(display_operand("inf", ','), "∞");
        assert_eq!(display_operand("-inf", ','), "-∞");
        assert_eq!(display_operand("NaN", ','), "NaN");
    }

    // -- display_value ------------------------------------------------------

    #[test]
    fn absent_value_is_blank() {
        assert_eq!(display_value(None, ','), "");
    }

    #[test]
    fn present_value_is_grouped() {
        assert_eq!(display_value(Some(1_234_567.0), ','), "1,234,567");
        assert_eq!(display_value(Some(0.5), ','), "0.5");
    }

    #[test]
    fn infinite_value_renders_as_infinity_sign() {
        assert_eq!(display_value(Some(f64::INFINITY), ','), "∞");
    }

    // -- Locale -------------------------------------------------------------

    #[test]
    fn comma_locales() {
        assert_eq!(separator_for_locale("en_US.UTF-8"), ',');
        assert_eq!(separator_for_locale("C"), ',');
        assert_eq!(separator_for_locale("POSIX"), ',');
        assert_eq!(separator_for_locale("ja_JP.UTF-8"), ',');
    }

    #[test]
    fn space_locales() {
        assert_eq!(separator_for_locale("de_DE.UTF-8"), ' ');
        assert_eq!(separator_for_locale("fr_FR"), ' ');
        assert_eq!(separator_for_locale("sv-SE"), ' ');
    }
}
