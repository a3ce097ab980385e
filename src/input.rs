//! Parsing of hand-typed numeric values.

use crate::errors::InputError;

/// Parse a decimal number written with either `.` or `,` as the separator.
///
/// Surrounding whitespace is ignored.
///
/// # Errors
///
/// Returns [`InputError::Empty`] for blank text and
/// [`InputError::NotANumber`] when the text is not a number.
///
/// # Examples
/// ```
/// use wishbone::parse_decimal;
///
/// assert_eq!(parse_decimal(" 12,5 "), Ok(12.5));
/// assert_eq!(parse_decimal("-0.25"), Ok(-0.25));
/// assert!(parse_decimal("twelve").is_err());
/// ```
pub fn parse_decimal(text: &str) -> Result<f64, InputError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(InputError::Empty);
    }
    trimmed
        .replace(',', ".")
        .parse::<f64>()
        .map_err(|_| InputError::NotANumber(trimmed.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_both_separators() {
        assert_eq!(parse_decimal("3.75"), Ok(3.75));
        assert_eq!(parse_decimal("3,75"), Ok(3.75));
        assert_eq!(parse_decimal("\t1200\n"), Ok(1200.0));
    }

    #[test]
    fn rejects_blank_and_garbage() {
        assert_eq!(parse_decimal("   "), Err(InputError::Empty));
        assert_eq!(parse_decimal("1,2,3"), Err(InputError::NotANumber("1,2,3".to_owned())));
        assert_eq!(parse_decimal("abc"), Err(InputError::NotANumber("abc".to_owned())));
    }
}
