use crate::limits::MIN_TIME_LIMIT_SECS;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

// Compiled regexes for time limit parsing
static TIME_MIN_SEC_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+)m\s*(\d+)s$").unwrap());
static TIME_COLON_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+):(\d+)$").unwrap());
static TIME_SEC_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+)s$").unwrap());

/// Reasons a time limit field can be rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeLimitError {
    #[error("Time limit cannot be empty")]
    EmptyInput,
    #[error("Invalid time limit format. Use: 120, 2:00, 2m0s or 120s")]
    InvalidFormat,
    #[error("Invalid seconds: {0} (must be 0-59)")]
    InvalidSeconds(u32),
    #[error("Time limit must be at least {min} second(s), got {value}")]
    TooShort { value: u32, min: u32 },
}

/// Parse a time limit to whole seconds. Any positive value is accepted.
///
/// Supported formats:
/// - Pure number: "120" (seconds)
/// - Colon format: "2:00" (minutes:seconds)
/// - Minutes and seconds: "2m 0s" or "2m0s"
/// - Seconds only: "120s"
///
/// # Examples
/// ```
/// use mental_math::utils::parse_time_limit;
/// assert_eq!(parse_time_limit("120"), Ok(120));
/// assert_eq!(parse_time_limit("2:00"), Ok(120));
/// assert_eq!(parse_time_limit("2m0s"), Ok(120));
/// assert_eq!(parse_time_limit("120s"), Ok(120));
/// ```
pub fn parse_time_limit(input: &str) -> Result<u32, TimeLimitError> {
    if input.is_empty() {
        return Err(TimeLimitError::EmptyInput);
    }

    let secs = if let Ok(secs) = input.parse::<u32>() {
        secs
    } else if let Some(captures) = TIME_COLON_REGEX
        .captures(input)
        .or_else(|| TIME_MIN_SEC_REGEX.captures(input))
    {
        let minutes: u32 = captures[1].parse().map_err(|_| TimeLimitError::InvalidFormat)?;
        let seconds: u32 = captures[2].parse().map_err(|_| TimeLimitError::InvalidFormat)?;
        if seconds > 59 {
            return Err(TimeLimitError::InvalidSeconds(seconds));
        }
        minutes
            .checked_mul(60)
            .and_then(|m| m.checked_add(seconds))
            .ok_or(TimeLimitError::InvalidFormat)?
    } else if let Some(captures) = TIME_SEC_REGEX.captures(input) {
        captures[1].parse().map_err(|_| TimeLimitError::InvalidFormat)?
    } else {
        return Err(TimeLimitError::InvalidFormat);
    };

    if secs < MIN_TIME_LIMIT_SECS {
        return Err(TimeLimitError::TooShort {
            value: secs,
            min: MIN_TIME_LIMIT_SECS,
        });
    }
    Ok(secs)
}

/// Parse one operand bound field as a whole number, exactly as typed.
///
/// Surrounding whitespace, decimals and anything else `i32` cannot parse are
/// rejected rather than coerced.
pub fn parse_operand(input: &str, field_name: &str) -> Result<i32, String> {
    if input.is_empty() {
        return Err(format!("{} cannot be empty", field_name));
    }
    input
        .parse::<i32>()
        .map_err(|_| format!("{} must be a whole number, got '{}'", field_name, input))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_limit_formats() {
        assert_eq!(parse_time_limit("120"), Ok(120));
        assert_eq!(parse_time_limit("1:30"), Ok(90));
        assert_eq!(parse_time_limit("1m 30s"), Ok(90));
        assert_eq!(parse_time_limit("90s"), Ok(90));
    }

    #[test]
    fn test_long_time_limits_accepted() {
        assert_eq!(parse_time_limit("7200"), Ok(7_200));
        assert_eq!(parse_time_limit("61:00"), Ok(3_660));
        assert_eq!(parse_time_limit("90m 0s"), Ok(5_400));
    }

    #[test]
    fn test_time_limit_rejections() {
        assert_eq!(parse_time_limit(""), Err(TimeLimitError::EmptyInput));
        assert_eq!(parse_time_limit("ten"), Err(TimeLimitError::InvalidFormat));
        assert_eq!(parse_time_limit("1.5"), Err(TimeLimitError::InvalidFormat));
        assert_eq!(parse_time_limit("-5"), Err(TimeLimitError::InvalidFormat));
        assert_eq!(parse_time_limit(" 45 "), Err(TimeLimitError::InvalidFormat));
        assert_eq!(parse_time_limit("1:75"), Err(TimeLimitError::InvalidSeconds(75)));
        assert_eq!(
            parse_time_limit("0"),
            Err(TimeLimitError::TooShort { value: 0, min: 1 })
        );
    }

    #[test]
    fn test_operand_parsing() {
        assert_eq!(parse_operand("12", "Left min"), Ok(12));
        assert_eq!(parse_operand("-4", "Left min"), Ok(-4));
        assert_eq!(
            parse_operand("", "Left min"),
            Err("Left min cannot be empty".to_string())
        );
        assert_eq!(
            parse_operand("4.5", "Left min"),
            Err("Left min must be a whole number, got '4.5'".to_string())
        );
    }

    #[test]
    fn test_operand_whitespace_not_coerced() {
        assert_eq!(
            parse_operand(" 5", "Left min"),
            Err("Left min must be a whole number, got ' 5'".to_string())
        );
        assert_eq!(
            parse_operand("5 ", "Left min"),
            Err("Left min must be a whole number, got '5 '".to_string())
        );
        assert!(parse_operand(" ", "Left min").is_err());
    }
}
