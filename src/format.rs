// Display formatting and duration parsing

use crate::errors::{EarnError, Result};

/// Format whole seconds as HH:MM:SS. Hours keep growing past 24.
pub fn format_elapsed(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

/// Format an amount with a currency symbol and fixed decimals
pub fn format_amount(amount: f64, currency: &str, decimals: u8) -> String {
    format!("{}{:.*}", currency, usize::from(decimals), amount)
}

/// Parse a duration given as plain seconds, MM:SS or HH:MM:SS
pub fn parse_duration_secs(input: &str) -> Result<u64> {
    let input = input.trim();
    if input.is_empty() {
        return Err(EarnError::InvalidInput("empty duration".to_string()));
    }

    let parts: Vec<&str> = input.split(':').collect();
    if parts.len() > 3 {
        return Err(EarnError::InvalidInput(format!(
            "Invalid duration '{}'. Expected SECONDS, MM:SS or HH:MM:SS",
            input
        )));
    }

    let mut fields = Vec::with_capacity(parts.len());
    for part in &parts {
        let value: u64 = part.trim().parse().map_err(|_| {
            EarnError::InvalidInput(format!("Invalid duration component '{}' in '{}'", part, input))
        })?;
        fields.push(value);
    }

    // Only the leading field may exceed its usual range
    if fields.len() > 1 && fields[1..].iter().any(|&v| v >= 60) {
        return Err(EarnError::InvalidInput(format!(
            "Minutes and seconds must be below 60 in '{}'",
            input
        )));
    }

    let total = fields
        .iter()
        .try_fold(0u64, |acc, &v| acc.checked_mul(60)?.checked_add(v))
        .ok_or_else(|| EarnError::InvalidInput(format!("Duration '{}' is too large", input)))?;

    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(0), "00:00:00");
        assert_eq!(format_elapsed(59), "00:00:59");
        assert_eq!(format_elapsed(3661), "01:01:01");
        assert_eq!(format_elapsed(86_400), "24:00:00");
        assert_eq!(format_elapsed(30 * 3600), "30:00:00");
        assert_eq!(format_elapsed(100 * 3600 + 5), "100:00:05");
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(16.666_666, "$", 2), "$16.67");
        assert_eq!(format_amount(0.0, "€", 2), "€0.00");
        assert_eq!(format_amount(20_000.0, "", 0), "20000");
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration_secs("90").unwrap(), 90);
        assert_eq!(parse_duration_secs("01:30").unwrap(), 90);
        assert_eq!(parse_duration_secs("08:00:00").unwrap(), 28_800);
        assert_eq!(parse_duration_secs(" 30:00:00 ").unwrap(), 108_000);
    }

    #[test]
    fn test_parse_duration_rejects_garbage() {
        assert!(parse_duration_secs("").is_err());
        assert!(parse_duration_secs("abc").is_err());
        assert!(parse_duration_secs("-5").is_err());
        assert!(parse_duration_secs("1:2:3:4").is_err());
        assert!(parse_duration_secs("00:75:00").is_err());
    }
}
