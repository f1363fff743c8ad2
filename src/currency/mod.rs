//! Rendering and parsing of money held as integer minor units.

use crate::errors::{Result, SchoolError};
use crate::fees::MAX_AMOUNT;

pub fn symbol_for(code: &str) -> &str {
    match code {
        "NGN" => "₦",
        "GHS" => "GH₵",
        "KES" => "KSh",
        "USD" => "$",
        "GBP" => "£",
        "EUR" => "€",
        _ => code,
    }
}

pub fn minor_units_for(code: &str) -> u32 {
    match code {
        "JPY" | "UGX" => 0,
        "KWD" | "BHD" => 3,
        _ => 2,
    }
}

/// Formats `amount` minor units as `₦185,000.00`; negatives get a leading sign.
pub fn format_amount(amount: i64, code: &str) -> String {
    let precision = minor_units_for(code);
    let scale = 10_i64.pow(precision);
    let magnitude = amount.unsigned_abs();
    let whole = group_digits(&(magnitude / scale as u64).to_string(), ',');
    let body = if precision == 0 {
        whole
    } else {
        format!(
            "{}.{:0width$}",
            whole,
            magnitude % scale as u64,
            width = precision as usize
        )
    };
    let sign = if amount < 0 { "-" } else { "" };
    format!("{}{}{}", sign, symbol_for(code), body)
}

/// Parses user text such as `185000`, `185,000.5` or `₦1,200.75` into minor units.
/// Amounts above [`MAX_AMOUNT`] minor units are rejected.
pub fn parse_amount(text: &str, code: &str) -> Result<i64> {
    let precision = minor_units_for(code) as usize;
    let cleaned: String = text
        .trim()
        .trim_start_matches(symbol_for(code))
        .chars()
        .filter(|c| *c != ',' && *c != '_')
        .collect();
    let invalid = || SchoolError::InvalidInput(format!("`{}` is not a valid amount", text.trim()));
    if cleaned.is_empty() || cleaned.starts_with('-') {
        return Err(invalid());
    }
    let (whole, fraction) = match cleaned.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (cleaned.as_str(), ""),
    };
    if fraction.len() > precision
        || !whole.chars().all(|c| c.is_ascii_digit())
        || !fraction.chars().all(|c| c.is_ascii_digit())
    {
        return Err(invalid());
    }
    let whole: i64 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| invalid())?
    };
    let fraction: i64 = if fraction.is_empty() {
        0
    } else {
        format!("{:0<width$}", fraction, width = precision)
            .parse()
            .map_err(|_| invalid())?
    };
    whole
        .checked_mul(10_i64.pow(precision as u32))
        .and_then(|scaled| scaled.checked_add(fraction))
        .filter(|amount| *amount <= MAX_AMOUNT)
        .ok_or_else(invalid)
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index != 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_with_grouping_and_symbol() {
        assert_eq!(format_amount(18_500_000, "NGN"), "₦185,000.00");
        assert_eq!(format_amount(-2_050, "USD"), "-$20.50");
        assert_eq!(format_amount(5, "NGN"), "₦0.05");
        assert_eq!(format_amount(1_000, "UGX"), "UGX1,000");
    }

    #[test]
    fn parses_common_entry_forms() {
        assert_eq!(parse_amount("185000", "NGN").unwrap(), 18_500_000);
        assert_eq!(parse_amount("₦1,200.5", "NGN").unwrap(), 120_050);
        assert_eq!(parse_amount(".75", "NGN").unwrap(), 75);
    }

    #[test]
    fn accepts_amounts_up_to_the_limit() {
        assert_eq!(
            parse_amount("10,000,000,000,000", "NGN").unwrap(),
            MAX_AMOUNT
        );
        assert!(parse_amount("10000000000000.01", "NGN").is_err());
    }

    #[test]
    fn rejects_malformed_amounts() {
        for bad in ["", "-5", "12.345", "abc", "1.2.3", "50000000000000000"] {
            assert!(parse_amount(bad, "NGN").is_err(), "{bad} should fail");
        }
    }
}
