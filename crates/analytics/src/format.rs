//! Money formatting for user-facing messages.

/// Whole number with comma thousands separators: `1234567.4` -> `"1,234,567"`.
pub fn thousands(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0.0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Rupee amount with separators: `"₹1,200"`.
pub fn rupees(value: f64) -> String {
    format!("₹{}", thousands(value))
}

/// Rupee amount in crores with one decimal: `250_000_000` -> `"₹25.0Cr"`.
pub fn crores(value: f64) -> String {
    format!("₹{:.1}Cr", value / 1.0e7)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thousands() {
        assert_eq!(thousands(0.0), "0");
        assert_eq!(thousands(999.0), "999");
        assert_eq!(thousands(1200.0), "1,200");
        assert_eq!(thousands(1234567.4), "1,234,567");
        assert_eq!(thousands(-45000.0), "-45,000");
    }

    #[test]
    fn test_crores() {
        assert_eq!(crores(250_000_000.0), "₹25.0Cr");
        assert_eq!(rupees(1.5e9), "₹1,500,000,000");
    }
}
