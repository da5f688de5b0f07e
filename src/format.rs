/// Formats `amount` as dollars with thousands separators and two decimals,
/// e.g. `$19,713.42`. Negative amounts render as `$-12.50`, and a negative
/// amount that rounds to zero keeps its sign (`$-0.00`).
pub fn currency(amount: f64) -> String {
    if !amount.is_finite() {
        return format!("${}", amount);
    }
    let fixed = format!("{:.2}", amount);
    let (sign, digits) = match fixed.strip_prefix('-') {
        Some(digits) => ("-", digits),
        None => ("", fixed.as_str()),
    };
    let (whole, cents) = digits.split_once('.').unwrap_or((digits, "00"));
    format!("${}{}.{}", sign, group_thousands(whole), cents)
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::currency;
    use test_log::test;

    #[test]
    fn test_currency() {
        assert_eq!(currency(0.), "$0.00");
        assert_eq!(currency(547.594874128003), "$547.59");
        assert_eq!(currency(1000.), "$1,000.00");
        assert_eq!(currency(19713.415468608106), "$19,713.42");
        assert_eq!(currency(10_000_000.), "$10,000,000.00");
        assert_eq!(currency(999.999), "$1,000.00");
    }

    #[test]
    fn test_currency_negative() {
        assert_eq!(currency(-1234.5), "$-1,234.50");
        assert_eq!(currency(-0.001), "$-0.00");
    }

    #[test]
    fn test_currency_non_finite() {
        assert_eq!(currency(f64::INFINITY), "$inf");
        assert_eq!(currency(f64::NEG_INFINITY), "$-inf");
    }
}
