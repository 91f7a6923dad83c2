/// Kip display formatting, e.g. `₭1,250,000`. The kip carries no minor
/// unit, so amounts are whole numbers; this is display only, never parsing
/// or conversion.
pub fn format_price(amount_cents: i64) -> String {
    let digits = amount_cents.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if amount_cents < 0 { "-" } else { "" };
    format!("{sign}₭{grouped}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_thousands() {
        assert_eq!(format_price(0), "₭0");
        assert_eq!(format_price(950), "₭950");
        assert_eq!(format_price(1_000), "₭1,000");
        assert_eq!(format_price(24_990_000), "₭24,990,000");
    }

    #[test]
    fn negative_amounts_keep_the_sign_outside() {
        assert_eq!(format_price(-5_000), "-₭5,000");
    }
}
