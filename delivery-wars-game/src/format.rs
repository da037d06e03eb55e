//! Display helpers shared by log lines and snapshots.

/// Whole-dollar amount with thousands separators, e.g. `$1,234` or `-$80`.
#[must_use]
pub fn fmt_money(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if amount < 0 {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

/// Unit price with cents, e.g. `$0.22`.
#[must_use]
pub fn fmt_price(price: f64) -> String {
    format!("${price:.2}")
}

/// Energy amount with one decimal place.
#[must_use]
pub fn fmt_kwh(kwh: f64) -> String {
    format!("{kwh:.1} kWh")
}
