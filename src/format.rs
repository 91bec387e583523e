//! Display formatting for amounts and counts.

use crate::models::round_half_up;

/// Thousands-separated integer, e.g. `1,248`.
pub fn thousands(value: u64) -> String {
    group(&value.to_string())
}

/// Dollar amount with cents, e.g. `$175.00`.
pub fn money(amount: f64) -> String {
    let cents = round_half_up(amount.abs() * 100.0);
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!(
        "{sign}${}.{:02}",
        thousands((cents / 100) as u64), cents % 100
    )
}

/// Whole-dollar amount with separators, e.g. `$2,456,780`.
pub fn money_whole(amount: f64) -> String {
    let dollars = round_half_up(amount);
    if dollars < 0 {
        format!("-${}", thousands(dollars.unsigned_abs()))
    } else {
        format!("${}", thousands(dollars as u64))
    }
}

/// Amount in thousands, e.g. `$188K`.
pub fn money_thousands(amount: f64) -> String {
    format!("${}K", round_half_up(amount / 1000.0))
}

/// Amount in millions with two decimals, e.g. `$1.65M`.
pub fn money_millions(amount: f64) -> String {
    format!("${:.2}M", amount / 1_000_000.0)
}

/// Optional amount, `-` when absent.
pub fn optional_money(amount: Option<f64>) -> String {
    amount.map(money).unwrap_or_else(|| "-".to_string())
}

/// Signed whole percentage, e.g. `+10%`.
pub fn signed_percent(value: i64) -> String {
    if value > 0 {
        format!("+{value}%")
    } else {
        format!("{value}%")
    }
}

/// File size in KB or MB.
pub fn file_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    let bytes = bytes as f64;
    if bytes >= KB * KB {
        format!("{:.1} MB", bytes / (KB * KB))
    } else {
        format!("{:.0} KB", (bytes / KB).ceil())
    }
}

fn group(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
