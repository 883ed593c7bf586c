// pt-BR number formatting for amounts shown to the user.

/// Formats `value` with `decimals` places, "." as thousands separator and "," as decimal separator.
pub fn format_decimal(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.decimals$}", value.abs(), decimals = decimals);
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (formatted.as_str(), None),
    };

    let mut out = String::with_capacity(formatted.len() + int_part.len() / 3 + 1);
    let is_zero = !formatted.bytes().any(|b| b.is_ascii_digit() && b != b'0');
    if value.is_sign_negative() && !is_zero {
        out.push('-');
    }
    let digits = int_part.len();
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (digits - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    if let Some(frac_part) = frac_part {
        out.push(',');
        out.push_str(frac_part);
    }
    out
}

/// "R$ 1.234,56"
pub fn format_brl(value: f64) -> String {
    format!("R$ {}", format_decimal(value, 2))
}
