fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// en-US style: thousands separators and exactly `digits` fraction digits.
pub fn format_number(value: f64, digits: usize) -> String {
    if !value.is_finite() {
        return "NaN".to_string();
    }
    let fixed = format!("{:.*}", digits, value.abs());
    let (integer, fraction) = match fixed.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (fixed.as_str(), None),
    };

    let mut out = String::new();
    let is_zero = fixed.chars().all(|ch| ch == '0' || ch == '.');
    if value.is_sign_negative() && !is_zero {
        out.push('-');
    }
    out.push_str(&group_thousands(integer));
    if let Some(fraction) = fraction {
        out.push('.');
        out.push_str(fraction);
    }
    out
}

/// Parses a decimal string first, like the price and balance fields carry.
pub fn format_number_str(raw: &str, digits: usize) -> String {
    match raw.trim().parse::<f64>() {
        Ok(value) => format_number(value, digits),
        Err(_) => "NaN".to_string(),
    }
}

/// Token supply: commas already in the text are ignored, the integer part is
/// regrouped, and no decimals are shown.
pub fn format_supply(raw: &str) -> String {
    let digits: String = raw
        .trim()
        .chars()
        .filter(|ch| *ch != ',')
        .take_while(|ch| ch.is_ascii_digit())
        .collect();
    let digits = digits.trim_start_matches('0');
    if digits.is_empty() {
        return "0".to_string();
    }
    group_thousands(digits)
}

/// Fixed decimals without grouping, for the balance card's USD figure.
pub fn to_fixed(value: f64, digits: usize) -> String {
    format!("{:.*}", digits, value)
}

/// `abcdef...wxyz` for values longer than 12 characters.
pub fn truncate_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 12 {
        return address.to_string();
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}
