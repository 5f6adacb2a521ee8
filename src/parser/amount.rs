use log::warn;

/// Parse a single quantity token: an integer, a decimal, `N/D` or `W N/D`.
///
/// Ranges are not handled here; callers pass the lower bound only.
pub fn parse_amount(token: &str) -> Option<f64> {
    let token = token.trim();
    if token.is_empty() {
        return None;
    }
    if let Ok(value) = token.parse::<i64>() {
        return Some(value as f64);
    }
    if is_decimal(token) {
        if let Ok(value) = token.parse::<f64>() {
            return value.is_finite().then_some(value);
        }
    }
    parse_fraction(token)
}

/// `f64::from_str` also accepts `inf`, `NaN` and exponents, which never appear in recipes.
fn is_decimal(token: &str) -> bool {
    let digits = token.strip_prefix('-').unwrap_or(token);
    digits.chars().any(|c| c.is_ascii_digit())
        && digits.chars().all(|c| c.is_ascii_digit() || c == '.')
        && digits.matches('.').count() == 1
}

fn parse_fraction(token: &str) -> Option<f64> {
    let parts: Vec<&str> = token.split_whitespace().collect();
    let (whole, fraction) = match parts.as_slice() {
        [fraction] if fraction.contains('/') => (0.0, *fraction),
        [whole, fraction] if !whole.contains('/') => (whole.parse::<i64>().ok()? as f64, *fraction),
        _ => return None,
    };

    let (numerator, denominator) = fraction.split_once('/')?;
    let numerator: i64 = numerator.parse().ok()?;
    let denominator: i64 = denominator.parse().ok()?;
    if denominator == 0 {
        warn!("Refusing fraction with zero denominator: \"{}\"", token);
        return None;
    }

    Some(whole + numerator as f64 / denominator as f64)
}

/// Whether a token is a proper fraction such as `1/2`, used to spot mixed numbers.
pub fn is_fraction(token: &str) -> bool {
    matches!(token.split_once('/'), Some((n, d))
        if !n.is_empty() && !d.is_empty()
            && n.chars().all(|c| c.is_ascii_digit())
            && d.chars().all(|c| c.is_ascii_digit()))
}

/// Whether a token could start a quantity: a digit, or a dot followed by a digit (`.5`).
pub fn is_numeric(token: &str) -> bool {
    starts_numeric(token) && token.chars().all(|c| c.is_ascii_digit() || c == '.' || c == '/')
}

/// Whether `text` begins like a number.
pub fn starts_numeric(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c.is_ascii_digit() => true,
        Some('.') => chars.next().is_some_and(|c| c.is_ascii_digit()),
        _ => false,
    }
}
