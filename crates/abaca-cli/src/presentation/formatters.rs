/// Stat value for display: thousands separators, two decimals unless integral
pub fn format_stat(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let sign = if value < 0.0 { "-" } else { "" };
    if value.fract() == 0.0 && value.abs() < 1e15 {
        return format!("{}{}", sign, group_thousands(value.abs() as u64));
    }
    let cents = (value.abs() * 100.0).round() as u64;
    format!("{}{}.{:02}", sign, group_thousands(cents / 100), cents % 100)
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// `total_revenue` → `Total revenue`
pub fn humanize(name: &str) -> String {
    let spaced = name.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Collapse whitespace and cut to `max_chars`, respecting UTF-8 boundaries
pub fn truncate(s: &str, max_chars: usize) -> String {
    let normalized = s.split_whitespace().collect::<Vec<_>>().join(" ");
    if normalized.chars().count() <= max_chars {
        normalized
    } else if max_chars <= 3 {
        normalized.chars().take(max_chars).collect()
    } else {
        let truncated: String = normalized.chars().take(max_chars - 3).collect();
        format!("{}...", truncated)
    }
}
