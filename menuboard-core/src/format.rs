//! Text helpers shared by the layout engine and renderers.

/// Turn a hyphenated slug into a display title.
///
/// `"deli-items"` becomes `"Deli Items"`. Only the first character of each
/// word is upper-cased; the rest is lower-cased.
pub fn format_title(input: &str) -> String {
    input
        .to_lowercase()
        .split('-')
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Format an amount as US dollars: `$1,234.50`.
pub fn format_usd(amount: f64) -> String {
    let total_cents = (amount.abs() * 100.0).round() as u64;
    let dollars = total_cents / 100;
    let cents = total_cents % 100;

    let digits = dollars.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 && total_cents > 0 { "-" } else { "" };
    format!("{}${}.{:02}", sign, grouped, cents)
}
