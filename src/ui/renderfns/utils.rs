use ratatui::prelude::Color;
use rust_decimal::Decimal;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max_len: usize) -> String {
  if s.chars().count() <= max_len {
    s.to_string()
  } else {
    let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", kept)
  }
}

/// Format an amount as dollars with thousands separators, e.g. `$1,234.50`
pub fn format_amount(amount: Decimal) -> String {
  let rounded = amount.round_dp(2).abs();
  let text = format!("{:.2}", rounded);
  let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));

  let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
  for (i, digit) in whole.chars().enumerate() {
    if i > 0 && (whole.len() - i) % 3 == 0 {
      grouped.push(',');
    }
    grouped.push(digit);
  }

  let sign = if amount.is_sign_negative() && !rounded.is_zero() {
    "-"
  } else {
    ""
  };
  format!("{}${}.{}", sign, grouped, cents)
}

/// Display color for a transaction's approval state
pub fn approval_color(approved: bool) -> Color {
  if approved {
    Color::Green
  } else {
    Color::DarkGray
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_truncate_short_string() {
    assert_eq!(truncate("hello", 10), "hello");
  }

  #[test]
  fn test_truncate_exact_length() {
    assert_eq!(truncate("hello", 5), "hello");
  }

  #[test]
  fn test_truncate_long_string() {
    assert_eq!(truncate("hello world", 8), "hello...");
  }

  #[test]
  fn test_truncate_multibyte() {
    assert_eq!(truncate("Café Crème Brûlée", 8), "Café ...");
  }

  #[test]
  fn test_format_amount() {
    assert_eq!(format_amount(Decimal::new(845, 1)), "$84.50");
    assert_eq!(format_amount(Decimal::new(123456789, 2)), "$1,234,567.89");
    assert_eq!(format_amount(Decimal::new(100000, 2)), "$1,000.00");
    assert_eq!(format_amount(Decimal::new(-1999, 2)), "-$19.99");
    assert_eq!(format_amount(Decimal::ZERO), "$0.00");
  }

  #[test]
  fn test_approval_color() {
    assert_eq!(approval_color(true), Color::Green);
    assert_eq!(approval_color(false), Color::DarkGray);
  }
}
