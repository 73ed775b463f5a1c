use crate::error::CheckoutError;
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

/// A single keypad digit in `0..=9`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Digit(u8);

impl Digit {
    pub fn new(value: u8) -> Option<Self> {
        (value <= 9).then_some(Self(value))
    }

    pub fn as_char(&self) -> char {
        char::from(b'0' + self.0)
    }
}

impl TryFrom<char> for Digit {
    type Error = CheckoutError;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        c.to_digit(10)
            .map(|d| Self(d as u8))
            .ok_or(CheckoutError::InvalidDigit(c))
    }
}

/// The dollar amount being typed on the keypad.
///
/// The amount is kept as the digit string the user sees rather than a number, so
/// edits are plain string operations. The buffer is never empty and never carries
/// a leading zero unless its whole value is `"0"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmountBuffer(String);

impl Default for AmountBuffer {
    /// The screen opens with one dollar selected.
    fn default() -> Self {
        Self("1".to_string())
    }
}

impl AmountBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn zero() -> Self {
        Self("0".to_string())
    }

    /// Replaces the buffer with a quick-amount preset.
    pub fn select_preset(&mut self, value: u64) {
        self.0 = value.to_string();
    }

    /// Appends a digit, replacing a lone zero.
    pub fn press_digit(&mut self, digit: Digit) {
        if self.0 == "0" {
            self.0.clear();
        }
        self.0.push(digit.as_char());
    }

    /// Removes the last digit, falling back to zero.
    pub fn press_delete(&mut self) {
        if self.0.len() > 1 {
            self.0.pop();
        } else {
            self.0 = "0".to_string();
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether an order can be created for the current amount.
    pub fn is_ready(&self) -> bool {
        is_ready_amount(&self.0)
    }

    /// Numeric value of the buffer, `None` if it exceeds `Decimal`'s range.
    pub fn value(&self) -> Option<Decimal> {
        Decimal::from_str(&self.0).ok()
    }
}

impl fmt::Display for AmountBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.0)
    }
}

pub(crate) fn is_ready_amount(amount: &str) -> bool {
    !amount.is_empty() && amount != "0"
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;
    use rust_decimal_macros::dec;

    fn digit(c: char) -> Digit {
        Digit::try_from(c).unwrap()
    }

    #[test]
    fn test_default_amount() {
        let buffer = AmountBuffer::new();
        assert_eq!(buffer.as_str(), "1");
        assert!(buffer.is_ready());
        assert!(!AmountBuffer::zero().is_ready());
    }

    #[test]
    fn test_preset_then_digit() {
        let mut buffer = AmountBuffer::new();
        buffer.select_preset(25);
        assert_eq!(buffer.as_str(), "25");
        buffer.press_digit(digit('0'));
        assert_eq!(buffer.as_str(), "250");
    }

    #[test]
    fn test_digit_replaces_zero() {
        let mut buffer = AmountBuffer::zero();
        buffer.press_digit(digit('0'));
        assert_eq!(buffer.as_str(), "0");
        buffer.press_digit(digit('7'));
        assert_eq!(buffer.as_str(), "7");
    }

    #[test]
    fn test_delete() {
        let mut buffer = AmountBuffer::new();
        buffer.select_preset(100);
        buffer.press_delete();
        assert_eq!(buffer.as_str(), "10");
        buffer.press_delete();
        assert_eq!(buffer.as_str(), "1");
        buffer.press_delete();
        assert_eq!(buffer.as_str(), "0");
        buffer.press_delete();
        assert_eq!(buffer.as_str(), "0");
    }

    #[test]
    fn test_random_edits_keep_invariants() {
        let mut rng = rand::thread_rng();
        for _ in 0..200 {
            let mut buffer = AmountBuffer::zero();
            for _ in 0..rng.gen_range(1..30) {
                let before = buffer.as_str().to_string();
                if rng.gen_bool(0.25) {
                    buffer.press_delete();
                    if before.len() >= 2 {
                        assert_eq!(buffer.as_str(), &before[..before.len() - 1]);
                    } else {
                        assert_eq!(buffer.as_str(), "0");
                    }
                } else {
                    buffer.press_digit(Digit::new(rng.gen_range(0..=9)).unwrap());
                }

                let current = buffer.as_str();
                assert!(!current.is_empty());
                assert!(current == "0" || !current.starts_with('0'));
            }
        }
    }

    #[test]
    fn test_unbounded_length() {
        let mut buffer = AmountBuffer::new();
        for _ in 0..40 {
            buffer.press_digit(digit('9'));
        }
        assert_eq!(buffer.as_str().len(), 41);
        assert!(buffer.is_ready());
        assert_eq!(buffer.value(), None);
    }

    #[test]
    fn test_value() {
        let mut buffer = AmountBuffer::new();
        buffer.select_preset(75);
        assert_eq!(buffer.value(), Some(dec!(75)));
        assert_eq!(buffer.to_string(), "$75");
    }

    #[test]
    fn test_invalid_digit() {
        assert!(matches!(
            Digit::try_from('x'),
            Err(CheckoutError::InvalidDigit('x'))
        ));
        assert!(Digit::new(10).is_none());
        assert_eq!(Digit::new(4).unwrap().as_char(), '4');
    }
}
