//! Input rules that vary per deployment.
//!
//! Static field rules (lengths, email format) live on the request DTOs as
//! `validator` attributes. The rules here are the ones operators tune, so
//! they are loaded at startup and handed to the operations that apply them.

use crate::env::parse_or;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ValidationRules {
    /// Minimum password length accepted on registration and password change
    pub password_min_length: usize,
    /// bcrypt cost used when storing passwords
    pub password_hash_cost: u32,
    /// Minimum number of digits in a phone number
    pub phone_min_digits: usize,
    /// Maximum number of digits in a phone number
    pub phone_max_digits: usize,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            password_min_length: 8,
            password_hash_cost: 12,
            phone_min_digits: 7,
            phone_max_digits: 15,
        }
    }
}

impl ValidationRules {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            password_min_length: parse_or("PASSWORD_MIN_LENGTH", defaults.password_min_length),
            password_hash_cost: parse_or("PASSWORD_HASH_COST", defaults.password_hash_cost)
                .clamp(4, 31),
            phone_min_digits: parse_or("PHONE_MIN_DIGITS", defaults.phone_min_digits),
            phone_max_digits: parse_or("PHONE_MAX_DIGITS", defaults.phone_max_digits),
        }
    }

    pub fn password_is_acceptable(&self, password: &str) -> bool {
        password.chars().count() >= self.password_min_length
    }

    /// Accepts digits plus the usual separators (`+`, space, `-`, `(`, `)`),
    /// with a digit count inside the configured range.
    pub fn phone_is_acceptable(&self, phone: &str) -> bool {
        let allowed = phone
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '+' | ' ' | '-' | '(' | ')'));
        let digits = phone.chars().filter(char::is_ascii_digit).count();
        allowed && (self.phone_min_digits..=self.phone_max_digits).contains(&digits)
    }
}
