//! Timer durations and the rules for turning loose user input into them.

use serde::Deserialize;

pub const DEFAULT_WORK_MINUTES: u32 = 25;
pub const DEFAULT_SHORT_BREAK_MINUTES: u32 = 5;
pub const DEFAULT_LONG_BREAK_MINUTES: u32 = 15;
pub const DEFAULT_LONG_BREAK_INTERVAL: u32 = 4;

/// Validated timer configuration. Every field is a positive integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub work_minutes: u32,
    pub short_break_minutes: u32,
    pub long_break_minutes: u32,
    /// Completed work sessions before a long break is inserted.
    pub long_break_interval: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            work_minutes: DEFAULT_WORK_MINUTES,
            short_break_minutes: DEFAULT_SHORT_BREAK_MINUTES,
            long_break_minutes: DEFAULT_LONG_BREAK_MINUTES,
            long_break_interval: DEFAULT_LONG_BREAK_INTERVAL,
        }
    }
}

impl Settings {
    /// Build settings from possibly-missing, possibly-bogus values. Anything
    /// absent or not positive is replaced by the default for that field.
    pub fn from_values(
        work: Option<i64>,
        short_break: Option<i64>,
        long_break: Option<i64>,
        interval: Option<i64>,
    ) -> Self {
        Self {
            work_minutes: positive_or(work, DEFAULT_WORK_MINUTES),
            short_break_minutes: positive_or(short_break, DEFAULT_SHORT_BREAK_MINUTES),
            long_break_minutes: positive_or(long_break, DEFAULT_LONG_BREAK_MINUTES),
            long_break_interval: positive_or(interval, DEFAULT_LONG_BREAK_INTERVAL),
        }
    }

    /// Parse the four text fields of the settings form.
    pub fn from_inputs(work: &str, short_break: &str, long_break: &str, interval: &str) -> Self {
        Self::from_values(
            parse_leading_int(work),
            parse_leading_int(short_break),
            parse_leading_int(long_break),
            parse_leading_int(interval),
        )
    }

    pub fn work_seconds(&self) -> u32 {
        self.work_minutes.saturating_mul(60)
    }

    pub fn short_break_seconds(&self) -> u32 {
        self.short_break_minutes.saturating_mul(60)
    }

    pub fn long_break_seconds(&self) -> u32 {
        self.long_break_minutes.saturating_mul(60)
    }
}

/// `[timer]` table of the config file, before validation.
#[derive(Debug, Default, Deserialize, Clone)]
#[serde(default)]
pub struct TimerSection {
    pub work_minutes: Option<i64>,
    pub short_break_minutes: Option<i64>,
    pub long_break_minutes: Option<i64>,
    pub long_break_interval: Option<i64>,
}

impl From<&TimerSection> for Settings {
    fn from(section: &TimerSection) -> Self {
        Settings::from_values(
            section.work_minutes,
            section.short_break_minutes,
            section.long_break_minutes,
            section.long_break_interval,
        )
    }
}

fn positive_or(value: Option<i64>, default: u32) -> u32 {
    match value {
        Some(v) if v > 0 => u32::try_from(v).unwrap_or(u32::MAX),
        _ => default,
    }
}

/// Reads an optional sign followed by digits, ignoring whatever trails them.
/// `"25min"` gives 25, `"abc"` and `""` give nothing.
fn parse_leading_int(input: &str) -> Option<i64> {
    let s = input.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }
    // Saturate absurdly long inputs instead of failing.
    let magnitude = rest[..digits_len].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_input_parses_like_a_leading_integer() {
        assert_eq!(parse_leading_int("25"), Some(25));
        assert_eq!(parse_leading_int("  40min"), Some(40));
        assert_eq!(parse_leading_int("-3"), Some(-3));
        assert_eq!(parse_leading_int("abc"), None);
        assert_eq!(parse_leading_int(""), None);
        assert_eq!(parse_leading_int("-"), None);
    }

    #[test]
    fn invalid_inputs_fall_back_to_defaults() {
        let settings = Settings::from_inputs("", "zero", "0", "-2");
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn valid_inputs_are_kept() {
        let settings = Settings::from_inputs("50", "10", "30", "2");
        assert_eq!(settings.work_minutes, 50);
        assert_eq!(settings.short_break_minutes, 10);
        assert_eq!(settings.long_break_minutes, 30);
        assert_eq!(settings.long_break_interval, 2);
        assert_eq!(settings.work_seconds(), 3000);
    }

    #[test]
    fn timer_section_is_validated() {
        let section = TimerSection {
            work_minutes: Some(45),
            short_break_minutes: Some(-5),
            long_break_minutes: None,
            long_break_interval: Some(3),
        };
        let settings = Settings::from(&section);
        assert_eq!(settings.work_minutes, 45);
        assert_eq!(settings.short_break_minutes, DEFAULT_SHORT_BREAK_MINUTES);
        assert_eq!(settings.long_break_minutes, DEFAULT_LONG_BREAK_MINUTES);
        assert_eq!(settings.long_break_interval, 3);
    }
}
