/// Time unit accepted in delay and configuration strings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Milliseconds,
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl TimeUnit {
    /// Milliseconds in `value` of this unit, saturating at `u64::MAX`
    pub fn to_millis(&self, value: u64) -> u64 {
        let factor = match self {
            TimeUnit::Milliseconds => 1,
            TimeUnit::Seconds => 1000,
            TimeUnit::Minutes => 60_000,
            TimeUnit::Hours => 3_600_000,
            TimeUnit::Days => 86_400_000,
        };
        value.saturating_mul(factor)
    }

    /// Parse a duration string like "5s", "10m", "2h", "500ms"
    /// Returns (value, TimeUnit) if successful
    ///
    /// Strict rules:
    /// - Only lowercase suffixes are accepted: "ms", "s", "m", "h", "d"
    /// - Format must be: <number><suffix> (e.g., "5s", "100ms")
    /// - No spaces allowed between number and suffix
    pub fn parse_duration(s: &str) -> Option<(u64, TimeUnit)> {
        let s = s.trim();

        let split_pos = s.find(|c: char| !c.is_ascii_digit())?;
        if split_pos == 0 {
            return None;
        }

        let (num_str, unit_str) = s.split_at(split_pos);
        let value = num_str.parse::<u64>().ok()?;

        let time_unit = match unit_str {
            "ms" => TimeUnit::Milliseconds,
            "s" => TimeUnit::Seconds,
            "m" => TimeUnit::Minutes,
            "h" => TimeUnit::Hours,
            "d" => TimeUnit::Days,
            _ => return None,
        };

        Some((value, time_unit))
    }

    /// Parse either a shorthand duration ("250ms", "2s") or a bare number of milliseconds
    pub fn parse_millis(s: &str) -> Option<u64> {
        if let Some((value, unit)) = Self::parse_duration(s) {
            return Some(unit.to_millis(value));
        }
        s.trim().parse::<u64>().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::TimeUnit;

    #[test]
    fn parses_shorthand_suffixes() {
        assert_eq!(TimeUnit::parse_duration("500ms"), Some((500, TimeUnit::Milliseconds)));
        assert_eq!(TimeUnit::parse_duration(" 5s "), Some((5, TimeUnit::Seconds)));
        assert_eq!(TimeUnit::parse_duration("10m"), Some((10, TimeUnit::Minutes)));
        assert_eq!(TimeUnit::parse_duration("2h"), Some((2, TimeUnit::Hours)));
        assert_eq!(TimeUnit::parse_duration("1d"), Some((1, TimeUnit::Days)));
    }

    #[test]
    fn rejects_malformed_shorthand() {
        assert_eq!(TimeUnit::parse_duration("5S"), None);
        assert_eq!(TimeUnit::parse_duration("5 s"), None);
        assert_eq!(TimeUnit::parse_duration("ms"), None);
        assert_eq!(TimeUnit::parse_duration("250"), None);
        assert_eq!(TimeUnit::parse_duration(""), None);
    }

    #[test]
    fn bare_numbers_are_milliseconds() {
        assert_eq!(TimeUnit::parse_millis("250"), Some(250));
        assert_eq!(TimeUnit::parse_millis("2s"), Some(2000));
        assert_eq!(TimeUnit::parse_millis("-1"), None);
        assert_eq!(TimeUnit::parse_millis("soon"), None);
    }

    #[test]
    fn to_millis_saturates() {
        assert_eq!(TimeUnit::Minutes.to_millis(3), 180_000);
        assert_eq!(TimeUnit::Days.to_millis(u64::MAX), u64::MAX);
    }
}
