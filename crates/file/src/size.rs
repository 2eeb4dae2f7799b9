//! Size accounting for prefix existence checks

use std::fmt;

const POWER: f64 = 1024.0;
const UNIT_LABELS: [&str; 4] = ["", "k", "M", "G"];

/// A byte total, raw or rendered for humans
#[derive(Debug, Clone, PartialEq)]
pub enum SizeValue {
    Bytes(u64),
    Formatted(String),
}

impl fmt::Display for SizeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SizeValue::Bytes(bytes) => write!(f, "{bytes}"),
            SizeValue::Formatted(s) => f.write_str(s),
        }
    }
}

/// Total size of the objects under a prefix
#[derive(Debug, Clone, PartialEq)]
pub enum SizeReport {
    /// The listing was complete
    Exact(SizeValue),
    /// The listing hit the page cap, so the real total is at least this much
    AtLeast(SizeValue),
}

impl SizeReport {
    pub fn value(&self) -> &SizeValue {
        match self {
            SizeReport::Exact(value) | SizeReport::AtLeast(value) => value,
        }
    }

    pub fn is_lower_bound(&self) -> bool {
        matches!(self, SizeReport::AtLeast(_))
    }
}

impl fmt::Display for SizeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SizeReport::Exact(value) => write!(f, "{value}"),
            SizeReport::AtLeast(value) => write!(f, ">{value}"),
        }
    }
}

/// Turn a byte total into a report; zero bytes means nothing was found
pub fn account(total_bytes: u64, format: bool, truncated: bool) -> Option<SizeReport> {
    if total_bytes == 0 {
        return None;
    }

    let value = if format {
        SizeValue::Formatted(format_size(total_bytes))
    } else {
        SizeValue::Bytes(total_bytes)
    };

    Some(if truncated {
        SizeReport::AtLeast(value)
    } else {
        SizeReport::Exact(value)
    })
}

/// Convert bytes to B, kB, MB or GB, e.g. `2024` -> `"1.98 kB"`
pub fn format_size(bytes: u64) -> String {
    if bytes as f64 <= POWER {
        return format!("{bytes} B");
    }

    let mut size = bytes as f64;
    let mut unit = 0;
    while size > POWER && unit < UNIT_LABELS.len() - 1 {
        size /= POWER;
        unit += 1;
    }

    format!("{} {}B", round_2(size), UNIT_LABELS[unit])
}

/// Two decimals, without trailing zeros beyond the first
fn round_2(value: f64) -> String {
    let rendered = format!("{value:.2}");
    let trimmed = rendered.trim_end_matches('0');
    if trimmed.ends_with('.') {
        format!("{trimmed}0")
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_is_absent() {
        assert_eq!(account(0, false, false), None);
        assert_eq!(account(0, true, true), None);
    }

    #[test]
    fn test_exact_bytes() {
        assert_eq!(
            account(2024, false, false),
            Some(SizeReport::Exact(SizeValue::Bytes(2024)))
        );
    }

    #[test]
    fn test_formatted() {
        assert_eq!(
            account(2024, true, false),
            Some(SizeReport::Exact(SizeValue::Formatted("1.98 kB".to_string())))
        );
    }

    #[test]
    fn test_truncated_is_lower_bound() {
        let report = account(1000, false, true).unwrap();
        assert!(report.is_lower_bound());
        assert_eq!(report.value(), &SizeValue::Bytes(1000));
        assert_eq!(report.to_string(), ">1000");
    }

    #[test]
    fn test_format_size_units() {
        assert_eq!(format_size(500), "500 B");
        assert_eq!(format_size(1024), "1024 B");
        assert_eq!(format_size(2048), "2.0 kB");
        assert_eq!(format_size(1536), "1.5 kB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.0 MB");
        assert_eq!(format_size(3 * 1024 * 1024 * 1024), "3.0 GB");
    }

    #[test]
    fn test_format_size_caps_at_gigabytes() {
        assert_eq!(format_size(2048 * 1024 * 1024 * 1024), "2048.0 GB");
    }
}
