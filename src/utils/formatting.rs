use chrono::{DateTime, Utc};

/// Format a minute count for display
pub fn format_minutes(minutes: u32) -> String {
    let hours = minutes / 60;
    let rem = minutes % 60;

    if hours == 0 {
        format!("{} minute{}", minutes, if minutes == 1 { "" } else { "s" })
    } else if rem == 0 {
        format!("{} hour{}", hours, if hours == 1 { "" } else { "s" })
    } else {
        format!("{}h {:02}min", hours, rem)
    }
}

/// Discord relative-timestamp markup, rendered client-side as "in 30 minutes"
pub fn relative_timestamp(at: DateTime<Utc>) -> String {
    format!("<t:{}:R>", at.timestamp())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_minutes() {
        assert_eq!(format_minutes(1), "1 minute");
        assert_eq!(format_minutes(30), "30 minutes");
        assert_eq!(format_minutes(60), "1 hour");
        assert_eq!(format_minutes(90), "1h 30min");
        assert_eq!(format_minutes(120), "2 hours");
        assert_eq!(format_minutes(1440), "24 hours");
    }

    #[test]
    fn test_relative_timestamp() {
        let at = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        assert_eq!(relative_timestamp(at), "<t:1700000000:R>");
    }
}
