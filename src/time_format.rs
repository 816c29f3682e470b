use chrono::{DateTime, Utc};

/// Formats the time from `from` until `to` in German, for log lines and the
/// review summary.
///
/// Examples:
/// - same moment or earlier: "jetzt"
/// - 30 seconds later: "in 30 Sekunden"
/// - 1 minute later: "in 1 Minute"
/// - 10 minutes later: "in 10 Minuten"
/// - 2 hours later: "in 2 Stunden"
/// - 1 day later: "morgen"
/// - 3 days later: "in 3 Tagen"
/// - 30 days or more: "am 2025-12-10"
pub fn format_time_difference(from: DateTime<Utc>, to: DateTime<Utc>) -> String {
    let duration = to.signed_duration_since(from);

    if duration.num_seconds() <= 0 {
        "jetzt".to_string()
    } else if duration.num_seconds() < 60 {
        let secs = duration.num_seconds();
        format!("in {} Sekunde{}", secs, if secs == 1 { "" } else { "n" })
    } else if duration.num_minutes() < 60 {
        let mins = duration.num_minutes();
        format!("in {} Minute{}", mins, if mins == 1 { "" } else { "n" })
    } else if duration.num_hours() < 24 {
        let hours = duration.num_hours();
        format!("in {} Stunde{}", hours, if hours == 1 { "" } else { "n" })
    } else if duration.num_days() == 1 {
        "morgen".to_string()
    } else if duration.num_days() < 30 {
        format!("in {} Tagen", duration.num_days())
    } else {
        format!("am {}", to.format("%Y-%m-%d"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 11, 10, 12, 0, 0).unwrap()
    }

    fn after(duration: Duration) -> String {
        format_time_difference(base(), base() + duration)
    }

    #[test]
    fn test_format_past_and_present() {
        assert_eq!(after(Duration::zero()), "jetzt");
        assert_eq!(after(Duration::seconds(-10)), "jetzt");
    }

    #[test]
    fn test_format_seconds() {
        assert_eq!(after(Duration::seconds(1)), "in 1 Sekunde");
        assert_eq!(after(Duration::seconds(59)), "in 59 Sekunden");
    }

    #[test]
    fn test_format_minutes() {
        assert_eq!(after(Duration::seconds(60)), "in 1 Minute");
        assert_eq!(after(Duration::minutes(10)), "in 10 Minuten");
        assert_eq!(after(Duration::minutes(59)), "in 59 Minuten");
    }

    #[test]
    fn test_format_hours() {
        assert_eq!(after(Duration::minutes(60)), "in 1 Stunde");
        assert_eq!(after(Duration::hours(23)), "in 23 Stunden");
    }

    #[test]
    fn test_format_days() {
        assert_eq!(after(Duration::days(1)), "morgen");
        assert_eq!(after(Duration::days(1) + Duration::hours(23)), "morgen");
        assert_eq!(after(Duration::days(3)), "in 3 Tagen");
        assert_eq!(after(Duration::days(14)), "in 14 Tagen");
        assert_eq!(after(Duration::days(29)), "in 29 Tagen");
    }

    #[test]
    fn test_format_far_future_uses_date() {
        assert_eq!(after(Duration::days(30)), "am 2025-12-10");
    }

    #[test]
    fn test_format_review_ladder() {
        let labels: Vec<String> = [
            Duration::zero(),
            Duration::minutes(10),
            Duration::days(1),
            Duration::days(3),
            Duration::weeks(1),
            Duration::weeks(2),
        ]
        .into_iter()
        .map(after)
        .collect();
        assert_eq!(
            labels,
            vec!["jetzt", "in 10 Minuten", "morgen", "in 3 Tagen", "in 7 Tagen", "in 14 Tagen"]
        );
    }
}
