//! Text shown on item cards and in the preview pane.

use time::macros::format_description;
use time::OffsetDateTime;

use crate::Item;

pub const UNTITLED: &str = "Untitled Save";
pub const GENERAL: &str = "General";
pub const NO_DESCRIPTION: &str = "No description available.";
pub const NO_SUMMARY: &str = "No summary available.";

fn non_empty(s: &Option<String>) -> Option<&str> {
    s.as_deref().filter(|s| !s.is_empty())
}

pub fn card_title(item: &Item) -> &str {
    non_empty(&item.title).unwrap_or(UNTITLED)
}

pub fn category_badge(item: &Item) -> &str {
    non_empty(&item.category).unwrap_or(GENERAL)
}

/// Summary, else the original caption, else a placeholder.
pub fn card_description(item: &Item) -> &str {
    non_empty(&item.summary)
        .or_else(|| non_empty(&item.caption))
        .unwrap_or(NO_DESCRIPTION)
}

pub fn preview_summary(item: &Item) -> &str {
    non_empty(&item.summary).unwrap_or(NO_SUMMARY)
}

/// Hashtag without its leading `#`.
pub fn tag_label(tag: &str) -> String {
    tag.replacen('#', "", 1)
}

/// Human phrasing of how long ago `at` was, e.g. "3 days ago" or "in an hour".
pub fn relative_time(at: OffsetDateTime, now: OffsetDateTime) -> String {
    let delta = (now - at).whole_seconds();
    let phrase = humanize(delta.unsigned_abs());
    if delta >= 0 {
        format!("{phrase} ago")
    } else {
        format!("in {phrase}")
    }
}

fn humanize(secs: u64) -> String {
    if secs < 45 {
        return "a few seconds".into();
    }
    if secs < 90 {
        return "a minute".into();
    }
    let minutes = (secs + 30) / 60;
    if minutes < 45 {
        return format!("{minutes} minutes");
    }
    if secs < 90 * 60 {
        return "an hour".into();
    }
    let hours = (secs + 1800) / 3600;
    if hours < 22 {
        return format!("{hours} hours");
    }
    if secs < 36 * 3600 {
        return "a day".into();
    }
    let days = (secs + 43_200) / 86_400;
    if days < 26 {
        return format!("{days} days");
    }
    if days < 320 {
        let months = (days as f64 / 30.4).round() as u64;
        return if months <= 1 {
            "a month".into()
        } else {
            format!("{months} months")
        };
    }
    let years = (days as f64 / 365.0).round() as u64;
    if years <= 1 {
        "a year".into()
    } else {
        format!("{years} years")
    }
}

/// `MMM Do, YYYY`, e.g. "Jan 5th, 2024".
pub fn long_date(at: OffsetDateTime) -> String {
    let d = at.date();
    match d.format(format_description!("[month repr:short] [day padding:none]")) {
        Ok(month_day) => format!("{month_day}{}, {}", ordinal_suffix(d.day()), d.year()),
        Err(_) => d.to_string(),
    }
}

fn ordinal_suffix(day: u8) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

/// Collapse newlines and cut to `max` characters.
pub fn one_line(s: &str, max: usize) -> String {
    let s = s.replace(['\n', '\r'], " ");
    if s.chars().count() > max {
        let cut: String = s.chars().take(max).collect();
        format!("{cut}…")
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;
    use time::Duration;

    #[test]
    fn fallbacks_follow_card_rules() {
        let mut item = Item::new(1, "https://example.com", datetime!(2024-01-05 10:00 UTC));
        assert_eq!(card_title(&item), UNTITLED);
        assert_eq!(category_badge(&item), GENERAL);
        assert_eq!(card_description(&item), NO_DESCRIPTION);
        item.caption = Some("from the post".into());
        assert_eq!(card_description(&item), "from the post");
        assert_eq!(preview_summary(&item), NO_SUMMARY);
        item.summary = Some(String::new());
        assert_eq!(card_description(&item), "from the post");
        item.summary = Some("AI summary".into());
        assert_eq!(card_description(&item), "AI summary");
    }

    #[test]
    fn tag_label_strips_first_hash_only() {
        assert_eq!(tag_label("#pasta"), "pasta");
        assert_eq!(tag_label("c#"), "c");
        assert_eq!(tag_label("##x"), "#x");
    }

    #[test]
    fn relative_phrases() {
        let now = datetime!(2024-06-15 12:00 UTC);
        let ago = |d: Duration| relative_time(now - d, now);
        assert_eq!(ago(Duration::seconds(10)), "a few seconds ago");
        assert_eq!(ago(Duration::seconds(60)), "a minute ago");
        assert_eq!(ago(Duration::minutes(5)), "5 minutes ago");
        assert_eq!(ago(Duration::minutes(50)), "an hour ago");
        assert_eq!(ago(Duration::hours(3)), "3 hours ago");
        assert_eq!(ago(Duration::hours(30)), "a day ago");
        assert_eq!(ago(Duration::days(2)), "2 days ago");
        assert_eq!(ago(Duration::days(30)), "a month ago");
        assert_eq!(ago(Duration::days(95)), "3 months ago");
        assert_eq!(ago(Duration::days(400)), "a year ago");
        assert_eq!(ago(Duration::days(1000)), "3 years ago");
        assert_eq!(relative_time(now + Duration::hours(1), now), "in an hour");
    }

    #[test]
    fn long_dates_use_ordinals() {
        assert_eq!(long_date(datetime!(2024-01-05 10:00 UTC)), "Jan 5th, 2024");
        assert_eq!(long_date(datetime!(2023-03-01 0:00 UTC)), "Mar 1st, 2023");
        assert_eq!(long_date(datetime!(2023-03-22 0:00 UTC)), "Mar 22nd, 2023");
        assert_eq!(long_date(datetime!(2023-03-13 0:00 UTC)), "Mar 13th, 2023");
        assert_eq!(long_date(datetime!(2024-09-03 0:00 UTC)), "Sep 3rd, 2024");
        assert_eq!(long_date(datetime!(2022-12-31 23:59 UTC)), "Dec 31st, 2022");
    }

    #[test]
    fn one_line_is_char_safe() {
        assert_eq!(one_line("a\nb", 10), "a b");
        assert_eq!(one_line("héllo wörld", 5), "héllo…");
    }
}
