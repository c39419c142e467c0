//! Contact hand-off: builds pre-filled messaging links. Nothing is sent
//! from here — the operator opens the link and presses send themselves.

use chrono::{Datelike, NaiveDate, Weekday};

/// Dialing prefix prepended to local numbers (leading 0 kept, as the
/// messaging service expects).
const COUNTRY_PREFIX: &str = "2";

/// Build a `wa.me` link that opens a chat with the message pre-filled.
pub fn build_contact_link(phone: &str, message: &str) -> String {
    let phone = phone.trim();
    let international = if phone.starts_with('0') {
        format!("{COUNTRY_PREFIX}{phone}")
    } else {
        phone.to_string()
    };
    let query = serde_urlencoded::to_string(&[("text", message)]).unwrap_or_default();
    format!("https://wa.me/{international}?{query}")
}

/// Egyptian summer time: last Friday of April through last Thursday of
/// October.
pub fn is_summer_time(date: NaiveDate) -> bool {
    let (Some(start), Some(end)) = (
        last_weekday(date.year(), 4, 30, Weekday::Fri),
        last_weekday(date.year(), 10, 31, Weekday::Thu),
    ) else {
        return false;
    };
    date >= start && date <= end
}

fn last_weekday(year: i32, month: u32, last_day: u32, target: Weekday) -> Option<NaiveDate> {
    let mut date = NaiveDate::from_ymd_opt(year, month, last_day)?;
    while date.weekday() != target {
        date = date.pred_opt()?;
    }
    Some(date)
}

/// Meeting start time for the given date, shifted for summer time.
pub fn meeting_time(date: NaiveDate) -> &'static str {
    if is_summer_time(date) {
        "7:00 مساءً"
    } else {
        "6:30 مساءً"
    }
}

fn weekday_name(date: NaiveDate) -> &'static str {
    match date.weekday() {
        Weekday::Mon => "الاثنين",
        Weekday::Tue => "الثلاثاء",
        Weekday::Wed => "الأربعاء",
        Weekday::Thu => "الخميس",
        Weekday::Fri => "الجمعة",
        Weekday::Sat => "السبت",
        Weekday::Sun => "الأحد",
    }
}

/// Pre-meeting reminder for every family.
pub fn reminder_message(meeting_date: NaiveDate) -> String {
    format!(
        "تذكير بميعاد الاجتماع العائلي اليوم ({}) الساعة {}. حضوركم يضيف بهجة لليوم!",
        weekday_name(meeting_date),
        meeting_time(meeting_date)
    )
}

/// Check-in message for families marked absent.
pub fn absentee_message() -> &'static str {
    "افتقدناكم في اجتماع اليوم! نأمل أن تكونوا بخير ونتطلع لرؤيتكم الأسبوع القادم."
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_numbers_get_country_prefix() {
        let link = build_contact_link("01234567890", "hi");
        assert!(link.starts_with("https://wa.me/201234567890?text="));
    }

    #[test]
    fn international_numbers_pass_through() {
        let link = build_contact_link("201234567890", "hi");
        assert!(link.starts_with("https://wa.me/201234567890?text="));
    }

    #[test]
    fn message_is_url_encoded() {
        let link = build_contact_link("0100", "مرحبا بكم");
        assert!(!link.contains("مرحبا"));
        assert!(link.contains('%'));
    }

    #[test]
    fn summer_time_window() {
        // 2025: last Friday of April = Apr 25, last Thursday of October = Oct 30.
        let d = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();
        assert!(!is_summer_time(d(2025, 4, 24)));
        assert!(is_summer_time(d(2025, 4, 25)));
        assert!(is_summer_time(d(2025, 7, 15)));
        assert!(is_summer_time(d(2025, 10, 30)));
        assert!(!is_summer_time(d(2025, 10, 31)));
        assert!(!is_summer_time(d(2025, 1, 10)));
    }

    #[test]
    fn meeting_time_shifts_with_season() {
        let d = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();
        assert_eq!(meeting_time(d(2025, 7, 15)), "7:00 مساءً");
        assert_eq!(meeting_time(d(2025, 1, 10)), "6:30 مساءً");
    }
}
