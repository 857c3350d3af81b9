use chrono::{DateTime, Duration, Local, NaiveTime, Timelike};

/// Local midnight at the start of the day containing `now`.
pub fn start_of_day(now: DateTime<Local>) -> DateTime<Local> {
    now.with_time(NaiveTime::MIN).single().unwrap_or(now)
}

/// One second before the next local midnight.
pub fn end_of_day(now: DateTime<Local>) -> DateTime<Local> {
    start_of_day(now) + Duration::days(1) - Duration::seconds(1)
}

pub fn is_within_today(date: DateTime<Local>, now: DateTime<Local>) -> bool {
    date >= start_of_day(now) && date <= end_of_day(now)
}

/// A date is overdue when it falls strictly before the start of today.
pub fn is_overdue(date: DateTime<Local>, now: DateTime<Local>) -> bool {
    date < start_of_day(now)
}

pub fn greeting(now: DateTime<Local>) -> &'static str {
    match now.hour() {
        0..=11 => "Good Morning",
        12..=17 => "Good Afternoon",
        _ => "Good Evening",
    }
}
