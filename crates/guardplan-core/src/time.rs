//! Clock-time and date formatting for sheet labels

use chrono::{Datelike, NaiveDate, Weekday};

/// Length of a day in hours; period labels saturate here
pub const HOURS_PER_DAY: f64 = 24.0;

/// Format decimal hours as `HH:MM`.
///
/// Minutes are rounded to the nearest whole minute, so `1.999` becomes
/// `02:00`. Negative values clamp to `00:00`; values past a day are not
/// wrapped (`24.0` is `24:00`).
pub fn decimal_to_time(hours: f64) -> String {
    let total_minutes = (hours * 60.0).round().max(0.0) as u64;
    format!("{:02}:{:02}", total_minutes / 60, total_minutes % 60)
}

/// Header label of period `index` (0-based): `"HH:MM\n-\nHH:MM"`.
///
/// Both bounds saturate at 24:00 so a plan that overruns the day never
/// produces a label past midnight.
pub fn period_label(index: u16, period_duration: u32) -> String {
    let duration = f64::from(period_duration);
    let start = (f64::from(index) * duration / 60.0).min(HOURS_PER_DAY);
    let end = ((f64::from(index) + 1.0) * duration / 60.0).min(HOURS_PER_DAY);
    format!("{}\n-\n{}", decimal_to_time(start), decimal_to_time(end))
}

/// Long French date, e.g. `dimanche 18 octobre 2026`
pub fn long_french_date(date: NaiveDate) -> String {
    let weekday = match date.weekday() {
        Weekday::Mon => "lundi",
        Weekday::Tue => "mardi",
        Weekday::Wed => "mercredi",
        Weekday::Thu => "jeudi",
        Weekday::Fri => "vendredi",
        Weekday::Sat => "samedi",
        Weekday::Sun => "dimanche",
    };
    let month = match date.month() {
        1 => "janvier",
        2 => "février",
        3 => "mars",
        4 => "avril",
        5 => "mai",
        6 => "juin",
        7 => "juillet",
        8 => "août",
        9 => "septembre",
        10 => "octobre",
        11 => "novembre",
        _ => "décembre",
    };
    format!("{} {} {} {}", weekday, date.day(), month, date.year())
}
