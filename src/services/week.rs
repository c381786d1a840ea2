use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Timelike, Weekday};
use serde::{Deserialize, Serialize};

/// Number of operating days in a menu week (Monday to Friday).
pub const MENU_DAYS: u32 = 5;

/// One operating day: the real date plus its dashboard label (`"lundi 04/03"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuDay {
    pub date: NaiveDate,
    pub label: String,
}

impl MenuDay {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            label: day_label(date),
        }
    }

    /// Upper-case French weekday token used in `MenuJourDto::jour`.
    pub fn jour(&self) -> &'static str {
        jour_token(self.date.weekday())
    }
}

/// Monday of the ISO week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// The five operating days starting at the Monday of `date`'s week.
pub fn menu_days(date: NaiveDate) -> Vec<MenuDay> {
    let monday = week_start(date);
    (0..MENU_DAYS)
        .map(|i| MenuDay::new(monday + Duration::days(i as i64)))
        .collect()
}

/// Monday of the week the kitchen is currently composing.
///
/// From Thursday at `cutoff_hour` onwards, and over the weekend, next week is the
/// editable one.
pub fn current_menu_monday<Tz: TimeZone>(now: &DateTime<Tz>, cutoff_hour: u32) -> NaiveDate {
    let today = now.date_naive();
    let monday = week_start(today);
    let roll_over = match today.weekday() {
        Weekday::Thu => now.hour() >= cutoff_hour,
        Weekday::Fri | Weekday::Sat | Weekday::Sun => true,
        _ => false,
    };
    if roll_over {
        monday + Duration::days(7)
    } else {
        monday
    }
}

/// Every Monday from the one on or before the 1st of the month up to its last day.
pub fn mondays_in_month(year: i32, month: u32) -> Vec<NaiveDate> {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return Vec::new();
    };
    let last = first
        .checked_add_months(chrono::Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(first);

    let mut mondays = Vec::new();
    let mut current = week_start(first);
    while current <= last {
        mondays.push(current);
        current += Duration::days(7);
    }
    mondays
}

/// Dashboard label of a day: lower-case French weekday and `dd/MM`.
pub fn day_label(date: NaiveDate) -> String {
    format!(
        "{} {}",
        jour_token(date.weekday()).to_lowercase(),
        date.format("%d/%m")
    )
}

pub fn jour_token(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "LUNDI",
        Weekday::Tue => "MARDI",
        Weekday::Wed => "MERCREDI",
        Weekday::Thu => "JEUDI",
        Weekday::Fri => "VENDREDI",
        Weekday::Sat => "SAMEDI",
        Weekday::Sun => "DIMANCHE",
    }
}

/// Map a French `jour` token to the backend's English one. Unknown tokens pass through.
pub fn backend_jour(token: &str) -> String {
    let english = match token.to_uppercase().as_str() {
        "LUNDI" => "MONDAY",
        "MARDI" => "TUESDAY",
        "MERCREDI" => "WEDNESDAY",
        "JEUDI" => "THURSDAY",
        "VENDREDI" => "FRIDAY",
        "SAMEDI" => "SATURDAY",
        "DIMANCHE" => "SUNDAY",
        _ => return token.to_string(),
    };
    english.to_string()
}

/// Parse a legacy `"<weekday> dd/MM"` label, inferring the year from the caller.
///
/// Weeks that straddle New Year resolve to the wrong year with this rule; prefer
/// [`MenuDay::date`].
pub fn parse_day_label(label: &str, year: i32) -> Option<NaiveDate> {
    let date_part = label.split_whitespace().nth(1)?;
    let (day, month) = date_part.split_once('/')?;
    NaiveDate::from_ymd_opt(year, month.trim().parse().ok()?, day.trim().parse().ok()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn tunis(y: i32, m: u32, d: u32, h: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(3600)
            .unwrap()
            .with_ymd_and_hms(y, m, d, h, 0, 0)
            .unwrap()
    }

    #[test]
    fn week_start_is_monday() {
        assert_eq!(week_start(date(2024, 3, 6)), date(2024, 3, 4));
        assert_eq!(week_start(date(2024, 3, 4)), date(2024, 3, 4));
        assert_eq!(week_start(date(2024, 3, 10)), date(2024, 3, 4));
    }

    #[test]
    fn menu_days_cover_monday_to_friday_with_labels() {
        let days = menu_days(date(2024, 3, 7));
        assert_eq!(days.len(), 5);
        assert_eq!(days[0].date, date(2024, 3, 4));
        assert_eq!(days[0].label, "lundi 04/03");
        assert_eq!(days[0].jour(), "LUNDI");
        assert_eq!(days[4].label, "vendredi 08/03");
    }

    #[test]
    fn menu_days_keep_real_year_across_new_year() {
        let days = menu_days(date(2024, 12, 30));
        assert_eq!(days[0].date, date(2024, 12, 30));
        assert_eq!(days[2].date, date(2025, 1, 1));
        assert_eq!(days[2].label, "mercredi 01/01");
    }

    #[test]
    fn current_week_rolls_over_thursday_evening() {
        // Wednesday 2024-03-06
        assert_eq!(current_menu_monday(&tunis(2024, 3, 6, 20), 17), date(2024, 3, 4));
        // Thursday before and after the cutoff
        assert_eq!(current_menu_monday(&tunis(2024, 3, 7, 16), 17), date(2024, 3, 4));
        assert_eq!(current_menu_monday(&tunis(2024, 3, 7, 17), 17), date(2024, 3, 11));
        // Weekend targets next week
        assert_eq!(current_menu_monday(&tunis(2024, 3, 10, 9), 17), date(2024, 3, 11));
    }

    #[test]
    fn mondays_in_month_start_before_the_first() {
        // March 2024 starts on a Friday.
        let mondays = mondays_in_month(2024, 3);
        assert_eq!(mondays.first(), Some(&date(2024, 2, 26)));
        assert_eq!(mondays.last(), Some(&date(2024, 3, 25)));
        assert_eq!(mondays.len(), 5);

        assert!(mondays_in_month(2024, 13).is_empty());
    }

    #[test]
    fn jour_tokens_map_to_backend_names() {
        assert_eq!(backend_jour("LUNDI"), "MONDAY");
        assert_eq!(backend_jour("vendredi"), "FRIDAY");
        assert_eq!(backend_jour("MONDAY"), "MONDAY");
    }

    #[test]
    fn legacy_label_uses_given_year() {
        assert_eq!(parse_day_label("lundi 04/03", 2024), Some(date(2024, 3, 4)));
        assert_eq!(parse_day_label("lundi", 2024), None);
        assert_eq!(parse_day_label("lundi 31/02", 2024), None);
    }
}
