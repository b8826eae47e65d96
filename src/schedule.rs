//! Weekly timetable expansion for the calendar view.
//!
//! Day names map to weekday numbers with Sunday as 0, while calendar dates
//! are numbered Monday = 1 through Sunday = 7. No name maps to 7, so dates
//! that fall on a Sunday never match a class, even a class scheduled on
//! "Sunday". The calendar has always behaved this way, and this module does
//! too.

use crate::models::ScheduleItem;
use chrono::{Datelike, Days, NaiveDate, Weekday};

/// How far ahead the calendar marks class dates.
pub const DEFAULT_WEEKS_AHEAD: u32 = 6;

const DAYS: [(&str, u32); 7] = [
    ("Monday", 1),
    ("Tuesday", 2),
    ("Wednesday", 3),
    ("Thursday", 4),
    ("Friday", 5),
    ("Saturday", 6),
    ("Sunday", 0),
];

/// Classes held on one calendar date.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDay<'a> {
    pub date: NaiveDate,
    pub classes: Vec<&'a ScheduleItem>,
}

/// Weekday number of a schedule day name (`"Sunday"` is 0).
pub fn day_number(name: &str) -> Option<u32> {
    DAYS.iter()
        .find(|(day, _)| *day == name)
        .map(|(_, number)| *number)
}

pub fn weekday_for(name: &str) -> Option<Weekday> {
    name.parse::<Weekday>().ok().filter(|_| day_number(name).is_some())
}

/// The schedule day name a calendar date matches, if any.
pub fn day_name_for(date: NaiveDate) -> Option<&'static str> {
    let day_of_week = date.weekday().number_from_monday();
    DAYS.iter()
        .find(|(_, number)| *number == day_of_week)
        .map(|(day, _)| *day)
}

pub fn classes_for_date(items: &[ScheduleItem], date: NaiveDate) -> Vec<&ScheduleItem> {
    let Some(day_name) = day_name_for(date) else {
        return Vec::new();
    };
    items
        .iter()
        .filter(|item| item.day.as_deref() == Some(day_name))
        .collect()
}

/// Weekly timetable ordered Monday to Sunday. Items whose day is missing or
/// unrecognised go last, keeping their original order.
pub fn weekly_timetable(items: &[ScheduleItem]) -> Vec<&ScheduleItem> {
    let mut ordered: Vec<&ScheduleItem> = items.iter().collect();
    ordered.sort_by_key(|item| {
        item.day
            .as_deref()
            .and_then(weekday_for)
            .map(|weekday| weekday.num_days_from_monday())
            .unwrap_or(u32::MAX)
    });
    ordered
}

/// Monday of the week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date.week(Weekday::Mon).first_day()
}

/// Every date from the Monday of `today`'s week through `weeks` weeks later
/// (inclusive) that has at least one class, with those classes.
pub fn expand_schedule(items: &[ScheduleItem], today: NaiveDate, weeks: u32) -> Vec<ClassDay<'_>> {
    let start = week_start(today);
    let total_days = u64::from(weeks) * 7;

    (0..=total_days)
        .filter_map(|offset| start.checked_add_days(Days::new(offset)))
        .filter_map(|date| {
            let classes = classes_for_date(items, date);
            (!classes.is_empty()).then_some(ClassDay { date, classes })
        })
        .collect()
}
