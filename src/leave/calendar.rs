use chrono::{Datelike, NaiveDate, Weekday};
use once_cell::sync::Lazy;

use crate::model::holiday::{HolidayKind, PublicHoliday};

/// UAE public holidays for 2026; islamic dates are estimates.
static UAE_PUBLIC_HOLIDAYS_2026: Lazy<Vec<PublicHoliday>> = Lazy::new(|| {
    use HolidayKind::{Fixed, Islamic};
    [
        ((1, 1), "New Year's Day", Fixed),
        ((3, 21), "Isra and Mi'raj (estimated)", Islamic),
        ((5, 23), "Eid al-Fitr (estimated)", Islamic),
        ((5, 24), "Eid al-Fitr (estimated)", Islamic),
        ((5, 25), "Eid al-Fitr (estimated)", Islamic),
        ((6, 15), "Arafat Day (estimated)", Islamic),
        ((7, 30), "Eid al-Adha (estimated)", Islamic),
        ((7, 31), "Eid al-Adha (estimated)", Islamic),
        ((8, 1), "Eid al-Adha (estimated)", Islamic),
        ((8, 20), "Islamic New Year (estimated)", Islamic),
        ((10, 29), "Prophet Muhammad's Birthday (estimated)", Islamic),
        ((12, 2), "Commemoration Day", Fixed),
        ((12, 3), "National Day", Fixed),
    ]
    .into_iter()
    .filter_map(|((month, day), name, kind)| {
        NaiveDate::from_ymd_opt(2026, month, day).map(|date| PublicHoliday {
            date,
            name: name.to_string(),
            kind,
        })
    })
    .collect()
});

/// Friday and Saturday make up the weekend.
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Fri | Weekday::Sat)
}

/// Non-weekend days in `[start, end]`. Public holidays are still counted;
/// use [`HolidayCalendar::working_days`] to drop them as well.
pub fn business_days(start: NaiveDate, end: NaiveDate) -> u32 {
    if start > end {
        return 0;
    }
    let total = (end - start).num_days() + 1;
    let (weeks, rest) = (total / 7, total % 7);

    // every full week holds exactly five business days; the tail is under a week
    let tail = (0..rest)
        .filter(|offset| {
            let weekday = (start.weekday().num_days_from_monday() as i64 + offset) % 7;
            !matches!(weekday, 4 | 5) // Fri, Sat
        })
        .count() as i64;

    (weeks * 5 + tail) as u32
}

#[derive(Debug, Clone)]
pub struct HolidayCalendar {
    holidays: Vec<PublicHoliday>,
}

impl Default for HolidayCalendar {
    fn default() -> Self {
        Self::new(UAE_PUBLIC_HOLIDAYS_2026.clone())
    }
}

impl HolidayCalendar {
    pub fn new(mut holidays: Vec<PublicHoliday>) -> Self {
        holidays.sort_by_key(|h| h.date);
        Self { holidays }
    }

    pub fn holidays(&self) -> &[PublicHoliday] {
        &self.holidays
    }

    pub fn holidays_between(&self, start: NaiveDate, end: NaiveDate) -> Vec<PublicHoliday> {
        self.holidays
            .iter()
            .filter(|h| h.date >= start && h.date <= end)
            .cloned()
            .collect()
    }

    /// Business days in `[start, end]` minus public holidays falling on them.
    pub fn working_days(&self, start: NaiveDate, end: NaiveDate) -> u32 {
        let holidays_on_business_days = self
            .holidays
            .iter()
            .filter(|h| h.date >= start && h.date <= end && !is_weekend(h.date))
            .count() as u32;
        business_days(start, end).saturating_sub(holidays_on_business_days)
    }

    /// Days a request for `[start, end]` is charged under the configured policy.
    pub fn chargeable_days(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        exclude_holidays: bool,
    ) -> u32 {
        if exclude_holidays {
            self.working_days(start, end)
        } else {
            business_days(start, end)
        }
    }
}
