//! Values a view derives from an opportunity before drawing it.
//!
//! Everything here is a pure function of the record and an injected "today",
//! so any front end produces the same banners, dates and tag badges.

use crate::models::{Opportunity, Priority, Status};
use crate::theme::Tone;
use chrono::{DateTime, Datelike, NaiveDate, Utc};

/// Deadlines this close (in days) get a banner even when not urgent
pub const DEFAULT_ALERT_WINDOW_DAYS: i64 = 7;

/// Tags shown on a card before the rest collapse into a "+N" badge
pub const MAX_VISIBLE_TAGS: usize = 3;

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// Whole days from `today` until `deadline`; negative once it has passed
pub fn days_remaining(deadline: NaiveDate, today: NaiveDate) -> i64 {
    (deadline - today).num_days()
}

/// Days until the deadline from an exact instant, rounded up
///
/// The deadline counts from midnight UTC, so any part of a day left counts
/// as a full day. Not clamped.
pub fn days_remaining_from(deadline: NaiveDate, now: DateTime<Utc>) -> i64 {
    let deadline_start = deadline.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    match deadline_start {
        Some(start) => {
            let seconds = (start - now).num_seconds();
            -(-seconds).div_euclid(SECONDS_PER_DAY)
        }
        None => days_remaining(deadline, now.date_naive()),
    }
}

/// Alert strip shown at the top of a card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrgencyBanner {
    /// Urgent priority, regardless of the date
    Imminent,
    /// Inside the alert window, deadline still ahead (or today)
    DaysLeft(i64),
    /// Inside the alert window because the deadline already passed
    Overdue(i64),
}

impl UrgencyBanner {
    pub fn message(&self) -> String {
        match self {
            UrgencyBanner::Imminent => "¡Fecha límite urgente!".to_string(),
            UrgencyBanner::DaysLeft(days) => format!("Solo {} días restantes", days),
            UrgencyBanner::Overdue(days) => {
                format!("Plazo vencido hace {} días", days.unsigned_abs())
            }
        }
    }

    pub fn tone(&self) -> Tone {
        match self {
            UrgencyBanner::Imminent | UrgencyBanner::Overdue(_) => Tone::Danger,
            UrgencyBanner::DaysLeft(_) => Tone::Warning,
        }
    }
}

/// Banner for a card, `None` when nothing is pressing
pub fn urgency_banner(
    priority: Priority,
    days_remaining: i64,
    alert_window_days: i64,
) -> Option<UrgencyBanner> {
    if priority == Priority::Urgent {
        Some(UrgencyBanner::Imminent)
    } else if days_remaining <= alert_window_days {
        if days_remaining < 0 {
            Some(UrgencyBanner::Overdue(days_remaining))
        } else {
            Some(UrgencyBanner::DaysLeft(days_remaining))
        }
    } else {
        None
    }
}

/// First few tags plus the count of the ones left out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagDisplay<'a> {
    pub shown: &'a [String],
    pub overflow: usize,
}

impl<'a> TagDisplay<'a> {
    pub fn from_tags(tags: &'a [String]) -> Self {
        let visible = tags.len().min(MAX_VISIBLE_TAGS);
        Self {
            shown: &tags[..visible],
            overflow: tags.len() - visible,
        }
    }

    /// "+N" badge text, if any tags were cut
    pub fn overflow_badge(&self) -> Option<String> {
        (self.overflow > 0).then(|| format!("+{}", self.overflow))
    }
}

/// Numeric day/month/year, e.g. `15/4/2024`
pub fn format_deadline(date: NaiveDate) -> String {
    format!("{}/{}/{}", date.day(), date.month(), date.year())
}

const SHORT_MONTHS: [&str; 12] = [
    "ene", "feb", "mar", "abr", "may", "jun", "jul", "ago", "sept", "oct", "nov", "dic",
];

/// Short Spanish form used on the timeline, e.g. `15 mar 2024`
pub fn format_timeline_date(date: NaiveDate) -> String {
    let month = SHORT_MONTHS
        .get(date.month0() as usize)
        .copied()
        .unwrap_or("");
    format!("{} {} {}", date.day(), month, date.year())
}

/// Main button label on a card
pub fn action_label(status: Status) -> &'static str {
    match status {
        Status::New => "Evaluar",
        Status::Evaluating | Status::Preparing | Status::Submitted => "Ver Detalles",
    }
}

/// Only fresh opportunities get the filled, primary action button
pub fn is_primary_action(status: Status) -> bool {
    status == Status::New
}

/// Everything a renderer needs for one opportunity card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpportunityCardView<'a> {
    pub opportunity: &'a Opportunity,
    pub days_remaining: i64,
    pub banner: Option<UrgencyBanner>,
    pub deadline_label: String,
    pub tags: TagDisplay<'a>,
    pub action_label: &'static str,
    pub primary_action: bool,
    /// Urgent cards get a highlighted frame
    pub highlighted: bool,
}

impl<'a> OpportunityCardView<'a> {
    pub fn build(opportunity: &'a Opportunity, today: NaiveDate, alert_window_days: i64) -> Self {
        let days = days_remaining(opportunity.deadline, today);
        Self {
            opportunity,
            days_remaining: days,
            banner: urgency_banner(opportunity.priority, days, alert_window_days),
            deadline_label: format_deadline(opportunity.deadline),
            tags: TagDisplay::from_tags(&opportunity.tags),
            action_label: action_label(opportunity.status),
            primary_action: is_primary_action(opportunity.status),
            highlighted: opportunity.priority == Priority::Urgent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{FixtureSource, OpportunitySource};
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_days_remaining_counts_calendar_days() {
        assert_eq!(days_remaining(date(2024, 4, 15), date(2024, 4, 10)), 5);
        assert_eq!(days_remaining(date(2024, 4, 15), date(2024, 4, 15)), 0);
        assert_eq!(days_remaining(date(2024, 3, 1), date(2024, 2, 28)), 2); // leap year
    }

    #[test]
    fn test_past_deadline_is_negative() {
        assert_eq!(days_remaining(date(2024, 4, 15), date(2024, 4, 20)), -5);
    }

    #[test]
    fn test_days_remaining_from_instant_rounds_up() {
        let midnight = Utc.with_ymd_and_hms(2024, 4, 10, 0, 0, 0).unwrap();
        assert_eq!(days_remaining_from(date(2024, 4, 15), midnight), 5);

        let afternoon = Utc.with_ymd_and_hms(2024, 4, 10, 15, 30, 0).unwrap();
        assert_eq!(days_remaining_from(date(2024, 4, 15), afternoon), 5);

        let just_after = Utc.with_ymd_and_hms(2024, 4, 15, 0, 0, 1).unwrap();
        assert_eq!(days_remaining_from(date(2024, 4, 15), just_after), 0);

        let two_days_late = Utc.with_ymd_and_hms(2024, 4, 17, 12, 0, 0).unwrap();
        assert_eq!(days_remaining_from(date(2024, 4, 15), two_days_late), -2);
    }

    #[test]
    fn test_banner_branches() {
        // Five days out: non-urgent gets the countdown, urgent the fixed text
        assert_eq!(
            urgency_banner(Priority::Medium, 5, DEFAULT_ALERT_WINDOW_DAYS),
            Some(UrgencyBanner::DaysLeft(5))
        );
        assert_eq!(
            urgency_banner(Priority::Urgent, 5, DEFAULT_ALERT_WINDOW_DAYS),
            Some(UrgencyBanner::Imminent)
        );
        assert_eq!(
            urgency_banner(Priority::Urgent, 90, DEFAULT_ALERT_WINDOW_DAYS),
            Some(UrgencyBanner::Imminent)
        );
        assert_eq!(
            urgency_banner(Priority::High, 7, DEFAULT_ALERT_WINDOW_DAYS),
            Some(UrgencyBanner::DaysLeft(7))
        );
        assert_eq!(urgency_banner(Priority::High, 8, DEFAULT_ALERT_WINDOW_DAYS), None);
        assert_eq!(
            urgency_banner(Priority::Low, -3, DEFAULT_ALERT_WINDOW_DAYS),
            Some(UrgencyBanner::Overdue(-3))
        );
    }

    #[test]
    fn test_banner_messages() {
        assert_eq!(UrgencyBanner::Imminent.message(), "¡Fecha límite urgente!");
        assert_eq!(UrgencyBanner::DaysLeft(5).message(), "Solo 5 días restantes");
        assert_eq!(UrgencyBanner::Overdue(-3).message(), "Plazo vencido hace 3 días");
        assert_eq!(UrgencyBanner::DaysLeft(5).tone(), Tone::Warning);
    }

    #[test]
    fn test_tag_truncation() {
        let tags: Vec<String> = ["IA", "Digital", "Innovación", "Colaborativo", "UE"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let display = TagDisplay::from_tags(&tags);
        assert_eq!(display.shown.len(), 3);
        assert_eq!(display.shown[2], "Innovación");
        assert_eq!(display.overflow, 2);
        assert_eq!(display.overflow_badge().as_deref(), Some("+2"));

        let few = TagDisplay::from_tags(&tags[..2]);
        assert_eq!(few.shown.len(), 2);
        assert_eq!(few.overflow_badge(), None);

        let none = TagDisplay::from_tags(&[]);
        assert!(none.shown.is_empty());
        assert_eq!(none.overflow, 0);
    }

    #[test]
    fn test_date_formats() {
        assert_eq!(format_deadline(date(2024, 4, 15)), "15/4/2024");
        assert_eq!(format_timeline_date(date(2024, 3, 15)), "15 mar 2024");
        assert_eq!(format_timeline_date(date(2024, 9, 1)), "1 sept 2024");
    }

    #[test]
    fn test_action_labels() {
        assert_eq!(action_label(Status::New), "Evaluar");
        assert_eq!(action_label(Status::Submitted), "Ver Detalles");
        assert!(is_primary_action(Status::New));
        assert!(!is_primary_action(Status::Preparing));
    }

    #[test]
    fn test_card_view_for_fixture() {
        let records = FixtureSource.fetch().unwrap();
        let today = date(2024, 4, 10);

        let first = OpportunityCardView::build(&records[0], today, DEFAULT_ALERT_WINDOW_DAYS);
        assert_eq!(first.days_remaining, 5);
        assert_eq!(first.banner, Some(UrgencyBanner::Imminent));
        assert!(first.highlighted);
        assert_eq!(first.tags.overflow, 1);
        assert_eq!(first.action_label, "Evaluar");

        let second = OpportunityCardView::build(&records[1], today, DEFAULT_ALERT_WINDOW_DAYS);
        assert_eq!(second.days_remaining, 21);
        assert_eq!(second.banner, None);
        assert!(!second.primary_action);
        assert_eq!(second.deadline_label, "1/5/2024");
    }
}
