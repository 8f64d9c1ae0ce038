use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, Utc};

/// Maps instants onto the user's wall clock.
///
/// Every day-bucketed computation takes one of these explicitly so results do
/// not depend on the ambient timezone of the process.
pub trait Calendar {
    fn localize(&self, instant: DateTime<Utc>) -> NaiveDateTime;

    /// Calendar day an instant counts toward.
    fn day_of(&self, instant: DateTime<Utc>) -> NaiveDate {
        self.localize(instant).date()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UtcCalendar;

impl Calendar for UtcCalendar {
    fn localize(&self, instant: DateTime<Utc>) -> NaiveDateTime {
        instant.naive_utc()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OffsetCalendar(pub FixedOffset);

impl OffsetCalendar {
    pub fn from_minutes(offset_minutes: i32) -> Option<Self> {
        FixedOffset::east_opt(offset_minutes.checked_mul(60)?).map(Self)
    }
}

impl Calendar for OffsetCalendar {
    fn localize(&self, instant: DateTime<Utc>) -> NaiveDateTime {
        instant.with_timezone(&self.0).naive_local()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LocalCalendar;

impl Calendar for LocalCalendar {
    fn localize(&self, instant: DateTime<Utc>) -> NaiveDateTime {
        instant.with_timezone(&Local).naive_local()
    }
}

impl<F> Calendar for F
where
    F: Fn(DateTime<Utc>) -> NaiveDateTime,
{
    fn localize(&self, instant: DateTime<Utc>) -> NaiveDateTime {
        self(instant)
    }
}
