//! One attendance slot per trainer per calendar day.
//!
//! A day moves `Unmarked → Present → CheckedOut` or `Unmarked → Absent`.
//! Absent and CheckedOut close the day. Replaying the event that produced the
//! current slot is accepted and changes nothing, so a retried request is safe.

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DayStatus {
    #[serde(rename = "present")]
    Present,
    #[serde(rename = "absent")]
    Absent,
    #[serde(rename = "checkout")]
    CheckedOut,
}

impl DayStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Present => "present",
            Self::Absent => "absent",
            Self::CheckedOut => "checkout",
        }
    }

    /// Present and checked-out days both count as attended.
    pub fn attended(self) -> bool {
        matches!(self, Self::Present | Self::CheckedOut)
    }
}

impl fmt::Display for DayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySlot {
    pub status: DayStatus,
    #[serde(default)]
    pub total_hour: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    MarkPresent,
    MarkAbsent,
    Checkout,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceEvent {
    pub date: NaiveDate,
    pub kind: EventKind,
    #[serde(default)]
    pub total_hour: f64,
}

impl AttendanceEvent {
    pub fn mark_present(date: NaiveDate) -> Self {
        Self {
            date,
            kind: EventKind::MarkPresent,
            total_hour: 0.0,
        }
    }

    pub fn mark_absent(date: NaiveDate) -> Self {
        Self {
            date,
            kind: EventKind::MarkAbsent,
            total_hour: 0.0,
        }
    }

    pub fn checkout(date: NaiveDate, total_hour: f64) -> Self {
        Self {
            date,
            kind: EventKind::Checkout,
            total_hour,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttendanceError {
    #[error("cannot check out on {0}: not checked in")]
    NotCheckedIn(NaiveDate),
    #[error("attendance for {date} is already closed ({status})")]
    DayClosed { date: NaiveDate, status: DayStatus },
    #[error("already marked present on {0}")]
    AlreadyPresent(NaiveDate),
}

/// Next slot for `current` under `event`, or the reason the transition is refused.
pub fn next_slot(current: Option<&DaySlot>, event: &AttendanceEvent) -> Result<DaySlot, AttendanceError> {
    use DayStatus::*;
    use EventKind::*;

    let hours = event.total_hour.max(0.0);
    let Some(slot) = current else {
        return match event.kind {
            MarkPresent => Ok(DaySlot {
                status: Present,
                total_hour: 0.0,
            }),
            MarkAbsent => Ok(DaySlot {
                status: Absent,
                total_hour: 0.0,
            }),
            Checkout => Err(AttendanceError::NotCheckedIn(event.date)),
        };
    };

    match (slot.status, event.kind) {
        (Present, MarkPresent) | (Absent, MarkAbsent) => Ok(*slot),
        (Present, MarkAbsent) => Err(AttendanceError::AlreadyPresent(event.date)),
        (Present, Checkout) => Ok(DaySlot {
            status: CheckedOut,
            total_hour: hours,
        }),
        (Absent, Checkout) => Err(AttendanceError::NotCheckedIn(event.date)),
        (CheckedOut, Checkout) if slot.total_hour == hours => Ok(*slot),
        (status, _) => Err(AttendanceError::DayClosed {
            date: event.date,
            status,
        }),
    }
}

/// Day slots keyed by ISO date, ordered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Calendar(BTreeMap<NaiveDate, DaySlot>);

impl Calendar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, date: NaiveDate) -> Option<&DaySlot> {
        self.0.get(&date)
    }

    pub fn insert(&mut self, date: NaiveDate, slot: DaySlot) {
        self.0.insert(date, slot);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NaiveDate, &DaySlot)> {
        self.0.iter()
    }

    /// Applies `event` in place. On error the calendar is left untouched.
    pub fn apply(&mut self, event: &AttendanceEvent) -> Result<&DaySlot, AttendanceError> {
        let slot = next_slot(self.0.get(&event.date), event)?;
        self.0.insert(event.date, slot);
        Ok(&self.0[&event.date])
    }

    /// Overwrites the local view with the server's calendar and returns the
    /// days whose slot changed.
    pub fn reconcile(&mut self, server: Calendar) -> Vec<NaiveDate> {
        let mut changed: Vec<NaiveDate> = server
            .0
            .iter()
            .filter(|(date, slot)| self.0.get(*date) != Some(*slot))
            .map(|(date, _)| *date)
            .collect();
        changed.extend(self.0.keys().filter(|d| !server.0.contains_key(*d)).copied());
        changed.sort_unstable();
        self.0 = server.0;
        changed
    }
}

impl FromIterator<(NaiveDate, DaySlot)> for Calendar {
    fn from_iter<I: IntoIterator<Item = (NaiveDate, DaySlot)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

pub fn apply_event(calendar: &Calendar, event: &AttendanceEvent) -> Result<Calendar, AttendanceError> {
    let mut next = calendar.clone();
    next.apply(event)?;
    Ok(next)
}

/// The day an action is recorded under: the server's date when it supplied
/// one, else the caller's local calendar day.
pub fn event_date<Tz: TimeZone>(server_date: Option<NaiveDate>, local_now: &DateTime<Tz>) -> NaiveDate {
    server_date.unwrap_or_else(|| local_now.date_naive())
}

/// Hours between check-in and checkout, rounded to two decimals.
pub fn elapsed_hours(check_in: DateTime<Utc>, check_out: DateTime<Utc>) -> f64 {
    let seconds = (check_out - check_in).num_seconds().max(0) as f64;
    (seconds / 3600.0 * 100.0).round() / 100.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySummary {
    pub year: i32,
    pub month: u32,
    pub present_days: u32,
    pub absent_days: u32,
    pub total_days: u32,
    pub percentage: u32,
}

impl MonthlySummary {
    pub fn for_month(calendar: &Calendar, year: i32, month: u32) -> Self {
        let (mut present, mut total) = (0u32, 0u32);
        for (date, slot) in calendar.iter() {
            if date.year() == year && date.month() == month {
                total += 1;
                if slot.status.attended() {
                    present += 1;
                }
            }
        }
        let percentage = if total > 0 {
            (f64::from(present) / f64::from(total) * 100.0).round() as u32
        } else {
            0
        };
        Self {
            year,
            month,
            present_days: present,
            absent_days: total - present,
            total_days: total,
            percentage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, FixedOffset};

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn present_then_checkout_then_replay_is_rejected() {
        let d = day("2024-05-01");
        let cal = apply_event(&Calendar::new(), &AttendanceEvent::mark_present(d)).unwrap();
        assert_eq!(cal.get(d).unwrap().status, DayStatus::Present);

        let cal = apply_event(&cal, &AttendanceEvent::checkout(d, 7.5)).unwrap();
        assert_eq!(
            cal.get(d),
            Some(&DaySlot {
                status: DayStatus::CheckedOut,
                total_hour: 7.5
            })
        );
        assert_eq!(cal.len(), 1);

        let err = apply_event(&cal, &AttendanceEvent::mark_present(d)).unwrap_err();
        assert_eq!(
            err,
            AttendanceError::DayClosed {
                date: d,
                status: DayStatus::CheckedOut
            }
        );
    }

    #[test]
    fn replaying_an_event_is_idempotent() {
        let d = day("2024-05-02");
        let events = [
            AttendanceEvent::mark_present(d),
            AttendanceEvent::mark_absent(d),
        ];
        for e in events {
            let once = apply_event(&Calendar::new(), &e).unwrap();
            let twice = apply_event(&once, &e).unwrap();
            assert_eq!(once, twice);
        }

        let present = apply_event(&Calendar::new(), &AttendanceEvent::mark_present(d)).unwrap();
        let out = AttendanceEvent::checkout(d, 3.25);
        let once = apply_event(&present, &out).unwrap();
        assert_eq!(apply_event(&once, &out).unwrap(), once);
    }

    #[test]
    fn checkout_requires_check_in() {
        let d = day("2024-05-03");
        let mut cal = Calendar::new();
        assert_eq!(
            cal.apply(&AttendanceEvent::checkout(d, 1.0)).unwrap_err(),
            AttendanceError::NotCheckedIn(d)
        );
        assert!(cal.is_empty());

        cal.apply(&AttendanceEvent::mark_absent(d)).unwrap();
        let before = cal.clone();
        assert!(cal.apply(&AttendanceEvent::checkout(d, 1.0)).is_err());
        assert_eq!(cal, before);
    }

    #[test]
    fn absent_after_present_is_refused() {
        let d = day("2024-05-04");
        let cal = apply_event(&Calendar::new(), &AttendanceEvent::mark_present(d)).unwrap();
        assert_eq!(
            apply_event(&cal, &AttendanceEvent::mark_absent(d)).unwrap_err(),
            AttendanceError::AlreadyPresent(d)
        );
    }

    #[test]
    fn server_date_wins_over_local_day() {
        let tz = FixedOffset::east_opt(5 * 3600 + 1800).unwrap();
        let late = tz.with_ymd_and_hms(2024, 5, 1, 23, 50, 0).unwrap();
        assert_eq!(event_date(None, &late), day("2024-05-01"));
        assert_eq!(event_date(Some(day("2024-05-02")), &late), day("2024-05-02"));
    }

    #[test]
    fn elapsed_hours_rounds_and_clamps() {
        let start = Utc::now();
        assert_eq!(elapsed_hours(start, start + Duration::minutes(90)), 1.5);
        assert_eq!(elapsed_hours(start, start + Duration::seconds(4000)), 1.11);
        assert_eq!(elapsed_hours(start, start - Duration::hours(1)), 0.0);
    }

    #[test]
    fn reconcile_takes_server_view() {
        let d1 = day("2024-05-01");
        let d2 = day("2024-05-02");
        let mut local = Calendar::new();
        local.apply(&AttendanceEvent::mark_present(d1)).unwrap();
        local.apply(&AttendanceEvent::mark_present(d2)).unwrap();

        let server: Calendar = [(
            d1,
            DaySlot {
                status: DayStatus::CheckedOut,
                total_hour: 6.0,
            },
        )]
        .into_iter()
        .collect();

        let changed = local.reconcile(server.clone());
        assert_eq!(changed, vec![d1, d2]);
        assert_eq!(local, server);
    }

    #[test]
    fn calendar_wire_shape() {
        let json = r#"{"2024-05-01":{"status":"checkout","totalHour":8.0},"2024-05-02":{"status":"absent"}}"#;
        let cal: Calendar = serde_json::from_str(json).unwrap();
        assert_eq!(cal.get(day("2024-05-01")).unwrap().status, DayStatus::CheckedOut);
        assert_eq!(cal.get(day("2024-05-02")).unwrap().total_hour, 0.0);
    }

    #[test]
    fn monthly_summary_counts_checked_out_as_present() {
        let cal: Calendar = [
            ("2024-05-01", DayStatus::CheckedOut),
            ("2024-05-02", DayStatus::Present),
            ("2024-05-03", DayStatus::Absent),
            ("2024-06-01", DayStatus::Absent),
        ]
        .into_iter()
        .map(|(d, status)| {
            (
                day(d),
                DaySlot {
                    status,
                    total_hour: 0.0,
                },
            )
        })
        .collect();

        let s = MonthlySummary::for_month(&cal, 2024, 5);
        assert_eq!((s.present_days, s.absent_days, s.total_days), (2, 1, 3));
        assert_eq!(s.percentage, 67);
        assert_eq!(MonthlySummary::for_month(&cal, 2023, 1).percentage, 0);
    }
}
