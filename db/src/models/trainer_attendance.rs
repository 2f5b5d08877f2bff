//! Persisted attendance day-slots.
//!
//! The table has one row per `(trainer_id, date)`. Every write goes through
//! [`hierarchy::attendance::next_slot`], so the stored row always follows the
//! day-slot state machine; check-in and checkout update the same row.

use chrono::{DateTime, NaiveDate, Utc};
use hierarchy::Location;
use hierarchy::attendance::{
    AttendanceError, AttendanceEvent, Calendar, DaySlot, DayStatus, EventKind, elapsed_hours, next_slot,
};
use sea_orm::entity::prelude::*;
use sea_orm::{JoinType, QueryOrder, QuerySelect, Set, TransactionTrait};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "trainer_attendance")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub trainer_id: i64,
    #[sea_orm(primary_key, auto_increment = false)]
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub check_in_at: Option<DateTime<Utc>>,
    pub check_out_at: Option<DateTime<Utc>>,
    pub total_hour: f64,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Display, EnumString, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "attendance_status")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum AttendanceStatus {
    #[sea_orm(string_value = "present")]
    Present,

    #[sea_orm(string_value = "absent")]
    Absent,

    #[sea_orm(string_value = "checkout")]
    Checkout,
}

impl From<AttendanceStatus> for DayStatus {
    fn from(s: AttendanceStatus) -> Self {
        match s {
            AttendanceStatus::Present => DayStatus::Present,
            AttendanceStatus::Absent => DayStatus::Absent,
            AttendanceStatus::Checkout => DayStatus::CheckedOut,
        }
    }
}

impl From<DayStatus> for AttendanceStatus {
    fn from(s: DayStatus) -> Self {
        match s {
            DayStatus::Present => AttendanceStatus::Present,
            DayStatus::Absent => AttendanceStatus::Absent,
            DayStatus::CheckedOut => AttendanceStatus::Checkout,
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::trainer::Entity",
        from = "Column::TrainerId",
        to = "super::trainer::Column::Id"
    )]
    Trainer,
}

impl Related<super::trainer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Trainer.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Error)]
pub enum AttendanceWriteError {
    #[error(transparent)]
    Rejected(#[from] AttendanceError),
    #[error("database error: {0}")]
    Db(#[from] DbErr),
}

/// A trainer action as received by the server, before the elapsed time is known.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mark {
    pub kind: EventKind,
    pub date: NaiveDate,
    pub at: DateTime<Utc>,
    pub location: Option<Location>,
}

impl Model {
    pub fn slot(&self) -> DaySlot {
        DaySlot {
            status: self.status.into(),
            total_hour: self.total_hour,
        }
    }

    pub async fn find<C: ConnectionTrait>(db: &C, trainer_id: i64, date: NaiveDate) -> Result<Option<Model>, DbErr> {
        Entity::find_by_id((trainer_id, date)).one(db).await
    }

    pub async fn find_by_trainer<C: ConnectionTrait>(db: &C, trainer_id: i64) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::TrainerId.eq(trainer_id))
            .order_by_asc(Column::Date)
            .all(db)
            .await
    }

    pub async fn calendar<C: ConnectionTrait>(db: &C, trainer_id: i64) -> Result<Calendar, DbErr> {
        Ok(Self::find_by_trainer(db, trainer_id)
            .await?
            .into_iter()
            .map(|row| (row.date, row.slot()))
            .collect())
    }

    /// Trainers of `company_id` who attended on `date`.
    pub async fn count_attended<C: ConnectionTrait>(db: &C, company_id: i64, date: NaiveDate) -> Result<u64, DbErr> {
        Entity::find()
            .join(JoinType::InnerJoin, Relation::Trainer.def())
            .filter(super::trainer::Column::CompanyId.eq(company_id))
            .filter(Column::Date.eq(date))
            .filter(Column::Status.is_in([AttendanceStatus::Present, AttendanceStatus::Checkout]))
            .count(db)
            .await
    }

    /// Applies `mark` to the trainer's slot for `mark.date` and stores the result.
    ///
    /// Checkout hours are measured from the stored check-in time. A replay of the
    /// action that produced the current slot leaves the row untouched, including
    /// a checkout retried after the day was closed.
    pub async fn record<C>(db: &C, trainer_id: i64, mark: Mark) -> Result<Model, AttendanceWriteError>
    where
        C: ConnectionTrait + TransactionTrait,
    {
        let txn = db.begin().await?;
        let existing = Self::find(&txn, trainer_id, mark.date).await?;
        let current = existing.as_ref().map(Model::slot);

        let event = match mark.kind {
            EventKind::MarkPresent => AttendanceEvent::mark_present(mark.date),
            EventKind::MarkAbsent => AttendanceEvent::mark_absent(mark.date),
            EventKind::Checkout => match current {
                // A retried checkout reuses the stored hours.
                Some(slot) if slot.status == DayStatus::CheckedOut => AttendanceEvent::checkout(mark.date, slot.total_hour),
                _ => {
                    let since = existing.as_ref().and_then(|r| r.check_in_at).unwrap_or(mark.at);
                    AttendanceEvent::checkout(mark.date, elapsed_hours(since, mark.at))
                }
            },
        };
        let next = next_slot(current.as_ref(), &event)?;

        let saved = match existing {
            Some(row) if row.slot() == next => {
                debug!(trainer_id, date = %mark.date, "attendance replay ignored");
                row
            }
            Some(row) => {
                let mut active: ActiveModel = row.into();
                active.status = Set(next.status.into());
                active.total_hour = Set(next.total_hour);
                active.check_out_at = Set(Some(mark.at));
                if let Some(loc) = mark.location {
                    active.latitude = Set(Some(loc.latitude()));
                    active.longitude = Set(Some(loc.longitude()));
                }
                active.updated_at = Set(mark.at);
                active.update(&txn).await?
            }
            None => {
                let checked_in = (next.status == DayStatus::Present).then_some(mark.at);
                ActiveModel {
                    trainer_id: Set(trainer_id),
                    date: Set(mark.date),
                    status: Set(next.status.into()),
                    check_in_at: Set(checked_in),
                    check_out_at: Set(None),
                    total_hour: Set(next.total_hour),
                    latitude: Set(mark.location.map(|l| l.latitude())),
                    longitude: Set(mark.location.map(|l| l.longitude())),
                    updated_at: Set(mark.at),
                }
                .insert(&txn)
                .await?
            }
        };
        txn.commit().await?;

        info!(trainer_id, date = %saved.date, status = %saved.status, "attendance recorded");
        Ok(saved)
    }
}
