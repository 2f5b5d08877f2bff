use crate::seed::Seeder;
use chrono::{Duration, NaiveTime, Utc};
use db::models::trainer_attendance::{self, AttendanceWriteError, Mark};
use db::models::{company, trainer};
use hierarchy::attendance::EventKind;
use sea_orm::{DatabaseConnection, DbErr};

const DAYS: i64 = 30;

/// A month of past attendance for every trainer: mostly present and checked
/// out, some absences, a few days left open.
pub struct AttendanceSeeder;

fn db_err(e: AttendanceWriteError) -> DbErr {
    match e {
        AttendanceWriteError::Db(err) => err,
        AttendanceWriteError::Rejected(reason) => DbErr::Custom(reason.to_string()),
    }
}

#[async_trait::async_trait]
impl Seeder for AttendanceSeeder {
    async fn seed(&self, db: &DatabaseConnection) -> Result<(), DbErr> {
        let today = Utc::now().date_naive();
        let nine = NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default();

        for c in company::Model::find_all(db).await? {
            for t in trainer::Model::find_by_company(db, c.id).await? {
                for back in 1..=DAYS {
                    let date = today - Duration::days(back);
                    if trainer_attendance::Model::find(db, t.id, date).await?.is_some() {
                        continue;
                    }
                    let check_in = date.and_time(nine).and_utc();
                    let roll = fastrand::u8(..100);

                    let kind = if roll < 15 { EventKind::MarkAbsent } else { EventKind::MarkPresent };
                    let location = t.location();
                    trainer_attendance::Model::record(db, t.id, Mark { kind, date, at: check_in, location })
                        .await
                        .map_err(db_err)?;

                    if roll >= 25 {
                        let at = check_in + Duration::minutes(fastrand::i64(300..540));
                        let mark = Mark {
                            kind: EventKind::Checkout,
                            date,
                            at,
                            location,
                        };
                        trainer_attendance::Model::record(db, t.id, mark).await.map_err(db_err)?;
                    }
                }
            }
        }
        Ok(())
    }
}
