//! Trainer attendance actions with an optimistic local calendar.

use chrono::{Local, NaiveDate};
use hierarchy::attendance::{AttendanceEvent, Calendar, DaySlot, MonthlySummary, event_date};
use hierarchy::Location;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, info, warn};

use crate::client::PortalClient;
use crate::error::ClientError;
use crate::geolocation::{GeolocationProvider, locate};

#[derive(Debug, Serialize)]
struct MarkBody {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    longitude: Option<f64>,
}

#[derive(Debug, Serialize)]
struct CheckOutBody {
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceResult {
    pub date: NaiveDate,
    pub slot: DaySlot,
    pub calendar: Calendar,
}

/// A trainer's attendance screen. The local calendar is updated optimistically
/// and then replaced by whatever the server returns.
#[derive(Debug)]
pub struct TrainerDesk {
    client: Arc<PortalClient>,
    calendar: RwLock<Calendar>,
}

impl TrainerDesk {
    pub fn new(client: Arc<PortalClient>) -> Self {
        Self {
            client,
            calendar: RwLock::new(Calendar::new()),
        }
    }

    pub fn calendar(&self) -> Calendar {
        self.calendar.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn reconcile(&self, server: Calendar) -> Vec<NaiveDate> {
        let changed = self
            .calendar
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .reconcile(server);
        if !changed.is_empty() {
            debug!(?changed, "calendar reconciled with server");
        }
        changed
    }

    /// Loads the calendar from the server.
    pub async fn refresh(&self) -> Result<Calendar, ClientError> {
        let server: Calendar = self.client.get("/trainers/calendar", &[]).await?;
        self.reconcile(server);
        Ok(self.calendar())
    }

    pub async fn summary(&self, year: i32, month: u32) -> Result<MonthlySummary, ClientError> {
        let query = [("year", year.to_string()), ("month", month.to_string())];
        self.client.get("/trainers/summary", &query).await
    }

    /// Summary computed from the local calendar, without a round trip.
    pub fn local_summary(&self, year: i32, month: u32) -> MonthlySummary {
        MonthlySummary::for_month(&self.calendar(), year, month)
    }

    fn optimistic(&self, event: AttendanceEvent) -> Result<(), ClientError> {
        self.calendar
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .apply(&event)?;
        Ok(())
    }

    async fn submit<B: Serialize>(&self, path: &str, body: &B, previous: Calendar) -> Result<AttendanceResult, ClientError> {
        match self.client.post::<B, AttendanceResult>(path, body).await {
            Ok(result) => {
                self.reconcile(result.calendar.clone());
                Ok(result)
            }
            Err(e) => {
                *self.calendar.write().unwrap_or_else(PoisonError::into_inner) = previous;
                // A rejection means the server holds a different day than ours.
                if matches!(e, ClientError::Api { .. }) {
                    if let Err(refresh) = self.refresh().await {
                        warn!(error = %refresh, "could not reload calendar after a rejected action");
                    }
                }
                Err(e)
            }
        }
    }

    /// Marks today present at the provider's position. A denied or timed out
    /// position request aborts before anything is sent.
    pub async fn mark_present(&self, geo: &dyn GeolocationProvider) -> Result<AttendanceResult, ClientError> {
        let at = locate(geo, self.client.config().geolocation_timeout).await?;
        let previous = self.calendar();
        self.optimistic(AttendanceEvent::mark_present(today()))?;

        let body = MarkBody {
            status: "present",
            latitude: Some(at.latitude()),
            longitude: Some(at.longitude()),
        };
        let result = self.submit("/trainers/mark-daily-status", &body, previous).await?;
        info!(date = %result.date, "marked present");
        Ok(result)
    }

    pub async fn mark_absent(&self) -> Result<AttendanceResult, ClientError> {
        let previous = self.calendar();
        self.optimistic(AttendanceEvent::mark_absent(today()))?;

        let body = MarkBody {
            status: "absent",
            latitude: None,
            longitude: None,
        };
        self.submit("/trainers/mark-daily-status", &body, previous).await
    }

    /// Checks out of today's present slot. Hours are computed by the server.
    pub async fn check_out(&self, geo: &dyn GeolocationProvider) -> Result<AttendanceResult, ClientError> {
        let at: Location = locate(geo, self.client.config().geolocation_timeout).await?;
        let previous = self.calendar();
        self.optimistic(AttendanceEvent::checkout(today(), 0.0))?;

        let body = CheckOutBody {
            latitude: at.latitude(),
            longitude: at.longitude(),
        };
        self.submit("/trainers/check-out", &body, previous).await
    }
}

fn today() -> NaiveDate {
    event_date(None, &Local::now())
}
