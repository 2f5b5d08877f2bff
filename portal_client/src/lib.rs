//! Typed client for the skills portal REST API.
//!
//! [`PortalClient`] logs in by role and keeps the bearer token; a `401` from any
//! call drops the token and surfaces [`ClientError::AuthExpired`]. Company-admin
//! collections are normalized at the boundary into [`hierarchy::Collections`]
//! and served through a [`DashboardSession`]. Trainers mark attendance through
//! [`TrainerDesk`], which acquires a position with a bounded timeout.

pub mod attendance;
pub mod client;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod geolocation;

pub use attendance::TrainerDesk;
pub use client::{LoginRole, PortalClient, Session};
pub use config::ClientConfig;
pub use dashboard::{DashboardSession, Fetched};
pub use error::{ClientError, GeolocationError};
pub use geolocation::GeolocationProvider;
