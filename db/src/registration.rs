//! Batch registration of a school with its trades and trainers.
//!
//! The whole batch is one transaction: a school is never stored without the
//! trades and trainer logins submitted with it.

use hierarchy::Location;
use sea_orm::{DbErr, TransactionTrait, ConnectionTrait};
use std::collections::BTreeSet;
use thiserror::Error;
use tracing::info;

use crate::models::school::NewSchool;
use crate::models::trainer::NewTrainer;
use crate::models::user::UserRole;
use crate::models::{block, school, school_trade, trade, trainer, user};

#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("block {0} not found")]
    UnknownBlock(i64),
    #[error("trade {0} not found")]
    UnknownTrade(i64),
    #[error("a school with UID '{0}' already exists")]
    DuplicateSchool(String),
    #[error("email '{0}' is already registered")]
    DuplicateEmail(String),
    #[error("database error: {0}")]
    Db(#[from] DbErr),
}

#[derive(Debug, Clone)]
pub struct TrainerRegistration {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub location: Option<Location>,
}

#[derive(Debug, Clone)]
pub struct TradeRegistration {
    pub trade_id: i64,
    pub trainers: Vec<TrainerRegistration>,
}

#[derive(Debug, Clone)]
pub struct SchoolRegistration {
    pub uid: String,
    pub name: String,
    pub block_id: i64,
    pub address: String,
    pub location: Option<Location>,
    pub trades: Vec<TradeRegistration>,
}

#[derive(Debug, Clone)]
pub struct RegisteredSchool {
    pub school: school::Model,
    pub trade_ids: Vec<i64>,
    pub trainers: Vec<trainer::Model>,
}

/// Stores `reg` for `company_id`. The block, every trade and every trainer email
/// are checked before anything is written.
pub async fn register_school<C>(
    db: &C,
    company_id: i64,
    reg: SchoolRegistration,
) -> Result<RegisteredSchool, RegistrationError>
where
    C: ConnectionTrait + TransactionTrait,
{
    let txn = db.begin().await?;

    if block::Model::find_in_company(&txn, company_id, reg.block_id).await?.is_none() {
        return Err(RegistrationError::UnknownBlock(reg.block_id));
    }
    if school::Model::find_by_uid(&txn, company_id, &reg.uid).await?.is_some() {
        return Err(RegistrationError::DuplicateSchool(reg.uid.trim().to_owned()));
    }

    let mut trade_ids = BTreeSet::new();
    for t in &reg.trades {
        if trade::Model::find_in_company(&txn, company_id, t.trade_id).await?.is_none() {
            return Err(RegistrationError::UnknownTrade(t.trade_id));
        }
        trade_ids.insert(t.trade_id);
    }

    let mut emails = BTreeSet::new();
    for tr in reg.trades.iter().flat_map(|t| &t.trainers) {
        let email = tr.email.trim().to_lowercase();
        if !emails.insert(email.clone()) || user::Model::find_by_email(&txn, &email).await?.is_some() {
            return Err(RegistrationError::DuplicateEmail(email));
        }
    }

    let school = school::Model::create(
        &txn,
        NewSchool {
            company_id,
            block_id: reg.block_id,
            uid: &reg.uid,
            name: &reg.name,
            address: &reg.address,
            location: reg.location,
        },
    )
    .await?;

    for trade_id in &trade_ids {
        school_trade::Model::create(&txn, school.id, *trade_id).await?;
    }

    let mut trainers = Vec::new();
    for t in &reg.trades {
        for tr in &t.trainers {
            let login = user::Model::create(
                &txn,
                &tr.full_name,
                &tr.email,
                &tr.password,
                UserRole::Trainer,
                Some(company_id),
            )
            .await?;
            let created = trainer::Model::create(
                &txn,
                NewTrainer {
                    company_id,
                    school_id: school.id,
                    trade_id: t.trade_id,
                    user_id: login.id,
                    full_name: &tr.full_name,
                    email: &tr.email,
                    phone: &tr.phone,
                    location: tr.location,
                },
            )
            .await?;
            trainers.push(created);
        }
    }

    txn.commit().await?;
    info!(
        company_id,
        school_id = school.id,
        trades = trade_ids.len(),
        trainers = trainers.len(),
        "school registered"
    );

    Ok(RegisteredSchool {
        school,
        trade_ids: trade_ids.into_iter().collect(),
        trainers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{seed_tenant, setup_test_db};

    fn trainer_reg(email: &str) -> TrainerRegistration {
        TrainerRegistration {
            full_name: "Meena Kumari".into(),
            email: email.into(),
            phone: "9876543210".into(),
            password: "trainer123".into(),
            location: None,
        }
    }

    fn school_reg(uid: &str, block_id: i64, trade_id: i64, emails: &[&str]) -> SchoolRegistration {
        SchoolRegistration {
            uid: uid.into(),
            name: "GIC Aliganj".into(),
            block_id,
            address: "Sector 5".into(),
            location: Location::new(26.89, 80.94).ok(),
            trades: vec![TradeRegistration {
                trade_id,
                trainers: emails.iter().map(|e| trainer_reg(e)).collect(),
            }],
        }
    }

    #[tokio::test]
    async fn registers_school_trades_and_trainer_logins() {
        let db = setup_test_db().await;
        let t = seed_tenant(&db, "Acme").await;

        let done = register_school(&db, t.company_id, school_reg("UP-900", t.block_id, t.trade_id, &["a@x.io", "b@x.io"]))
            .await
            .unwrap();
        assert_eq!(done.trade_ids, vec![t.trade_id]);
        assert_eq!(done.trainers.len(), 2);

        let login = user::Model::authenticate(&db, "b@x.io", "trainer123", UserRole::Trainer)
            .await
            .unwrap();
        assert!(login.is_some());
    }

    #[tokio::test]
    async fn rejects_foreign_block_and_rolls_back_on_duplicates() {
        let db = setup_test_db().await;
        let acme = seed_tenant(&db, "Acme").await;
        let globex = seed_tenant(&db, "Globex").await;

        let err = register_school(&db, acme.company_id, school_reg("UP-901", globex.block_id, acme.trade_id, &[]))
            .await
            .unwrap_err();
        assert!(matches!(err, RegistrationError::UnknownBlock(id) if id == globex.block_id));

        let err = register_school(&db, acme.company_id, school_reg("UP-902", acme.block_id, acme.trade_id, &["dup@x.io", "DUP@x.io"]))
            .await
            .unwrap_err();
        assert!(matches!(err, RegistrationError::DuplicateEmail(_)));
        assert!(school::Model::find_by_uid(&db, acme.company_id, "UP-902").await.unwrap().is_none());
    }
}
