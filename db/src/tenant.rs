//! Loading one tenant's hierarchy for the engine.

use hierarchy::Collections;
use sea_orm::{ConnectionTrait, DbErr};
use tracing::debug;

use crate::models::{block, district, school, school_trade, state, trade, trainer};

/// Every hierarchy record owned by `company_id`, converted to engine records.
pub async fn load_collections<C: ConnectionTrait>(db: &C, company_id: i64) -> Result<Collections, DbErr> {
    let collections = Collections {
        states: into_records(state::Model::find_by_company(db, company_id).await?),
        districts: into_records(district::Model::find_by_company(db, company_id).await?),
        blocks: into_records(block::Model::find_by_company(db, company_id).await?),
        schools: into_records(school::Model::find_by_company(db, company_id).await?),
        trades: into_records(trade::Model::find_by_company(db, company_id).await?),
        trainers: into_records(trainer::Model::find_by_company(db, company_id).await?),
        school_trades: into_records(school_trade::Model::find_by_company(db, company_id).await?),
    };
    debug!(
        company_id,
        states = collections.states.len(),
        schools = collections.schools.len(),
        trainers = collections.trainers.len(),
        "loaded tenant collections"
    );
    Ok(collections)
}

fn into_records<M, R: From<M>>(rows: Vec<M>) -> Vec<R> {
    rows.into_iter().map(R::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{seed_tenant, setup_test_db};
    use hierarchy::{EntityId, HierarchyFilter};
    use hierarchy::snapshot::DashboardView;

    #[tokio::test]
    async fn collections_are_scoped_to_the_tenant() {
        let db = setup_test_db().await;
        let acme = seed_tenant(&db, "Acme").await;
        let other = seed_tenant(&db, "Globex").await;

        let c = load_collections(&db, acme.company_id).await.unwrap();
        assert_eq!(c.states.len(), 1);
        assert_eq!(c.schools.len(), 1);
        assert_eq!(c.trainers.len(), 1);
        assert_eq!(c.school_trades.len(), 1);
        assert!(c.schools.iter().all(|s| s.company_id == EntityId::from(acme.company_id)));
        assert!(c.states.iter().all(|s| s.id != EntityId::from(other.state_id)));

        let view = DashboardView::from_collections(&c, &HierarchyFilter::default()).unwrap();
        assert_eq!(view.statistics.total_schools, 1);
        assert_eq!(view.statistics.state_wise[0].schools, 1);
        assert!(view.unresolved.is_empty());
    }
}
