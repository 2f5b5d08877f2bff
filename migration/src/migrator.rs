use sea_orm_migration::prelude::*;

use crate::migrations;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(migrations::m202509200001_create_companies::Migration),
            Box::new(migrations::m202509200002_create_users::Migration),
            Box::new(migrations::m202509200003_create_states::Migration),
            Box::new(migrations::m202509200004_create_districts::Migration),
            Box::new(migrations::m202509200005_create_blocks::Migration),
            Box::new(migrations::m202509200006_create_trades::Migration),
            Box::new(migrations::m202509200007_create_schools::Migration),
            Box::new(migrations::m202509200008_create_school_trades::Migration),
            Box::new(migrations::m202509200009_create_trainers::Migration),
            Box::new(migrations::m202509200010_create_trainer_attendance::Migration),
        ]
    }
}
