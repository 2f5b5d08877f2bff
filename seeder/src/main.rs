use crate::seed::{Seeder, run_seeder};
use crate::seeds::{attendance::AttendanceSeeder, company::CompanySeeder, super_admin::SuperAdminSeeder};
use colored::*;
use migration::Migrator;
use sea_orm_migration::MigratorTrait;

mod seed;
mod seeds;

#[tokio::main]
async fn main() {
    let db = match db::connect().await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("{} {e}", "Failed to connect to database:".red());
            std::process::exit(1);
        }
    };
    if let Err(e) = Migrator::up(&db, None).await {
        eprintln!("{} {e}", "Failed to run migrations:".red());
        std::process::exit(1);
    }

    for (seeder, name) in [
        (Box::new(SuperAdminSeeder) as Box<dyn Seeder + Send + Sync>, "SuperAdmin"),
        (Box::new(CompanySeeder), "Company"),
        (Box::new(AttendanceSeeder), "Attendance"),
    ] {
        if !run_seeder(&*seeder, name, &db).await {
            std::process::exit(1);
        }
    }
}
