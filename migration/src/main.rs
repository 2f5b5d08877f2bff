use colored::*;
use std::{env, fs, path::Path, process};
use util::config;

mod runner;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let db_path = config::database_path();
    let url = format!("sqlite://{}?mode=rwc", db_path);
    let args: Vec<String> = env::args().collect();

    let outcome = match args.get(1).map(|s| s.as_str()) {
        Some("clean") => remove_db_file(&db_path),
        Some("fresh") => remove_db_file(&db_path).and_then(|_| create_db_dir(&db_path)),
        _ => create_db_dir(&db_path),
    };
    if let Err(e) = outcome {
        eprintln!("{} {}", "error:".red(), e);
        process::exit(1);
    }

    if args.get(1).map(|s| s.as_str()) == Some("clean") {
        return;
    }

    if let Err(e) = runner::run_all_migrations(&url).await {
        eprintln!("{} {}", "migration failed:".red(), e);
        process::exit(1);
    }
}

fn remove_db_file(path: &str) -> std::io::Result<()> {
    let db_path = Path::new(path);
    if db_path.exists() {
        fs::remove_file(db_path)?;
        println!("Deleted DB: {}", db_path.display());
    } else {
        println!("DB file does not exist: {}", db_path.display());
    }
    Ok(())
}

fn create_db_dir(path: &str) -> std::io::Result<()> {
    match Path::new(path).parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent),
        _ => Ok(()),
    }
}
