use colored::*;
use futures::FutureExt;
use sea_orm_migration::prelude::*;
use std::io::{self, Write};
use std::time::Instant;

const STATUS_COLUMN: usize = 72;

pub async fn run_all_migrations(url: &str) {
    let db = sea_orm::Database::connect(url)
        .await
        .expect("DB connection failed");

    let migrations = <migration::Migrator as MigratorTrait>::migrations();
    println!("Running {} migration(s)...", migrations.len());

    let schema_manager = SchemaManager::new(&db);
    for m in migrations {
        apply(&schema_manager, m).await;
    }
}

async fn apply(schema_manager: &SchemaManager<'_>, m: Box<dyn MigrationTrait>) {
    let label = format!("Applying {}", m.name().bold());
    print!(
        "{label}{} ",
        ".".repeat(STATUS_COLUMN.saturating_sub(label.len()))
    );
    io::stdout().flush().ok();

    let start = Instant::now();
    let outcome = std::panic::AssertUnwindSafe(m.up(schema_manager))
        .catch_unwind()
        .await;

    match outcome {
        Ok(Ok(())) => {
            let took = format!("({:.2?})", start.elapsed()).dimmed();
            println!("{} {took}", "done".green());
        }
        Ok(Err(e)) => {
            println!("{}", "failed".red());
            eprintln!("  {e}");
            std::process::exit(1);
        }
        Err(_) => {
            println!("{}", "panicked".red());
            std::process::exit(1);
        }
    }
}
