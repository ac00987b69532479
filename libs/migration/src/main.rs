//! `migration up|down|status|fresh` for the registry schema.
//!
//! Reads `DATABASE_URL` like every other sea-orm-migration CLI.

use migration::Migrator;
use sea_orm_migration::cli;

#[tokio::main]
async fn main() {
    cli::run_cli(Migrator).await;
}
