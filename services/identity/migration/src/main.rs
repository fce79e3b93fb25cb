use sea_orm_migration::prelude::*;

use aula_identity_migration::Migrator;

#[tokio::main]
async fn main() {
    cli::run_cli(Migrator).await;
}
