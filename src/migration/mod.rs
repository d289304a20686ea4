// ABOUTME: SeaORM migration module for database schema management
// ABOUTME: Applied on every startup so a fresh store gets the full schema

use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20241016_000001_create_diary_tables::Migration)]
    }
}

pub mod m20241016_000001_create_diary_tables;
