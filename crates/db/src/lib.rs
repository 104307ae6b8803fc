use sea_orm::Database;
use sea_orm_migration::MigratorTrait;

pub use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr};

pub mod entities;
pub mod models;

#[derive(Clone)]
pub struct DBService {
    pub pool: DatabaseConnection,
}

impl DBService {
    /// Connects to the database at `database_url` and brings the schema up
    /// to date before handing out the pool.
    pub async fn new(database_url: &str) -> Result<DBService, DbErr> {
        let pool = Database::connect(database_url).await?;
        db_migration::Migrator::up(&pool, None).await?;
        Ok(DBService { pool })
    }
}
