//! PostgreSQL-backed `WorksheetRepository` using Diesel.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewWorksheetRow, WorksheetChangeset, WorksheetRow};
use super::pool::{DbPool, PoolError};
use super::schema::worksheets;
use crate::domain::ports::{WorksheetRepository, WorksheetRepositoryError};
use crate::domain::{NewWorksheet, Worksheet, WorksheetChanges, WorksheetId};

/// Diesel-backed worksheet store.
#[derive(Clone)]
pub struct DieselWorksheetRepository {
    pool: DbPool,
}

impl DieselWorksheetRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> WorksheetRepositoryError {
    map_basic_pool_error(error, WorksheetRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> WorksheetRepositoryError {
    map_basic_diesel_error(
        error,
        WorksheetRepositoryError::query,
        WorksheetRepositoryError::connection,
    )
}

#[async_trait]
impl WorksheetRepository for DieselWorksheetRepository {
    async fn list(&self) -> Result<Vec<Worksheet>, WorksheetRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<WorksheetRow> = worksheets::table
            .order((worksheets::updated_at.desc(), worksheets::id.desc()))
            .select(WorksheetRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Worksheet::from).collect())
    }

    async fn find_by_id(&self, id: &WorksheetId) -> Result<Worksheet, WorksheetRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        worksheets::table
            .find(*id.as_uuid())
            .select(WorksheetRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(Worksheet::from)
            .ok_or_else(|| WorksheetRepositoryError::not_found(*id))
    }

    async fn insert(&self, worksheet: &NewWorksheet) -> Result<Worksheet, WorksheetRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = diesel::insert_into(worksheets::table)
            .values(NewWorksheetRow::from(worksheet))
            .returning(WorksheetRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(row.into())
    }

    async fn update(
        &self,
        id: &WorksheetId,
        changes: &WorksheetChanges,
    ) -> Result<Worksheet, WorksheetRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changeset = WorksheetChangeset::from(changes);
        diesel::update(worksheets::table.find(*id.as_uuid()))
            .set(&changeset)
            .returning(WorksheetRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(Worksheet::from)
            .ok_or_else(|| WorksheetRepositoryError::not_found(*id))
    }

    async fn delete(&self, id: &WorksheetId) -> Result<(), WorksheetRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(worksheets::table.find(*id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if deleted == 0 {
            return Err(WorksheetRepositoryError::not_found(*id));
        }
        Ok(())
    }
}
