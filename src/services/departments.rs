use crate::{db::DbPool, entities::department, errors::ServiceError};
use sea_orm::{EntityTrait, QueryOrder};
use std::sync::Arc;
use tracing::instrument;

/// Read access to departments.
#[derive(Clone)]
pub struct DepartmentService {
    db_pool: Arc<DbPool>,
}

impl DepartmentService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Lists every department sorted by name.
    #[instrument(skip(self))]
    pub async fn list_all(&self) -> Result<Vec<department::Model>, ServiceError> {
        let db = &*self.db_pool;
        let departments = department::Entity::find()
            .order_by_asc(department::Column::Name)
            .order_by_asc(department::Column::Id)
            .all(db)
            .await?;
        Ok(departments)
    }
}
