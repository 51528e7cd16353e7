use crate::{
    db::DbPool,
    entities::{department, sales_record, seller},
    errors::ServiceError,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;

pub const ID_NOT_FOUND: &str = "Id not found";
pub const SELLER_HAS_SALES: &str = "Can't delete seller because they have sales";
pub const SELLER_CHANGED: &str = "Seller was changed by another request, reload and try again";

/// Validated seller fields, as written by insert and update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SellerDraft {
    pub name: String,
    pub email: String,
    pub birth_date: NaiveDate,
    pub base_salary: Decimal,
    pub department_id: i32,
}

/// A seller with its department loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SellerWithDepartment {
    pub seller: seller::Model,
    pub department: department::Model,
}

/// Seller CRUD over the store.
#[derive(Clone)]
pub struct SellerService {
    db_pool: Arc<DbPool>,
}

impl SellerService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Lists sellers by id, without their departments.
    #[instrument(skip(self))]
    pub async fn list_all(&self) -> Result<Vec<seller::Model>, ServiceError> {
        let db = &*self.db_pool;
        let sellers = seller::Entity::find()
            .order_by_asc(seller::Column::Id)
            .all(db)
            .await?;
        Ok(sellers)
    }

    /// Finds a seller and eagerly loads its department.
    #[instrument(skip(self))]
    pub async fn find_by_id(&self, id: i32) -> Result<Option<SellerWithDepartment>, ServiceError> {
        let db = &*self.db_pool;
        let row = seller::Entity::find_by_id(id)
            .find_also_related(department::Entity)
            .one(db)
            .await?;

        match row {
            None => Ok(None),
            Some((seller, Some(department))) => Ok(Some(SellerWithDepartment { seller, department })),
            Some((seller, None)) => Err(ServiceError::InternalError(format!(
                "seller {} references missing department {}",
                seller.id, seller.department_id
            ))),
        }
    }

    /// Persists a new seller at version 1.
    ///
    /// An unknown department id is rejected by the store and surfaces as a
    /// database error.
    #[instrument(skip(self, draft), fields(name = %draft.name))]
    pub async fn insert(&self, draft: SellerDraft) -> Result<seller::Model, ServiceError> {
        let db = &*self.db_pool;
        let saved = seller::ActiveModel {
            name: Set(draft.name),
            email: Set(draft.email),
            birth_date: Set(draft.birth_date),
            base_salary: Set(draft.base_salary),
            department_id: Set(draft.department_id),
            version: Set(1),
            ..Default::default()
        }
        .insert(db)
        .await?;

        info!(seller_id = saved.id, "seller created");
        Ok(saved)
    }

    /// Overwrites a seller's fields.
    ///
    /// The write only lands when the stored version still equals `version`
    /// (or, when `None`, the version seen by the existence check). A missing
    /// row is `NotFound`; a version mismatch is `DbConcurrency`.
    #[instrument(skip(self, draft))]
    pub async fn update(
        &self,
        id: i32,
        draft: SellerDraft,
        version: Option<i32>,
    ) -> Result<seller::Model, ServiceError> {
        let db = &*self.db_pool;
        let existing = seller::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(ID_NOT_FOUND.to_string()))?;

        let expected = version.unwrap_or(existing.version);
        let next = expected + 1;

        let changes = seller::ActiveModel {
            name: Set(draft.name.clone()),
            email: Set(draft.email.clone()),
            birth_date: Set(draft.birth_date),
            base_salary: Set(draft.base_salary),
            department_id: Set(draft.department_id),
            version: Set(next),
            ..Default::default()
        };

        let result = seller::Entity::update_many()
            .set(changes)
            .filter(seller::Column::Id.eq(id))
            .filter(seller::Column::Version.eq(expected))
            .exec(db)
            .await?;

        if result.rows_affected == 0 {
            warn!(seller_id = id, expected_version = expected, "stale seller update");
            return Err(ServiceError::DbConcurrency(SELLER_CHANGED.to_string()));
        }

        info!(seller_id = id, version = next, "seller updated");
        Ok(seller::Model {
            id,
            name: draft.name,
            email: draft.email,
            birth_date: draft.birth_date,
            base_salary: draft.base_salary,
            department_id: draft.department_id,
            version: next,
        })
    }

    /// Deletes a seller. Sellers with sales records are kept and reported as
    /// an integrity conflict.
    #[instrument(skip(self))]
    pub async fn remove(&self, id: i32) -> Result<(), ServiceError> {
        let db = &*self.db_pool;
        let sales = sales_record::Entity::find()
            .filter(sales_record::Column::SellerId.eq(id))
            .count(db)
            .await?;
        if sales > 0 {
            warn!(seller_id = id, sales, "seller has sales, not deleting");
            return Err(ServiceError::Integrity(SELLER_HAS_SALES.to_string()));
        }

        // The store still rejects the delete if a sale lands in between.
        let result = seller::Entity::delete_by_id(id)
            .exec(db)
            .await
            .map_err(|e| ServiceError::from_delete_error(e, SELLER_HAS_SALES))?;

        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(ID_NOT_FOUND.to_string()));
        }

        info!(seller_id = id, "seller deleted");
        Ok(())
    }
}
