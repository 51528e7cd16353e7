use crate::{
    db::DbPool,
    entities::{department, sales_record, seller, SaleStatus},
    errors::ServiceError,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, instrument};
use utoipa::ToSchema;

/// Inclusive sales-record date window. Either side may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DateRange {
    pub min: Option<NaiveDate>,
    pub max: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(min: Option<NaiveDate>, max: Option<NaiveDate>) -> Self {
        Self { min, max }
    }

    /// Store-side filter on `created_at`.
    pub fn condition(&self) -> Condition {
        let mut cond = Condition::all();
        if let Some(min) = self.min {
            cond = cond.add(sales_record::Column::CreatedAt.gte(min));
        }
        if let Some(max) = self.max {
            cond = cond.add(sales_record::Column::CreatedAt.lte(max));
        }
        cond
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.min.map_or(true, |min| date >= min) && self.max.map_or(true, |max| date <= max)
    }
}

/// A sales record with its seller and the seller's department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SalesRecordView {
    pub id: i32,
    pub created_at: NaiveDate,
    /// `dd/MM/yyyy`
    #[schema(example = "25/08/2018")]
    pub date_display: String,
    #[schema(value_type = String, example = "11000.00")]
    pub amount: Decimal,
    #[schema(example = "11000.00")]
    pub amount_display: String,
    pub status: SaleStatus,
    pub seller: seller::Model,
    pub department: department::Model,
}

impl SalesRecordView {
    pub fn new(
        record: sales_record::Model,
        seller: seller::Model,
        department: department::Model,
    ) -> Self {
        Self {
            id: record.id,
            created_at: record.created_at,
            date_display: record.created_at.format("%d/%m/%Y").to_string(),
            amount: record.amount,
            amount_display: format!("{:.2}", record.amount.round_dp(2)),
            status: record.status,
            seller,
            department,
        }
    }
}

/// Sales of one department, date-descending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DepartmentGroup {
    pub department: department::Model,
    /// Sum of `amount` over the group's records.
    #[schema(value_type = String, example = "30000.00")]
    pub total: Decimal,
    pub records: Vec<SalesRecordView>,
}

/// Partitions records by department id.
///
/// Groups come out in the order their department first appears in `records`;
/// each group keeps the relative order of its members.
pub fn group_by_department(records: Vec<SalesRecordView>) -> Vec<DepartmentGroup> {
    let mut groups: Vec<DepartmentGroup> = Vec::new();
    let mut index: HashMap<i32, usize> = HashMap::new();

    for record in records {
        let slot = *index.entry(record.department.id).or_insert_with(|| {
            groups.push(DepartmentGroup {
                department: record.department.clone(),
                total: Decimal::ZERO,
                records: Vec::new(),
            });
            groups.len() - 1
        });
        let group = &mut groups[slot];
        group.total += record.amount;
        group.records.push(record);
    }

    groups
}

/// Date-window search over sales records.
#[derive(Clone)]
pub struct SalesRecordService {
    db_pool: Arc<DbPool>,
}

impl SalesRecordService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Records inside `range`, newest first, ties by id.
    #[instrument(skip(self))]
    pub async fn find_by_date(&self, range: DateRange) -> Result<Vec<SalesRecordView>, ServiceError> {
        let db = &*self.db_pool;

        let rows = sales_record::Entity::find()
            .filter(range.condition())
            .find_also_related(seller::Entity)
            .order_by_desc(sales_record::Column::CreatedAt)
            .order_by_asc(sales_record::Column::Id)
            .all(db)
            .await?;

        let mut department_ids: Vec<i32> = rows
            .iter()
            .filter_map(|(_, seller)| seller.as_ref().map(|s| s.department_id))
            .collect();
        department_ids.sort_unstable();
        department_ids.dedup();

        let departments: HashMap<i32, department::Model> = if department_ids.is_empty() {
            HashMap::new()
        } else {
            department::Entity::find()
                .filter(department::Column::Id.is_in(department_ids))
                .all(db)
                .await?
                .into_iter()
                .map(|d| (d.id, d))
                .collect()
        };

        let views = rows
            .into_iter()
            .map(|(record, seller)| {
                let seller = seller.ok_or_else(|| {
                    ServiceError::InternalError(format!(
                        "sales record {} references missing seller {}",
                        record.id, record.seller_id
                    ))
                })?;
                let department = departments.get(&seller.department_id).cloned().ok_or_else(|| {
                    ServiceError::InternalError(format!(
                        "seller {} references missing department {}",
                        seller.id, seller.department_id
                    ))
                })?;
                Ok(SalesRecordView::new(record, seller, department))
            })
            .collect::<Result<Vec<_>, ServiceError>>()?;

        debug!(count = views.len(), "sales records found");
        Ok(views)
    }

    /// Same search as [`find_by_date`](Self::find_by_date), partitioned by
    /// department.
    #[instrument(skip(self))]
    pub async fn find_by_date_grouped(
        &self,
        range: DateRange,
    ) -> Result<Vec<DepartmentGroup>, ServiceError> {
        let records = self.find_by_date(range).await?;
        Ok(group_by_department(records))
    }
}
