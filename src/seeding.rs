//! Sample data for a fresh store.
//!
//! Inserts four departments, six sellers and thirty sales records spanning
//! 2018-08-25 .. 2018-10-31. Rows go in without explicit ids and in listing
//! order, so an empty store assigns ids 1..n.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, Set, TransactionTrait,
};
use tracing::{info, instrument};

use crate::entities::{department, sales_record, seller, SaleStatus};

const DEPARTMENTS: [&str; 4] = ["Computers", "Electronics", "Fashion", "Books"];

/// (name, email, birth date, base salary, department index into `DEPARTMENTS`)
const SELLERS: [(&str, &str, (i32, u32, u32), i64, usize); 6] = [
    ("Bob Brown", "bob@gmail.com", (1998, 4, 21), 1000, 0),
    ("Maria Green", "maria@gmail.com", (1979, 12, 31), 3500, 1),
    ("Alex Grey", "alex@gmail.com", (1988, 1, 15), 2200, 0),
    ("Martha Red", "martha@gmail.com", (1993, 11, 30), 3000, 3),
    ("Donald Blue", "donald@gmail.com", (2000, 1, 9), 4000, 2),
    ("Melvin Pink", "melvin@gmail.com", (1997, 3, 4), 3000, 1),
];

/// (month, day, amount, status, seller index into `SELLERS`), all in 2018.
const SALES: [(u32, u32, i64, SaleStatus, usize); 30] = [
    (8, 25, 11000, SaleStatus::Billed, 0),
    (9, 4, 7000, SaleStatus::Billed, 4),
    (9, 13, 4000, SaleStatus::Canceled, 3),
    (9, 1, 8000, SaleStatus::Billed, 0),
    (9, 21, 3000, SaleStatus::Billed, 2),
    (9, 15, 2000, SaleStatus::Billed, 0),
    (9, 28, 13000, SaleStatus::Billed, 1),
    (9, 11, 4000, SaleStatus::Billed, 3),
    (9, 14, 11000, SaleStatus::Pending, 5),
    (9, 7, 9000, SaleStatus::Billed, 5),
    (9, 13, 6000, SaleStatus::Billed, 1),
    (9, 25, 7000, SaleStatus::Pending, 2),
    (9, 29, 10000, SaleStatus::Billed, 3),
    (9, 4, 3000, SaleStatus::Billed, 4),
    (9, 12, 4000, SaleStatus::Billed, 0),
    (10, 5, 2000, SaleStatus::Billed, 3),
    (10, 1, 12000, SaleStatus::Billed, 0),
    (10, 24, 6000, SaleStatus::Billed, 2),
    (10, 22, 8000, SaleStatus::Billed, 4),
    (10, 15, 8000, SaleStatus::Billed, 5),
    (10, 17, 9000, SaleStatus::Billed, 1),
    (10, 24, 4000, SaleStatus::Billed, 3),
    (10, 19, 11000, SaleStatus::Canceled, 1),
    (10, 12, 8000, SaleStatus::Billed, 4),
    (10, 31, 7000, SaleStatus::Billed, 2),
    (10, 6, 5000, SaleStatus::Billed, 3),
    (10, 13, 9000, SaleStatus::Pending, 0),
    (10, 7, 4000, SaleStatus::Billed, 2),
    (10, 23, 12000, SaleStatus::Billed, 4),
    (10, 12, 5000, SaleStatus::Billed, 1),
];

/// Counts of rows written by a seeding run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub departments: usize,
    pub sellers: usize,
    pub sales_records: usize,
}

impl SeedSummary {
    pub fn is_empty(&self) -> bool {
        self.departments == 0 && self.sellers == 0 && self.sales_records == 0
    }
}

fn date(year: i32, month: u32, day: u32) -> Result<NaiveDate, DbErr> {
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| DbErr::Custom(format!("invalid seed date {year}-{month}-{day}")))
}

async fn store_has_rows<C: ConnectionTrait>(db: &C) -> Result<bool, DbErr> {
    Ok(department::Entity::find().count(db).await? > 0
        || seller::Entity::find().count(db).await? > 0
        || sales_record::Entity::find().count(db).await? > 0)
}

/// Populates the sample data set in one transaction.
///
/// Does nothing and returns an empty summary when any of the three tables
/// already holds rows.
#[instrument(skip(db))]
pub async fn seed<C>(db: &C) -> Result<SeedSummary, DbErr>
where
    C: ConnectionTrait + TransactionTrait,
{
    if store_has_rows(db).await? {
        info!("store already populated, skipping seed");
        return Ok(SeedSummary::default());
    }

    let txn = db.begin().await?;

    let mut department_ids = Vec::with_capacity(DEPARTMENTS.len());
    for name in DEPARTMENTS {
        let saved = department::ActiveModel {
            name: Set(name.to_string()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        department_ids.push(saved.id);
    }

    let mut seller_ids = Vec::with_capacity(SELLERS.len());
    for (name, email, (y, m, d), salary, dept) in SELLERS {
        let saved = seller::ActiveModel {
            name: Set(name.to_string()),
            email: Set(email.to_string()),
            birth_date: Set(date(y, m, d)?),
            base_salary: Set(Decimal::new(salary, 0)),
            department_id: Set(department_ids[dept]),
            version: Set(1),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        seller_ids.push(saved.id);
    }

    for (month, day, amount, status, seller_idx) in SALES {
        sales_record::ActiveModel {
            created_at: Set(date(2018, month, day)?),
            amount: Set(Decimal::new(amount, 0)),
            status: Set(status),
            seller_id: Set(seller_ids[seller_idx]),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
    }

    txn.commit().await?;

    let summary = SeedSummary {
        departments: department_ids.len(),
        sellers: seller_ids.len(),
        sales_records: SALES.len(),
    };
    info!(
        departments = summary.departments,
        sellers = summary.sellers,
        sales_records = summary.sales_records,
        "seeded sample data"
    );
    Ok(summary)
}
