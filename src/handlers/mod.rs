pub mod common;
pub mod departments;
pub mod error_page;
pub mod sales_records;
pub mod sellers;

use crate::{
    db::DbPool,
    services::{DepartmentService, SalesRecordService, SellerService},
};
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub departments: Arc<DepartmentService>,
    pub sellers: Arc<SellerService>,
    pub sales_records: Arc<SalesRecordService>,
}

impl AppServices {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self {
            departments: Arc::new(DepartmentService::new(db_pool.clone())),
            sellers: Arc::new(SellerService::new(db_pool.clone())),
            sales_records: Arc::new(SalesRecordService::new(db_pool)),
        }
    }
}
