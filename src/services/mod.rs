// Reference data
pub mod departments;

// Seller CRUD
pub mod sellers;

// Sales search and grouping
pub mod sales_records;

pub use departments::DepartmentService;
pub use sales_records::{DateRange, DepartmentGroup, SalesRecordService, SalesRecordView};
pub use sellers::{SellerDraft, SellerService, SellerWithDepartment};
