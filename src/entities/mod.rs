//! SeaORM entities for the three persisted tables.

pub mod department;
pub mod sales_record;
pub mod seller;

pub use sales_record::SaleStatus;
