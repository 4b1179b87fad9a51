//! Query modules for the station reports.
//!
//! Each module provides a query struct that borrows from a
//! [`Connection`](crate::connection::Connection), fetches typed records
//! and hands them to the matching pure function in [`crate::reports`].
//! Report methods never fail: unavailable data produces an empty report
//! with a warning attached.

pub mod credit;
pub mod prices;
pub mod pumps;
pub mod rows;
pub mod sales;
pub mod tanks;

pub use credit::CreditQuery;
pub use prices::PriceQuery;
pub use pumps::PumpQuery;
pub use rows::Fetched;
pub use sales::{SalesQuery, SalesReportParams};
pub use tanks::TankQuery;
