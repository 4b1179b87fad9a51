//! Pure report computations.
//!
//! Nothing here touches the database: each function takes typed records and
//! returns a typed report, so it can be driven directly from tests or from
//! any other data source.

pub mod credit;
pub mod price_impact;
pub mod pumps;
pub mod sales;
pub mod tanks;

pub use credit::overdue_credit;
pub use price_impact::price_impact;
pub use pumps::pump_performance;
pub use sales::{aggregate, lost_profit, Aggregator};
pub use tanks::{classify, fill_percent, tank_levels};
