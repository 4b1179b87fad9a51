pub mod credit;
pub mod dispensing;
pub mod impact;
pub mod period;
pub mod price;
pub mod pump;
pub mod sales;
pub mod tank;
pub mod warning;

pub use credit::*;
pub use dispensing::*;
pub use impact::*;
pub use period::*;
pub use price::*;
pub use pump::*;
pub use sales::*;
pub use tank::*;
pub use warning::*;
