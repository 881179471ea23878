//! 시세 데이터 전반에서 사용되는 공통 타입.

mod exchange;
mod trade_date;

pub use exchange::*;
pub use trade_date::*;
