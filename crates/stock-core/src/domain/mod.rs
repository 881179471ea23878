//! 시세 조회와 파생 분석을 위한 도메인 모델.

mod calculations;
mod filter;
mod history;
mod instrument;
mod snapshot;
mod strategy;

pub use calculations::*;
pub use filter::*;
pub use history::*;
pub use instrument::*;
pub use snapshot::*;
pub use strategy::*;
