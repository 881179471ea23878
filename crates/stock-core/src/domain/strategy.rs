//! 거래량 급증 + 등락 가속 전략 스캔.
//!
//! 세 거래일(당일 D, 직전 P, 그 이전 PP)을 사용합니다.
//! - 거래량 배수 = volume(D) / volume(P)
//! - 가속도 = change%(D vs P) - change%(P vs PP)
//!
//! 후보 조회 뒤 최신 스냅샷의 회전율/시가총액으로 한 번 더 거릅니다.

use serde::{Deserialize, Serialize};

use super::calculations::{exceeds_ceiling, mktcap_ceiling_wan};
use super::snapshot::SnapshotMetrics;

/// 스캔 조건.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyParams {
    /// 기준일. 없으면 최신 스냅샷 날짜
    pub date: Option<String>,
    pub volume_multiplier: f64,
    /// 등락률 가속도 최소값 (%p)
    pub min_change_increase: f64,
    /// 회전율 최소값 (%, 0 이하는 무시)
    pub min_turnover: f64,
    /// 시가총액 상한 (억 위안, 0 이하는 무제한)
    pub max_mktcap: f64,
    pub limit: usize,
}

impl Default for StrategyParams {
    fn default() -> Self {
        Self {
            date: None,
            volume_multiplier: 2.0,
            min_change_increase: 5.0,
            min_turnover: 5.0,
            max_mktcap: 0.0,
            limit: 50,
        }
    }
}

impl StrategyParams {
    /// 후처리 필터로 빠질 몫을 감안한 후보 조회 개수.
    pub fn candidate_limit(&self) -> usize {
        self.limit.saturating_mul(2)
    }

    pub fn mktcap_ceiling(&self) -> Option<f64> {
        mktcap_ceiling_wan(self.max_mktcap)
    }

    /// 스냅샷 지표를 반영하고 후보를 결과에 남길지 결정합니다.
    ///
    /// 스냅샷 행을 찾지 못한 후보는 지표 0으로 그대로 통과합니다.
    pub fn admit(&self, hit: &mut StrategyHit, metrics: Option<SnapshotMetrics>) -> bool {
        let Some(metrics) = metrics else {
            return true;
        };

        hit.turnover_ratio = metrics.turnover_ratio;
        hit.mktcap = metrics.mktcap;

        if self.min_turnover > 0.0 && metrics.turnover_ratio < self.min_turnover {
            return false;
        }
        !exceeds_ceiling(metrics.mktcap, self.mktcap_ceiling())
    }
}

/// 스캔에 사용하는 세 거래일.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyDates {
    pub date: String,
    pub prev_date: String,
    /// 이력에서 찾지 못하면 `prev_date`와 같음
    pub prev_prev_date: String,
}

/// 스캔 결과 한 건.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx-support", derive(sqlx::FromRow))]
pub struct StrategyHit {
    pub stock_code: String,
    pub stock_name: String,
    pub exchange: String,
    pub trade_date: String,
    pub open: f64,
    pub close: f64,
    pub high: f64,
    pub low: f64,
    pub volume: i64,
    pub amount: f64,
    pub change_percent: f64,
    #[cfg_attr(feature = "sqlx-support", sqlx(default))]
    pub turnover_ratio: f64,
    pub prev_volume: i64,
    pub prev_change_percent: f64,
    pub volume_ratio: f64,
    /// 만 위안
    #[cfg_attr(feature = "sqlx-support", sqlx(default))]
    pub mktcap: f64,
}
