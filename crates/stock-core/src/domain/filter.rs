//! 다일(多日) 등락률 필터 집계.
//!
//! 최근 N 거래일 동안 등락률이 범위 안에 든 (종목, 거래일) 행을 받아
//! 종목별로 최대/최소/평균 등락률과 해당 거래일 목록을 모읍니다.
//! 입력은 종목 코드 오름차순, 거래일 내림차순으로 들어온다고 가정하며
//! 결과 순서는 종목이 처음 등장한 순서를 그대로 따릅니다.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::calculations::{exceeds_ceiling, mktcap_ceiling_wan};

/// 범위 조건을 통과한 하루치 등락 행.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx-support", derive(sqlx::FromRow))]
pub struct DailyChange {
    pub stock_code: String,
    pub stock_name: String,
    pub exchange: String,
    pub trade_date: String,
    pub change_percent: f64,
}

/// 종목별 집계 결과.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilteredStock {
    pub stock_code: String,
    pub stock_name: String,
    pub exchange: String,
    pub max_change_percent: f64,
    pub min_change_percent: f64,
    pub avg_change_percent: f64,
    pub days_count: usize,
    /// `latest_date`의 종가
    pub latest_price: f64,
    pub latest_date: String,
    /// 만 위안. 스냅샷에서 찾지 못하면 0
    pub mktcap: f64,
    /// 조건을 만족한 거래일 (입력 순서)
    pub trigger_dates: Vec<String>,
}

impl FilteredStock {
    fn first(change: DailyChange) -> Self {
        Self {
            stock_code: change.stock_code,
            stock_name: change.stock_name,
            exchange: change.exchange,
            max_change_percent: change.change_percent,
            min_change_percent: change.change_percent,
            avg_change_percent: change.change_percent,
            days_count: 1,
            latest_price: 0.0,
            latest_date: change.trade_date.clone(),
            mktcap: 0.0,
            trigger_dates: vec![change.trade_date],
        }
    }

    fn absorb(&mut self, change: DailyChange) {
        let value = change.change_percent;
        if value > self.max_change_percent {
            self.max_change_percent = value;
        }
        if value < self.min_change_percent {
            self.min_change_percent = value;
        }
        let n = self.days_count as f64;
        self.avg_change_percent = (self.avg_change_percent * n + value) / (n + 1.0);
        self.days_count += 1;
        if change.trade_date > self.latest_date {
            self.latest_date = change.trade_date.clone();
        }
        self.trigger_dates.push(change.trade_date);
    }
}

/// 다일 필터 조건.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FilterParams {
    /// 최근 거래일 수
    pub days: i64,
    /// 최소 등락률 (%)
    pub min_change: f64,
    /// 최대 등락률 (%)
    pub max_change: f64,
    /// 시가총액 상한 (억 위안, 0 이하는 무제한)
    pub max_mktcap: f64,
    pub limit: usize,
}

impl Default for FilterParams {
    fn default() -> Self {
        Self {
            days: 7,
            min_change: 0.0,
            max_change: 100.0,
            max_mktcap: 10_000.0,
            limit: 50,
        }
    }
}

impl FilterParams {
    /// 만 위안 단위의 시가총액 상한.
    pub fn mktcap_ceiling(&self) -> Option<f64> {
        mktcap_ceiling_wan(self.max_mktcap)
    }

    /// 스냅샷 시가총액을 반영하고 종목을 결과에 남길지 결정합니다.
    ///
    /// 양수 시가총액을 찾은 경우에만 값을 기록하고 상한을 적용합니다.
    pub fn admit(&self, stock: &mut FilteredStock, mktcap: Option<f64>) -> bool {
        match mktcap {
            Some(value) if value > 0.0 => {
                stock.mktcap = value;
                !exceeds_ceiling(value, self.mktcap_ceiling())
            }
            _ => true,
        }
    }
}

/// 종목별 등락 집계기.
#[derive(Debug, Default)]
pub struct MultiDayAggregator {
    index: HashMap<String, usize>,
    stocks: Vec<FilteredStock>,
}

impl MultiDayAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 등락 행 하나를 해당 종목 집계에 반영합니다.
    pub fn push(&mut self, change: DailyChange) {
        match self.index.get(&change.stock_code) {
            Some(&pos) => self.stocks[pos].absorb(change),
            None => {
                self.index.insert(change.stock_code.clone(), self.stocks.len());
                self.stocks.push(FilteredStock::first(change));
            }
        }
    }

    pub fn len(&self) -> usize {
        self.stocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stocks.is_empty()
    }

    /// 처음 등장한 순서대로 집계 결과를 반환합니다.
    pub fn into_stocks(self) -> Vec<FilteredStock> {
        self.stocks
    }
}

impl FromIterator<DailyChange> for MultiDayAggregator {
    fn from_iter<I: IntoIterator<Item = DailyChange>>(iter: I) -> Self {
        let mut aggregator = Self::new();
        for change in iter {
            aggregator.push(change);
        }
        aggregator
    }
}
