//! 테스트용 SQLite 픽스처.
//!
//! 종목 목록, 두 개의 일별 스냅샷 테이블(20250103, 20250106),
//! 세 거래일(20250102, 20250103, 20250106)의 일봉 이력을 만듭니다.
//!
//! | 종목 | 20250102 | 20250103 | 20250106 | 비고 |
//! |---|---|---|---|---|
//! | 300750 | 100 / 1000 | 101 / 1000 | 110 / 3000 | 거래량 3배, 가속 |
//! | 600000 | 10 / 5000 | 10 / 5000 | 11 / 15000 | 회전율 1.2% |
//! | 920003 | 20 / 1000 | 20 / 1000 | 19 / 1500 | 하락 |
//! | 000001 | - | - | 시가 10, 종가 10.5 | 이전 행 없음 |
//! | 688001 | - | - | 시가 0, 종가 5 | 이전 행 없음, 시가 0 |
//! | 000002 | - | - | 종가 NULL | 디코딩 불가 |
//!
//! (종가 / 거래량)

use sqlx::SqlitePool;

const SCHEMA: &str = r#"
CREATE TABLE stock_list (
    ts_code TEXT, symbol TEXT, name TEXT, area TEXT,
    industry TEXT, list_date TEXT, pinyin TEXT
);

CREATE TABLE stock_history (
    id INTEGER PRIMARY KEY,
    stock_code TEXT, stock_name TEXT, exchange TEXT, trade_date TEXT,
    open REAL, high REAL, low REAL, close REAL,
    volume INTEGER, amount REAL, import_time TEXT,
    UNIQUE (stock_code, trade_date)
);

CREATE TABLE stock_daily_20250103 (
    symbol TEXT, code TEXT, name TEXT, trade REAL, pricechange REAL,
    changepercent REAL, buy REAL, sell REAL, settlement REAL,
    open REAL, high REAL, low REAL, volume INTEGER, amount INTEGER,
    ticktime TEXT, per REAL, pb REAL, mktcap REAL, nmc REAL,
    turnoverratio REAL, dump_time TEXT
);

CREATE TABLE stock_daily_20250106 (
    symbol TEXT, code TEXT, name TEXT, trade REAL, pricechange REAL,
    changepercent REAL, buy REAL, sell REAL, settlement REAL,
    open REAL, high REAL, low REAL, volume INTEGER, amount INTEGER,
    ticktime TEXT, per REAL, pb REAL, mktcap REAL, nmc REAL,
    turnoverratio REAL, dump_time TEXT
);

CREATE TABLE stock_daily_backup (symbol TEXT);
"#;

const DATA: &str = r#"
INSERT INTO stock_list VALUES
    ('600000.SH', '600000', '浦发银行', '上海', '银行', '19991110', 'pfyh'),
    ('000001.SZ', '000001', '平安银行', '深圳', '银行', '19910403', 'payh'),
    ('300750.SZ', '300750', '宁德时代', '福建', '电气设备', '20180611', 'ndsd'),
    ('920003.BJ', '920003', '北交样本', '北京', '制造', '20200101', 'bjyb'),
    ('688001.SH', '688001', '华兴源创', NULL, '设备', '20190722', 'hxyc');

INSERT INTO stock_daily_20250103 VALUES
    ('sh600000', '600000', '浦发银行', 10.0, 0.0, 0.0, 10.0, 10.01, 10.0, 10.0, 10.1, 9.9, 5000, 50000, '15:00:00', 5.1, 0.5, 2900000.0, 2800000.0, 0.4, '2025-01-03 15:30:00'),
    ('sz300750', '300750', '宁德时代', 101.0, 1.0, 1.0, 101.0, 101.1, 100.0, 100.0, 102.0, 99.5, 1000, 101000, '15:00:00', 20.3, 4.8, 45000.0, 40000.0, 3.0, '2025-01-03 15:30:00');

INSERT INTO stock_daily_20250106 VALUES
    ('sh600000', '600000', '浦发银行', 11.0, 1.0, 10.0, 11.0, 11.01, 10.0, 10.0, 11.0, 10.0, 15000, 160000, '15:00:00', 5.6, 0.55, 3000000.0, 2900000.0, 1.2, '2025-01-06 15:30:00'),
    ('sz000001', '000001', '平安银行', 11.0, -0.22, -2.0, 11.0, 11.01, 11.22, 11.2, 11.3, 10.9, 8000, 88000, '15:00:00', 4.2, 0.6, 2100000.0, 2000000.0, 0.8, '2025-01-06 15:30:00'),
    ('sz000001', '000001', '平安银行', 11.2, -0.17, -1.5, 11.2, 11.21, 11.37, 11.2, 11.3, 10.9, 8100, 89000, '15:01:00', 4.2, 0.6, 2100000.0, 2000000.0, 0.9, '2025-01-06 15:31:00'),
    ('sz300750', '300750', '宁德时代', 110.0, 9.0, 8.91, 110.0, 110.1, 101.0, 101.0, 111.0, 100.5, 3000, 330000, '15:00:00', 22.0, 5.2, 50000.0, 45000.0, 8.5, '2025-01-06 15:30:00'),
    ('bj920003', '920003', '北交样本', 19.0, 0.0, 0.0, 19.0, 19.01, 19.0, 20.0, 20.0, 18.8, 1500, 28500, '15:00:00', 30.0, 2.0, 20000.0, 15000.0, 12.0, '2025-01-06 15:30:00');

INSERT INTO stock_history (stock_code, stock_name, exchange, trade_date, open, high, low, close, volume, amount, import_time) VALUES
    ('300750', '宁德时代', 'SZ', '20250102', 99.0, 100.5, 98.0, 100.0, 1000, 100000.0, '2025-01-07 09:00:00'),
    ('300750', '宁德时代', 'SZ', '20250103', 100.0, 102.0, 99.5, 101.0, 1000, 101000.0, '2025-01-07 09:00:00'),
    ('300750', '宁德时代', 'SZ', '20250106', 101.0, 111.0, 100.5, 110.0, 3000, 330000.0, '2025-01-07 09:00:00'),
    ('600000', '浦发银行', 'SH', '20250102', 10.0, 10.1, 9.9, 10.0, 5000, 50000.0, '2025-01-07 09:00:00'),
    ('600000', '浦发银行', 'SH', '20250103', 10.0, 10.1, 9.9, 10.0, 5000, 50000.0, '2025-01-07 09:00:00'),
    ('600000', '浦发银行', 'SH', '20250106', 10.0, 11.0, 10.0, 11.0, 15000, 160000.0, '2025-01-07 09:00:00'),
    ('920003', '北交样本', 'BJ', '20250102', 20.0, 20.5, 19.5, 20.0, 1000, 20000.0, '2025-01-07 09:00:00'),
    ('920003', '北交样本', 'BJ', '20250103', 20.0, 20.5, 19.5, 20.0, 1000, 20000.0, '2025-01-07 09:00:00'),
    ('920003', '北交样本', 'BJ', '20250106', 20.0, 20.0, 18.8, 19.0, 1500, 28500.0, '2025-01-07 09:00:00'),
    ('000001', '平安银行', 'SZ', '20250106', 10.0, 10.6, 9.9, 10.5, 8000, 84000.0, '2025-01-07 09:00:00'),
    ('688001', '华兴源创', 'SH', '20250106', 0.0, 5.0, 0.0, 5.0, 100, 500.0, '2025-01-07 09:00:00'),
    ('000002', '万科A', 'SZ', '20250106', 5.0, 5.2, 4.9, NULL, 100, 500.0, '2025-01-07 09:00:00');
"#;

/// 픽스처 스키마와 데이터를 생성합니다.
pub async fn seed_market_data(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(SCHEMA).execute(pool).await?;
    sqlx::raw_sql(DATA).execute(pool).await?;
    Ok(())
}

/// 픽스처가 채워진 테스트 상태.
pub async fn seeded_state() -> crate::state::AppState {
    let state = crate::state::create_test_state();
    seed_market_data(&state.db_pool)
        .await
        .expect("Failed to seed fixture data");
    state
}
