//! 시가총액 단위 변환과 상한 필터.
//!
//! 데이터베이스와 실시간 시세의 시가총액은 만 위안(万元) 단위입니다.
//! 사용자는 상한을 억 위안(亿元) 단위로 지정합니다.

/// 1억 위안에 해당하는 만 위안 수.
pub const WAN_PER_YI: f64 = 10_000.0;

/// 억 위안을 만 위안으로 변환합니다.
pub fn yi_to_wan(yi: f64) -> f64 {
    yi * WAN_PER_YI
}

/// 만 위안을 억 위안으로 변환합니다.
pub fn wan_to_yi(wan: f64) -> f64 {
    wan / WAN_PER_YI
}

/// 억 단위 상한을 만 단위로 바꿉니다. 0 이하는 무제한(`None`)입니다.
pub fn mktcap_ceiling_wan(max_mktcap_yi: f64) -> Option<f64> {
    if max_mktcap_yi > 0.0 {
        Some(yi_to_wan(max_mktcap_yi))
    } else {
        None
    }
}

/// 시가총액이 상한을 넘는지 확인합니다.
pub fn exceeds_ceiling(mktcap_wan: f64, ceiling_wan: Option<f64>) -> bool {
    matches!(ceiling_wan, Some(ceiling) if mktcap_wan > ceiling)
}

/// 주당 가격과 총 주식수(만 주)로 시가총액(만 위안)을 계산합니다.
pub fn market_cap_wan(price: f64, total_shares_wan: f64) -> f64 {
    price * total_shares_wan
}
