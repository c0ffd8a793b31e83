//! Purpose: Black-Scholes delta for option-chain contracts.
//! Exports: `RISK_FREE_RATE`, `normal_cdf`, `years_to_expiry`, `black_scholes_delta`.
//! Role: Pure math behind `Contract::delta`; no lookups or I/O.
//! Invariants: Degenerate inputs (non-positive time, volatility, spot or strike)
//! yield +0.5 for calls and -0.5 for puts instead of NaN.
//! Notes: `normal_cdf` uses the Abramowitz-Stegun 7.1.26 erf (abs error < 1.5e-7).
use crate::quote::ContractKind;

/// Annualized rate used in `d1`.
pub const RISK_FREE_RATE: f64 = 0.045;

const SECONDS_PER_DAY: i64 = 86_400;
const MIN_YEARS: f64 = 0.001;

fn erf(x: f64) -> f64 {
    const A1: f64 = 0.254_829_592;
    const A2: f64 = -0.284_496_736;
    const A3: f64 = 1.421_413_741;
    const A4: f64 = -1.453_152_027;
    const A5: f64 = 1.061_405_429;
    const P: f64 = 0.327_591_1;

    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();
    let t = 1.0 / (1.0 + P * x);
    let poly = ((((A5 * t + A4) * t + A3) * t + A2) * t + A1) * t;
    sign * (1.0 - poly * (-x * x).exp())
}

pub fn normal_cdf(x: f64) -> f64 {
    0.5 * (1.0 + erf(x / std::f64::consts::SQRT_2))
}

/// Whole days until `expiration` (floored), in years, never below 0.001.
/// A missing expiration (`<= 0`) gives 0.0 so the delta falls back.
pub fn years_to_expiry(expiration: i64, now_unix: i64) -> f64 {
    if expiration <= 0 {
        return 0.0;
    }
    let days = (expiration - now_unix).div_euclid(SECONDS_PER_DAY);
    (days as f64 / 365.0).max(MIN_YEARS)
}

pub fn black_scholes_delta(
    spot: f64,
    strike: f64,
    years: f64,
    volatility: f64,
    kind: ContractKind,
) -> f64 {
    let fallback = match kind {
        ContractKind::Call => 0.5,
        ContractKind::Put => -0.5,
    };
    if !(years > 0.0 && volatility > 0.0 && spot > 0.0 && strike > 0.0) {
        return fallback;
    }
    let d1 = ((spot / strike).ln() + (RISK_FREE_RATE + 0.5 * volatility * volatility) * years)
        / (volatility * years.sqrt());
    if !d1.is_finite() {
        return fallback;
    }
    match kind {
        ContractKind::Call => normal_cdf(d1),
        ContractKind::Put => normal_cdf(d1) - 1.0,
    }
}
