//! 토큰 만료 기간 파싱.
//!
//! 설정에 문자열로 저장되는 만료 기간(`"3m"`, `"1ms"`, `"2 days"`)이나
//! 단위 없는 밀리초 값(`"60000"`)을 해석합니다.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

const SECOND: f64 = 1_000.0;
const MINUTE: f64 = SECOND * 60.0;
const HOUR: f64 = MINUTE * 60.0;
const DAY: f64 = HOUR * 24.0;
const WEEK: f64 = DAY * 7.0;
const YEAR: f64 = DAY * 365.25;

/// 만료 기간 파싱 에러.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DurationParseError {
    #[error("duration is empty")]
    Empty,
    #[error("invalid duration value: {0}")]
    InvalidValue(String),
    #[error("unknown duration unit: {0}")]
    UnknownUnit(String),
    #[error("duration must be positive: {0}")]
    NotPositive(String),
    #[error("duration exceeds 100 years: {0}")]
    TooLarge(String),
}

/// 토큰 만료 기간 (밀리초 정밀도).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ExpiresIn {
    millis: i64,
}

impl ExpiresIn {
    /// 허용되는 최대 기간 (100년). 현재 시각에 더해도 `i64` 밀리초 범위를 넘지 않습니다.
    pub const MAX_MILLIS: i64 = (YEAR * 100.0) as i64;

    /// 밀리초 값으로 생성.
    pub fn from_millis(millis: i64) -> Result<Self, DurationParseError> {
        if millis <= 0 {
            return Err(DurationParseError::NotPositive(millis.to_string()));
        }
        if millis > Self::MAX_MILLIS {
            return Err(DurationParseError::TooLarge(millis.to_string()));
        }
        Ok(Self { millis })
    }

    /// 밀리초 값.
    pub fn as_millis(&self) -> i64 {
        self.millis
    }

    /// 초 값 (내림).
    pub fn as_secs(&self) -> i64 {
        self.millis / 1_000
    }
}

fn unit_factor(unit: &str) -> Option<f64> {
    let factor = match unit {
        "" | "ms" | "msec" | "msecs" | "millisecond" | "milliseconds" => 1.0,
        "s" | "sec" | "secs" | "second" | "seconds" => SECOND,
        "m" | "min" | "mins" | "minute" | "minutes" => MINUTE,
        "h" | "hr" | "hrs" | "hour" | "hours" => HOUR,
        "d" | "day" | "days" => DAY,
        "w" | "week" | "weeks" => WEEK,
        "y" | "yr" | "yrs" | "year" | "years" => YEAR,
        _ => return None,
    };
    Some(factor)
}

impl FromStr for ExpiresIn {
    type Err = DurationParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        if input.is_empty() {
            return Err(DurationParseError::Empty);
        }

        let split = input
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(input.len());
        let (value, unit) = input.split_at(split);

        let value: f64 = value
            .parse()
            .map_err(|_| DurationParseError::InvalidValue(input.to_string()))?;
        let unit = unit.trim().to_ascii_lowercase();
        let factor =
            unit_factor(&unit).ok_or_else(|| DurationParseError::UnknownUnit(unit.clone()))?;

        let millis = (value * factor).round();
        if !millis.is_finite() {
            return Err(DurationParseError::InvalidValue(input.to_string()));
        }
        if millis > Self::MAX_MILLIS as f64 {
            return Err(DurationParseError::TooLarge(input.to_string()));
        }

        Self::from_millis(millis as i64)
            .map_err(|_| DurationParseError::NotPositive(input.to_string()))
    }
}

impl fmt::Display for ExpiresIn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.millis)
    }
}
