//! Ten-day calendar buckets ("décades") used by the sowing calendar.
//!
//! The year is split into 36 decades, three per month: decade 1 is the first
//! ten days of January, decade 36 the last third of December. Month indices
//! are 0-based (0 = January) and periods are 0 = début, 1 = mi, 2 = fin.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use sqlx::{
    Database, Decode, Encode, Sqlite, Type,
    encode::IsNull,
    error::BoxDynError,
    sqlite::{SqliteTypeInfo, SqliteValueRef},
};
use thiserror::Error;
use ts_rs::TS;

pub const DECADES_PER_YEAR: u8 = 36;
pub const DECADES_PER_MONTH: u8 = 3;

pub const MONTH_NAMES: [&str; 12] = [
    "Janvier",
    "Février",
    "Mars",
    "Avril",
    "Mai",
    "Juin",
    "Juillet",
    "Août",
    "Septembre",
    "Octobre",
    "Novembre",
    "Décembre",
];

/// Representative day of month used when a decade has to become a date.
const PERIOD_ANCHOR_DAYS: [u32; 3] = [5, 15, 25];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecadeError {
    #[error("{field} out of range: {value} (must be {min}..={max})")]
    OutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },
}

impl DecadeError {
    fn out_of_range(field: &'static str, value: i64, min: i64, max: i64) -> Self {
        DecadeError::OutOfRange {
            field,
            value,
            min,
            max,
        }
    }
}

/// Third of a month a decade falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
pub enum DecadePeriod {
    #[serde(rename = "début")]
    Debut,
    Mi,
    Fin,
}

impl DecadePeriod {
    pub const ALL: [DecadePeriod; 3] = [DecadePeriod::Debut, DecadePeriod::Mi, DecadePeriod::Fin];

    pub fn from_index(index: i64) -> Result<Self, DecadeError> {
        match index {
            0 => Ok(DecadePeriod::Debut),
            1 => Ok(DecadePeriod::Mi),
            2 => Ok(DecadePeriod::Fin),
            other => Err(DecadeError::out_of_range("period", other, 0, 2)),
        }
    }

    pub fn index(self) -> u8 {
        match self {
            DecadePeriod::Debut => 0,
            DecadePeriod::Mi => 1,
            DecadePeriod::Fin => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DecadePeriod::Debut => "début",
            DecadePeriod::Mi => "mi",
            DecadePeriod::Fin => "fin",
        }
    }
}

impl fmt::Display for DecadePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Validated decade index in `1..=36`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    TS,
)]
#[serde(try_from = "i64")]
pub struct Decade(u8);

impl Decade {
    /// # Errors
    ///
    /// Returns [`DecadeError::OutOfRange`] if `value` is not in `1..=36`.
    pub fn new(value: i64) -> Result<Self, DecadeError> {
        if !(1..=DECADES_PER_YEAR as i64).contains(&value) {
            return Err(DecadeError::out_of_range(
                "decade",
                value,
                1,
                DECADES_PER_YEAR as i64,
            ));
        }
        Ok(Self(value as u8))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Month index, 0 = January.
    pub fn month_index(self) -> u8 {
        (self.0 - 1) / DECADES_PER_MONTH
    }

    pub fn period(self) -> DecadePeriod {
        match (self.0 - 1) % DECADES_PER_MONTH {
            0 => DecadePeriod::Debut,
            1 => DecadePeriod::Mi,
            _ => DecadePeriod::Fin,
        }
    }

    pub fn month_name(self) -> &'static str {
        MONTH_NAMES[self.month_index() as usize]
    }

    pub fn info(self) -> DecadeInfo {
        DecadeInfo {
            decade: self,
            month_index: self.month_index(),
            month_name: self.month_name().to_string(),
            period: self.period(),
            display_text: self.to_string(),
        }
    }

    /// All 36 decades in calendar order.
    pub fn all() -> impl Iterator<Item = Decade> {
        (1..=DECADES_PER_YEAR).map(Decade)
    }
}

impl TryFrom<i64> for Decade {
    type Error = DecadeError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Decade::new(value)
    }
}

impl From<Decade> for i64 {
    fn from(decade: Decade) -> Self {
        decade.0 as i64
    }
}

// Stored as INTEGER; decoding goes through `Decade::new` so a bad row is an
// error instead of an invalid value.
impl Type<Sqlite> for Decade {
    fn type_info() -> SqliteTypeInfo {
        <i64 as Type<Sqlite>>::type_info()
    }

    fn compatible(ty: &SqliteTypeInfo) -> bool {
        <i64 as Type<Sqlite>>::compatible(ty)
    }
}

impl<'q> Encode<'q, Sqlite> for Decade {
    fn encode_by_ref(
        &self,
        buf: &mut <Sqlite as Database>::ArgumentBuffer<'q>,
    ) -> Result<IsNull, BoxDynError> {
        <i64 as Encode<'q, Sqlite>>::encode(i64::from(*self), buf)
    }
}

impl<'r> Decode<'r, Sqlite> for Decade {
    fn decode(value: SqliteValueRef<'r>) -> Result<Self, BoxDynError> {
        let raw = <i64 as Decode<'r, Sqlite>>::decode(value)?;
        Ok(Decade::new(raw)?)
    }
}

impl fmt::Display for Decade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.period(), self.month_name())
    }
}

/// Decoded view of a decade for tooltips and grid headers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
pub struct DecadeInfo {
    pub decade: Decade,
    pub month_index: u8,
    pub month_name: String,
    pub period: DecadePeriod,
    pub display_text: String,
}

/// A month with its three decades, in grid order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
pub struct MonthDecades {
    pub month_index: u8,
    pub month_name: String,
    pub decades: [Decade; 3],
}

pub fn decade_info(decade: i64) -> Result<DecadeInfo, DecadeError> {
    Decade::new(decade).map(Decade::info)
}

/// Inverse of [`decade_info`]: `month * 3 + period + 1`.
pub fn month_period_to_decade(month: i64, period: i64) -> Result<Decade, DecadeError> {
    if !(0..=11).contains(&month) {
        return Err(DecadeError::out_of_range("month", month, 0, 11));
    }
    let period = DecadePeriod::from_index(period)?;
    Ok(Decade(
        month as u8 * DECADES_PER_MONTH + period.index() + 1,
    ))
}

pub fn format_range(start: Decade, end: Decade) -> String {
    if start == end {
        return start.to_string();
    }
    format!("{} - {}", start, end)
}

/// Inclusive containment; `start > end` spans the December → January boundary.
pub fn is_in_range(decade: Decade, start: Decade, end: Decade) -> bool {
    if start <= end {
        start <= decade && decade <= end
    } else {
        decade >= start || decade <= end
    }
}

pub fn current_decade(today: NaiveDate) -> Decade {
    let day = today.day();
    let period = if day >= 21 {
        DecadePeriod::Fin
    } else if day >= 11 {
        DecadePeriod::Mi
    } else {
        DecadePeriod::Debut
    };
    Decade(today.month0() as u8 * DECADES_PER_MONTH + period.index() + 1)
}

/// Representative date (5th, 15th or 25th) for duration estimates.
pub fn approximate_date(decade: Decade, year: i32) -> Result<NaiveDate, DecadeError> {
    let day = PERIOD_ANCHOR_DAYS[decade.period().index() as usize];
    NaiveDate::from_ymd_opt(year, decade.month_index() as u32 + 1, day).ok_or_else(|| {
        DecadeError::out_of_range(
            "year",
            year as i64,
            NaiveDate::MIN.year() as i64,
            NaiveDate::MAX.year() as i64,
        )
    })
}

/// Approximate number of days between two decades within the same year.
/// Negative when `end` comes before `start`.
pub fn days_between(start: Decade, end: Decade, year: i32) -> Result<i64, DecadeError> {
    let from = approximate_date(start, year)?;
    let to = approximate_date(end, year)?;
    Ok((to - from).num_days())
}

pub fn decades_for_month(month: i64) -> Result<[Decade; 3], DecadeError> {
    let first = month_period_to_decade(month, 0)?;
    Ok([first, Decade(first.0 + 1), Decade(first.0 + 2)])
}

pub fn all_months() -> Vec<MonthDecades> {
    MONTH_NAMES
        .iter()
        .enumerate()
        .map(|(index, name)| {
            let first = index as u8 * DECADES_PER_MONTH + 1;
            MonthDecades {
                month_index: index as u8,
                month_name: (*name).to_string(),
                decades: [Decade(first), Decade(first + 1), Decade(first + 2)],
            }
        })
        .collect()
}
