// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Clock record encoding.
//!
//! The device keeps local wall-clock time with minute resolution and a
//! one-byte year offset from 2000.

use chrono::{Datelike, NaiveDate, NaiveDateTime, TimeDelta, Timelike};

use crate::error::ValueError;

use super::CLOCK_LEN;

const YEAR_BASE: i32 = 2000;

/// Rounds a timestamp to the nearest whole minute.
///
/// Seconds of 30 or more round up, carrying into the hour, day, month and
/// year as needed.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use xavax_lib::codec::round_to_minute;
///
/// let dt = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap().and_hms_opt(23, 59, 30).unwrap();
/// let rounded = round_to_minute(dt);
/// assert_eq!(rounded, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap());
/// ```
#[must_use]
pub fn round_to_minute(dt: NaiveDateTime) -> NaiveDateTime {
    let floor = dt
        - TimeDelta::seconds(i64::from(dt.second()))
        - TimeDelta::nanoseconds(i64::from(dt.nanosecond()));
    if dt.second() >= 30 {
        floor + TimeDelta::minutes(1)
    } else {
        floor
    }
}

/// Encodes a timestamp into the clock record, rounding to the nearest
/// minute first.
///
/// # Errors
///
/// Returns `ValueError::YearOutOfRange` if the rounded year is outside
/// 2000-2255.
#[allow(clippy::cast_possible_truncation)]
pub fn encode_time(dt: NaiveDateTime) -> Result<[u8; CLOCK_LEN], ValueError> {
    let dt = round_to_minute(dt);
    let year = u8::try_from(dt.year() - YEAR_BASE)
        .map_err(|_| ValueError::YearOutOfRange(dt.year()))?;
    // Calendar and clock fields are all below 60
    Ok([
        dt.minute() as u8,
        dt.hour() as u8,
        dt.day() as u8,
        dt.month() as u8,
        year,
    ])
}

/// Decodes the clock record.
///
/// Returns `None` while the date has not been set (a fresh device reports
/// zero day and month) or when the fields do not form a valid timestamp.
#[must_use]
pub fn decode_time(record: &[u8; CLOCK_LEN]) -> Option<NaiveDateTime> {
    let [minute, hour, day, month, year] = *record;
    NaiveDate::from_ymd_opt(
        YEAR_BASE + i32::from(year),
        u32::from(month),
        u32::from(day),
    )?
    .and_hms_opt(u32::from(hour), u32::from(minute), 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn seconds_at_or_above_thirty_round_up() {
        let encoded = encode_time(at(2019, 8, 5, 13, 10, 45)).unwrap();
        assert_eq!(encoded, [11, 13, 5, 8, 19]);

        let encoded = encode_time(at(2019, 8, 5, 13, 10, 30)).unwrap();
        assert_eq!(encoded[0], 11);
    }

    #[test]
    fn seconds_below_thirty_round_down() {
        let encoded = encode_time(at(2019, 8, 5, 13, 10, 29)).unwrap();
        assert_eq!(encoded, [10, 13, 5, 8, 19]);
    }

    #[test]
    fn rounding_carries_into_hour() {
        let encoded = encode_time(at(2023, 3, 1, 7, 59, 50)).unwrap();
        assert_eq!(encoded, [0, 8, 1, 3, 23]);
    }

    #[test]
    fn year_range() {
        assert!(encode_time(at(2000, 1, 1, 0, 0, 0)).is_ok());
        assert!(encode_time(at(2255, 6, 1, 0, 0, 0)).is_ok());
        assert_eq!(
            encode_time(at(1999, 12, 31, 12, 0, 0)),
            Err(ValueError::YearOutOfRange(1999))
        );
        assert_eq!(
            encode_time(at(2256, 1, 1, 0, 0, 0)),
            Err(ValueError::YearOutOfRange(2256))
        );
    }

    #[test]
    fn decode_valid_clock() {
        let record = [0x30, 0x13, 0x05, 0x08, 0x13];
        assert_eq!(decode_time(&record), Some(at(2019, 8, 5, 19, 48, 0)));
    }

    #[test]
    fn decode_unset_clock() {
        assert_eq!(decode_time(&[0, 0, 0, 0, 0]), None);
        assert_eq!(decode_time(&[61, 0, 1, 1, 20]), None);
    }

    #[test]
    fn encode_then_decode_gives_rounded_time() {
        let dt = at(2024, 2, 29, 22, 14, 31);
        let decoded = decode_time(&encode_time(dt).unwrap()).unwrap();
        assert_eq!(decoded, at(2024, 2, 29, 22, 15, 0));
    }
}
