//! Serial date numbers
//!
//! Spreadsheets store dates as a count of days from an epoch, with the time
//! of day as the fractional part. The 1900 system keeps the historical
//! mistake of treating 1900 as a leap year: serial 60 is the nonexistent
//! 1900-02-29 and earlier serials are shifted by one day.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

/// Day-count ordinal (from 0001-01-01 = 1) of 1899-12-30
const ORDINAL_1899_12_30: i64 = 693_594;
/// Day-count ordinal of 1904-01-01
const ORDINAL_1904_01_01: i64 = 695_056;
/// Serial of the phantom 1900-02-29
const PHANTOM_LEAP_DAY: i64 = 60;

const SECONDS_PER_DAY: i64 = 86_400;
const MICROS_PER_DAY: f64 = 86_400_000_000.0;

/// The date system of a workbook
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Calendar {
    /// Serial 1 is 1900-01-01
    #[default]
    Windows1900,
    /// Serial 0 is 1904-01-01
    Mac1904,
}

impl Calendar {
    /// Whole-day serial of a date
    pub fn date_to_serial(self, date: NaiveDate) -> i64 {
        let ordinal = date.num_days_from_ce() as i64;
        match self {
            Calendar::Windows1900 => {
                let days = ordinal - ORDINAL_1899_12_30;
                if days <= PHANTOM_LEAP_DAY {
                    days - 1
                } else {
                    days
                }
            }
            Calendar::Mac1904 => ordinal - ORDINAL_1904_01_01,
        }
    }

    /// Date of a whole-day serial. The phantom 1900-02-29 maps to 1900-02-28.
    pub fn serial_to_date(self, serial: i64) -> Option<NaiveDate> {
        let ordinal = match self {
            Calendar::Windows1900 if serial < PHANTOM_LEAP_DAY => ORDINAL_1899_12_30 + 1 + serial,
            Calendar::Windows1900 if serial == PHANTOM_LEAP_DAY => ORDINAL_1899_12_30 + serial,
            Calendar::Windows1900 => ORDINAL_1899_12_30 + serial,
            Calendar::Mac1904 => ORDINAL_1904_01_01 + serial,
        };
        NaiveDate::from_num_days_from_ce_opt(i32::try_from(ordinal).ok()?)
    }

    /// Serial of a date and time
    pub fn datetime_to_serial(self, datetime: NaiveDateTime) -> f64 {
        self.date_to_serial(datetime.date()) as f64 + time_to_serial(datetime.time())
    }

    /// Date and time of a serial, rounded to the microsecond
    pub fn serial_to_datetime(self, serial: f64) -> Option<NaiveDateTime> {
        let (days, micros) = split_serial(serial)?;
        let date = self.serial_to_date(days)?;
        Some(date.and_time(micros_to_time(micros)))
    }

    /// Calendar fields for rendering, with seconds rounded to `precision`
    /// fractional digits. Negative serials have no date.
    pub fn serial_to_parts(self, serial: f64, precision: u32) -> Option<DateParts> {
        if !serial.is_finite() || serial < 0.0 {
            return None;
        }
        let scale = 10_i64.pow(precision.min(6));
        let total = (serial * (SECONDS_PER_DAY * scale) as f64).round() as i64;
        let units_per_day = SECONDS_PER_DAY * scale;
        let days = total.div_euclid(units_per_day);
        let seconds = total.rem_euclid(units_per_day) / scale;
        let fraction = total.rem_euclid(scale) as u32;

        let (year, month, day) = match self {
            Calendar::Windows1900 if days == PHANTOM_LEAP_DAY => (1900, 2, 29),
            Calendar::Windows1900 if days == 0 => (1900, 1, 0),
            _ => {
                let date = self.serial_to_date(days)?;
                (date.year(), date.month(), date.day())
            }
        };
        let weekday = match self {
            Calendar::Windows1900 => (days + 6).rem_euclid(7) as u32,
            Calendar::Mac1904 => (days + 5).rem_euclid(7) as u32,
        };

        Some(DateParts {
            year,
            month,
            day,
            weekday,
            hour: (seconds / 3600) as u32,
            minute: (seconds / 60 % 60) as u32,
            second: (seconds % 60) as u32,
            fraction,
            total_seconds: total / scale,
        })
    }
}

/// Fields of a serial date as shown by number formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateParts {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    /// 0 = Sunday
    pub weekday: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    /// Fractional seconds in units of the requested precision
    pub fraction: u32,
    /// Whole seconds since serial 0, for elapsed-time formats
    pub total_seconds: i64,
}

/// Fraction of a day for a time of day
pub fn time_to_serial(time: NaiveTime) -> f64 {
    let micros = time.num_seconds_from_midnight() as f64 * 1e6 + (time.nanosecond() / 1000) as f64;
    micros / MICROS_PER_DAY
}

/// Fraction of a day for hour/minute/second/microsecond fields; hours may
/// exceed 23
pub fn time_parts_to_serial(hour: i64, minute: i64, second: i64, microsecond: i64) -> f64 {
    let seconds =
        hour as f64 * 3600.0 + minute as f64 * 60.0 + second as f64 + microsecond as f64 / 1e6;
    seconds / SECONDS_PER_DAY as f64
}

/// Time of day of a serial, ignoring whole days
pub fn serial_to_time(serial: f64) -> NaiveTime {
    split_serial(serial).map_or(NaiveTime::MIN, |(_, micros)| micros_to_time(micros))
}

/// Serial length of a duration
pub fn duration_to_serial(duration: Duration) -> f64 {
    match duration.num_microseconds() {
        Some(us) => us as f64 / MICROS_PER_DAY,
        None => duration.num_seconds() as f64 / SECONDS_PER_DAY as f64,
    }
}

/// Duration of a serial length, rounded to the microsecond
pub fn serial_to_duration(serial: f64) -> Duration {
    if !serial.is_finite() {
        return Duration::zero();
    }
    Duration::microseconds((serial * MICROS_PER_DAY).round() as i64)
}

/// Whole days and microseconds into the day
fn split_serial(serial: f64) -> Option<(i64, i64)> {
    if !serial.is_finite() {
        return None;
    }
    let micros_per_day = MICROS_PER_DAY as i64;
    let total = (serial * MICROS_PER_DAY).round() as i64;
    Some((total.div_euclid(micros_per_day), total.rem_euclid(micros_per_day)))
}

fn micros_to_time(micros: i64) -> NaiveTime {
    let secs = (micros / 1_000_000) as u32;
    let nanos = (micros % 1_000_000) as u32 * 1000;
    NaiveTime::from_num_seconds_from_midnight_opt(secs, nanos).unwrap_or(NaiveTime::MIN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_windows_serials() {
        let cal = Calendar::Windows1900;
        assert_eq!(cal.date_to_serial(ymd(1900, 1, 1)), 1);
        assert_eq!(cal.date_to_serial(ymd(1900, 2, 28)), 59);
        assert_eq!(cal.date_to_serial(ymd(1900, 3, 1)), 61);
        assert_eq!(cal.date_to_serial(ymd(2016, 6, 30)), 42551);
        for serial in [1, 59, 61, 42551] {
            let date = cal.serial_to_date(serial).unwrap();
            assert_eq!(cal.date_to_serial(date), serial);
        }
        assert_eq!(cal.serial_to_date(60), Some(ymd(1900, 2, 28)));
    }

    #[test]
    fn test_mac_serials() {
        let cal = Calendar::Mac1904;
        assert_eq!(cal.date_to_serial(ymd(1904, 1, 1)), 0);
        assert_eq!(
            cal.date_to_serial(ymd(2016, 6, 30)),
            Calendar::Windows1900.date_to_serial(ymd(2016, 6, 30)) - 1462
        );
        assert_eq!(cal.serial_to_date(1), Some(ymd(1904, 1, 2)));
    }

    #[test]
    fn test_datetime_round_trip() {
        let dt = ymd(2016, 6, 30).and_hms_opt(13, 45, 30).unwrap();
        let serial = Calendar::Windows1900.datetime_to_serial(dt);
        assert!((serial - 42551.573263888889).abs() < 1e-9);
        assert_eq!(Calendar::Windows1900.serial_to_datetime(serial), Some(dt));
    }

    #[test]
    fn test_time_serials() {
        let noon = NaiveTime::from_hms_opt(12, 0, 0).unwrap();
        assert_eq!(time_to_serial(noon), 0.5);
        assert_eq!(serial_to_time(1.5), noon);
        assert_eq!(time_parts_to_serial(25, 0, 0, 500_000), (90_000.5) / 86_400.0);
    }

    #[test]
    fn test_durations() {
        let d = Duration::hours(36);
        assert_eq!(duration_to_serial(d), 1.5);
        assert_eq!(serial_to_duration(1.5), d);
    }

    #[test]
    fn test_parts() {
        let parts = Calendar::Windows1900.serial_to_parts(60.75, 0).unwrap();
        assert_eq!((parts.year, parts.month, parts.day), (1900, 2, 29));
        assert_eq!((parts.hour, parts.minute, parts.second), (18, 0, 0));

        let parts = Calendar::Windows1900.serial_to_parts(1.0, 0).unwrap();
        assert_eq!(parts.weekday, 0);

        // 23:59:59.9996 rounds into the next day
        let parts = Calendar::Windows1900
            .serial_to_parts(42551.0 + 86_399.9996 / 86_400.0, 0)
            .unwrap();
        assert_eq!((parts.month, parts.day, parts.hour), (7, 1, 0));

        let parts = Calendar::Windows1900.serial_to_parts(0.5 + 0.25 / 86_400.0, 2).unwrap();
        assert_eq!((parts.second, parts.fraction), (0, 25));
        assert!(Calendar::Windows1900.serial_to_parts(-1.0, 0).is_none());
    }
}
