use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

/// Conversion of the common chrono types into a UTC timestamp.
///
/// Naive values are interpreted as UTC; a bare [`NaiveDate`] maps to midnight UTC,
/// which is how daily observations are timestamped.
pub trait IntoUtcDateTime {
    fn into_utc(self) -> DateTime<Utc>;
}

impl IntoUtcDateTime for NaiveDateTime {
    fn into_utc(self) -> DateTime<Utc> {
        Utc.from_utc_datetime(&self)
    }
}

impl IntoUtcDateTime for NaiveDate {
    fn into_utc(self) -> DateTime<Utc> {
        Utc.from_utc_datetime(&self.and_time(NaiveTime::MIN))
    }
}

/// Any zoned timestamp, shifted to UTC.
impl<Tz: TimeZone> IntoUtcDateTime for DateTime<Tz> {
    fn into_utc(self) -> DateTime<Utc> {
        self.with_timezone(&Utc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn test_naive_date_is_midnight_utc() {
        let date = NaiveDate::from_ymd_opt(1934, 1, 1).unwrap();
        assert_eq!(
            date.into_utc(),
            Utc.with_ymd_and_hms(1934, 1, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_fixed_offset_is_shifted() {
        let berlin = FixedOffset::east_opt(3600).unwrap();
        let local = berlin.with_ymd_and_hms(2022, 1, 1, 1, 0, 0).unwrap();
        assert_eq!(
            local.into_utc(),
            Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap()
        );
    }
}
