use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Closing price - uses Decimal for precision
pub type Price = Decimal;

/// Timestamp in UTC
pub type Timestamp = DateTime<Utc>;

/// Ticker symbol used for price lookups (e.g. `ADS.F`)
pub type Symbol = String;

/// Format the pass date the way existing document consumers expect it.
///
/// Always `MM/DD/YYYY`, never ISO-8601.
pub fn date_stamp(at: &Timestamp) -> String {
    at.format("%m/%d/%Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_date_stamp_is_month_day_year() {
        let at = Utc.with_ymd_and_hms(2024, 3, 7, 23, 59, 0).unwrap();
        assert_eq!(date_stamp(&at), "03/07/2024");
    }
}
