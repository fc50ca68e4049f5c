use chrono::{NaiveDate, Utc};

/// Calendar days are exchanged as `YYYY-MM-DD` strings and always
/// interpreted at UTC midnight. Mixing in the local timezone shifts day
/// boundaries and breaks streak arithmetic, so `Local` never appears here.
pub const DAY_FORMAT: &str = "%Y-%m-%d";

pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

pub fn parse_day(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DAY_FORMAT).ok()
}

pub fn day_key(date: NaiveDate) -> String {
    date.format(DAY_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_day_accepts_iso_dates() {
        assert_eq!(
            parse_day("2025-02-23"),
            NaiveDate::from_ymd_opt(2025, 2, 23)
        );
        assert_eq!(parse_day(" 2025-02-23 "), NaiveDate::from_ymd_opt(2025, 2, 23));
    }

    #[test]
    fn parse_day_rejects_garbage() {
        assert_eq!(parse_day("23/02/2025"), None);
        assert_eq!(parse_day("2025-13-01"), None);
        assert_eq!(parse_day(""), None);
    }

    #[test]
    fn day_key_round_trips() {
        let date = NaiveDate::from_ymd_opt(2025, 2, 5).unwrap();
        assert_eq!(day_key(date), "2025-02-05");
        assert_eq!(parse_day(&day_key(date)), Some(date));
    }
}
