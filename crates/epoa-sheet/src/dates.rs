use chrono::{DateTime, Days, NaiveDate, NaiveDateTime};

/// Day zero of spreadsheet serial dates (1900 date system, with the leap-year quirk folded in).
const SERIAL_EPOCH: (i32, u32, u32) = (1899, 12, 30);

/// Parse a date cell as exported from a spreadsheet. Blank cells are `None`.
pub fn parse_sheet_date(raw: &str) -> Result<Option<NaiveDate>, String> {
    let s = raw.trim();
    if s.is_empty() {
        return Ok(None);
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(Some(d));
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%m/%d/%Y") {
        return Ok(Some(d));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Ok(Some(dt.date()));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(Some(dt.date_naive()));
    }
    if let Ok(serial) = s.parse::<f64>() {
        return from_serial(serial).map(Some);
    }
    Err(format!("unrecognised date {s:?}"))
}

fn from_serial(serial: f64) -> Result<NaiveDate, String> {
    if !(1.0..=2_958_465.0).contains(&serial) {
        return Err(format!("date serial {serial} out of range"));
    }
    let (y, m, d) = SERIAL_EPOCH;
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|epoch| epoch.checked_add_days(Days::new(serial.trunc() as u64)))
        .ok_or_else(|| format!("date serial {serial} out of range"))
}
