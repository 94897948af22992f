use chrono::{
    DateTime,
    TimeZone,
    Utc,
};

/// Midnight UTC on the given day of January 2024; handy for building
/// orderable commit dates without spelling out full timestamps.
pub fn day(n: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, n, 0, 0, 0)
        .single()
        .expect("a valid day in January")
}
