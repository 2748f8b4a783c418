//! Dataset Schema
//! Fixed column set of the Beijing PRSA air-quality CSV (Shunyi station).

/// Integer date-part columns composed into the per-row timestamp.
pub const DATE_PART_FIELDS: [&str; 4] = ["year", "month", "day", "hour"];

/// Numeric measurement columns available to the trend and correlation
/// selectors. Order here is the order the UI lists them in.
pub const MEASUREMENT_FIELDS: [&str; 11] = [
    "PM2.5", "PM10", "SO2", "NO2", "CO", "O3", "TEMP", "PRES", "DEWP", "RAIN", "WSPM",
];

/// Derived column holding the composed timestamp
/// (`year*1_000_000 + month*10_000 + day*100 + hour`).
pub const DATE_KEY: &str = "date_key";

/// True if `name` is one of the known measurement columns.
pub fn is_measurement_field(name: &str) -> bool {
    MEASUREMENT_FIELDS.contains(&name)
}
