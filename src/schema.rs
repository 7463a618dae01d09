//! Fixed column dtypes for files whose content would otherwise infer poorly.
//!
//! Most GTFS files get by with inference, but `agency` identifiers are text
//! even when they look numeric, and `calendar` stores its dates as YYYYMMDD
//! integers alongside 0/1 weekday flags.

use crate::table::Dtype;

/// Pinned dtypes for the `agency` file.
const AGENCY_SCHEMA: &[(&str, Dtype)] = &[
    ("agency_id", Dtype::Text),
    ("agency_name", Dtype::Text),
    ("agency_url", Dtype::Text),
    ("agency_timezone", Dtype::Text),
    ("agency_lang", Dtype::Text),
    ("agency_phone", Dtype::Text),
    ("agency_fare_url", Dtype::Text),
    ("agency_email", Dtype::Text),
    ("cemv_support", Dtype::Int),
];

/// Pinned dtypes for the `calendar` file. Dates are YYYYMMDD integers.
const CALENDAR_SCHEMA: &[(&str, Dtype)] = &[
    ("service_id", Dtype::Text),
    ("monday", Dtype::Int),
    ("tuesday", Dtype::Int),
    ("wednesday", Dtype::Int),
    ("thursday", Dtype::Int),
    ("friday", Dtype::Int),
    ("saturday", Dtype::Int),
    ("sunday", Dtype::Int),
    ("start_date", Dtype::Int),
    ("end_date", Dtype::Int),
];

/// The fixed schema for a logical file name, if one is pinned.
pub(crate) fn fixed_schema(logical_name: &str) -> Option<&'static [(&'static str, Dtype)]> {
    match logical_name {
        "agency" => Some(AGENCY_SCHEMA),
        "calendar" => Some(CALENDAR_SCHEMA),
        _ => None,
    }
}

/// The pinned dtype for one column of a logical file, if any.
pub(crate) fn fixed_dtype(logical_name: &str, column: &str) -> Option<Dtype> {
    fixed_schema(logical_name)?
        .iter()
        .find(|(name, _)| *name == column)
        .map(|(_, dtype)| *dtype)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn agency_pins_text_ids() {
        assert_eq!(Some(Dtype::Text), fixed_dtype("agency", "agency_id"));
        assert_eq!(Some(Dtype::Int), fixed_dtype("agency", "cemv_support"));
        assert_eq!(None, fixed_dtype("agency", "extra_column"));
    }

    #[test]
    fn calendar_pins_integer_dates() {
        assert_eq!(Some(Dtype::Int), fixed_dtype("calendar", "start_date"));
        assert_eq!(Some(Dtype::Text), fixed_dtype("calendar", "service_id"));
    }

    #[test]
    fn unpinned_files_have_no_schema() {
        assert!(fixed_schema("routes").is_none());
    }
}
