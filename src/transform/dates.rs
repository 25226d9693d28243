use anyhow::{anyhow, bail, Result};
use arrow::{
    array::{
        Array, ArrayRef, Date32Array, StringArray, TimestampMillisecondArray,
        TimestampMillisecondBuilder,
    },
    compute,
    datatypes::{DataType, TimeUnit},
};
use chrono::{NaiveDate, NaiveDateTime};

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
];

/// Lenient date parse over the formats the bronze files actually carry.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

/// Datetime parse; a bare date resolves to midnight.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| parse_date(s).and_then(|d| d.and_hms_opt(0, 0, 0)))
}

const MILLIS_PER_DAY: i64 = 86_400_000;
// days from 0001-01-01 (CE) to the 1970-01-01 epoch
const EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Per-row dates from a column the CSV reader inferred as Utf8 or Date32.
pub fn date_values(array: &ArrayRef) -> Result<Vec<Option<NaiveDate>>> {
    match array.data_type() {
        DataType::Utf8 => {
            let strings = downcast::<StringArray>(array)?;
            Ok(strings
                .iter()
                .map(|opt| opt.and_then(parse_date))
                .collect())
        }
        DataType::Date32 => {
            let days = downcast::<Date32Array>(array)?;
            Ok(days
                .iter()
                .map(|opt| {
                    opt.and_then(|d| NaiveDate::from_num_days_from_ce_opt(d + EPOCH_DAYS_FROM_CE))
                })
                .collect())
        }
        other => bail!("cannot read dates from a `{other}` column"),
    }
}

/// Column → millisecond timestamps. Utf8 values are parsed, Date32 becomes
/// midnight, and an already-typed timestamp column is cast through.
pub fn to_timestamp_millis(array: &ArrayRef) -> Result<TimestampMillisecondArray> {
    match array.data_type() {
        DataType::Utf8 => {
            let strings = downcast::<StringArray>(array)?;
            let mut builder = TimestampMillisecondBuilder::with_capacity(strings.len());
            for opt in strings.iter() {
                let millis = opt
                    .and_then(parse_timestamp)
                    .map(|dt| dt.and_utc().timestamp_millis());
                builder.append_option(millis);
            }
            Ok(builder.finish())
        }
        DataType::Date32 => {
            let days = downcast::<Date32Array>(array)?;
            let mut builder = TimestampMillisecondBuilder::with_capacity(days.len());
            for opt in days.iter() {
                builder.append_option(opt.map(|d| d as i64 * MILLIS_PER_DAY));
            }
            Ok(builder.finish())
        }
        DataType::Timestamp(_, _) => {
            let cast = compute::cast(array, &DataType::Timestamp(TimeUnit::Millisecond, None))?;
            Ok(downcast::<TimestampMillisecondArray>(&cast)?.clone())
        }
        other => bail!("cannot convert a `{other}` column into a timestamp"),
    }
}

fn downcast<'a, T: 'static>(array: &'a ArrayRef) -> Result<&'a T> {
    array
        .as_any()
        .downcast_ref::<T>()
        .ok_or_else(|| anyhow!("unexpected array layout for `{}`", array.data_type()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn parses_the_expected_date_shapes() {
        let expected = NaiveDate::from_ymd_opt(2022, 3, 15).unwrap();
        assert_eq!(parse_date("2022-03-15"), Some(expected));
        assert_eq!(parse_date("3/15/2022"), Some(expected));
        assert_eq!(parse_date("2022/03/15"), Some(expected));
        assert_eq!(parse_date("15-03-2022"), None);
    }

    #[test]
    fn bare_dates_resolve_to_midnight() {
        let ts = parse_timestamp("2022-03-15").unwrap();
        assert_eq!(ts.format("%H:%M:%S").to_string(), "00:00:00");

        let ts = parse_timestamp("2022-03-15 10:30:00").unwrap();
        assert_eq!(ts.format("%H:%M:%S").to_string(), "10:30:00");
    }

    #[test]
    fn date32_round_trips_through_date_values() -> Result<()> {
        // 2022-03-15 is 19066 days after the epoch
        let array: ArrayRef = Arc::new(Date32Array::from(vec![Some(19066), None]));
        let dates = date_values(&array)?;
        assert_eq!(dates[0], NaiveDate::from_ymd_opt(2022, 3, 15));
        assert_eq!(dates[1], None);
        Ok(())
    }

    #[test]
    fn strings_convert_to_epoch_millis() -> Result<()> {
        let array: ArrayRef = Arc::new(StringArray::from(vec![
            Some("1970-01-02"),
            Some("not a date"),
            None,
        ]));
        let ts = to_timestamp_millis(&array)?;
        assert_eq!(ts.value(0), MILLIS_PER_DAY);
        assert!(ts.is_null(1));
        assert!(ts.is_null(2));
        Ok(())
    }

    #[test]
    fn non_temporal_columns_are_rejected() {
        let array: ArrayRef = Arc::new(arrow::array::Int64Array::from(vec![1_i64]));
        assert!(date_values(&array).is_err());
        assert!(to_timestamp_millis(&array).is_err());
    }
}
