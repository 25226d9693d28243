use super::{dates, with_column};
use anyhow::{anyhow, Result};
use arrow::{
    array::Int32Builder,
    datatypes::{DataType, Field},
    record_batch::RecordBatch,
};
use chrono::Datelike;
use std::sync::Arc;

/// Decompose the `Date` column into `Year`, `Month` and `Day` integer
/// columns. Calendar dates only, no timezone handling.
pub fn derive_date_parts(batch: RecordBatch) -> Result<RecordBatch> {
    let column = batch
        .column_by_name("Date")
        .ok_or_else(|| anyhow!("column `Date` not found"))?;
    let dates = dates::date_values(column)?;

    let mut years = Int32Builder::with_capacity(dates.len());
    let mut months = Int32Builder::with_capacity(dates.len());
    let mut days = Int32Builder::with_capacity(dates.len());
    for date in &dates {
        years.append_option(date.map(|d| d.year()));
        months.append_option(date.map(|d| d.month() as i32));
        days.append_option(date.map(|d| d.day() as i32));
    }

    let batch = with_column(
        &batch,
        Field::new("Year", DataType::Int32, true),
        Arc::new(years.finish()),
    )?;
    let batch = with_column(
        &batch,
        Field::new("Month", DataType::Int32, true),
        Arc::new(months.finish()),
    )?;
    with_column(
        &batch,
        Field::new("Day", DataType::Int32, true),
        Arc::new(days.finish()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Array, Date32Array, Int32Array, StringArray};
    use arrow::datatypes::Schema;

    fn int_column<'a>(batch: &'a RecordBatch, name: &str) -> &'a Int32Array {
        batch
            .column_by_name(name)
            .unwrap()
            .as_any()
            .downcast_ref::<Int32Array>()
            .unwrap()
    }

    #[test]
    fn splits_string_dates_into_parts() -> Result<()> {
        let schema = Arc::new(Schema::new(vec![Field::new("Date", DataType::Utf8, true)]));
        let batch = RecordBatch::try_new(
            schema,
            vec![Arc::new(StringArray::from(vec![
                Some("2022-03-15"),
                Some("12/31/2019"),
                None,
            ]))],
        )?;

        let out = derive_date_parts(batch)?;
        assert_eq!(out.num_columns(), 4);
        assert_eq!(int_column(&out, "Year").value(0), 2022);
        assert_eq!(int_column(&out, "Month").value(0), 3);
        assert_eq!(int_column(&out, "Day").value(0), 15);
        assert_eq!(int_column(&out, "Year").value(1), 2019);
        assert_eq!(int_column(&out, "Month").value(1), 12);
        assert!(int_column(&out, "Year").is_null(2));
        Ok(())
    }

    #[test]
    fn splits_inferred_date32_columns() -> Result<()> {
        let schema = Arc::new(Schema::new(vec![Field::new(
            "Date",
            DataType::Date32,
            true,
        )]));
        // 19066 days after the epoch = 2022-03-15
        let batch = RecordBatch::try_new(
            schema,
            vec![Arc::new(Date32Array::from(vec![Some(19066)]))],
        )?;

        let out = derive_date_parts(batch)?;
        assert_eq!(int_column(&out, "Year").value(0), 2022);
        assert_eq!(int_column(&out, "Month").value(0), 3);
        assert_eq!(int_column(&out, "Day").value(0), 15);
        Ok(())
    }

    #[test]
    fn missing_date_column_fails() {
        let schema = Arc::new(Schema::new(vec![Field::new("Other", DataType::Utf8, true)]));
        let batch =
            RecordBatch::try_new(schema, vec![Arc::new(StringArray::from(vec!["x"]))]).unwrap();
        assert!(derive_date_parts(batch).is_err());
    }
}
