use super::{dates, replace_column, string_column, with_column};
use anyhow::{anyhow, Context, Result};
use arrow::{
    array::{Array, Float64Array, Float64Builder, StringArray},
    compute,
    datatypes::{DataType, Field, TimeUnit},
    record_batch::RecordBatch,
};
use once_cell::sync::Lazy;
use regex::Regex;
use std::{collections::BTreeMap, sync::Arc};
use tracing::warn;

static LEADING_S: Lazy<Regex> = Lazy::new(|| Regex::new("^S").expect("literal anchor regex"));

/// Sales cleanup: `StockDate` becomes a real timestamp, order numbers are
/// re-keyed from a leading `S` to `T`, and `TotalCost` is derived as
/// line-item price times quantity.
pub fn enrich_orders(batch: RecordBatch) -> Result<RecordBatch> {
    let stock = batch
        .column_by_name("StockDate")
        .ok_or_else(|| anyhow!("column `StockDate` not found"))?;
    let stock_ts = dates::to_timestamp_millis(stock).context("parsing `StockDate`")?;
    let batch = replace_column(
        &batch,
        "StockDate",
        Field::new(
            "StockDate",
            DataType::Timestamp(TimeUnit::Millisecond, None),
            true,
        ),
        Arc::new(stock_ts),
    )?;

    let orders = string_column(&batch, "OrderNumber")?;
    let rewritten: StringArray = orders
        .iter()
        .map(|opt| opt.map(|s| LEADING_S.replace(s, "T").into_owned()))
        .collect();
    let batch = replace_column(
        &batch,
        "OrderNumber",
        Field::new("OrderNumber", DataType::Utf8, true),
        Arc::new(rewritten),
    )?;

    let price = numeric_f64(&batch, "OrderLineItem")?;
    let quantity = numeric_f64(&batch, "OrderQuantity")?;
    let mut totals = Float64Builder::with_capacity(batch.num_rows());
    for i in 0..batch.num_rows() {
        if price.is_null(i) || quantity.is_null(i) {
            totals.append_null();
        } else {
            totals.append_value(price.value(i) * quantity.value(i));
        }
    }

    with_column(
        &batch,
        Field::new("TotalCost", DataType::Float64, true),
        Arc::new(totals.finish()),
    )
}

/// Order counts per `OrderDate`, in date order. Diagnostic output only; the
/// result is displayed after the sales transform and never persisted.
pub fn orders_per_day(batch: &RecordBatch) -> Result<Vec<(String, u64)>> {
    let days = batch
        .column_by_name("OrderDate")
        .ok_or_else(|| anyhow!("column `OrderDate` not found"))?;
    let days = dates::date_values(days).context("reading `OrderDate`")?;
    let orders = batch
        .column_by_name("OrderNumber")
        .ok_or_else(|| anyhow!("column `OrderNumber` not found"))?;

    let mut counts: BTreeMap<String, u64> = BTreeMap::new();
    for (row, day) in days.iter().enumerate() {
        if orders.is_null(row) {
            warn!(row, "order without an order number, skipped in the daily count");
            continue;
        }
        let day = day.map(|d| d.to_string()).unwrap_or_default();
        *counts.entry(day).or_insert(0) += 1;
    }
    Ok(counts.into_iter().collect())
}

fn numeric_f64(batch: &RecordBatch, name: &str) -> Result<Float64Array> {
    let column = batch
        .column_by_name(name)
        .ok_or_else(|| anyhow!("column `{name}` not found"))?;
    let cast = compute::cast(column, &DataType::Float64)
        .with_context(|| format!("column `{name}` is not numeric"))?;
    cast.as_any()
        .downcast_ref::<Float64Array>()
        .cloned()
        .ok_or_else(|| anyhow!("column `{name}` did not cast to Float64"))
}
