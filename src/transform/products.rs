use super::{replace_column, string_column};
use anyhow::Result;
use arrow::{
    array::StringArray,
    datatypes::{DataType, Field},
    record_batch::RecordBatch,
};
use std::sync::Arc;

/// Cut `ProductSKU` down to the segment before the first hyphen and
/// `ProductName` down to its first space-delimited token. Values without the
/// delimiter are kept whole.
pub fn truncate_identifiers(batch: RecordBatch) -> Result<RecordBatch> {
    let batch = truncate_at(&batch, "ProductSKU", '-')?;
    truncate_at(&batch, "ProductName", ' ')
}

fn truncate_at(batch: &RecordBatch, name: &str, delimiter: char) -> Result<RecordBatch> {
    let column = string_column(batch, name)?;
    let truncated: StringArray = column
        .iter()
        .map(|opt| opt.and_then(|s| s.split(delimiter).next()))
        .collect();
    replace_column(
        batch,
        name,
        Field::new(name, DataType::Utf8, true),
        Arc::new(truncated),
    )
}
