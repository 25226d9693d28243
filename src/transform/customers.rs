use super::{string_column, with_column};
use anyhow::Result;
use arrow::{
    array::{Array, StringArray},
    datatypes::{DataType, Field},
    record_batch::RecordBatch,
};
use std::sync::Arc;

/// Join `Prefix`, `FirstName` and `LastName` into a `FullName` column with
/// single-space separators. The join is positional: an empty or missing part
/// contributes an empty string, it is not skipped, so a customer without a
/// prefix gets a leading space.
pub fn derive_full_name(batch: RecordBatch) -> Result<RecordBatch> {
    let prefix = string_column(&batch, "Prefix")?;
    let first = string_column(&batch, "FirstName")?;
    let last = string_column(&batch, "LastName")?;

    fn part(arr: &StringArray, i: usize) -> &str {
        if arr.is_null(i) {
            ""
        } else {
            arr.value(i)
        }
    }

    let mut names = Vec::with_capacity(batch.num_rows());
    for i in 0..batch.num_rows() {
        names.push(format!(
            "{} {} {}",
            part(prefix, i),
            part(first, i),
            part(last, i)
        ));
    }

    with_column(
        &batch,
        Field::new("FullName", DataType::Utf8, true),
        Arc::new(StringArray::from(names)),
    )
}
