use crate::registry::Dataset;
use anyhow::{anyhow, Context, Result};
use arrow::{
    array::{ArrayRef, StringArray},
    datatypes::{Field, Schema},
    record_batch::RecordBatch,
};
use std::sync::Arc;

pub mod calendar;
pub mod customers;
pub mod dates;
pub mod products;
pub mod sales;

/// A per-dataset transform rule. Pure: consumes one table, returns the
/// transformed table, touches nothing else.
pub type Rule = fn(RecordBatch) -> Result<RecordBatch>;

pub fn rule_for(dataset: Dataset) -> Option<Rule> {
    match dataset {
        Dataset::Calendar => Some(calendar::derive_date_parts),
        Dataset::Customers => Some(customers::derive_full_name),
        Dataset::Products => Some(products::truncate_identifiers),
        Dataset::Sales => Some(sales::enrich_orders),
        _ => None,
    }
}

/// Apply the dataset's rule, or pass the table through untouched when the
/// registry has no rule for it.
pub fn apply(dataset: Dataset, batch: RecordBatch) -> Result<RecordBatch> {
    match rule_for(dataset) {
        Some(rule) => {
            rule(batch).with_context(|| format!("transforming dataset `{dataset}`"))
        }
        None => Ok(batch),
    }
}

pub(crate) fn string_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a StringArray> {
    batch
        .column_by_name(name)
        .ok_or_else(|| anyhow!("column `{name}` not found"))?
        .as_any()
        .downcast_ref::<StringArray>()
        .ok_or_else(|| anyhow!("column `{name}` is not a string column"))
}

/// Rebuild the batch with one extra column appended.
pub(crate) fn with_column(
    batch: &RecordBatch,
    field: Field,
    array: ArrayRef,
) -> Result<RecordBatch> {
    let mut fields: Vec<Arc<Field>> = batch.schema().fields().iter().cloned().collect();
    fields.push(Arc::new(field));
    let mut columns = batch.columns().to_vec();
    columns.push(array);
    RecordBatch::try_new(Arc::new(Schema::new(fields)), columns).map_err(Into::into)
}

/// Rebuild the batch with one column swapped in place, keeping its position.
pub(crate) fn replace_column(
    batch: &RecordBatch,
    name: &str,
    field: Field,
    array: ArrayRef,
) -> Result<RecordBatch> {
    let index = batch
        .schema()
        .index_of(name)
        .with_context(|| format!("column `{name}` not found"))?;
    let mut fields: Vec<Arc<Field>> = batch.schema().fields().iter().cloned().collect();
    fields[index] = Arc::new(field);
    let mut columns = batch.columns().to_vec();
    columns[index] = array;
    RecordBatch::try_new(Arc::new(Schema::new(fields)), columns).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::datatypes::DataType;

    fn two_column_batch() -> RecordBatch {
        let schema = Arc::new(Schema::new(vec![
            Field::new("a", DataType::Utf8, true),
            Field::new("b", DataType::Utf8, true),
        ]));
        RecordBatch::try_new(
            schema,
            vec![
                Arc::new(StringArray::from(vec!["x", "y"])),
                Arc::new(StringArray::from(vec!["1", "2"])),
            ],
        )
        .unwrap()
    }

    #[test]
    fn datasets_without_rules_pass_through() -> Result<()> {
        let batch = two_column_batch();
        let out = apply(crate::registry::Dataset::Territories, batch.clone())?;
        assert_eq!(out, batch);
        Ok(())
    }

    #[test]
    fn rules_exist_exactly_where_expected() {
        use crate::registry::Dataset;
        for d in Dataset::ALL {
            let expected = matches!(
                d,
                Dataset::Calendar | Dataset::Customers | Dataset::Products | Dataset::Sales
            );
            assert_eq!(rule_for(d).is_some(), expected, "rule table wrong for {d}");
        }
    }

    #[test]
    fn replace_column_keeps_position() -> Result<()> {
        let batch = two_column_batch();
        let replaced = replace_column(
            &batch,
            "a",
            Field::new("a", DataType::Utf8, true),
            Arc::new(StringArray::from(vec!["z", "w"])),
        )?;
        assert_eq!(replaced.schema().field(0).name(), "a");
        let col = string_column(&replaced, "a")?;
        assert_eq!(col.value(0), "z");
        Ok(())
    }
}
