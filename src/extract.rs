use crate::registry::Dataset;
use crate::store::{StorageMount, Tier};
use anyhow::{bail, Context, Result};
use arrow::{
    csv::{reader::Format, ReaderBuilder},
    datatypes::{Schema, SchemaRef},
    record_batch::RecordBatch,
};
use glob::glob;
use std::{fs::File, path::{Path, PathBuf}, sync::Arc};
use tracing::info;

const BATCH_SIZE: usize = 8192;

/// Load one dataset from the bronze container: every file matching the
/// registry pattern, read with a header row and the schema inferred from the
/// first match, concatenated into a single table. A pattern with no matches
/// aborts the run; datasets are not isolated from each other's failures.
#[tracing::instrument(level = "info", skip(mount))]
pub fn load_dataset(mount: &StorageMount, dataset: Dataset) -> Result<RecordBatch> {
    let bronze = mount.container_path(Tier::Bronze);
    let pattern = bronze
        .join(format!("{}.csv", dataset.file_pattern()))
        .to_string_lossy()
        .into_owned();

    // glob yields matches in alphabetical order, so multi-file reads are
    // deterministic across runs
    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in glob(&pattern).with_context(|| format!("invalid glob pattern `{pattern}`"))? {
        paths.push(entry.context("reading glob entry")?);
    }
    if paths.is_empty() {
        bail!("no bronze files match `{pattern}` for dataset `{dataset}`");
    }

    let schema: SchemaRef = Arc::new(infer_file_schema(&paths[0])?);
    let mut batches = Vec::new();
    for path in &paths {
        batches.extend(read_csv_file(path, schema.clone())?);
    }

    let batch = arrow::compute::concat_batches(&schema, &batches)
        .with_context(|| format!("concatenating batches for dataset `{dataset}`"))?;
    info!(files = paths.len(), rows = batch.num_rows(), "loaded dataset");
    Ok(batch)
}

/// Header names plus per-column types, inferred from the file contents.
/// Inferred types are trusted as-is; there is no schema contract.
fn infer_file_schema(path: &Path) -> Result<Schema> {
    let mut file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let (schema, _) = Format::default()
        .with_header(true)
        .infer_schema(&mut file, None)
        .with_context(|| format!("inferring schema from {}", path.display()))?;
    Ok(schema)
}

fn read_csv_file(path: &Path, schema: SchemaRef) -> Result<Vec<RecordBatch>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let reader = ReaderBuilder::new(schema)
        .with_header(true)
        .with_batch_size(BATCH_SIZE)
        .build(file)
        .with_context(|| format!("creating CSV reader for {}", path.display()))?;

    let mut batches = Vec::new();
    for batch in reader {
        batches.push(batch.with_context(|| format!("reading CSV batch from {}", path.display()))?);
    }
    Ok(batches)
}
