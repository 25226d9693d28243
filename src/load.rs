use crate::registry::Dataset;
use crate::store::{StorageMount, Tier};
use anyhow::{Context, Result};
use arrow::record_batch::RecordBatch;
use parquet::{
    arrow::ArrowWriter,
    basic::{BrotliLevel, Compression},
    file::properties::WriterProperties,
};
use std::{
    fs::{self, File},
    path::PathBuf,
};
use tracing::info;

/// Write one transformed table to the silver container, replacing any
/// previous output for that dataset. Each write stands alone: there is no
/// transaction across datasets, and a mid-run failure leaves the silver tier
/// partially refreshed.
#[tracing::instrument(level = "info", skip(mount, batch))]
pub fn write_dataset(
    mount: &StorageMount,
    dataset: Dataset,
    batch: &RecordBatch,
) -> Result<PathBuf> {
    let target_dir = mount
        .container_path(Tier::Silver)
        .join(dataset.target_segment());

    if target_dir.exists() {
        fs::remove_dir_all(&target_dir)
            .with_context(|| format!("clearing previous output {}", target_dir.display()))?;
    }
    fs::create_dir_all(&target_dir)
        .with_context(|| format!("creating {}", target_dir.display()))?;

    let path = target_dir.join("part-00000.parquet");
    let file = File::create(&path).with_context(|| format!("creating {}", path.display()))?;

    let props = WriterProperties::builder()
        .set_compression(Compression::BROTLI(BrotliLevel::try_new(5)?))
        .build();
    let mut writer =
        ArrowWriter::try_new(file, batch.schema(), Some(props)).context("creating parquet writer")?;
    writer.write(batch).context("writing batch to parquet")?;
    writer.close().context("closing parquet writer")?;

    info!(rows = batch.num_rows(), path = %path.display(), "wrote dataset");
    Ok(path)
}
