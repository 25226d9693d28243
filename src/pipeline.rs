use crate::{
    config::Config,
    extract, load,
    registry::Dataset,
    secrets::{Credentials, SecretStore},
    store::{ConnectorConfig, StorageMount},
    transform::{self, sales},
};
use anyhow::{Context, Result};
use arrow::record_batch::RecordBatch;
use rayon::prelude::*;
use tracing::info;

/// One full bronze → silver refresh. Any failure — credential lookup,
/// storage configuration, load, transform or write — aborts the whole run.
pub fn run(config: &Config) -> Result<()> {
    // ─── 1) credentials + storage configuration ──────────────────────
    let store = SecretStore::open(&config.secrets_file)?;
    let creds = Credentials::resolve(&store, &config.secret_scope)
        .with_context(|| format!("resolving credentials from scope `{}`", config.secret_scope))?;
    let connector = ConnectorConfig::new(&creds);
    let mount = StorageMount::configure(&config.storage_root, &connector)?;

    // ─── 2) load every registered dataset from bronze ────────────────
    let mut tables: Vec<(Dataset, RecordBatch)> = Vec::with_capacity(Dataset::ALL.len());
    for dataset in Dataset::ALL {
        info!(%dataset, "loading dataset");
        tables.push((dataset, extract::load_dataset(&mount, dataset)?));
    }

    // ─── 3) per-dataset transforms ───────────────────────────────────
    let tables: Vec<(Dataset, RecordBatch)> = tables
        .into_iter()
        .map(|(dataset, batch)| transform::apply(dataset, batch).map(|batch| (dataset, batch)))
        .collect::<Result<_>>()?;

    // ─── 4) orders-per-day diagnostic, displayed only ────────────────
    if let Some((_, sales_batch)) = tables.iter().find(|(d, _)| *d == Dataset::Sales) {
        for (day, orders) in sales::orders_per_day(sales_batch)?.iter().take(5) {
            info!(%day, orders, "orders per day");
        }
    }

    // ─── 5) write to silver; datasets share no state, so fan out ─────
    tables.par_iter().try_for_each(|(dataset, batch)| {
        info!(%dataset, "writing dataset");
        load::write_dataset(&mount, *dataset, batch).map(|_| ())
    })?;

    info!("silver layer refresh complete");
    Ok(())
}
