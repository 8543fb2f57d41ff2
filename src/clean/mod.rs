//! The cleaning step: fetch, filter, publish
//!
//! A strict linear pipeline. Phase 1 resolves the input reference and loads
//! the table; phase 2 drops rows outside the fixed bounding box, then rows
//! outside the caller's price range; phase 3 serializes the survivors to a
//! scoped temp file and publishes it as a new artifact version, returning
//! only after the store confirms durability. Any failure aborts the run
//! and propagates to the caller; nothing is retried.

pub mod command;
pub mod filters;

use tempfile::NamedTempFile;
use tracing::info;

pub use command::CleanCommand;

use crate::dataset::Dataset;
use crate::error::Result;
use crate::store::{ArtifactRef, ArtifactSpec, ArtifactStore, ArtifactVersion, LocalStore};

use filters::{PriceRange, NYC_BOUNDS};

/// Run the cleaning step against the default on-disk store.
pub async fn run(cmd: &CleanCommand) -> Result<ArtifactVersion> {
    let store = LocalStore::from_env()?;
    run_with_store(&store, cmd).await
}

/// Run the cleaning step against an injected store.
pub async fn run_with_store(
    store: &dyn ArtifactStore,
    cmd: &CleanCommand,
) -> Result<ArtifactVersion> {
    let reference: ArtifactRef = cmd.input_artifact.parse()?;
    let path = store.resolve(&reference).await?;
    let mut table = Dataset::load(&path).await?;
    info!(artifact = %reference, rows = table.len(), "loaded input table");

    let in_bounds = filters::retain_in_bounds(&mut table, &NYC_BOUNDS)?;
    info!(rows = in_bounds, "rows inside bounding box");

    let range = PriceRange::new(cmd.min_price, cmd.max_price);
    let surviving = filters::retain_in_price_range(&mut table, &range)?;
    info!(
        rows = surviving,
        min_price = range.min,
        max_price = range.max,
        "rows inside price range"
    );

    // Scoped output file: deleted on every exit path, success or failure.
    let output = NamedTempFile::new()?;
    table.write_to(output.path()).await?;

    let spec = ArtifactSpec::new(&cmd.output_artifact, &cmd.output_type, &cmd.output_description);
    let version = store.publish(output.path(), &spec).await?;
    info!(artifact = %version.qualified_name(), "cleaning step complete");
    Ok(version)
}
