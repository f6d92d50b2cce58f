use crate::error::{ErrorKind as LibraryErrorKind, Result as LibraryResult};
use crate::finalize::{finalize, served_layout_path};
use crate::report::Report;
use crate::transform::{Strategy, transform_all};
use exn::{Exn, ResultExt};
use slpk_archive::{Extraction, Package, extract};
use slpk_storage::{WorkTree, ops};
use std::time::Instant;
use tracing::instrument;

/// Options for a single conversion run.
#[derive(Debug, Clone, Copy, Default)]
pub struct Context {
    pub strategy: Strategy,
    /// Stop at the first failed file instead of transforming the rest.
    pub fail_fast: bool,
    /// Carry on with a working directory left behind by an earlier run
    /// instead of refusing to extract over it.
    pub reuse_extraction: bool,
}

/// Convert `package` into its served layout.
///
/// Runs extraction, the transform of every node file, and finalization, in
/// that order; finalization only starts once every transform has finished.
/// The served layout is checked up front so an existing one is refused before
/// anything is extracted.
///
/// If any file fails to transform, nothing is finalized: the working
/// directory is left in place for inspection and every failure is returned as
/// a child of a single [`Failures`](LibraryErrorKind::Failures) error.
#[instrument(skip_all, fields(package = %package.path().display()))]
pub async fn convert(package: &Package, ctx: &Context) -> LibraryResult<Report> {
    let start = Instant::now();
    let working_dir = package.working_dir();

    let layout = served_layout_path(working_dir).or_raise(|| LibraryErrorKind::Finalize)?;
    if ops::exists(&layout).await.or_raise(|| LibraryErrorKind::Finalize)? {
        exn::bail!(LibraryErrorKind::OutputExists(layout));
    }

    tracing::info!(working_dir = %working_dir.display(), "Extracting package");
    match extract(package, ctx.reuse_extraction).await.or_raise(|| LibraryErrorKind::Extract)? {
        Extraction::Extracted(files) => tracing::info!(files, "Finished extracting package"),
        Extraction::Reused => tracing::info!("Using existing working directory"),
    }

    tracing::info!("Transforming node files");
    let tree = WorkTree::open(working_dir).await.or_raise(|| LibraryErrorKind::Walk)?;
    let mut report = transform_all(&tree, ctx.strategy, ctx.fail_fast).await?;
    tracing::info!(
        nodes = report.nodes,
        index_documents = report.index_documents,
        skipped = report.skipped,
        failed = report.failures.len(),
        "Finished transforming node files"
    );
    if !report.failures.is_empty() {
        let failures = std::mem::take(&mut report.failures);
        return Err(Exn::raise_all(LibraryErrorKind::Failures(failures.len()), failures));
    }

    tracing::info!(layout = %layout.display(), "Moving into served layout");
    report.served_layout = Some(finalize(working_dir).await?);
    report.elapsed = start.elapsed();
    tracing::info!("Finished conversion in {:.2} seconds", report.elapsed.as_secs_f64());
    Ok(report)
}
