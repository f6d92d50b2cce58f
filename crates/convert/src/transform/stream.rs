use crate::classify::classify;
use crate::error::{ErrorKind as LibraryErrorKind, Result as LibraryResult};
use crate::report::Report;
use crate::transform::error::ErrorKind as TransformErrorKind;
use crate::transform::file::{Outcome, transform_file_inner};
use async_stream::stream;
use exn::{Exn, ResultExt};
use futures::stream::FuturesUnordered;
use futures::{Stream, StreamExt};
use slpk_storage::{WorkItem, WorkTree};
use std::collections::HashSet;
use std::num::NonZeroUsize;
use std::path::PathBuf;

/// How many files are transformed at once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Strategy {
    /// One file at a time, interleaved with the walk.
    #[default]
    Sequential,
    /// Enumerate the whole tree first, then keep up to `N` files in flight.
    Parallel(NonZeroUsize),
}

impl From<Option<NonZeroUsize>> for Strategy {
    fn from(concurrency: Option<NonZeroUsize>) -> Self {
        concurrency.map_or(Self::Sequential, Self::Parallel)
    }
}

/// Progress events emitted by [`transform`] as it works through a tree.
///
/// Events follow a strict ordering:
/// 1. [`Started`](Self::Started), exactly once.
/// 2. [`DiscoveryComplete`](Self::DiscoveryComplete), exactly once, with the
///    total file count. Only emitted by [`Strategy::Parallel`]; a sequential
///    run never knows the total up front.
/// 3. [`Transformed`](Self::Transformed), zero or more times, one per file.
/// 4. [`Complete`](Self::Complete), exactly once.
///
/// Failures are interleaved as `Err` items and do not end the stream.
#[derive(Debug)]
pub enum ConvertEvent {
    Started,
    DiscoveryComplete(u64),
    Transformed(Outcome),
    Complete,
}

/// Streams [`ConvertEvent`]s for every regular file below the tree's root.
///
/// Each node file's output path is claimed in walk order before the file is
/// transformed. A later file mapping to an already claimed path is reported
/// as an error instead of overwriting the earlier output, so both strategies
/// always agree on which file wins.
///
/// Under [`Strategy::Sequential`] a directory's entries are listed when the
/// walk reaches it, after the files before it have been transformed. Output
/// written into a directory the walk has not reached yet is seen by the walk
/// and reported as [`Outcome::Skipped`]. Under [`Strategy::Parallel`] the tree
/// is enumerated before anything is changed. The resulting trees are
/// identical.
pub fn transform(tree: &WorkTree, strategy: Strategy) -> impl Stream<Item = LibraryResult<ConvertEvent>> + '_ {
    // `rustfmt` does not format macros that use braces. Wrap in parentheses!
    stream!({
        yield Ok(ConvertEvent::Started);
        let mut claims = Claims::default();

        match strategy {
            Strategy::Sequential => {
                let mut walk = tree.walk();
                while let Some(item) = walk.next().await {
                    match item {
                        Ok(item) => {
                            let claim = claims.claim_for(&item);
                            yield transform_claimed(item, claim).await;
                        },
                        Err(err) => yield Err(err.raise(LibraryErrorKind::Walk)),
                    }
                }
            },
            Strategy::Parallel(concurrency) => {
                let mut items = Vec::new();
                let mut walk = tree.walk();
                while let Some(item) = walk.next().await {
                    match item {
                        Ok(item) => items.push(item),
                        Err(err) => yield Err(err.raise(LibraryErrorKind::Walk)),
                    }
                }
                // Infallible: a usize (either 32- or 64-bit) will always fit in a u64.
                yield Ok(ConvertEvent::DiscoveryComplete(u64::try_from(items.len()).unwrap_or(0)));

                let mut pending = items.into_iter().map(|item| {
                    let claim = claims.claim_for(&item);
                    transform_claimed(item, claim)
                });
                let mut processing = FuturesUnordered::new();
                processing.extend(pending.by_ref().take(concurrency.get()));
                while let Some(result) = processing.next().await {
                    yield result;
                    // Pop-n-push, FIFO.
                    if let Some(next) = pending.next() {
                        processing.push(next);
                    }
                }
            },
        }

        yield Ok(ConvertEvent::Complete);
    })
}

/// Drives [`transform`] to completion, tallying outcomes into a [`Report`].
///
/// Per-item failures are logged and collected into [`Report::failures`]; the
/// remaining files are still transformed. With `fail_fast` the first failure
/// is returned instead, and transforms still in flight are abandoned.
pub async fn transform_all(tree: &WorkTree, strategy: Strategy, fail_fast: bool) -> LibraryResult<Report> {
    let mut report = Report::default();
    let mut events = std::pin::pin!(transform(tree, strategy));
    while let Some(event) = events.next().await {
        match event {
            Ok(ConvertEvent::Started) => tracing::debug!(?strategy, "Transforming working tree"),
            Ok(ConvertEvent::DiscoveryComplete(total)) => tracing::info!(total, "Discovered files"),
            Ok(ConvertEvent::Transformed(outcome)) => report.record(&outcome),
            Ok(ConvertEvent::Complete) => tracing::debug!(transformed = report.transformed(), "Transform complete"),
            Err(err) => {
                tracing::warn!(error = %err, "Transform failed");
                if fail_fast {
                    return Err(err);
                }
                report.failures.push(err);
            },
        }
    }
    Ok(report)
}

/// Output paths already handed out, in walk order.
#[derive(Default)]
struct Claims(HashSet<PathBuf>);

impl Claims {
    /// Claims `item`'s output path. Returns the path if an earlier item
    /// already holds it.
    fn claim_for(&mut self, item: &WorkItem) -> Option<PathBuf> {
        let output = classify(item).output_in(&item.directory)?;
        if self.0.insert(output.clone()) { None } else { Some(output) }
    }
}

async fn transform_claimed(item: WorkItem, collision: Option<PathBuf>) -> LibraryResult<ConvertEvent> {
    let result = match collision {
        Some(output) => Err(Exn::from(TransformErrorKind::Collision(output))),
        None => transform_file_inner(&item).await,
    };
    result.map(ConvertEvent::Transformed).or_raise(|| LibraryErrorKind::Transform(item.path()))
}
