//! Directory reads
//!
//! Packets are stored in arbitrary directory trees, often mixed with unrelated
//! files. A read walks the whole tree under a base directory, keeps the files
//! accepted by a [`ReadFilter`], decodes them and returns the packets ordered by
//! their machine-clock start time.
//!
//! ## Failure policy
//!
//! Names that are not packet-shaped are skipped silently. Any other failure
//! (unreadable directory, corrupt frame, invalid payload, malformed name under
//! [`MalformedNamePolicy::Abort`](crate::MalformedNamePolicy::Abort)) aborts the
//! whole read and no packets are returned.
//!
//! ## Traversal
//!
//! Symbolic links are not followed, so link cycles cannot occur. Entries within
//! a directory are visited in file name order.

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use futures::{StreamExt, TryStreamExt, stream};
use tokio::task::{JoinError, spawn_blocking};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::codec::deserialize_path;
use crate::{ReadFilter, RedvoxError, RedvoxPacketM, Result};

/// Read every packet under `base_dir` accepted by `filter`, ordered by start time.
///
/// Ties in [`RedvoxPacketM::start_mach_timestamp`] keep the order in which the
/// files were visited.
pub fn read_unstructured<P: AsRef<Path>>(
    base_dir: P,
    filter: &ReadFilter,
) -> Result<Vec<RedvoxPacketM>> {
    let base_dir = base_dir.as_ref();

    let mut packets = accepted_paths(base_dir, filter)
        .map(|path| path.and_then(deserialize_path))
        .collect::<Result<Vec<_>>>()?;
    sort_by_start(&mut packets);

    info!(base_dir = %base_dir.display(), packets = packets.len(), "Read unstructured packets");
    Ok(packets)
}

/// [`read_unstructured`] with [`ReadFilter::default`].
pub fn read_unstructured_default<P: AsRef<Path>>(base_dir: P) -> Result<Vec<RedvoxPacketM>> {
    read_unstructured(base_dir, &ReadFilter::default())
}

/// Paths under `base_dir` accepted by `filter`, in visit order. Nothing is decoded.
pub fn select_paths<P: AsRef<Path>>(base_dir: P, filter: &ReadFilter) -> Result<Vec<PathBuf>> {
    accepted_paths(base_dir.as_ref(), filter).collect()
}

/// Concurrent form of [`read_unstructured`].
///
/// The directory walk and every decode run on tokio's blocking pool with up to
/// one decode per available core in flight. The result is identical to the
/// synchronous read. Must be called from within a tokio runtime.
pub async fn read_unstructured_concurrent<P: AsRef<Path>>(
    base_dir: P,
    filter: ReadFilter,
) -> Result<Vec<RedvoxPacketM>> {
    let base_dir = base_dir.as_ref().to_path_buf();
    let walk_dir = base_dir.clone();
    let paths =
        spawn_blocking(move || select_paths(&walk_dir, &filter)).await.map_err(task_error)??;

    let in_flight = std::thread::available_parallelism().map_or(4, NonZeroUsize::get);
    debug!(files = paths.len(), in_flight, "Decoding accepted packet files");

    let mut packets: Vec<RedvoxPacketM> = stream::iter(paths)
        .map(|path| async move {
            spawn_blocking(move || deserialize_path(&path))
                .await
                .unwrap_or_else(|err| Err(task_error(err)))
        })
        .buffered(in_flight)
        .try_collect()
        .await?;
    sort_by_start(&mut packets);

    info!(base_dir = %base_dir.display(), packets = packets.len(), "Read unstructured packets");
    Ok(packets)
}

fn accepted_paths<'a>(
    base_dir: &'a Path,
    filter: &'a ReadFilter,
) -> impl Iterator<Item = Result<PathBuf>> + 'a {
    WalkDir::new(base_dir)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_map(move |entry| {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => return Some(Err(walk_error(base_dir, err))),
            };

            if is_directory(&entry) {
                return None;
            }

            match filter.accepts(entry.path()) {
                Ok(true) => Some(Ok(entry.into_path())),
                Ok(false) => None,
                Err(err) => Some(Err(err)),
            }
        })
}

fn is_directory(entry: &walkdir::DirEntry) -> bool {
    entry.file_type().is_dir() || (entry.path_is_symlink() && entry.path().is_dir())
}

fn sort_by_start(packets: &mut [RedvoxPacketM]) {
    // sort_by is stable
    packets.sort_by(|a, b| a.start_mach_timestamp().total_cmp(&b.start_mach_timestamp()));
}

fn walk_error(base_dir: &Path, err: walkdir::Error) -> RedvoxError {
    let path = err.path().unwrap_or(base_dir).to_path_buf();
    RedvoxError::io_error(path, std::io::Error::from(err))
}

fn task_error(err: JoinError) -> RedvoxError {
    RedvoxError::Task { details: err.to_string() }
}
