//! Batcher: split work into bulk-call sized chunks and pace mutating calls.

use std::future::Future;
use std::num::NonZeroUsize;

use crate::ports::{MAX_DELETE_BATCH, Pacer};

/// Chunk size for bulk deletion.
pub const DELETE_CHUNK_SIZE: NonZeroUsize = match NonZeroUsize::new(MAX_DELETE_BATCH) {
    Some(size) => size,
    None => panic!("MAX_DELETE_BATCH must be positive"),
};

/// Split `items` into consecutive groups of at most `size` elements.
///
/// Order is preserved and only the last group may be shorter. Empty input
/// yields no groups at all, never a single empty group.
pub fn chunk<T: Clone>(items: &[T], size: NonZeroUsize) -> Vec<Vec<T>> {
    items.chunks(size.get()).map(<[T]>::to_vec).collect()
}

/// Await one mutating call, then wait on `pacer` before handing back its result.
///
/// A failed call returns immediately: the run is aborted anyway.
pub async fn paced<P, F, T, E>(pacer: &P, call: F) -> Result<T, E>
where
    P: Pacer + ?Sized,
    F: Future<Output = Result<T, E>>,
{
    let output = call.await?;
    pacer.pace().await;
    Ok(output)
}
