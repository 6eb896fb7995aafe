#[cfg(all(feature = "parallel", not(target_arch = "wasm32")))]
use rayon::prelude::*;

/// Maps owned items where every item is a unit of work (e.g. a layer), in parallel when
/// enabled. Output keeps the input order.
#[cfg(all(feature = "parallel", not(target_arch = "wasm32")))]
#[inline]
pub fn map_owned<T, R, F>(collection: Vec<T>, f: F) -> Vec<R>
where
    T: Send,
    R: Send,
    F: Fn(T) -> R + Sync + Send,
{
    collection.into_par_iter().map(f).collect()
}

#[cfg(any(not(feature = "parallel"), target_arch = "wasm32"))]
#[inline]
pub fn map_owned<T, R, F>(collection: Vec<T>, f: F) -> Vec<R>
where
    T: Send,
    R: Send,
    F: Fn(T) -> R + Sync + Send,
{
    collection.into_iter().map(f).collect()
}
