use crate::config::ComparisonConfig;

/// map over items on the rayon pool when the config allows it, output keeps input order
#[allow(unused_variables)]
pub fn maybe_parallel_map<T, U, F>(items: &[T], config: &ComparisonConfig, f: F) -> Vec<U>
where
    T: Sync,
    U: Send,
    F: Fn(&T) -> U + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        if config.should_parallelize(items.len()) {
            return items.par_iter().map(f).collect();
        }
    }

    items.iter().map(f).collect()
}
