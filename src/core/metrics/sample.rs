use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::index;

/// Picks `n` of `len` positions with a seeded generator, returned ascending.
/// `n == 0` or `n >= len` keeps everything.
pub fn sample_indices(len: usize, n: usize, seed: u64) -> Vec<usize> {
    if n == 0 || n >= len {
        return (0..len).collect();
    }
    let mut rng = StdRng::seed_from_u64(seed);
    let mut picked = index::sample(&mut rng, len, n).into_vec();
    picked.sort_unstable();
    picked
}

pub fn sample<T: Clone>(items: &[T], n: usize, seed: u64) -> Vec<T> {
    sample_indices(items.len(), n, seed)
        .into_iter()
        .map(|i| items[i].clone())
        .collect()
}
