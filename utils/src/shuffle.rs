/// Shuffle `items` in place (Fisher–Yates) with the thread-local generator.
pub fn shuffle<T>(items: &mut [T]) {
    shuffle_with(items, |bound| {
        let scaled = rand::random::<f64>() * bound as f64;
        scaled as usize
    });
}

/// Fisher–Yates with an injected index source.
///
/// `pick(bound)` must return an index in `0..bound`; larger values are
/// clamped to `bound - 1`.
pub fn shuffle_with<T, F>(items: &mut [T], mut pick: F)
where
    F: FnMut(usize) -> usize,
{
    for i in (1..items.len()).rev() {
        let j = pick(i + 1).min(i);
        items.swap(i, j);
    }
}
