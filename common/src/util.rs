use std::hash::Hash;

use itertools::Itertools;

pub fn mean(data: &[f64]) -> Option<f64> {
    if data.is_empty() {
        return None;
    }
    Some(data.iter().sum::<f64>() / data.len() as f64)
}

/// Averages values sharing a key, keeping keys in first-seen order
pub fn group_means<K, I>(items: I) -> Vec<(K, f64)>
where
    K: Eq + Hash + Clone,
    I: IntoIterator<Item = (K, f64)>,
{
    let items = items.into_iter().collect::<Vec<_>>();
    let order = items.iter().map(|(k, _)| k.clone()).unique().collect::<Vec<_>>();
    let groups = items.into_iter().into_group_map();
    order
        .into_iter()
        .filter_map(|key| {
            let values = groups.get(&key)?;
            mean(values).map(|m| (key, m))
        })
        .collect()
}

pub fn unique_in_order<T: Eq + Hash + Clone>(items: impl IntoIterator<Item = T>) -> Vec<T> {
    items.into_iter().unique().collect()
}
