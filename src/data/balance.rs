// ============================================================
// Layer 4 — Class Balancing
// ============================================================
// The tweet corpus is skewed (far more positive and neutral
// tweets than negative ones). A classifier trained on it
// learns the skew, so every class is undersampled to the size
// of the smallest class before splitting.
//
// Example with counts negative=869, neutral=1953, positive=2599:
//   keep all 869 negatives
//   keep a random 869 of the neutrals
//   keep a random 869 of the positives
//
// Sampling is without replacement and seeded, so a run can be
// reproduced exactly.

use std::hash::Hash;

use rand::{rngs::StdRng, seq::index, SeedableRng};

/// Undersample every class to the size of the smallest class.
///
/// Classes appear in the output in order of first appearance;
/// within a class the original record order is kept.
pub fn undersample<T, K, F>(records: Vec<T>, class_of: F, seed: u64) -> Vec<T>
where
    K: Eq + Hash + Clone + std::fmt::Debug,
    F: Fn(&T) -> K,
{
    // Group while keeping first-appearance order of the classes.
    let mut groups: Vec<(K, Vec<T>)> = Vec::new();
    for record in records {
        let class = class_of(&record);
        match groups.iter_mut().find(|(k, _)| *k == class) {
            Some((_, members)) => members.push(record),
            None => groups.push((class, vec![record])),
        }
    }

    let Some(target) = groups.iter().map(|(_, members)| members.len()).min() else {
        return Vec::new();
    };

    let mut rng = StdRng::seed_from_u64(seed);
    let mut out = Vec::with_capacity(target * groups.len());

    for (class, members) in groups {
        let total = members.len();
        let mut keep = vec![false; total];
        for i in index::sample(&mut rng, total, target).iter() {
            keep[i] = true;
        }
        tracing::debug!("Class {:?}: keeping {} of {}", class, target, total);
        out.extend(
            members
                .into_iter()
                .zip(keep)
                .filter_map(|(record, kept)| kept.then_some(record)),
        );
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skewed() -> Vec<(char, usize)> {
        let mut v = Vec::new();
        v.extend((0..10).map(|i| ('p', i)));
        v.extend((0..3).map(|i| ('n', i)));
        v.extend((0..6).map(|i| ('u', i)));
        v
    }

    #[test]
    fn test_every_class_shrinks_to_minority() {
        let out = undersample(skewed(), |r| r.0, 1);
        assert_eq!(out.len(), 9);
        for class in ['p', 'n', 'u'] {
            assert_eq!(out.iter().filter(|r| r.0 == class).count(), 3);
        }
    }

    #[test]
    fn test_minority_class_is_kept_whole_and_in_order() {
        let out = undersample(skewed(), |r| r.0, 1);
        let negatives: Vec<usize> = out.iter().filter(|r| r.0 == 'n').map(|r| r.1).collect();
        assert_eq!(negatives, vec![0, 1, 2]);
    }

    #[test]
    fn test_classes_follow_first_appearance() {
        let interleaved = vec![('u', 0), ('p', 0), ('n', 0), ('p', 1), ('u', 1), ('n', 1), ('p', 2)];
        let out = undersample(interleaved, |r| r.0, 5);
        let classes: Vec<char> = out.iter().map(|r| r.0).collect();
        assert_eq!(classes, vec!['u', 'u', 'p', 'p', 'n', 'n']);
        assert_eq!(out[0], ('u', 0));
        assert_eq!(out[1], ('u', 1));
    }

    #[test]
    fn test_same_seed_same_sample() {
        assert_eq!(undersample(skewed(), |r| r.0, 42), undersample(skewed(), |r| r.0, 42));
    }

    #[test]
    fn test_no_duplicates() {
        let out = undersample(skewed(), |r| r.0, 3);
        let mut seen = out.clone();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), out.len());
    }

    #[test]
    fn test_empty_input() {
        let out: Vec<(char, usize)> = undersample(Vec::new(), |r: &(char, usize)| r.0, 0);
        assert!(out.is_empty());
    }
}
