//! Seeded stratified train/test split over binary targets.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Row indices on each side of a split, ascending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// A class with too few rows to appear on both sides of the split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StratifyError {
    pub class: u8,
    pub count: usize,
}

/// Hold out `round(n_class * test_fraction)` rows of each class, at least one and
/// never all of them, so both sides see both classes.
pub fn stratified_split(
    targets: &[u8],
    test_fraction: f64,
    seed: u64,
) -> Result<Split, StratifyError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut train = Vec::with_capacity(targets.len());
    let mut test = Vec::new();

    for class in [0u8, 1u8] {
        let mut idx: Vec<usize> = targets
            .iter()
            .enumerate()
            .filter(|&(_, &t)| t == class)
            .map(|(i, _)| i)
            .collect();
        if idx.len() < 2 {
            return Err(StratifyError {
                class,
                count: idx.len(),
            });
        }
        idx.shuffle(&mut rng);
        let n_test = ((idx.len() as f64 * test_fraction).round() as usize).clamp(1, idx.len() - 1);
        test.extend_from_slice(&idx[..n_test]);
        train.extend_from_slice(&idx[n_test..]);
    }

    train.sort_unstable();
    test.sort_unstable();
    Ok(Split { train, test })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn targets(neg: usize, pos: usize) -> Vec<u8> {
        // Interleave so positives are not contiguous
        let mut t = vec![0u8; neg];
        for i in 0..pos {
            t.insert((i * 3).min(t.len()), 1);
        }
        t
    }

    #[test]
    fn keeps_class_proportions() {
        let y = targets(80, 20);
        let s = stratified_split(&y, 0.2, 42).unwrap();
        assert_eq!(s.test.len(), 20);
        assert_eq!(s.train.len(), 80);
        let test_pos = s.test.iter().filter(|&&i| y[i] == 1).count();
        assert_eq!(test_pos, 4);
    }

    #[test]
    fn sides_are_disjoint_and_cover_all_rows() {
        let y = targets(37, 11);
        let s = stratified_split(&y, 0.25, 1).unwrap();
        let mut all: Vec<usize> = s.train.iter().chain(s.test.iter()).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..y.len()).collect::<Vec<_>>());
    }

    #[test]
    fn same_seed_same_split() {
        let y = targets(50, 50);
        assert_eq!(
            stratified_split(&y, 0.2, 42).unwrap(),
            stratified_split(&y, 0.2, 42).unwrap()
        );
        assert_ne!(
            stratified_split(&y, 0.2, 42).unwrap(),
            stratified_split(&y, 0.2, 43).unwrap()
        );
    }

    #[test]
    fn single_member_class_cannot_stratify() {
        let y = targets(10, 1);
        assert_eq!(
            stratified_split(&y, 0.2, 42),
            Err(StratifyError { class: 1, count: 1 })
        );
        assert_eq!(
            stratified_split(&[1, 1, 1], 0.2, 42),
            Err(StratifyError { class: 0, count: 0 })
        );
    }

    #[test]
    fn tiny_classes_keep_one_row_per_side() {
        let y = [0, 0, 1, 1];
        let s = stratified_split(&y, 0.2, 42).unwrap();
        assert_eq!(s.test.len(), 2);
        assert_eq!(s.train.len(), 2);
    }
}
