//! Stratified Train/Test Split

use crate::ClassifierError;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Row indices of each partition, ascending
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Split row indices so each class keeps its share in both partitions.
///
/// `labels` are class codes in `0..n_classes`. The test partition targets
/// `ceil(test_size * N)` rows, allotted per class by largest remainder and
/// clamped so every class has at least one row on each side.
pub fn stratified_split(
    labels: &[u32],
    n_classes: usize,
    test_size: f64,
    seed: u64,
) -> Result<Split, ClassifierError> {
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(ClassifierError::InvalidData(format!(
            "test_size must be in (0, 1), got {}",
            test_size
        )));
    }

    let mut by_class: Vec<Vec<usize>> = vec![Vec::new(); n_classes];
    for (i, &label) in labels.iter().enumerate() {
        let slot = by_class.get_mut(label as usize).ok_or_else(|| {
            ClassifierError::InvalidData(format!("Class code {} out of range", label))
        })?;
        slot.push(i);
    }

    if let Some((code, members)) = by_class.iter().enumerate().find(|(_, m)| m.len() < 2) {
        return Err(ClassifierError::InvalidData(format!(
            "Class {} has {} member(s), stratification needs at least 2",
            code,
            members.len()
        )));
    }

    let n = labels.len();
    let n_test = (test_size * n as f64).ceil() as usize;

    // Largest-remainder apportionment of n_test across classes
    let exact: Vec<f64> = by_class
        .iter()
        .map(|m| m.len() as f64 * n_test as f64 / n as f64)
        .collect();
    let mut quotas: Vec<usize> = exact.iter().map(|q| q.floor() as usize).collect();
    let assigned: usize = quotas.iter().sum();

    let mut order: Vec<usize> = (0..n_classes).collect();
    order.sort_by(|&a, &b| {
        let ra = exact[a] - exact[a].floor();
        let rb = exact[b] - exact[b].floor();
        rb.total_cmp(&ra).then(a.cmp(&b))
    });
    for &class in order.iter().take(n_test.saturating_sub(assigned)) {
        quotas[class] += 1;
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut train = Vec::with_capacity(n);
    let mut test = Vec::with_capacity(n_test);
    for (members, quota) in by_class.iter_mut().zip(quotas) {
        let quota = quota.clamp(1, members.len() - 1);
        members.shuffle(&mut rng);
        test.extend_from_slice(&members[..quota]);
        train.extend_from_slice(&members[quota..]);
    }

    train.sort_unstable();
    test.sort_unstable();
    Ok(Split { train, test })
}
