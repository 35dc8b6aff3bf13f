//! Evaluation Metrics

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fraction of positions where prediction equals truth
pub fn accuracy(y_true: &[u32], y_pred: &[u32]) -> f64 {
    if y_true.is_empty() {
        return 0.0;
    }
    let correct = y_true.iter().zip(y_pred).filter(|(t, p)| t == p).count();
    correct as f64 / y_true.len() as f64
}

/// Counts of (true class, predicted class) pairs; rows are true classes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    classes: Vec<String>,
    counts: Vec<Vec<usize>>,
}

impl ConfusionMatrix {
    /// Tally predictions; codes index into `classes`, out-of-range codes are skipped
    pub fn from_predictions(y_true: &[u32], y_pred: &[u32], classes: Vec<String>) -> Self {
        let n = classes.len();
        let mut counts = vec![vec![0; n]; n];
        for (&t, &p) in y_true.iter().zip(y_pred) {
            if let Some(cell) = counts
                .get_mut(t as usize)
                .and_then(|row| row.get_mut(p as usize))
            {
                *cell += 1;
            }
        }
        Self { classes, counts }
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn counts(&self) -> &[Vec<usize>] {
        &self.counts
    }

    /// Count for a true/predicted pair
    pub fn get(&self, true_class: usize, predicted: usize) -> usize {
        self.counts[true_class][predicted]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }

    /// Sum of the diagonal
    pub fn correct(&self) -> usize {
        (0..self.counts.len()).map(|i| self.counts[i][i]).sum()
    }

    pub fn accuracy(&self) -> f64 {
        match self.total() {
            0 => 0.0,
            total => self.correct() as f64 / total as f64,
        }
    }

    /// Largest single cell
    pub fn max_count(&self) -> usize {
        self.counts.iter().flatten().copied().max().unwrap_or(0)
    }
}

impl fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .classes
            .iter()
            .map(String::len)
            .chain(std::iter::once(self.max_count().to_string().len()))
            .max()
            .unwrap_or(1);

        write!(f, "{:width$}", "", width = width)?;
        for class in &self.classes {
            write!(f, " {:>width$}", class, width = width)?;
        }
        writeln!(f)?;
        for (class, row) in self.classes.iter().zip(&self.counts) {
            write!(f, "{:>width$}", class, width = width)?;
            for count in row {
                write!(f, " {:>width$}", count, width = width)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classes() -> Vec<String> {
        vec!["EB".to_string(), "RR_LYR".to_string()]
    }

    #[test]
    fn test_accuracy() {
        assert_eq!(accuracy(&[0, 1, 1, 0], &[0, 1, 0, 0]), 0.75);
        assert_eq!(accuracy(&[], &[]), 0.0);
    }

    #[test]
    fn test_confusion_counts() {
        let y_true = [0, 0, 1, 1, 1];
        let y_pred = [0, 1, 1, 1, 0];
        let cm = ConfusionMatrix::from_predictions(&y_true, &y_pred, classes());
        assert_eq!(cm.get(0, 0), 1);
        assert_eq!(cm.get(0, 1), 1);
        assert_eq!(cm.get(1, 0), 1);
        assert_eq!(cm.get(1, 1), 2);
        assert_eq!(cm.total(), 5);
        assert_eq!(cm.correct(), 3);
        assert_eq!(cm.accuracy(), accuracy(&y_true, &y_pred));
        assert_eq!(cm.max_count(), 2);
    }

    #[test]
    fn test_display_layout() {
        let cm = ConfusionMatrix::from_predictions(&[0, 1], &[0, 1], classes());
        let text = cm.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("EB") && lines[0].contains("RR_LYR"));
        assert!(lines[1].trim_start().starts_with("EB"));
    }
}
