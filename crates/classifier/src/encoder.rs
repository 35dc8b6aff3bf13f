//! Label Encoding

use crate::ClassifierError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Maps class names to dense integer codes in sorted name order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    /// Learn the class set from labels
    pub fn fit<S: AsRef<str>>(labels: &[S]) -> Self {
        let classes: BTreeSet<&str> = labels.iter().map(|l| l.as_ref()).collect();
        Self {
            classes: classes.into_iter().map(str::to_string).collect(),
        }
    }

    /// Known classes, code order
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }

    /// Code of a class name
    pub fn encode(&self, label: &str) -> Option<u32> {
        self.classes
            .binary_search_by(|c| c.as_str().cmp(label))
            .ok()
            .map(|i| i as u32)
    }

    /// Encode every label, failing on the first unknown one
    pub fn transform<S: AsRef<str>>(&self, labels: &[S]) -> Result<Vec<u32>, ClassifierError> {
        labels
            .iter()
            .map(|l| {
                self.encode(l.as_ref())
                    .ok_or_else(|| ClassifierError::InvalidData(format!("Unknown label {:?}", l.as_ref())))
            })
            .collect()
    }

    /// Class name of a code
    pub fn decode(&self, code: u32) -> Option<&str> {
        self.classes.get(code as usize).map(String::as_str)
    }
}
