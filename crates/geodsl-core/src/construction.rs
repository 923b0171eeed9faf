//! Construction: the labeled results of a session

use std::collections::HashMap;

use crate::errors::{GeoDslError, Result};
use crate::value::Descriptor;

/// Labeled results of a session
///
/// Labels map to non-empty descriptor lists. Iteration follows first
/// insertion order; rebinding a label keeps its position.
#[derive(Debug, Clone, Default)]
pub struct Construction {
    elements: HashMap<String, Vec<Descriptor>>,
    order: Vec<String>,
    suppress_labels: bool,
}

impl Construction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_element(&self, label: &str) -> Option<&[Descriptor]> {
        self.elements.get(label).map(Vec::as_slice)
    }

    /// Bind or rebind `label`
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the label is blank or `result` is empty.
    pub fn add_element(&mut self, label: &str, result: Vec<Descriptor>) -> Result<()> {
        if label.trim().is_empty() {
            return Err(GeoDslError::invalid_input("Empty label"));
        }
        if result.is_empty() {
            return Err(GeoDslError::invalid_input(format!(
                "Cannot bind empty result to '{}'",
                label
            )));
        }

        if self.elements.insert(label.to_string(), result).is_none() {
            self.order.push(label.to_string());
        }
        Ok(())
    }

    /// Returns `false` if the label was not bound
    pub fn remove_element(&mut self, label: &str) -> bool {
        if self.elements.remove(label).is_none() {
            return false;
        }
        self.order.retain(|l| l != label);
        true
    }

    pub fn is_free_label(&self, label: &str) -> bool {
        !self.elements.contains_key(label)
    }

    pub fn clear(&mut self) {
        self.elements.clear();
        self.order.clear();
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Labels in insertion order
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// `(label, result)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Descriptor])> {
        self.order.iter().filter_map(|label| {
            self.elements
                .get(label)
                .map(|result| (label.as_str(), result.as_slice()))
        })
    }

    pub fn is_suppress_labels_active(&self) -> bool {
        self.suppress_labels
    }

    /// While active, evaluation still runs but labeled results are not recorded
    pub fn set_suppress_label_creation(&mut self, suppress: bool) {
        self.suppress_labels = suppress;
    }
}
