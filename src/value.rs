use serde::Serialize;
use serde_json::Value;

use crate::errors::SnapshotError;

/// An ordered, heterogeneous collection of captured values.
///
/// One `ValueSet` feeds one named slot; every backend serializes the whole
/// set as a single composite snapshot, so a change anywhere in the set
/// invalidates the slot as a unit. Values are converted to [`serde_json::Value`]
/// at push time, which erases their concrete types and guarantees stable
/// (sorted) map-key ordering from then on.
///
/// # Examples
///
/// ```rust
/// use snapfile::ValueSet;
/// let mut values = ValueSet::new();
/// values.push(&"header").unwrap();
/// values.push(&vec![1, 2, 3]).unwrap();
/// assert_eq!(values.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueSet {
    items: Vec<Value>,
}

impl ValueSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a set holding a single captured value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use snapfile::ValueSet;
    /// let values = ValueSet::of(&42).unwrap();
    /// assert_eq!(values.len(), 1);
    /// ```
    pub fn of<T: Serialize + ?Sized>(value: &T) -> Result<Self, SnapshotError> {
        let mut set = Self::new();
        set.push(value)?;
        Ok(set)
    }

    /// Captures one more value at the end of the set.
    pub fn push<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), SnapshotError> {
        self.items.push(serde_json::to_value(value)?);
        Ok(())
    }

    /// Number of captured values.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when nothing has been captured.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub(crate) fn items(&self) -> &[Value] {
        &self.items
    }
}
