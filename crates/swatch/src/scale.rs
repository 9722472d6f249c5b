//! Ordered scales with an offset-based origin.
//!
//! A scale such as `{ values: [8, 12, 16, 20, 24], offset: 2 }` treats
//! position `0` as its base value (`16`). Positive positions step up the
//! scale, negative positions step down, and positions past either end clamp
//! to the first or last value.

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// An ordered list of values with a base position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scale<T = Value> {
    pub values: Vec<T>,
    pub offset: usize,
}

impl<T> Scale<T> {
    pub fn new(values: Vec<T>, offset: usize) -> Self {
        Scale { values, offset }
    }

    /// Returns the value at `position` relative to the base; see
    /// [`get_scale_value`].
    pub fn get(&self, position: i64) -> Option<&T> {
        get_scale_value(self, position)
    }

    /// Converts every value, keeping the offset.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Scale<U> {
        Scale {
            values: self.values.into_iter().map(f).collect(),
            offset: self.offset,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Looks up `position` relative to the scale's offset, clamping to the
/// ends. Returns `None` only for an empty scale.
///
/// ```rust
/// use swatch::{get_scale_value, Scale};
///
/// let scale = Scale::new(vec![8, 12, 16, 20, 24], 2);
/// assert_eq!(get_scale_value(&scale, 0), Some(&16));
/// assert_eq!(get_scale_value(&scale, -1), Some(&12));
/// assert_eq!(get_scale_value(&scale, 10), Some(&24));
/// assert_eq!(get_scale_value(&scale, -10), Some(&8));
/// ```
pub fn get_scale_value<T>(scale: &Scale<T>, position: i64) -> Option<&T> {
    let last = scale.values.len().checked_sub(1)?;
    let index = (scale.offset as i64).saturating_add(position);
    let index = index.clamp(0, last as i64) as usize;
    scale.values.get(index)
}
