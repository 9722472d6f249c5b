//! Breakpoint selection for responsive values.
//!
//! Any style value may be an array indexed by breakpoint. A scalar applies to
//! every breakpoint. An undefined entry (a hole) inherits from smaller
//! breakpoints; an explicit `null` does not.

use crate::value::Value;

/// The entry of `value` for `index`: array slot, or the scalar itself.
fn slot(value: &Value, index: usize) -> Option<&Value> {
    match value {
        Value::Array(entries) => entries.get(index).and_then(Option::as_ref),
        scalar => Some(scalar),
    }
}

/// Selects the value for `breakpoint`.
///
/// `default` carries forward: its last defined entry at or below
/// `breakpoint` is used. `new` only counts when it defines an entry at
/// exactly `breakpoint`, in which case it wins. `null` entries are values
/// and are preserved.
///
/// ```rust
/// use swatch::{get_responsive_value, Value};
///
/// let default = Value::responsive([Some(0.into())]);
/// let new = Value::responsive([None, Some(1.into())]);
/// assert_eq!(get_responsive_value(2, Some(&default), Some(&new)), Some(&Value::from(0)));
/// assert_eq!(get_responsive_value(1, Some(&default), Some(&new)), Some(&Value::from(1)));
/// ```
pub fn get_responsive_value<'a>(
    breakpoint: usize,
    default: Option<&'a Value>,
    new: Option<&'a Value>,
) -> Option<&'a Value> {
    if let Some(exact) = new.and_then(|value| slot(value, breakpoint)) {
        return Some(exact);
    }
    match default? {
        Value::Array(entries) => {
            let last = breakpoint.min(entries.len().checked_sub(1)?);
            entries[..=last].iter().rev().find_map(Option::as_ref)
        }
        scalar => Some(scalar),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arr(entries: &[Option<i32>]) -> Value {
        Value::responsive(entries.iter().map(|e| e.map(Value::from)))
    }

    fn num(n: i32) -> Value {
        Value::from(n)
    }

    #[test]
    fn scalar_applies_everywhere() {
        let v = num(3);
        assert_eq!(get_responsive_value(0, Some(&v), None), Some(&v));
        assert_eq!(get_responsive_value(5, Some(&v), None), Some(&v));
    }

    #[test]
    fn default_carries_forward_over_holes() {
        let v = arr(&[Some(1), None, Some(3)]);
        assert_eq!(get_responsive_value(1, Some(&v), None), Some(&num(1)));
        assert_eq!(get_responsive_value(2, Some(&v), None), Some(&num(3)));
        assert_eq!(get_responsive_value(9, Some(&v), None), Some(&num(3)));
    }

    #[test]
    fn new_only_applies_at_exact_index() {
        let default = arr(&[Some(0)]);
        let new = arr(&[None, Some(1)]);
        assert_eq!(get_responsive_value(2, Some(&default), Some(&new)), Some(&num(0)));
        assert_eq!(get_responsive_value(1, Some(&default), Some(&new)), Some(&num(1)));
    }

    #[test]
    fn null_is_preserved() {
        let v = Value::responsive([Some(num(1)), Some(Value::Null)]);
        assert_eq!(get_responsive_value(1, Some(&v), None), Some(&Value::Null));
        assert_eq!(get_responsive_value(3, Some(&v), None), Some(&Value::Null));
    }

    #[test]
    fn huge_breakpoint_uses_last_entry() {
        let v = arr(&[Some(1), Some(2), None]);
        assert_eq!(get_responsive_value(usize::MAX, Some(&v), None), Some(&num(2)));
        assert_eq!(get_responsive_value(usize::MAX, Some(&arr(&[])), None), None);
        assert_eq!(get_responsive_value(usize::MAX, Some(&num(4)), Some(&v)), Some(&num(4)));
    }

    #[test]
    fn leading_hole_is_undefined() {
        let v = arr(&[None, Some(2)]);
        assert_eq!(get_responsive_value(0, Some(&v), None), None);
        assert_eq!(get_responsive_value(0, None, None), None);
    }
}
