//! Recursive merging of style sheets.

use crate::value::{StyleSheet, Value};

/// Merges sheets left to right; later sheets win.
///
/// Nested sheets under the same key are merged recursively; any other value
/// is replaced. Keys keep the position of their first occurrence. Merging a
/// single sheet returns that same sheet, identity included, and merging none
/// returns an empty sheet.
///
/// ```rust
/// use swatch::{depth_first_object_merge, StyleSheet};
///
/// let base = StyleSheet::new()
///     .with("color", "red")
///     .with("&:hover", StyleSheet::new().with("color", "blue").with("opacity", 1));
/// let over = StyleSheet::new()
///     .with("&:hover", StyleSheet::new().with("color", "green"));
///
/// let merged = depth_first_object_merge(&[base, over]);
/// let hover = merged.get("&:hover").and_then(|v| v.as_sheet()).unwrap();
/// assert_eq!(hover.get("color").and_then(|v| v.as_str()), Some("green"));
/// assert_eq!(hover.get("opacity").and_then(|v| v.as_f64()), Some(1.0));
/// ```
pub fn depth_first_object_merge(sheets: &[StyleSheet]) -> StyleSheet {
    match sheets {
        [] => StyleSheet::new(),
        [only] => only.clone(),
        [first, rest @ ..] => rest
            .iter()
            .fold(first.clone(), |acc, sheet| merge_pair(&acc, sheet)),
    }
}

/// Merges `over` onto `base` into a new sheet.
pub fn merge_pair(base: &StyleSheet, over: &StyleSheet) -> StyleSheet {
    if over.is_empty() {
        return base.clone();
    }
    if base.is_empty() {
        return over.clone();
    }
    let mut entries = base.entries().to_vec();
    for (key, value) in over.iter() {
        match entries.iter_mut().find(|(k, _)| k == key) {
            Some(slot) => {
                slot.1 = match (&slot.1, value) {
                    (Value::Sheet(a), Value::Sheet(b)) => Value::Sheet(merge_pair(a, b)),
                    _ => value.clone(),
                };
            }
            None => entries.push((key.to_string(), value.clone())),
        }
    }
    StyleSheet::from_vec(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input() {
        assert!(depth_first_object_merge(&[]).is_empty());
    }

    #[test]
    fn single_input_keeps_identity() {
        let sheet = StyleSheet::new().with("a", 1);
        assert!(depth_first_object_merge(std::slice::from_ref(&sheet)).same(&sheet));
    }

    #[test]
    fn later_wins() {
        let a = StyleSheet::new().with("x", 1).with("y", 1);
        let b = StyleSheet::new().with("x", 2);
        let c = StyleSheet::new().with("x", 3).with("z", 3);
        let merged = depth_first_object_merge(&[a, b, c]);
        assert_eq!(merged.keys().collect::<Vec<_>>(), ["x", "y", "z"]);
        assert_eq!(merged.get("x"), Some(&Value::from(3)));
    }

    #[test]
    fn scalar_replaces_nested_sheet() {
        let a = StyleSheet::new().with("x", StyleSheet::new().with("y", 1));
        let b = StyleSheet::new().with("x", "flat");
        assert_eq!(merge_pair(&a, &b).get("x"), Some(&Value::from("flat")));
    }

    #[test]
    fn nested_sheets_merge_deeply() {
        let a = StyleSheet::new().with(
            "a",
            StyleSheet::new().with("b", StyleSheet::new().with("c", 1).with("d", 1)),
        );
        let b = StyleSheet::new().with("a", StyleSheet::new().with("b", StyleSheet::new().with("c", 2)));
        let merged = merge_pair(&a, &b);
        let inner = merged
            .get("a")
            .and_then(Value::as_sheet)
            .and_then(|s| s.get("b"))
            .and_then(Value::as_sheet)
            .unwrap();
        assert_eq!(inner.get("c"), Some(&Value::from(2)));
        assert_eq!(inner.get("d"), Some(&Value::from(1)));
    }

    #[test]
    fn inputs_are_not_modified() {
        let a = StyleSheet::new().with("x", 1);
        let b = StyleSheet::new().with("y", 2);
        let _ = merge_pair(&a, &b);
        assert_eq!(a.len(), 1);
        assert_eq!(b.len(), 1);
    }
}
