//! Style values, style sheets and style sheet lists.
//!
//! A [`StyleSheet`] is an ordered mapping from property names (or selector
//! strings such as `&:hover`) to [`Value`]s. Sheets are immutable, cheaply
//! clonable handles carrying a process-unique identity ([`SheetId`]); the
//! resolution memo and the composition cache are keyed by that identity,
//! never by content.
//!
//! ```rust
//! use swatch::{StyleSheet, Value};
//!
//! let hover = StyleSheet::new().with("color", "primary.1");
//! let sheet = StyleSheet::new()
//!     .with("color", "primary")
//!     .with("padding", Value::responsive([Some(1.into()), None, Some(3.into())]))
//!     .with("&:hover", hover);
//!
//! assert_eq!(sheet.len(), 3);
//! assert_eq!(sheet.keys().collect::<Vec<_>>(), ["color", "padding", "&:hover"]);
//! ```

use std::fmt;
use std::ops::Deref;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use crate::error::{Result, StyleError};
use crate::responsive::get_responsive_value;
use crate::scale::Scale;

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

fn next_id() -> SheetId {
    SheetId(NEXT_ID.fetch_add(1, Ordering::Relaxed))
}

/// Identity of a [`StyleSheet`] or [`SheetList`].
///
/// Ids are never reused within a process, so a cache entry keyed by an id can
/// never be confused with a later object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SheetId(u64);

/// A style value.
///
/// `Option<Value>` is used wherever a slot may be *undefined*; `Value::Null`
/// is the explicit "no value" signal and is preserved through resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    /// A responsive value indexed by breakpoint; `None` entries are holes.
    Array(Vec<Option<Value>>),
    Scale(Scale),
    Sheet(StyleSheet),
}

impl Value {
    /// Builds a responsive array value.
    pub fn responsive<I: IntoIterator<Item = Option<Value>>>(entries: I) -> Self {
        Value::Array(entries.into_iter().collect())
    }

    /// Selects the entry for `breakpoint`, treating scalars as applying to
    /// every breakpoint.
    pub fn at_breakpoint(&self, breakpoint: usize) -> Option<&Value> {
        get_responsive_value(breakpoint, Some(self), None)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_sheet(&self) -> Option<&StyleSheet> {
        match self {
            Value::Sheet(sheet) => Some(sheet),
            _ => None,
        }
    }

    pub fn as_scale(&self) -> Option<&Scale> {
        match self {
            Value::Scale(scale) => Some(scale),
            _ => None,
        }
    }

    /// Returns the integer value of a whole number.
    pub fn as_position(&self) -> Option<i64> {
        match self {
            Value::Number(n) if n.fract() == 0.0 && n.is_finite() => Some(*n as i64),
            _ => None,
        }
    }

    /// Short name of the variant, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Scale(_) => "scale",
            Value::Sheet(_) => "mapping",
        }
    }

    /// Converts to a `serde_json` value.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => json_number(*n),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Array(items) => serde_json::Value::Array(
                items
                    .iter()
                    .map(|item| item.as_ref().map_or(serde_json::Value::Null, Value::to_json))
                    .collect(),
            ),
            Value::Scale(scale) => {
                let mut map = serde_json::Map::new();
                map.insert(
                    "values".to_string(),
                    serde_json::Value::Array(scale.values.iter().map(Value::to_json).collect()),
                );
                map.insert("offset".to_string(), serde_json::Value::from(scale.offset));
                serde_json::Value::Object(map)
            }
            Value::Sheet(sheet) => sheet.to_json(),
        }
    }
}

fn json_number(n: f64) -> serde_json::Value {
    if n.fract() == 0.0 && n.abs() < 9.0e15 {
        serde_json::Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n).map_or(serde_json::Value::Null, serde_json::Value::Number)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<StyleSheet> for Value {
    fn from(sheet: StyleSheet) -> Self {
        Value::Sheet(sheet)
    }
}

impl From<Scale> for Value {
    fn from(scale: Scale) -> Self {
        Value::Scale(scale)
    }
}

impl From<Scale<f64>> for Value {
    fn from(scale: Scale<f64>) -> Self {
        Value::Scale(scale.map(Value::Number))
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items.into_iter().map(Some).collect())
    }
}

/// Converts JSON data. Objects with exactly a `values` array and a numeric
/// `offset` become [`Value::Scale`]; every other object becomes a sheet.
impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(0.0)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(|item| Some(item.into())).collect())
            }
            serde_json::Value::Object(map) => {
                if let Some(scale) = scale_from_json(&map) {
                    return Value::Scale(scale);
                }
                Value::Sheet(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

fn scale_from_json(map: &serde_json::Map<String, serde_json::Value>) -> Option<Scale> {
    if map.len() != 2 {
        return None;
    }
    let values = map.get("values")?.as_array()?;
    let offset = map.get("offset")?.as_u64()?;
    Some(Scale::new(
        values.iter().cloned().map(Value::from).collect(),
        offset as usize,
    ))
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) if n.fract() == 0.0 && n.abs() < 9.0e15 => {
                serializer.serialize_i64(*n as i64)
            }
            Value::Number(n) => serializer.serialize_f64(*n),
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Scale(scale) => scale.serialize(serializer),
            Value::Sheet(sheet) => sheet.serialize(serializer),
        }
    }
}

// ─── StyleSheet ─────────────────────────────────────────────────────────────

#[derive(Debug)]
pub(crate) struct SheetInner {
    id: SheetId,
    entries: Vec<(String, Value)>,
}

/// An ordered, immutable mapping of style properties.
///
/// Cloning is cheap and preserves identity. Equality (`==`) compares
/// content; use [`StyleSheet::same`] to compare identity.
#[derive(Clone)]
pub struct StyleSheet(Arc<SheetInner>);

impl StyleSheet {
    /// Creates an empty sheet.
    pub fn new() -> Self {
        Self::from_entries(Vec::new())
    }

    fn from_entries(entries: Vec<(String, Value)>) -> Self {
        StyleSheet(Arc::new(SheetInner {
            id: next_id(),
            entries,
        }))
    }

    /// Parses a sheet from JSON text. Key order is preserved.
    pub fn from_json(json: &str) -> Result<Self> {
        let parsed: serde_json::Value = serde_json::from_str(json)?;
        Self::from_json_value(parsed)
    }

    /// Parses a sheet from YAML text. Key order is preserved.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let parsed: serde_json::Value = serde_yaml::from_str(yaml)?;
        Self::from_json_value(parsed)
    }

    /// Loads a sheet from a `.json`, `.yaml` or `.yml` file. Other extensions
    /// are read as YAML, which also accepts JSON.
    ///
    /// ```rust,ignore
    /// use swatch::{StyleSheet, Theme};
    ///
    /// let theme = Theme::with_settings(StyleSheet::from_file("./themes/light.yaml")?)?;
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| StyleError::Load {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json(&content),
            _ => Self::from_yaml(&content),
        }
    }

    /// Converts a JSON object into a sheet.
    pub fn from_json_value(json: serde_json::Value) -> Result<Self> {
        match Value::from(json) {
            Value::Sheet(sheet) => Ok(sheet),
            other => Err(StyleError::NotAMapping(other.type_name())),
        }
    }

    /// Returns a sheet with `key` set to `value`.
    ///
    /// An existing key keeps its position. The sheet is updated in place when
    /// this handle is the only reference to it; otherwise a copy with a new
    /// identity is made.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        let value = value.into();
        match Arc::get_mut(&mut self.0) {
            Some(inner) => {
                insert_entry(&mut inner.entries, key, value);
                self
            }
            None => {
                let mut entries = self.0.entries.clone();
                insert_entry(&mut entries, key, value);
                Self::from_entries(entries)
            }
        }
    }

    /// The sheet's identity.
    pub fn id(&self) -> SheetId {
        self.0.id
    }

    /// `true` when both handles refer to the same sheet.
    pub fn same(&self, other: &StyleSheet) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0
            .entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.0.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.entries.is_empty()
    }

    /// Iterates entries in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Converts to a `serde_json` object.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.iter()
                .map(|(k, v)| (k.to_string(), v.to_json()))
                .collect(),
        )
    }

    pub(crate) fn entries(&self) -> &[(String, Value)] {
        &self.0.entries
    }

    pub(crate) fn from_vec(entries: Vec<(String, Value)>) -> Self {
        Self::from_entries(entries)
    }

    pub(crate) fn downgrade(&self) -> WeakSheet {
        WeakSheet(Arc::downgrade(&self.0))
    }
}

fn insert_entry(entries: &mut Vec<(String, Value)>, key: String, value: Value) {
    match entries.iter_mut().find(|(k, _)| *k == key) {
        Some(slot) => slot.1 = value,
        None => entries.push((key, value)),
    }
}

impl Default for StyleSheet {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for StyleSheet {
    fn eq(&self, other: &Self) -> bool {
        self.same(other) || self.0.entries == other.0.entries
    }
}

impl fmt::Debug for StyleSheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.0.entries.iter().map(|(k, v)| (k, v)))
            .finish()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for StyleSheet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut entries = Vec::new();
        for (k, v) in iter {
            insert_entry(&mut entries, k.into(), v.into());
        }
        Self::from_entries(entries)
    }
}

impl Serialize for StyleSheet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (k, v) in self.iter() {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// A non-owning reference to a sheet, used by identity-keyed caches.
#[derive(Debug, Clone)]
pub(crate) struct WeakSheet(Weak<SheetInner>);

impl WeakSheet {
    pub(crate) fn is_alive(&self) -> bool {
        self.0.strong_count() > 0
    }
}

// ─── SheetList ──────────────────────────────────────────────────────────────

#[derive(Debug)]
struct ListInner {
    id: SheetId,
    sheets: Vec<StyleSheet>,
}

/// An immutable, identity-carrying list of style sheets.
///
/// Used for the "parent sheets" of a component and for the assembled
/// sheet order returned by [`StyleSheetCache`](crate::StyleSheetCache).
#[derive(Clone)]
pub struct SheetList(Arc<ListInner>);

impl SheetList {
    pub fn new(sheets: Vec<StyleSheet>) -> Self {
        SheetList(Arc::new(ListInner {
            id: next_id(),
            sheets,
        }))
    }

    /// The list's identity.
    pub fn id(&self) -> SheetId {
        self.0.id
    }

    /// `true` when both handles refer to the same list.
    pub fn same(&self, other: &SheetList) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Deref for SheetList {
    type Target = [StyleSheet];

    fn deref(&self) -> &[StyleSheet] {
        &self.0.sheets
    }
}

impl Default for SheetList {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl fmt::Debug for SheetList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.sheets.iter()).finish()
    }
}

impl FromIterator<StyleSheet> for SheetList {
    fn from_iter<I: IntoIterator<Item = StyleSheet>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ids_are_unique() {
        let a = StyleSheet::new();
        let b = StyleSheet::new();
        assert_ne!(a.id(), b.id());
        assert!(a.same(&a.clone()));
        assert!(!a.same(&b));
        assert_eq!(a, b);
    }

    #[test]
    fn with_keeps_position_of_existing_key() {
        let sheet = StyleSheet::new()
            .with("a", 1)
            .with("b", 2)
            .with("a", 3);
        assert_eq!(sheet.keys().collect::<Vec<_>>(), ["a", "b"]);
        assert_eq!(sheet.get("a"), Some(&Value::Number(3.0)));
    }

    #[test]
    fn with_on_shared_sheet_gets_new_identity() {
        let original = StyleSheet::new().with("a", 1);
        let shared = original.clone();
        let updated = shared.with("b", 2);
        assert!(!updated.same(&original));
        assert_eq!(original.len(), 1);
        assert_eq!(updated.len(), 2);
    }

    #[test]
    fn with_on_unique_sheet_keeps_identity() {
        let sheet = StyleSheet::new();
        let id = sheet.id();
        let sheet = sheet.with("a", 1);
        assert_eq!(sheet.id(), id);
    }

    #[test]
    fn json_objects_keep_order_and_detect_scales() {
        let sheet = StyleSheet::from_json_value(json!({
            "zIndex": 1,
            "colors": { "primary": { "values": ["#ddd", "#ccc"], "offset": 1 } },
            "alpha": [1, null, 2]
        }))
        .unwrap();
        assert_eq!(sheet.keys().collect::<Vec<_>>(), ["zIndex", "colors", "alpha"]);
        let colors = sheet.get("colors").and_then(Value::as_sheet).unwrap();
        let primary = colors.get("primary").and_then(Value::as_scale).unwrap();
        assert_eq!(primary.offset, 1);
        assert_eq!(
            sheet.get("alpha"),
            Some(&Value::Array(vec![
                Some(Value::Number(1.0)),
                Some(Value::Null),
                Some(Value::Number(2.0))
            ]))
        );
    }

    #[test]
    fn yaml_settings() {
        let sheet = StyleSheet::from_yaml("isDark: true\nfontFamily:\n  body: Inter\n").unwrap();
        assert_eq!(sheet.get("isDark"), Some(&Value::Bool(true)));
    }

    #[test]
    fn settings_from_file() {
        use std::fs;
        use tempfile::TempDir;

        let temp_dir = TempDir::new().unwrap();
        let yaml_path = temp_dir.path().join("light.yaml");
        fs::write(
            &yaml_path,
            r##"
            colors:
              primary: "#ccc"
            isDark: false
            "##,
        )
        .unwrap();
        let json_path = temp_dir.path().join("dark.json");
        fs::write(&json_path, r#"{"isDark": true}"#).unwrap();

        let light = StyleSheet::from_file(&yaml_path).unwrap();
        assert_eq!(light.keys().collect::<Vec<_>>(), ["colors", "isDark"]);
        let dark = StyleSheet::from_file(&json_path).unwrap();
        assert_eq!(dark.get("isDark"), Some(&Value::Bool(true)));
    }

    #[test]
    fn settings_file_not_found() {
        let err = StyleSheet::from_file("/nonexistent/path/theme.yaml").unwrap_err();
        assert!(matches!(err, StyleError::Load { .. }));
        assert!(err.to_string().starts_with("Failed to load /nonexistent/path/theme.yaml"));
    }

    #[test]
    fn non_mapping_document_is_rejected() {
        let err = StyleSheet::from_json("[1, 2]").unwrap_err();
        assert!(matches!(err, StyleError::NotAMapping("array")));
    }

    #[test]
    fn serializes_whole_numbers_as_integers() {
        let sheet = StyleSheet::new()
            .with("marginLeft", "8px")
            .with("opacity", 0.5)
            .with("zIndex", 2);
        assert_eq!(
            serde_json::to_string(&sheet).unwrap(),
            r#"{"marginLeft":"8px","opacity":0.5,"zIndex":2}"#
        );
        assert_eq!(sheet.to_json(), json!({"marginLeft": "8px", "opacity": 0.5, "zIndex": 2}));
    }

    #[test]
    fn sheet_list_identity() {
        let a = StyleSheet::new();
        let list: SheetList = vec![a.clone()].into_iter().collect();
        assert_eq!(list.len(), 1);
        assert!(list[0].same(&a));
        assert!(list.same(&list.clone()));
    }

    #[test]
    fn weak_sheet_tracks_liveness() {
        let sheet = StyleSheet::new();
        let weak = sheet.downgrade();
        assert!(weak.is_alive());
        drop(sheet);
        assert!(!weak.is_alive());
    }
}
