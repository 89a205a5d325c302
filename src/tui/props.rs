//! # Prop Snapshots
//!
//! Panels describe their inputs as a flat name → value snapshot rebuilt on
//! every frame. [`props_equal`] is the shallow comparator that decides
//! whether the previous render artifact can be reused (see `memo`).
//!
//! ## Comparison policy
//!
//! The gate is deliberately imprecise in two places, trading accuracy for
//! fewer rebuilds:
//!
//! - Callables always compare equal. Panels recreate their callbacks every
//!   frame, and a fresh closure must not invalidate the cache.
//! - A list containing any object-like element (list, map, callable) is
//!   judged by length alone. Panels that care about object contents carry a
//!   revision scalar next to the list.
//!
//! Both inputs are read-only; the comparator never mutates a snapshot and
//! never panics.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

/// Cloneable callback slot. Rc rather than Box so a snapshot can be cloned
/// into the cache without re-wrapping the closure.
pub type Callback = Rc<dyn Fn()>;

/// One dynamically shaped panel input.
///
/// The closed set of shapes the comparator understands. Shape is resolved
/// once per key by matching on the pair of variants, never by inspecting
/// values at runtime.
#[derive(Clone, Default)]
pub enum PropValue {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(Rc<str>),
    Callback(Callback),
    List(Rc<[PropValue]>),
    Map(Rc<BTreeMap<String, PropValue>>),
}

impl PropValue {
    /// Returns the shape name, for logs and test failure messages.
    pub fn shape(&self) -> &'static str {
        match self {
            PropValue::Null => "Null",
            PropValue::Bool(_) => "Bool",
            PropValue::Int(_) => "Int",
            PropValue::Float(_) => "Float",
            PropValue::Text(_) => "Text",
            PropValue::Callback(_) => "Callback",
            PropValue::List(_) => "List",
            PropValue::Map(_) => "Map",
        }
    }

    /// Null, Bool, Int, Float, and Text compare by value; everything else is
    /// object-like.
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            PropValue::Null
                | PropValue::Bool(_)
                | PropValue::Int(_)
                | PropValue::Float(_)
                | PropValue::Text(_)
        )
    }

    pub fn is_callable(&self) -> bool {
        matches!(self, PropValue::Callback(_))
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            PropValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            PropValue::Float(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            PropValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Strict equality: value equality for primitives, reference identity
    /// for object-like values. Mismatched shapes are unequal. Floats follow
    /// IEEE semantics, so a NaN is unequal even to itself.
    pub fn strict_eq(&self, other: &PropValue) -> bool {
        match (self, other) {
            (PropValue::Null, PropValue::Null) => true,
            (PropValue::Bool(a), PropValue::Bool(b)) => a == b,
            (PropValue::Int(a), PropValue::Int(b)) => a == b,
            (PropValue::Float(a), PropValue::Float(b)) => a == b,
            (PropValue::Text(a), PropValue::Text(b)) => a == b,
            (PropValue::Callback(a), PropValue::Callback(b)) => Rc::ptr_eq(a, b),
            (PropValue::List(a), PropValue::List(b)) => Rc::ptr_eq(a, b),
            (PropValue::Map(a), PropValue::Map(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropValue::Null => write!(f, "Null"),
            PropValue::Bool(b) => write!(f, "Bool({b})"),
            PropValue::Int(n) => write!(f, "Int({n})"),
            PropValue::Float(n) => write!(f, "Float({n})"),
            PropValue::Text(s) => write!(f, "Text({s:?})"),
            PropValue::Callback(_) => write!(f, "Callback(..)"),
            PropValue::List(items) => f.debug_list().entries(items.iter()).finish(),
            PropValue::Map(entries) => f.debug_map().entries(entries.iter()).finish(),
        }
    }
}

impl From<bool> for PropValue {
    fn from(v: bool) -> Self {
        PropValue::Bool(v)
    }
}

impl From<i64> for PropValue {
    fn from(v: i64) -> Self {
        PropValue::Int(v)
    }
}

impl From<u16> for PropValue {
    fn from(v: u16) -> Self {
        PropValue::Int(v as i64)
    }
}

impl From<u32> for PropValue {
    fn from(v: u32) -> Self {
        PropValue::Int(v as i64)
    }
}

impl From<usize> for PropValue {
    fn from(v: usize) -> Self {
        PropValue::Int(v as i64)
    }
}

impl From<f64> for PropValue {
    fn from(v: f64) -> Self {
        PropValue::Float(v)
    }
}

impl From<&str> for PropValue {
    fn from(v: &str) -> Self {
        PropValue::Text(Rc::from(v))
    }
}

impl From<String> for PropValue {
    fn from(v: String) -> Self {
        PropValue::Text(Rc::from(v))
    }
}

impl From<Vec<PropValue>> for PropValue {
    fn from(v: Vec<PropValue>) -> Self {
        PropValue::List(Rc::from(v))
    }
}

impl From<BTreeMap<String, PropValue>> for PropValue {
    fn from(v: BTreeMap<String, PropValue>) -> Self {
        PropValue::Map(Rc::new(v))
    }
}

/// Absent optionals become Null, mirroring how panels treat "not set".
impl<T: Into<PropValue>> From<Option<T>> for PropValue {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(inner) => inner.into(),
            None => PropValue::Null,
        }
    }
}

/// One panel's full input set at a given frame.
///
/// Built fresh each render with the builder-style [`Props::with`], then
/// handed to the memo layer by value. Key order is irrelevant to the
/// comparison; BTreeMap just keeps Debug output stable.
#[derive(Clone, Debug, Default)]
pub struct Props {
    entries: BTreeMap<String, PropValue>,
}

impl Props {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<PropValue>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&PropValue> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Decides whether two prop snapshots are close enough to skip a rebuild.
///
/// Returns `false` (rebuild) whenever either snapshot is missing, the key
/// counts differ, or any shared key fails the per-shape comparison:
///
/// - two callables are always equal
/// - two lists are equal when lengths match and either every previous
///   element is primitive and pairwise value-equal, or any previous element
///   is object-like (contents deliberately not inspected)
/// - anything else falls back to [`PropValue::strict_eq`]
///
/// Key sets are assumed to match when the counts do; a key of `previous`
/// that is missing from `next` is skipped, so same-sized snapshots with
/// different names slip through as equal.
pub fn props_equal(previous: Option<&Props>, next: Option<&Props>) -> bool {
    let (Some(prev), Some(next)) = (previous, next) else {
        // No prior snapshot to compare against: render
        return false;
    };

    if prev.len() != next.len() {
        return false;
    }

    for (key, prev_value) in prev.iter() {
        let Some(next_value) = next.get(key) else {
            continue;
        };
        if !value_pair_equal(prev_value, next_value) {
            return false;
        }
    }

    true
}

/// Per-key dispatch over the shape pair.
fn value_pair_equal(prev: &PropValue, next: &PropValue) -> bool {
    match (prev, next) {
        (PropValue::Callback(_), PropValue::Callback(_)) => true,
        (PropValue::List(prev_items), PropValue::List(next_items)) => {
            lists_equal(prev_items, next_items)
        }
        _ => prev.strict_eq(next),
    }
}

fn lists_equal(prev: &[PropValue], next: &[PropValue]) -> bool {
    if prev.len() != next.len() {
        return false;
    }
    if prev.iter().any(|v| !v.is_primitive()) {
        // Object rows are judged by length alone
        return true;
    }
    prev.iter().zip(next.iter()).all(|(a, b)| a.strict_eq(b))
}
