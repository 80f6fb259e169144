use std::collections::BTreeMap;
use std::fmt;

/// Reserved kind for the placeholder particles that make up a [`Port`](super::compound::Port).
pub const GHOST_KIND: &str = "G";

/// A value stored in an atom's attribute bag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue {
    Text(String),
    List(Vec<String>),
}

impl AttrValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttrValue::Text(s) => Some(s),
            AttrValue::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            AttrValue::Text(_) => None,
            AttrValue::List(items) => Some(items),
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Text(s) => f.write_str(s),
            AttrValue::List(items) => write!(f, "[{}]", items.join(", ")),
        }
    }
}

/// Leaf particle of the compound hierarchy.
///
/// `kind` is usually the chemical element symbol; ghost particles use
/// [`GHOST_KIND`]. Engines attach their results to `extras` under their own
/// keys rather than growing this struct.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    pub kind: String,
    pub position: [f64; 3],
    pub charge: f64,
    pub extras: BTreeMap<String, AttrValue>,
}

impl Atom {
    pub fn new(kind: impl Into<String>, position: [f64; 3]) -> Self {
        Self {
            kind: kind.into(),
            position,
            charge: 0.0,
            extras: BTreeMap::new(),
        }
    }

    pub fn ghost(position: [f64; 3]) -> Self {
        Self::new(GHOST_KIND, position)
    }

    #[inline]
    pub fn is_ghost(&self) -> bool {
        self.kind == GHOST_KIND
    }

    pub fn extra(&self, key: &str) -> Option<&AttrValue> {
        self.extras.get(key)
    }

    pub fn set_extra(&mut self, key: impl Into<String>, value: AttrValue) {
        self.extras.insert(key.into(), value);
    }
}
