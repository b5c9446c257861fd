//! The parsed document tree.
//!
//! A [`Json`] node owns all of its children, so dropping the root releases the
//! whole document. Nodes are built bottom-up by the parser and are not mutated
//! once their production completes.

use std::collections::TryReserveError;
use std::fmt::{self, Display};

use derive_more::From;
use fxhash::FxHashMap;

use crate::print::Pretty;
use crate::util::try_match;

#[derive(Debug, Clone, PartialEq, From)]
pub enum Json {
    Object(JsonObject),
    Array(Vec<Json>),
    String(String),
    Number(JsonNumber),
    Boolean(bool),

    #[from(ignore)]
    Null,
}

#[derive(strum::Display, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[strum(serialize_all = "lowercase")]
pub enum JsonKind {
    Object,
    Array,
    String,
    Number,
    Boolean,
    Null,
}

impl Json {
    pub fn kind(&self) -> JsonKind {
        match self {
            Self::Object(_) => JsonKind::Object,
            Self::Array(_) => JsonKind::Array,
            Self::String(_) => JsonKind::String,
            Self::Number(_) => JsonKind::Number,
            Self::Boolean(_) => JsonKind::Boolean,
            Self::Null => JsonKind::Null,
        }
    }

    pub fn as_object(&self) -> Option<&JsonObject> {
        try_match!(self, Self::Object(object) => object)
    }

    pub fn as_array(&self) -> Option<&[Json]> {
        try_match!(self, Self::Array(elems) => elems.as_slice())
    }

    pub fn as_str(&self) -> Option<&str> {
        try_match!(self, Self::String(s) => s.as_str())
    }

    pub fn as_number(&self) -> Option<&JsonNumber> {
        try_match!(self, Self::Number(number) => number)
    }

    pub fn as_bool(&self) -> Option<bool> {
        try_match!(*self, Self::Boolean(b) => b)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Looks up a member of an object by key.
    pub fn get(&self, key: &str) -> Option<&Json> {
        self.as_object()?.get(key)
    }

    /// Looks up an element of an array by index.
    pub fn at(&self, idx: usize) -> Option<&Json> {
        self.as_array()?.get(idx)
    }

    /// Resolves a JSON pointer such as `/servers/0/name`.
    ///
    /// The empty pointer refers to the node itself. Within a segment, `~1`
    /// stands for `/` and `~0` for `~`. Array segments must be plain decimal
    /// indices without leading zeros.
    pub fn pointer(&self, pointer: &str) -> Option<&Json> {
        if pointer.is_empty() {
            return Some(self);
        }

        let path = pointer.strip_prefix('/')?;

        path.split('/').try_fold(self, |node, segment| {
            let segment = segment.replace("~1", "/").replace("~0", "~");

            match node {
                Self::Object(object) => object.get(&segment),

                Self::Array(elems) => {
                    let leading_zero = segment.len() > 1 && segment.starts_with('0');

                    if leading_zero || !segment.bytes().all(|b| b.is_ascii_digit()) {
                        return None;
                    }

                    elems.get(segment.parse::<usize>().ok()?)
                }

                _ => None,
            }
        })
    }
}

impl Eq for Json {}

impl Display for Json {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Pretty::new(self, Pretty::DEFAULT_INDENT).fmt(f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub key: String,
    pub value: Json,
}

/// An object whose members keep their insertion order.
///
/// Keys are unique. When a key is inserted twice, the first value is kept and
/// the later one is dropped.
#[derive(Debug, Clone, Default)]
pub struct JsonObject {
    members: Vec<Member>,
    index: FxHashMap<String, usize>,
}

impl JsonObject {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Json> {
        self.index.get(key).map(|&idx| &self.members[idx].value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Json)> {
        self.members
            .iter()
            .map(|member| (member.key.as_str(), &member.value))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(|member| member.key.as_str())
    }

    /// Inserts a member unless the key is already present.
    ///
    /// Returns whether the member was inserted.
    pub fn try_insert(&mut self, key: String, value: Json) -> Result<bool, TryReserveError> {
        if self.index.contains_key(&key) {
            return Ok(false);
        }

        self.members.try_reserve(1)?;
        self.index.try_reserve(1)?;
        self.index.insert(key.clone(), self.members.len());
        self.members.push(Member { key, value });

        Ok(true)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Json>) -> bool {
        let key = key.into();

        if self.index.contains_key(&key) {
            return false;
        }

        self.index.insert(key.clone(), self.members.len());
        self.members.push(Member {
            key,
            value: value.into(),
        });

        true
    }
}

impl PartialEq for JsonObject {
    fn eq(&self, other: &Self) -> bool {
        self.members == other.members
    }
}

impl Eq for JsonObject {}

#[derive(strum::Display, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[strum(serialize_all = "lowercase")]
pub enum NumberKind {
    Integer,
    Float,
}

/// A number kept as the exact text it was written with.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JsonNumber {
    kind: NumberKind,
    raw: String,
}

impl JsonNumber {
    pub fn new(kind: NumberKind, raw: impl Into<String>) -> Self {
        Self {
            kind,
            raw: raw.into(),
        }
    }

    pub fn kind(&self) -> NumberKind {
        self.kind
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn is_integer(&self) -> bool {
        self.kind == NumberKind::Integer
    }

    pub fn is_float(&self) -> bool {
        self.kind == NumberKind::Float
    }
}

impl Display for JsonNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
