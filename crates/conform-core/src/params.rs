//! Explicit and realized instruction parameters.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// Explicit parameters for building an instruction.
///
/// Every field is optional and named after the keyword argument it
/// carries. A checker reads only the fields it owns and samples the rest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstructionParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_sentences: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_placeholders: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_bullets: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_highlights: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section_spliter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_sections: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_paragraphs: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postscript_marker: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_words: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nth_paragraph: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_word: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forbidden_words: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_to_repeat: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_phrase: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub letter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub let_frequency: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub let_relation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capital_frequency: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capital_relation: Option<String>,
}

impl InstructionParams {
    pub fn new() -> Self {
        Self::default()
    }
}

/// A realized parameter value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArgValue {
    Int(i64),
    Str(String),
    List(Vec<String>),
}

impl ArgValue {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(v) => Some(v),
            _ => None,
        }
    }
}

impl From<i64> for ArgValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for ArgValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<Vec<String>> for ArgValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

/// Realized parameters, in the checker's declared key order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstructionArgs {
    entries: Vec<(&'static str, ArgValue)>,
}

impl InstructionArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry. Keys are expected in declared order.
    pub fn with(mut self, key: &'static str, value: impl Into<ArgValue>) -> Self {
        self.entries.push((key, value.into()));
        self
    }

    pub fn get(&self, key: &str) -> Option<&ArgValue> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v)
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(k, _)| *k)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &ArgValue)> {
        self.entries.iter().map(|(k, v)| (*k, v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for InstructionArgs {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
