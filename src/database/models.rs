/*!
 * Database entity models.
 *
 * These structures map directly to the two record tables and provide
 * type-safe access to persisted translations.
 */

use chrono::{DateTime, SecondsFormat, Utc};
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::app_config::{DEFAULT_LIMIT_FAVORITES, DEFAULT_LIMIT_HISTORIES};

/// The two record tables of the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TranslateTable {
    /// Translations the user marked as favorite
    Favorites,
    /// Every translation performed
    Histories,
}

impl TranslateTable {
    /// Both tables, in schema creation order
    pub const ALL: [TranslateTable; 2] = [TranslateTable::Favorites, TranslateTable::Histories];

    /// SQL table name
    pub fn as_str(&self) -> &'static str {
        match self {
            TranslateTable::Favorites => "favorites",
            TranslateTable::Histories => "histories",
        }
    }

    /// Limit applied by `list` and `add` when the caller gives none
    pub fn default_limit(&self) -> usize {
        match self {
            TranslateTable::Favorites => DEFAULT_LIMIT_FAVORITES,
            TranslateTable::Histories => DEFAULT_LIMIT_HISTORIES,
        }
    }
}

impl fmt::Display for TranslateTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TranslateTable {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "favorites" => Ok(TranslateTable::Favorites),
            "histories" => Ok(TranslateTable::Histories),
            _ => Err(anyhow::anyhow!("Invalid translate table: {}", s)),
        }
    }
}

/// Serialized name of [`TranslateText::text`]
const TEXT_FIELD: &str = "text";

/// One side of a translation: the text plus whatever the caller attached
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslateText {
    /// Indexed text
    pub text: String,
    /// Remaining fields, stored and returned verbatim. The key `text` is
    /// reserved for the field above and must not appear here.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TranslateText {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            extra: Map::new(),
        }
    }

    /// Attach an extra field. The reserved key `text` is ignored.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        if key == TEXT_FIELD {
            warn!("Ignoring extra field named {:?}, the key is reserved", key);
            return self;
        }
        self.extra.insert(key, value.into());
        self
    }
}

/// Translation record stored in either table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Translate {
    /// Database ID, `None` until the store assigns one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Creation time, set by the caller
    pub date: DateTime<Utc>,
    /// Original text
    pub source: TranslateText,
    /// Translated text
    pub result: TranslateText,
}

impl Translate {
    /// Create a new record dated now (without database ID)
    pub fn new(source: TranslateText, result: TranslateText) -> Self {
        Self::with_date(Utc::now(), source, result)
    }

    /// Create a new record with an explicit creation time
    pub fn with_date(date: DateTime<Utc>, source: TranslateText, result: TranslateText) -> Self {
        Self {
            id: None,
            date,
            source,
            result,
        }
    }

    /// Fixed-width RFC 3339 form used by the `date` column, so text order matches time order
    pub(crate) fn date_column(&self) -> String {
        self.date.to_rfc3339_opts(SecondsFormat::Nanos, true)
    }
}

/// Counts and head-of-list views of both tables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllTranslates {
    pub favorites_count: usize,
    pub histories_count: usize,
    pub favorites: Vec<Translate>,
    pub histories: Vec<Translate>,
}
