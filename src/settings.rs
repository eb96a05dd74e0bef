//! Settings resolution for the preparer.
//!
//! Settings are split in two records: the five keys the NLU layer recognizes,
//! held as typed fields on [`Settings`], and an open map of additional values
//! that individual pipeline steps may read. Caller input arrives as
//! [`SettingsOverrides`], where every recognized key is optional.
//!
//! Resolution is a shallow, key-by-key merge in which a value supplied by the
//! caller always wins over the default.
//!
//! # Examples
//!
//! ```
//! use nlu_prep::settings::{Settings, SettingsOverrides};
//!
//! let overrides = SettingsOverrides::from_json_str(r#"{"locale":"fr","keepStopwords":false}"#).unwrap();
//! let settings = Settings::resolve(&Settings::default(), &overrides);
//!
//! assert_eq!(settings.locale, "fr");
//! assert!(!settings.keep_stopwords);
//! assert_eq!(settings.nonedelta_multiplier, 1.2);
//! ```

use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;

/// Keys held as typed fields, in their serialized (camelCase) spelling.
pub const RECOGNIZED_KEYS: [&str; 5] = [
    "locale",
    "keepStopwords",
    "nonefeatureValue",
    "nonedeltaMultiplier",
    "spellcheckDistance",
];

/// Default locale.
pub const DEFAULT_LOCALE: &str = "en";

/// Stopwords are kept unless the caller says otherwise.
pub const DEFAULT_KEEP_STOPWORDS: bool = true;

/// Default weight of the "none" intent feature.
pub const DEFAULT_NONEFEATURE_VALUE: f64 = 1.0;

/// Default multiplier applied to the "none" intent delta.
pub const DEFAULT_NONEDELTA_MULTIPLIER: f64 = 1.2;

/// Spellchecking is disabled by default.
pub const DEFAULT_SPELLCHECK_DISTANCE: u32 = 0;

/// Fully resolved settings.
///
/// Immutable after construction; the preparer hands out shared references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Language tag used by normalization, tokenization and stemming.
    pub locale: String,

    /// When false, the stopword step removes the locale's stopwords.
    pub keep_stopwords: bool,

    /// Weight reserved for downstream "none" intent scoring.
    pub nonefeature_value: f64,

    /// Multiplier reserved for downstream scoring.
    pub nonedelta_multiplier: f64,

    /// Maximum edit distance a spellcheck step may tolerate.
    pub spellcheck_distance: u32,

    /// Settings the NLU layer does not interpret itself.
    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            locale: DEFAULT_LOCALE.to_string(),
            keep_stopwords: DEFAULT_KEEP_STOPWORDS,
            nonefeature_value: DEFAULT_NONEFEATURE_VALUE,
            nonedelta_multiplier: DEFAULT_NONEDELTA_MULTIPLIER,
            spellcheck_distance: DEFAULT_SPELLCHECK_DISTANCE,
            additional: Map::new(),
        }
    }
}

impl Settings {
    /// Merge `overrides` over `base`.
    ///
    /// Every key present in `overrides` takes the overriding value; every
    /// other key keeps the value from `base`. This is a pure function, so
    /// resolving the same pair twice yields equal results.
    ///
    /// Recognized keys that reached an `additional` map still land on their
    /// typed field, so the typed value and [`Settings::to_value`] agree.
    pub fn resolve(base: &Settings, overrides: &SettingsOverrides) -> Settings {
        let mut overrides = overrides.clone();
        overrides.absorb_recognized();

        let mut additional = overrides.additional;
        apply_settings(&mut additional, &base.additional);
        additional.retain(|key, _| !RECOGNIZED_KEYS.contains(&key.as_str()));

        Settings {
            locale: overrides
                .locale
                .clone()
                .unwrap_or_else(|| base.locale.clone()),
            keep_stopwords: overrides.keep_stopwords.unwrap_or(base.keep_stopwords),
            nonefeature_value: overrides.nonefeature_value.unwrap_or(base.nonefeature_value),
            nonedelta_multiplier: overrides
                .nonedelta_multiplier
                .unwrap_or(base.nonedelta_multiplier),
            spellcheck_distance: overrides
                .spellcheck_distance
                .unwrap_or(base.spellcheck_distance),
            additional,
        }
    }

    /// Resolve caller overrides against the built-in defaults.
    pub fn from_overrides(overrides: &SettingsOverrides) -> Settings {
        Settings::resolve(&Settings::default(), overrides)
    }

    /// Look up an additional (non-recognized) setting.
    pub fn additional(&self, key: &str) -> Option<&Value> {
        self.additional.get(key)
    }

    /// Render these settings as a JSON value, recognized keys included.
    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Caller-supplied settings, every recognized key optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub keep_stopwords: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub nonefeature_value: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub nonedelta_multiplier: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub spellcheck_distance: Option<u32>,

    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

impl SettingsOverrides {
    /// Create an empty set of overrides.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse overrides from a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Convert overrides from an already-parsed JSON value.
    pub fn from_value(value: Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn locale<S: Into<String>>(mut self, locale: S) -> Self {
        self.locale = Some(locale.into());
        self
    }

    pub fn keep_stopwords(mut self, keep: bool) -> Self {
        self.keep_stopwords = Some(keep);
        self
    }

    pub fn nonefeature_value(mut self, value: f64) -> Self {
        self.nonefeature_value = Some(value);
        self
    }

    pub fn nonedelta_multiplier(mut self, value: f64) -> Self {
        self.nonedelta_multiplier = Some(value);
        self
    }

    pub fn spellcheck_distance(mut self, distance: u32) -> Self {
        self.spellcheck_distance = Some(distance);
        self
    }

    /// Add a setting by its camelCase key.
    ///
    /// Recognized keys set the matching typed field; a recognized key with a
    /// value of the wrong type is logged and ignored. Anything else is passed
    /// through to pipeline steps.
    pub fn with<K: Into<String>>(mut self, key: K, value: Value) -> Self {
        let key = key.into();
        if RECOGNIZED_KEYS.contains(&key.as_str()) {
            self.set_recognized(&key, value);
        } else {
            self.additional.insert(key, value);
        }
        self
    }

    fn set_recognized(&mut self, key: &str, value: Value) {
        let applied = match key {
            "locale" => serde_json::from_value(value).map(|v| self.locale = Some(v)),
            "keepStopwords" => serde_json::from_value(value).map(|v| self.keep_stopwords = Some(v)),
            "nonefeatureValue" => {
                serde_json::from_value(value).map(|v| self.nonefeature_value = Some(v))
            }
            "nonedeltaMultiplier" => {
                serde_json::from_value(value).map(|v| self.nonedelta_multiplier = Some(v))
            }
            "spellcheckDistance" => {
                serde_json::from_value(value).map(|v| self.spellcheck_distance = Some(v))
            }
            _ => Ok(()),
        };
        if let Err(err) = applied {
            warn!("Ignoring setting '{key}': {err}");
        }
    }

    // Move recognized keys out of `additional`. A typed field that is already
    // set wins over the same key in the map.
    fn absorb_recognized(&mut self) {
        for key in RECOGNIZED_KEYS {
            let Some(value) = self.additional.remove(key) else {
                continue;
            };
            let unset = match key {
                "locale" => self.locale.is_none(),
                "keepStopwords" => self.keep_stopwords.is_none(),
                "nonefeatureValue" => self.nonefeature_value.is_none(),
                "nonedeltaMultiplier" => self.nonedelta_multiplier.is_none(),
                _ => self.spellcheck_distance.is_none(),
            };
            if unset {
                self.set_recognized(key, value);
            }
        }
    }
}

/// Copy every key of `defaults` that `target` does not already hold.
///
/// Keys already present in `target` are never overwritten.
pub fn apply_settings(target: &mut Map<String, Value>, defaults: &Map<String, Value>) {
    for (key, value) in defaults {
        if !target.contains_key(key) {
            target.insert(key.clone(), value.clone());
        }
    }
}
