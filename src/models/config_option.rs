//! Board configuration options and FQBN decoration

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::sync::LazyLock;

use regex::Regex;

use crate::errors::{BoardsError, Result};

static FQBN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]+(:[A-Za-z0-9_]+)*$").expect("valid FQBN pattern"));

static FQBN_WITH_OPTIONS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[A-Za-z0-9_]+(:[A-Za-z0-9_]+)*(:[A-Za-z0-9_]+=[A-Za-z0-9_]+(,[A-Za-z0-9_]+=[A-Za-z0-9_]+)*)$",
    )
    .expect("valid decorated FQBN pattern")
});

/// One selectable value of a configuration option
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigValue {
    pub label: String,
    pub value: String,
    pub selected: bool,
}

impl ConfigValue {
    pub fn new(label: impl Into<String>, value: impl Into<String>, selected: bool) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            selected,
        }
    }
}

/// A board menu option such as `cpu` or `baud`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigOption {
    pub option: String,
    pub label: String,
    pub values: Vec<ConfigValue>,
}

impl ConfigOption {
    pub fn new(option: impl Into<String>, label: impl Into<String>, values: Vec<ConfigValue>) -> Self {
        Self {
            option: option.into(),
            label: label.into(),
            values,
        }
    }

    /// The first selected value, if any
    pub fn selected_value(&self) -> Option<&ConfigValue> {
        self.values.iter().find(|value| value.selected)
    }

    /// A copy with exactly `value` selected, `None` if no value matches
    pub fn with_selected(&self, value: &str) -> Option<ConfigOption> {
        if !self.values.iter().any(|candidate| candidate.value == value) {
            return None;
        }
        let values = self
            .values
            .iter()
            .map(|candidate| ConfigValue {
                selected: candidate.value == value,
                ..candidate.clone()
            })
            .collect();
        Some(ConfigOption {
            values,
            ..self.clone()
        })
    }

    /// Case-insensitive order by label, as options are listed in menus
    pub fn label_compare(left: &ConfigOption, right: &ConfigOption) -> Ordering {
        left.label.to_lowercase().cmp(&right.label.to_lowercase())
    }

    pub fn is_valid_fqbn(fqbn: &str) -> bool {
        FQBN.is_match(fqbn)
    }

    pub fn is_valid_fqbn_with_options(fqbn: &str) -> bool {
        FQBN_WITH_OPTIONS.is_match(fqbn)
    }

    /// Append the selected values of `options` to `fqbn`.
    ///
    /// The output has the form `segment(':'segment)*(':'option'='value(','option'='value)*)?`.
    /// Options without a selected value are skipped. With `validate` set, a
    /// malformed or already decorated `fqbn` is rejected.
    pub fn decorate(fqbn: &str, options: &[ConfigOption], validate: bool) -> Result<String> {
        if validate {
            if Self::is_valid_fqbn_with_options(fqbn) {
                return Err(BoardsError::AlreadyDecorated(fqbn.to_string()));
            }
            if !Self::is_valid_fqbn(fqbn) {
                return Err(BoardsError::InvalidFqbn(fqbn.to_string()));
            }
        }

        let pairs: Vec<String> = options
            .iter()
            .filter_map(|option| match option.selected_value() {
                Some(selected) => Some(format!("{}={}", option.option, selected.value)),
                None => {
                    log::warn!(
                        "None of the config values was selected for option '{}'. Values were: {:?}",
                        option.option,
                        option.values
                    );
                    None
                }
            })
            .collect();

        if pairs.is_empty() {
            return Ok(fqbn.to_string());
        }
        Ok(format!("{}:{}", fqbn, pairs.join(",")))
    }
}
