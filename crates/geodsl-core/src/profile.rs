//! Session profiles
//!
//! A profile describes the restrictions and settings of a session (exam
//! allow-lists, category gates, argument bounds) and installs them on an
//! `AlgebraProcessor`. Profiles are read from TOML or JSON:
//!
//! ```toml
//! silent_errors = true
//! log_profile = "production"
//! autocreate_sliders = false
//!
//! [commands]
//! allow = ["Point", "Line", "Sum"]
//! cas_allowed = false
//! deny_categories = ["Function"]
//!
//! [arguments]
//! min = 1
//! max = 5
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::algebra::AlgebraProcessor;
use crate::commands::{Category, CommandId};
use crate::errors::{GeoDslError, Result};
use crate::filters::{ArgumentCountFilter, CategoryGateFilter, ExamModeFilter, FilterId};
use crate::logging_facility::Profile;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionProfile {
    pub silent_errors: bool,
    pub log_profile: Option<Profile>,
    pub autocreate_sliders: bool,
    pub commands: CommandRules,
    pub arguments: ArgumentRules,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CommandRules {
    /// Exam-mode allow-list; absent means every command is allowed
    pub allow: Option<Vec<String>>,
    pub cas_allowed: bool,
    pub deny_categories: Vec<String>,
}

impl Default for CommandRules {
    fn default() -> Self {
        Self {
            allow: None,
            cas_allowed: true,
            deny_categories: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArgumentRules {
    pub min: Option<usize>,
    pub max: Option<usize>,
}

impl SessionProfile {
    /// # Errors
    ///
    /// Returns `Profile` if the text is not a valid profile.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// # Errors
    ///
    /// Returns `Profile` if the text is not a valid profile.
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Load a profile file; `.json` files are read as JSON, anything else
    /// as TOML
    ///
    /// # Errors
    ///
    /// Returns `Profile` if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| GeoDslError::Profile {
            reason: format!("{}: {}", path.display(), e),
        })?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&text)
        } else {
            Self::from_toml_str(&text)
        }
    }

    /// Install this profile's filters and settings
    ///
    /// Names are resolved before anything is installed, so a profile with an
    /// unknown command or category leaves the processor untouched. Returns
    /// the ids of the installed command and argument filters.
    ///
    /// # Errors
    ///
    /// Returns `Profile` for unknown command or category names, or when
    /// `min` exceeds `max`.
    pub fn apply(&self, processor: &mut AlgebraProcessor) -> Result<Vec<FilterId>> {
        let allowed = self
            .commands
            .allow
            .as_ref()
            .map(|names| {
                names
                    .iter()
                    .map(|name| {
                        CommandId::from_name(name).ok_or_else(|| GeoDslError::Profile {
                            reason: format!("unknown command '{}'", name),
                        })
                    })
                    .collect::<Result<Vec<_>>>()
            })
            .transpose()?;

        let denied = self
            .commands
            .deny_categories
            .iter()
            .map(|name| {
                name.parse::<Category>().map_err(|_| GeoDslError::Profile {
                    reason: format!("unknown category '{}'", name),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        if let (Some(min), Some(max)) = (self.arguments.min, self.arguments.max) {
            if min > max {
                return Err(GeoDslError::Profile {
                    reason: format!("arguments.min ({}) exceeds arguments.max ({})", min, max),
                });
            }
        }

        let mut installed = Vec::new();
        if let Some(allowed) = allowed {
            installed.push(processor.add_command_filter(Box::new(ExamModeFilter::new(allowed))));
        }
        if !self.commands.cas_allowed {
            installed.push(processor.add_command_filter(Box::new(CategoryGateFilter::cas(false))));
        }
        for category in denied {
            installed.push(
                processor.add_command_filter(Box::new(CategoryGateFilter::new(category, false))),
            );
        }
        if self.arguments.min.is_some() || self.arguments.max.is_some() {
            let filter = ArgumentCountFilter::new(self.arguments.min.unwrap_or(0), self.arguments.max);
            installed.push(processor.add_argument_filter(Box::new(filter)));
        }

        processor.error_handler_mut().set_silent(self.silent_errors);
        processor.set_autocreate_sliders(self.autocreate_sliders);

        tracing::debug!(filters = installed.len(), "session profile applied");
        Ok(installed)
    }
}
