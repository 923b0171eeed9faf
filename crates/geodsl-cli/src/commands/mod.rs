//! Subcommand implementations and the shared session setup

pub mod catalog;
pub mod eval;
pub mod script;
pub mod validate;

use std::path::Path;

use geodsl_core::logging_facility::{self, Profile};
use geodsl_core::{AlgebraProcessor, Descriptor, SessionProfile};

/// Build the processor every subcommand runs against
///
/// `--verbose` forces development logging; otherwise the profile's
/// `log_profile` decides, and without one no subscriber is installed.
pub fn open_session(
    profile: Option<&Path>,
    verbose: bool,
) -> Result<AlgebraProcessor, Box<dyn std::error::Error>> {
    let profile = match profile {
        Some(path) => Some(SessionProfile::load(path)?),
        None => None,
    };

    let log_profile = if verbose {
        Some(Profile::Development)
    } else {
        profile.as_ref().and_then(|p| p.log_profile)
    };
    if let Some(log_profile) = log_profile {
        logging_facility::init(log_profile);
    }

    let mut algebra = AlgebraProcessor::new();
    if let Some(profile) = &profile {
        profile.apply(&mut algebra)?;
    }
    Ok(algebra)
}

/// One result list as a single JSON line
pub(crate) fn render(result: &[Descriptor]) -> Result<String, serde_json::Error> {
    serde_json::to_string(result)
}
