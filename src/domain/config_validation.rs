//! Configuration validation.
//!
//! Regime labels must be given explicitly; there is no silent fallback to 0/2/1.

use crate::domain::error::RegimeTraderError;
use crate::domain::regime::{RegimeLabels, RegimeNames};
use crate::ports::config_port::ConfigPort;

const LABELS: &str = "labels";
const NAMES: &str = "names";

pub fn validate_config(config: &dyn ConfigPort) -> Result<(), RegimeTraderError> {
    build_regime_labels(config)?;
    build_regime_names(config)?;
    validate_date_format(config)?;
    Ok(())
}

pub fn build_regime_labels(config: &dyn ConfigPort) -> Result<RegimeLabels, RegimeTraderError> {
    let labels = RegimeLabels {
        bull: required_label(config, "bull")?,
        bear: required_label(config, "bear")?,
        side: required_label(config, "side")?,
    };

    if labels.bull == labels.bear {
        return Err(RegimeTraderError::invalid(
            LABELS,
            "bear",
            "bear label must differ from bull label",
        ));
    }
    if labels.side == labels.bull || labels.side == labels.bear {
        return Err(RegimeTraderError::invalid(
            LABELS,
            "side",
            "side label must differ from bull and bear labels",
        ));
    }

    Ok(labels)
}

/// Every key in `[names]` must be an integer label.
pub fn build_regime_names(config: &dyn ConfigPort) -> Result<RegimeNames, RegimeTraderError> {
    let mut names = RegimeNames::new();
    for key in config.keys(NAMES) {
        let label: i64 = key.trim().parse().map_err(|_| {
            RegimeTraderError::invalid(NAMES, &key, "name keys must be integer labels")
        })?;
        if let Some(name) = config.get_string(NAMES, &key).filter(|s| !s.trim().is_empty()) {
            names.insert(label, name.trim());
        }
    }
    Ok(names)
}

fn required_label(config: &dyn ConfigPort, key: &str) -> Result<i64, RegimeTraderError> {
    let value = config
        .get_int(LABELS, key)
        .map_err(|reason| {
            RegimeTraderError::invalid(LABELS, key, format!("not an integer: {reason}"))
        })?
        .ok_or_else(|| RegimeTraderError::ConfigMissing {
            section: LABELS.to_string(),
            key: key.to_string(),
        })?;

    if value < 0 {
        return Err(RegimeTraderError::invalid(
            LABELS,
            key,
            "regime labels must be non-negative",
        ));
    }
    Ok(value)
}

fn validate_date_format(config: &dyn ConfigPort) -> Result<(), RegimeTraderError> {
    match config.get_string("input", "date_format") {
        Some(fmt) if fmt.trim().is_empty() => Err(RegimeTraderError::invalid(
            "input",
            "date_format",
            "date_format must not be empty",
        )),
        _ => Ok(()),
    }
}
