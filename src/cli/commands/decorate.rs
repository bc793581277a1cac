//! Decorate command implementation - Append option=value pairs to a FQBN

use anyhow::{Result, bail};

use crate::models::{ConfigOption, ConfigValue};

/// Parse `option=value` into a config option with that single value selected
fn parse_selection(pair: &str) -> Result<ConfigOption> {
    let Some((option, value)) = pair.split_once('=') else {
        bail!("Expected OPTION=VALUE, got '{}'", pair);
    };
    if option.is_empty() || value.is_empty() {
        bail!("Expected OPTION=VALUE, got '{}'", pair);
    }
    Ok(ConfigOption::new(
        option,
        option,
        vec![ConfigValue::new(value, value, true)],
    ))
}

pub fn execute_decorate_command(fqbn: &str, pairs: &[String], validate: bool) -> Result<()> {
    let options = pairs
        .iter()
        .map(|pair| parse_selection(pair))
        .collect::<Result<Vec<_>>>()?;
    let decorated = ConfigOption::decorate(fqbn, &options, validate)?;
    println!("{}", decorated);
    Ok(())
}
