//! `--property` and `--secret` handling.

use anyhow::bail;
use luna_types::{is_timestamp, Props, ADDED, UPDATED};
use zeroize::Zeroizing;

use crate::cli::PropertyArgs;

fn is_reserved(key: &str) -> bool {
    key == ADDED || key == UPDATED
}

/// Split `key=value`. The separator may be neither first nor last.
pub fn parse_property(raw: &str) -> anyhow::Result<(String, String)> {
    let (key, value) = match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() && !value.is_empty() => (key, value),
        _ => bail!("--property expects a key value pair, e.g. `--property key=value`"),
    };
    if is_reserved(key) && !is_timestamp(value) {
        bail!("Property '{key}' must use date format");
    }
    Ok((key.to_string(), value.to_string()))
}

/// Secret keys are names only and may not be the reserved timestamps.
pub fn validate_secret_key(key: &str) -> anyhow::Result<()> {
    if key.contains('=') {
        eprintln!("WARN: Secrets may have been leaked via command line input");
        bail!("--secret cannot accept a value on the command line for security reasons");
    }
    if is_reserved(key) {
        bail!("Cannot use --secret for property '{key}'. Use --property instead.");
    }
    Ok(())
}

/// Build the props for `add`/`update`, asking for each secret's value.
///
/// Everything on the command line is validated before the first prompt.
pub fn collect_props<F>(args: &PropertyArgs, mut ask: F) -> anyhow::Result<Props>
where
    F: FnMut(&str) -> anyhow::Result<Zeroizing<String>>,
{
    let mut props = Props::new();
    for raw in &args.properties {
        let (key, value) = parse_property(raw)?;
        props.insert(key, value);
    }
    for key in &args.secrets {
        validate_secret_key(key)?;
    }
    for key in &args.secrets {
        let value = ask(key)?;
        props.insert(key.clone(), value.to_string());
    }
    Ok(props)
}
