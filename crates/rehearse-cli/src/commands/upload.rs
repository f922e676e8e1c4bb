//! /upload command - ingest a resume or notes file into a slot

use super::CommandResult;
use crate::utils::expand_home;
use std::path::PathBuf;

pub struct UploadCommand;

impl UploadCommand {
    pub fn execute(args: &str) -> CommandResult {
        match parse_doc_spec(args) {
            Ok((label, path)) => CommandResult::Upload { label, path },
            Err(e) => CommandResult::Message(format!("{}\nUsage: /upload LABEL=PATH", e)),
        }
    }
}

/// Parse `LABEL=PATH`, or `LABEL PATH` split at the last space.
///
/// Also the value parser for `--doc`.
pub fn parse_doc_spec(spec: &str) -> Result<(String, PathBuf), String> {
    let spec = spec.trim();
    let (label, path) = spec
        .split_once('=')
        .or_else(|| spec.rsplit_once(' '))
        .ok_or_else(|| format!("expected LABEL=PATH, got '{}'", spec))?;

    let (label, path) = (label.trim(), path.trim());
    if label.is_empty() {
        return Err("document label is empty".to_string());
    }
    if path.is_empty() {
        return Err(format!("no file given for '{}'", label));
    }

    Ok((label.to_string(), expand_home(path)))
}
