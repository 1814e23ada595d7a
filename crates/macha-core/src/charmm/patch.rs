use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, info};

/// Suffix of the pristine copy kept next to every patched script.
pub const BACKUP_SUFFIX: &str = "premod";

/// Where a block goes relative to the line that matched its rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InsertMode {
    #[default]
    After,
    Before,
    Replace,
}

impl FromStr for InsertMode {
    type Err = PatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "after" => Ok(InsertMode::After),
            "before" => Ok(InsertMode::Before),
            "replace" => Ok(InsertMode::Replace),
            other => Err(PatchError::InvalidMode(other.to_string())),
        }
    }
}

#[derive(Debug, Error)]
pub enum PatchError {
    #[error(
        "Patch rule lists differ in length: {cases} cases, {blocks} blocks, {modes} modes"
    )]
    LengthMismatch {
        cases: usize,
        blocks: usize,
        modes: usize,
    },
    #[error("Unknown insert mode '{0}' (expected after, before or replace)")]
    InvalidMode(String),
    #[error("No backup found at '{0}'")]
    MissingBackup(PathBuf),
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// A substring to look for and the block to insert where it is found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchRule {
    pub case: String,
    pub block: String,
    pub mode: InsertMode,
}

impl PatchRule {
    pub fn new(case: impl Into<String>, block: impl Into<String>, mode: InsertMode) -> Self {
        Self {
            case: case.into(),
            block: block.into(),
            mode,
        }
    }

    pub fn after(case: impl Into<String>, block: impl Into<String>) -> Self {
        Self::new(case, block, InsertMode::After)
    }

    /// Builds rules from three parallel lists.
    pub fn zip<C, B>(cases: &[C], blocks: &[B], modes: &[InsertMode]) -> Result<Vec<Self>, PatchError>
    where
        C: AsRef<str>,
        B: AsRef<str>,
    {
        if cases.len() != blocks.len() || cases.len() != modes.len() {
            return Err(PatchError::LengthMismatch {
                cases: cases.len(),
                blocks: blocks.len(),
                modes: modes.len(),
            });
        }
        Ok(cases
            .iter()
            .zip(blocks)
            .zip(modes)
            .map(|((case, block), &mode)| Self::new(case.as_ref(), block.as_ref(), mode))
            .collect())
    }
}

/// One template line (terminator included) and the rule that matched it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateLine<'a> {
    pub text: &'a str,
    pub rule: Option<usize>,
}

/// Tags every line with the index of the first rule whose case occurs in it.
pub fn parse<'a>(template: &'a str, rules: &[PatchRule]) -> Vec<TemplateLine<'a>> {
    template
        .split_inclusive('\n')
        .map(|text| TemplateLine {
            text,
            rule: rules.iter().position(|r| text.contains(r.case.as_str())),
        })
        .collect()
}

/// Renders tagged lines back to text. Untagged lines are copied unchanged.
pub fn render(lines: &[TemplateLine<'_>], rules: &[PatchRule]) -> String {
    let mut out = String::new();
    for line in lines {
        let Some(rule) = line.rule.and_then(|i| rules.get(i)) else {
            out.push_str(line.text);
            continue;
        };
        let content = line.text.trim_end_matches(['\n', '\r']);
        match rule.mode {
            InsertMode::After => {
                out.push_str(content);
                out.push_str("\n\n");
                out.push_str(&rule.block);
                out.push('\n');
            }
            InsertMode::Before => {
                out.push_str(&rule.block);
                out.push_str("\n\n");
                out.push_str(content);
                out.push('\n');
            }
            InsertMode::Replace => {
                out.push_str(&rule.block);
                out.push('\n');
            }
        }
    }
    out
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> PatchError {
    let path = path.to_path_buf();
    move |source| PatchError::Io { path, source }
}

/// Applies patch rules to CHARMM input scripts in place.
///
/// The first patch of a script copies it to `<script>.premod`; every patch
/// (including the first) renders from that backup, so repeated runs never
/// compound edits and a changed rule set always applies to the pristine
/// template.
pub struct ScriptPatcher;

impl ScriptPatcher {
    pub fn backup_path(path: &Path) -> PathBuf {
        let mut name = path.as_os_str().to_owned();
        name.push(".");
        name.push(BACKUP_SUFFIX);
        PathBuf::from(name)
    }

    pub fn apply(path: &Path, rules: &[PatchRule]) -> Result<(), PatchError> {
        let backup = Self::backup_path(path);

        if backup.exists() {
            debug!("Patching {} from existing backup", path.display());
        } else {
            fs::copy(path, &backup).map_err(io_error(path))?;
            debug!("Created backup {}", backup.display());
        }

        let template = fs::read_to_string(&backup).map_err(io_error(&backup))?;
        let lines = parse(&template, rules);
        let matched = lines.iter().filter(|l| l.rule.is_some()).count();
        fs::write(path, render(&lines, rules)).map_err(io_error(path))?;

        info!(
            "Patched {} ({} of {} lines matched)",
            path.display(),
            matched,
            lines.len()
        );
        Ok(())
    }

    /// Copies the backup back over the live script.
    pub fn restore(path: &Path) -> Result<(), PatchError> {
        let backup = Self::backup_path(path);
        if !backup.exists() {
            return Err(PatchError::MissingBackup(backup));
        }
        fs::copy(&backup, path).map_err(io_error(path))?;
        Ok(())
    }
}
