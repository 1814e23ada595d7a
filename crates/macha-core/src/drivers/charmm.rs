use super::process::{DriverError, ToolOutput, locate_executable, run_tool};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// Runs CHARMM on an input script.
#[derive(Debug, Clone, Default)]
pub struct CharmmDriver {
    executable: Option<PathBuf>,
}

impl CharmmDriver {
    pub const DEFAULT_NAME: &'static str = "charmm";

    pub fn new(explicit: Option<&Path>) -> Self {
        Self {
            executable: locate_executable(explicit, Self::DEFAULT_NAME),
        }
    }

    pub fn with_executable(executable: Option<PathBuf>) -> Self {
        Self { executable }
    }

    pub fn is_available(&self) -> bool {
        self.executable.is_some()
    }

    /// Path of the file receiving CHARMM's standard output for `script`.
    pub fn output_path(script: &Path) -> Option<PathBuf> {
        let stem = script.file_stem()?;
        let mut name = stem.to_owned();
        name.push(".out");
        Some(script.with_file_name(name))
    }

    /// Runs `charmm -i <script>` from the script's directory and stores the
    /// captured standard output next to it as `<stem>.out`.
    ///
    /// Returns `Ok(None)` when no CHARMM binary is available.
    pub fn run(&self, script: &Path) -> Result<Option<ToolOutput>, DriverError> {
        let Some(program) = &self.executable else {
            warn!(
                "CHARMM is not available. Install it or set `charmm.executable` in the \
                 configuration; skipping {}.",
                script.display()
            );
            return Ok(None);
        };

        let (Some(file_name), Some(out_path)) = (script.file_name(), Self::output_path(script))
        else {
            return Err(DriverError::InvalidScript(script.to_path_buf()));
        };
        let work_dir = match script.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };

        let args = vec!["-i".to_string(), file_name.to_string_lossy().into_owned()];
        let output = run_tool(program, &args, work_dir)?;

        fs::write(&out_path, &output.stdout).map_err(|e| DriverError::Io {
            path: out_path.clone(),
            source: e,
        })?;

        if output.success() {
            info!(
                "CHARMM finished {} (output in {})",
                script.display(),
                out_path.display()
            );
        } else {
            error!(
                "CHARMM returned an error (code {:?}) for `{}`; see {}\n{}",
                output.status_code,
                output.command_line(),
                out_path.display(),
                output.stderr
            );
        }
        Ok(Some(output))
    }
}
