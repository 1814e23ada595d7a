use super::process::{DriverError, ToolOutput, locate_executable, run_tool};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// Runs CGenFF to produce a CHARMM stream file for a ligand.
#[derive(Debug, Clone, Default)]
pub struct CgenffDriver {
    executable: Option<PathBuf>,
}

impl CgenffDriver {
    pub const DEFAULT_NAME: &'static str = "cgenff";

    /// Resolves the binary from `explicit` or `PATH`.
    pub fn new(explicit: Option<&Path>) -> Self {
        Self {
            executable: locate_executable(explicit, Self::DEFAULT_NAME),
        }
    }

    /// Uses an already-resolved binary (or none).
    pub fn with_executable(executable: Option<PathBuf>) -> Self {
        Self { executable }
    }

    pub fn executable(&self) -> Option<&Path> {
        self.executable.as_deref()
    }

    pub fn is_available(&self) -> bool {
        self.executable.is_some()
    }

    /// The arguments CGenFF is called with for one ligand.
    ///
    /// The stream and log land in `{ligand_id}/` below the working directory.
    pub fn arguments(ligand_file: &Path, ligand_id: &str) -> Vec<String> {
        vec![
            ligand_file.display().to_string(),
            "-v".to_string(),
            "-f".to_string(),
            format!("{0}/{0}.str", ligand_id),
            "-m".to_string(),
            format!("{0}/{0}.log", ligand_id),
        ]
    }

    /// Parameterizes `ligand_file` (relative to `work_dir`).
    ///
    /// Returns `Ok(None)` when no CGenFF binary is available. A non-zero exit
    /// is logged but still returned as `Ok(Some(_))`; the caller decides what
    /// to do with it.
    pub fn run(
        &self,
        work_dir: &Path,
        ligand_file: &Path,
        ligand_id: &str,
    ) -> Result<Option<ToolOutput>, DriverError> {
        let Some(program) = &self.executable else {
            warn!(
                "CGenFF is not available. Install it in the active environment or point to it \
                 with the `cgenff.path` setting (or --cgenff /path/to/cgenff)."
            );
            return Ok(None);
        };

        let args = Self::arguments(ligand_file, ligand_id);
        let output = run_tool(program, &args, work_dir)?;

        if output.success() {
            info!("CGenFF executed successfully for ligand {}", ligand_id);
        } else {
            error!(
                "CGenFF returned an error (code {:?}) after being called with:\n{}\n{}\n{}",
                output.status_code,
                output.command_line(),
                output.stdout,
                output.stderr
            );
        }
        Ok(Some(output))
    }
}
