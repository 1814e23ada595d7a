use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use thiserror::Error;
use tracing::{debug, trace};

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("Failed to execute '{program}': {source}")]
    Spawn {
        program: PathBuf,
        source: std::io::Error,
    },
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid script path '{0}'")]
    InvalidScript(PathBuf),
}

/// Captured result of one external tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    pub program: PathBuf,
    pub args: Vec<String>,
    /// Exit code, `None` if the process was terminated by a signal.
    pub status_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.status_code == Some(0)
    }

    /// The invocation as a single shell-like line, for logs and reports.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.display().to_string())
            .chain(self.args.iter().cloned())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Resolves an executable from an explicit path or a search path.
///
/// `search_path` has the format of the `PATH` variable.
pub fn locate_executable_in(
    explicit: Option<&Path>,
    name: &str,
    search_path: Option<OsString>,
) -> Option<PathBuf> {
    if let Some(path) = explicit {
        match which::which(path) {
            Ok(found) => return Some(found),
            Err(e) => debug!(
                "Configured path {} is not usable ({}); searching PATH for {}",
                path.display(),
                e,
                name
            ),
        }
    }
    let search_path = search_path?;
    let cwd = env::current_dir().ok()?;
    which::which_in(name, Some(search_path), cwd).ok()
}

/// Resolves an executable from an explicit path, falling back to `PATH`.
///
/// Returns `None` if neither yields an executable file.
pub fn locate_executable(explicit: Option<&Path>, name: &str) -> Option<PathBuf> {
    locate_executable_in(explicit, name, env::var_os("PATH"))
}

/// Runs `program` with `args` in `work_dir` and captures its output.
///
/// Nothing is fed on stdin. A non-zero exit is not an error here; only a
/// failure to start the process is.
pub fn run_tool(program: &Path, args: &[String], work_dir: &Path) -> Result<ToolOutput, DriverError> {
    trace!(
        "Spawning {} {:?} in {}",
        program.display(),
        args,
        work_dir.display()
    );
    let output = Command::new(program)
        .args(args)
        .current_dir(work_dir)
        .stdin(Stdio::null())
        .output()
        .map_err(|e| DriverError::Spawn {
            program: program.to_path_buf(),
            source: e,
        })?;

    Ok(ToolOutput {
        program: program.to_path_buf(),
        args: args.to_vec(),
        status_code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}


#[cfg(all(test, unix))]
mod tests {
    use super::test_support::fake_tool;
    use super::*;
    use serial_test::serial;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn explicit_executable_wins() {
        let dir = tempdir().unwrap();
        let tool = fake_tool(dir.path(), "cgenff", "exit 0");
        assert_eq!(locate_executable_in(Some(&tool), "cgenff", None), Some(tool));
    }

    #[test]
    fn search_path_is_used_when_explicit_path_is_missing() {
        let bin = tempdir().unwrap();
        let tool = fake_tool(bin.path(), "charmm", "exit 0");
        let missing = bin.path().join("not-here");

        let found = locate_executable_in(
            Some(&missing),
            "charmm",
            Some(bin.path().as_os_str().to_owned()),
        );
        assert_eq!(found, Some(tool));
    }

    #[test]
    fn non_executable_files_are_skipped() {
        let bin = tempdir().unwrap();
        fs::write(bin.path().join("cgenff"), "data").unwrap();
        let found =
            locate_executable_in(None, "cgenff", Some(bin.path().as_os_str().to_owned()));
        assert_eq!(found, None);
    }

    #[test]
    fn explicit_non_executable_falls_back_to_search_path() {
        let conf = tempdir().unwrap();
        let plain = conf.path().join("cgenff");
        fs::write(&plain, "data").unwrap();
        let bin = tempdir().unwrap();
        let tool = fake_tool(bin.path(), "cgenff", "exit 0");

        let found = locate_executable_in(
            Some(&plain),
            "cgenff",
            Some(bin.path().as_os_str().to_owned()),
        );
        assert_eq!(found, Some(tool));
    }

    #[test]
    fn unavailable_tool_yields_none() {
        let empty = tempdir().unwrap();
        assert_eq!(
            locate_executable_in(None, "cgenff", Some(empty.path().as_os_str().to_owned())),
            None
        );
        assert_eq!(locate_executable_in(None, "cgenff", None), None);
    }

    #[test]
    #[serial]
    fn run_tool_captures_streams_and_status() {
        let dir = tempdir().unwrap();
        let tool = fake_tool(dir.path(), "tool", "echo \"out $1\"\necho err >&2\nexit 3");

        let output = run_tool(&tool, &["arg".to_string()], dir.path()).unwrap();

        assert_eq!(output.stdout, "out arg\n");
        assert_eq!(output.stderr, "err\n");
        assert_eq!(output.status_code, Some(3));
        assert!(!output.success());
        assert_eq!(output.command_line(), format!("{} arg", tool.display()));
    }

    #[test]
    #[serial]
    fn run_tool_uses_working_directory() {
        let dir = tempdir().unwrap();
        let tool = fake_tool(dir.path(), "tool", "pwd");
        let work = tempdir().unwrap();

        let output = run_tool(&tool, &[], work.path()).unwrap();
        let reported = PathBuf::from(output.stdout.trim());
        assert_eq!(
            reported.canonicalize().unwrap(),
            work.path().canonicalize().unwrap()
        );
    }

    #[test]
    #[serial]
    fn unspawnable_program_is_a_spawn_error() {
        let dir = tempdir().unwrap();
        let bogus = dir.path().join("bogus");
        fs::write(&bogus, "not a script").unwrap();

        let result = run_tool(&bogus, &[], dir.path());
        assert!(matches!(result, Err(DriverError::Spawn { .. })));
    }
}
