use crate::charmm::patch::InsertMode;
use crate::segments::names::ResidueNames;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
}

pub const DEFAULT_STREAM_NAME: &str = "macha";
pub const DEFAULT_MARKER: &str = "stream toppar.str";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CgenffConfig {
    pub enabled: bool,
    /// Explicit binary; `PATH` is searched when unset or not executable.
    pub executable: Option<PathBuf>,
}

/// CHARMM input templates copied into, and patched for, every target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateConfig {
    pub dir: PathBuf,
    /// Script (relative to the template folder) that receives the blocks.
    pub input_script: PathBuf,
    /// Line substring after (or before, or instead of) which blocks go.
    pub marker: String,
    pub mode: InsertMode,
    pub run: bool,
    pub executable: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrepareConfig {
    /// Root below which `original_dir`, `ligands_dir` and every ligand
    /// folder live.
    pub parent_dir: PathBuf,
    pub original_dir: PathBuf,
    pub ligands_dir: PathBuf,
    /// Extension of the combined structure files (`pdb` or `crd`).
    pub input_ext: String,
    /// Extension of the ligand files handed to CGenFF.
    pub ligand_ext: String,
    pub atom_table: bool,
    pub stream_name: String,
    pub stage_toppar: bool,
    pub residue_names: ResidueNames,
    pub cgenff: CgenffConfig,
    pub template: Option<TemplateConfig>,
}

impl PrepareConfig {
    pub fn structure_path(&self, ligand: &str) -> PathBuf {
        self.parent_dir
            .join(&self.original_dir)
            .join(format!("{}.{}", ligand, self.input_ext))
    }

    /// Ligand file path relative to `parent_dir`, as passed to CGenFF.
    pub fn ligand_file(&self, ligand: &str) -> PathBuf {
        self.ligands_dir
            .join(format!("{}.{}", ligand, self.ligand_ext))
    }

    pub fn ligand_dir(&self, ligand: &str) -> PathBuf {
        self.parent_dir.join(ligand)
    }
}

#[derive(Default)]
pub struct PrepareConfigBuilder {
    parent_dir: Option<PathBuf>,
    original_dir: Option<PathBuf>,
    ligands_dir: Option<PathBuf>,
    input_ext: Option<String>,
    ligand_ext: Option<String>,
    atom_table: bool,
    stream_name: Option<String>,
    stage_toppar: bool,
    residue_names: ResidueNames,
    cgenff_enabled: bool,
    cgenff_executable: Option<PathBuf>,
    template_dir: Option<PathBuf>,
    input_script: Option<PathBuf>,
    marker: Option<String>,
    insert_mode: InsertMode,
    run_charmm: bool,
    charmm_executable: Option<PathBuf>,
}

impl PrepareConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parent_dir(mut self, path: impl AsRef<Path>) -> Self {
        self.parent_dir = Some(path.as_ref().to_path_buf());
        self
    }
    pub fn original_dir(mut self, path: impl AsRef<Path>) -> Self {
        self.original_dir = Some(path.as_ref().to_path_buf());
        self
    }
    pub fn ligands_dir(mut self, path: impl AsRef<Path>) -> Self {
        self.ligands_dir = Some(path.as_ref().to_path_buf());
        self
    }
    pub fn input_ext(mut self, ext: &str) -> Self {
        self.input_ext = Some(ext.trim_start_matches('.').to_string());
        self
    }
    pub fn ligand_ext(mut self, ext: &str) -> Self {
        self.ligand_ext = Some(ext.trim_start_matches('.').to_string());
        self
    }
    pub fn atom_table(mut self, enabled: bool) -> Self {
        self.atom_table = enabled;
        self
    }
    pub fn stream_name(mut self, name: &str) -> Self {
        self.stream_name = Some(name.to_string());
        self
    }
    pub fn stage_toppar(mut self, enabled: bool) -> Self {
        self.stage_toppar = enabled;
        self
    }
    pub fn residue_names(mut self, names: ResidueNames) -> Self {
        self.residue_names = names;
        self
    }
    pub fn cgenff(mut self, enabled: bool, executable: Option<PathBuf>) -> Self {
        self.cgenff_enabled = enabled;
        self.cgenff_executable = executable;
        self
    }
    pub fn template_dir(mut self, path: impl AsRef<Path>) -> Self {
        self.template_dir = Some(path.as_ref().to_path_buf());
        self
    }
    pub fn input_script(mut self, path: impl AsRef<Path>) -> Self {
        self.input_script = Some(path.as_ref().to_path_buf());
        self
    }
    pub fn marker(mut self, marker: &str) -> Self {
        self.marker = Some(marker.to_string());
        self
    }
    pub fn insert_mode(mut self, mode: InsertMode) -> Self {
        self.insert_mode = mode;
        self
    }
    pub fn run_charmm(mut self, enabled: bool, executable: Option<PathBuf>) -> Self {
        self.run_charmm = enabled;
        self.charmm_executable = executable;
        self
    }

    pub fn build(self) -> Result<PrepareConfig, ConfigError> {
        let template = match self.template_dir {
            Some(dir) => Some(TemplateConfig {
                dir,
                input_script: self
                    .input_script
                    .ok_or(ConfigError::MissingParameter("input_script"))?,
                marker: self.marker.unwrap_or_else(|| DEFAULT_MARKER.to_string()),
                mode: self.insert_mode,
                run: self.run_charmm,
                executable: self.charmm_executable,
            }),
            None => None,
        };

        Ok(PrepareConfig {
            parent_dir: self
                .parent_dir
                .ok_or(ConfigError::MissingParameter("parent_dir"))?,
            original_dir: self
                .original_dir
                .ok_or(ConfigError::MissingParameter("original_dir"))?,
            ligands_dir: self
                .ligands_dir
                .ok_or(ConfigError::MissingParameter("ligands_dir"))?,
            input_ext: self
                .input_ext
                .ok_or(ConfigError::MissingParameter("input_ext"))?,
            ligand_ext: self
                .ligand_ext
                .ok_or(ConfigError::MissingParameter("ligand_ext"))?,
            atom_table: self.atom_table,
            stream_name: self
                .stream_name
                .unwrap_or_else(|| DEFAULT_STREAM_NAME.to_string()),
            stage_toppar: self.stage_toppar,
            residue_names: self.residue_names,
            cgenff: CgenffConfig {
                enabled: self.cgenff_enabled,
                executable: self.cgenff_executable,
            },
            template,
        })
    }
}
