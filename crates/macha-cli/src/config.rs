use crate::cli::Cli;
use crate::error::{CliError, Result};
use macha::charmm::patch::InsertMode;
use macha::segments::names::ResidueNames;
use macha::workflows::config::{PrepareConfig, PrepareConfigBuilder};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

const DEFAULT_PARENT_DIR: &str = ".";
const DEFAULT_ORIGINAL_DIR: &str = "original";
const DEFAULT_LIGANDS_DIR: &str = "ligands";
const DEFAULT_INPUT_EXT: &str = "pdb";
const DEFAULT_LIGAND_EXT: &str = "mol2";
const DEFAULT_INPUT_SCRIPT: &str = "step1_pdbreader.inp";

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialCgenffConfig {
    enabled: Option<bool>,
    path: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialTopparConfig {
    stage: Option<bool>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialCharmmConfig {
    template_dir: Option<PathBuf>,
    input_script: Option<PathBuf>,
    marker: Option<String>,
    insert_mode: Option<String>,
    stream_name: Option<String>,
    run: Option<bool>,
    executable: Option<PathBuf>,
}

/// Configuration as read from a TOML file; every field may be left out.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct PartialMachaConfig {
    parent_dir: Option<PathBuf>,
    original_dir: Option<PathBuf>,
    ligands_dir: Option<PathBuf>,
    input_ext: Option<String>,
    ligand_ext: Option<String>,
    atom_table: Option<bool>,
    residue_names: Option<PathBuf>,
    cgenff: Option<PartialCgenffConfig>,
    toppar: Option<PartialTopparConfig>,
    charmm: Option<PartialCharmmConfig>,
}

impl PartialMachaConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// Loads the file named by `--config`, or starts from an empty
    /// configuration.
    pub fn load(args: &Cli) -> Result<Self> {
        match &args.config {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn merge_with_cli(mut self, args: &Cli) -> Result<PrepareConfig> {
        self.apply_set_values(&args.set_values)?;

        let cgenff = self.cgenff.take().unwrap_or_default();
        let toppar = self.toppar.take().unwrap_or_default();
        let charmm = self.charmm.take().unwrap_or_default();

        let parent_dir = args
            .parent_dir
            .clone()
            .or(self.parent_dir)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PARENT_DIR));

        let cgenff_enabled = if args.no_cgenff {
            false
        } else {
            args.cgenff.is_some() || cgenff.enabled.unwrap_or(true)
        };
        let cgenff_executable = args.cgenff.clone().or(cgenff.path);

        let residue_names = match &self.residue_names {
            Some(path) => ResidueNames::load(path).map_err(|e| CliError::FileParsing {
                path: path.clone(),
                source: e.into(),
            })?,
            None => ResidueNames::new(),
        };

        let mut builder = PrepareConfigBuilder::new()
            .parent_dir(parent_dir)
            .original_dir(
                self.original_dir
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_ORIGINAL_DIR)),
            )
            .ligands_dir(
                self.ligands_dir
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_LIGANDS_DIR)),
            )
            .input_ext(self.input_ext.as_deref().unwrap_or(DEFAULT_INPUT_EXT))
            .ligand_ext(self.ligand_ext.as_deref().unwrap_or(DEFAULT_LIGAND_EXT))
            .atom_table(args.atom_table || self.atom_table.unwrap_or(false))
            .stage_toppar(toppar.stage.unwrap_or(false))
            .residue_names(residue_names)
            .cgenff(cgenff_enabled, cgenff_executable);

        if let Some(name) = &charmm.stream_name {
            builder = builder.stream_name(name);
        }

        if let Some(dir) = charmm.template_dir {
            let mode = match &charmm.insert_mode {
                Some(mode) => {
                    InsertMode::from_str(mode).map_err(|e| CliError::Config(e.to_string()))?
                }
                None => InsertMode::default(),
            };
            builder = builder
                .template_dir(dir)
                .input_script(
                    charmm
                        .input_script
                        .unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT_SCRIPT)),
                )
                .insert_mode(mode)
                .run_charmm(charmm.run.unwrap_or(false), charmm.executable);
            if let Some(marker) = &charmm.marker {
                builder = builder.marker(marker);
            }
        }

        builder.build().map_err(|e| CliError::Config(e.to_string()))
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let Some((key, value)) = kv_pair.split_once('=') else {
                return Err(CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                )));
            };

            match key {
                "parent-dir" => self.parent_dir = Some(PathBuf::from(value)),
                "original-dir" => self.original_dir = Some(PathBuf::from(value)),
                "ligands-dir" => self.ligands_dir = Some(PathBuf::from(value)),
                "input-ext" => self.input_ext = Some(value.to_string()),
                "ligand-ext" => self.ligand_ext = Some(value.to_string()),
                "atom-table" => self.atom_table = Some(parse_bool(key, value)?),
                "residue-names" => self.residue_names = Some(PathBuf::from(value)),
                "cgenff.enabled" => {
                    self.cgenff.get_or_insert_with(Default::default).enabled =
                        Some(parse_bool(key, value)?);
                }
                "cgenff.path" => {
                    self.cgenff.get_or_insert_with(Default::default).path =
                        Some(PathBuf::from(value));
                }
                "toppar.stage" => {
                    self.toppar.get_or_insert_with(Default::default).stage =
                        Some(parse_bool(key, value)?);
                }
                "charmm.template-dir" => {
                    self.charmm.get_or_insert_with(Default::default).template_dir =
                        Some(PathBuf::from(value));
                }
                "charmm.input-script" => {
                    self.charmm.get_or_insert_with(Default::default).input_script =
                        Some(PathBuf::from(value));
                }
                "charmm.marker" => {
                    self.charmm.get_or_insert_with(Default::default).marker =
                        Some(value.to_string());
                }
                "charmm.insert-mode" => {
                    self.charmm.get_or_insert_with(Default::default).insert_mode =
                        Some(value.to_string());
                }
                "charmm.stream-name" => {
                    self.charmm.get_or_insert_with(Default::default).stream_name =
                        Some(value.to_string());
                }
                "charmm.run" => {
                    self.charmm.get_or_insert_with(Default::default).run =
                        Some(parse_bool(key, value)?);
                }
                "charmm.executable" => {
                    self.charmm.get_or_insert_with(Default::default).executable =
                        Some(PathBuf::from(value));
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    value
        .trim()
        .parse()
        .map_err(|_| CliError::Config(format!("Invalid boolean value for {}: {}", key, value)))
}

/// Fully merged settings for one invocation.
#[derive(Debug)]
pub struct AppConfig {
    pub ligand: Option<String>,
    pub prepare: PrepareConfig,
}

pub fn build_config(args: &Cli) -> Result<AppConfig> {
    let prepare = PartialMachaConfig::load(args)?.merge_with_cli(args)?;
    Ok(AppConfig {
        ligand: args.ligand.clone(),
        prepare,
    })
}
