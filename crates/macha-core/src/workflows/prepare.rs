use super::config::{PrepareConfig, TemplateConfig};
use super::error::PrepareError;
use super::progress::{Progress, ProgressReporter};
use crate::charmm::blocks::BlockSet;
use crate::charmm::log::{HBUILD_MARKERS, PARAMETER_MARKERS, extract_sections};
use crate::charmm::patch::{PatchRule, ScriptPatcher};
use crate::charmm::stream::write_stream;
use crate::core::io::crd::CrdFile;
use crate::core::io::pdb::PdbFile;
use crate::core::io::traits::StructureFile;
use crate::core::models::structure::Structure;
use crate::drivers::cgenff::CgenffDriver;
use crate::drivers::charmm::CharmmDriver;
use crate::drivers::process::ToolOutput;
use crate::segments::classifier::{LabelSource, classify};
use crate::segments::export::{Target, export_segments};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

/// CHARMM run on one patched target script.
#[derive(Debug, Clone)]
pub struct CharmmRun {
    pub target: Target,
    pub script: PathBuf,
    pub output: ToolOutput,
    pub hbuild_sections: Vec<String>,
    pub parameter_sections: Vec<String>,
}

/// Everything produced while preparing one ligand.
#[derive(Debug, Clone)]
pub struct LigandReport {
    pub ligand: String,
    pub label_source: LabelSource,
    /// All segment labels found, solvent and ions included.
    pub labels: Vec<String>,
    /// CRD files written.
    pub written: Vec<PathBuf>,
    pub atom_table: Option<PathBuf>,
    pub streams: Vec<PathBuf>,
    pub staged_toppar: Vec<PathBuf>,
    pub patched_scripts: Vec<PathBuf>,
    pub cgenff: Option<ToolOutput>,
    pub charmm: Vec<CharmmRun>,
}

/// Resolves the ligand ids to process.
///
/// A requested id must have a structure file in the original folder.
/// Without one, every `*.{input_ext}` file there is used, sorted by name.
pub fn discover_ligands(
    config: &PrepareConfig,
    requested: Option<&str>,
) -> Result<Vec<String>, PrepareError> {
    if let Some(ligand) = requested {
        if ligand.trim().is_empty() {
            return Err(PrepareError::InvalidLigandName(ligand.to_string()));
        }
        let path = config.structure_path(ligand);
        if !path.is_file() {
            return Err(PrepareError::InputNotFound(path));
        }
        return Ok(vec![ligand.to_string()]);
    }

    let dir = config.parent_dir.join(&config.original_dir);
    let entries = fs::read_dir(&dir).map_err(PrepareError::io(&dir))?;
    let mut ligands = Vec::new();
    for entry in entries {
        let path = entry.map_err(PrepareError::io(&dir))?.path();
        // Exact match: the loader rebuilds the path from `input_ext`.
        let matches_ext = path
            .extension()
            .is_some_and(|ext| ext == config.input_ext.as_str());
        if !matches_ext || !path.is_file() {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            ligands.push(stem.to_string());
        }
    }
    ligands.sort();
    info!("Found {} ligand(s) in {}", ligands.len(), dir.display());
    Ok(ligands)
}

/// Creates `{parent}/{ligand}` with its `complex` and `waterbox` subfolders.
///
/// Existing folders are kept; a file in the way is an error.
pub fn make_folder_tree(parent: &Path, ligand: &str) -> Result<PathBuf, PrepareError> {
    let ligand_dir = parent.join(ligand);
    let dirs = std::iter::once(ligand_dir.clone())
        .chain(Target::ALL.iter().map(|t| ligand_dir.join(t.dir_name())));
    for dir in dirs {
        fs::create_dir_all(&dir).map_err(PrepareError::io(&dir))?;
    }
    debug!("Folder tree ready at {}", ligand_dir.display());
    Ok(ligand_dir)
}

fn load_structure(config: &PrepareConfig, ligand: &str) -> Result<Structure, PrepareError> {
    let path = config.structure_path(ligand);
    let structure = match config.input_ext.to_ascii_lowercase().as_str() {
        "pdb" | "ent" => {
            let (structure, metadata) =
                PdbFile::read_from_path(&path).map_err(|source| PrepareError::Pdb {
                    path: path.clone(),
                    source,
                })?;
            if metadata.skipped_altlocs > 0 {
                warn!(
                    "Skipped {} alternate-location atoms in {}",
                    metadata.skipped_altlocs,
                    path.display()
                );
            }
            structure
        }
        "crd" | "cor" => {
            CrdFile::read_from_path(&path)
                .map_err(|source| PrepareError::Crd {
                    path: path.clone(),
                    source,
                })?
                .0
        }
        other => return Err(PrepareError::UnsupportedFormat(other.to_string())),
    };
    info!(
        "Loaded {} atoms in {} residues from {}",
        structure.atom_count(),
        structure.residue_count(),
        path.display()
    );
    Ok(structure)
}

fn write_atom_table(structure: &Structure, path: &Path) -> Result<(), PrepareError> {
    let file = File::create(path).map_err(PrepareError::io(path))?;
    structure
        .write_atom_table(BufWriter::new(file))
        .map_err(|source| PrepareError::AtomTable {
            path: path.to_path_buf(),
            source,
        })
}

/// Moves the CGenFF stream and log of a ligand into `{target}/{ligand}/`.
fn stage_toppar(ligand_dir: &Path, ligand: &str) -> Result<Vec<PathBuf>, PrepareError> {
    let sources: Vec<PathBuf> = ["str", "log"]
        .iter()
        .map(|ext| ligand_dir.join(format!("{}.{}", ligand, ext)))
        .collect();
    if let Some(missing) = sources.iter().find(|p| !p.is_file()) {
        return Err(PrepareError::TopparNotFound(missing.clone()));
    }

    let mut staged = Vec::new();
    for target in Target::ALL {
        let dest_dir = ligand_dir.join(target.dir_name()).join(ligand);
        fs::create_dir_all(&dest_dir).map_err(PrepareError::io(&dest_dir))?;
        for source in &sources {
            let Some(file_name) = source.file_name() else {
                continue;
            };
            let dest = dest_dir.join(file_name);
            fs::copy(source, &dest).map_err(PrepareError::io(&dest))?;
            staged.push(dest);
        }
    }
    for source in &sources {
        fs::remove_file(source).map_err(PrepareError::io(source))?;
    }
    debug!("Staged toppar files: {:?}", staged);
    Ok(staged)
}

fn copy_template(src: &Path, dst: &Path) -> Result<usize, PrepareError> {
    fs::create_dir_all(dst).map_err(PrepareError::io(dst))?;
    let mut copied = 0;
    for entry in fs::read_dir(src).map_err(PrepareError::io(src))? {
        let path = entry.map_err(PrepareError::io(src))?.path();
        let Some(name) = path.file_name() else {
            continue;
        };
        let dest = dst.join(name);
        if path.is_dir() {
            copied += copy_template(&path, &dest)?;
        } else {
            fs::copy(&path, &dest).map_err(PrepareError::io(&dest))?;
            copied += 1;
        }
    }
    Ok(copied)
}

fn prepare_template(
    template: &TemplateConfig,
    target: Target,
    target_dir: &Path,
    blocks: &BlockSet,
    charmm: &CharmmDriver,
    report: &mut LigandReport,
) -> Result<(), PrepareError> {
    let copied = copy_template(&template.dir, target_dir)?;
    debug!("Copied {} template files into {}", copied, target_dir.display());

    let script = target_dir.join(&template.input_script);
    let rule = PatchRule::new(template.marker.as_str(), blocks.concatenated(), template.mode);
    ScriptPatcher::apply(&script, &[rule])?;
    report.patched_scripts.push(script.clone());

    if !template.run {
        return Ok(());
    }
    if let Some(output) = charmm.run(&script)? {
        let (hbuild_start, hbuild_end) = HBUILD_MARKERS;
        let (par_start, par_end) = PARAMETER_MARKERS;
        report.charmm.push(CharmmRun {
            target,
            script,
            hbuild_sections: extract_sections(&output.stdout, hbuild_start, hbuild_end),
            parameter_sections: extract_sections(&output.stdout, par_start, par_end),
            output,
        });
    }
    Ok(())
}

/// Prepares the complex and waterbox inputs of one ligand.
///
/// Steps run in order and the first failure aborts the ligand; files
/// already written stay on disk.
#[instrument(skip_all, name = "prepare_ligand", fields(ligand = %ligand))]
pub fn prepare_ligand(
    config: &PrepareConfig,
    ligand: &str,
    reporter: &ProgressReporter,
) -> Result<LigandReport, PrepareError> {
    reporter.report(Progress::LigandStart {
        ligand: ligand.to_string(),
    });
    info!("Processing ligand {}", ligand);

    let ligand_dir =
        reporter.step("Folder tree", || make_folder_tree(&config.parent_dir, ligand))?;

    let (structure, segmentation) = reporter.step("Classify", || {
        let structure = load_structure(config, ligand)?;
        let segmentation = classify(&structure, &config.residue_names)?;
        Ok::<_, PrepareError>((structure, segmentation))
    })?;
    if segmentation.heteroatom_labels().is_empty() {
        warn!("No heteroatom segment found for {}; the waterbox will be empty", ligand);
    }

    let mut report = LigandReport {
        ligand: ligand.to_string(),
        label_source: segmentation.source(),
        labels: segmentation.labels().iter().map(|l| l.to_string()).collect(),
        written: Vec::new(),
        atom_table: None,
        streams: Vec::new(),
        staged_toppar: Vec::new(),
        patched_scripts: Vec::new(),
        cgenff: None,
        charmm: Vec::new(),
    };

    reporter.step("Export", || {
        report.written = export_segments(&structure, &segmentation, &ligand_dir)?.written;
        if config.atom_table {
            let path = ligand_dir.join(format!("{}_atoms.csv", ligand));
            write_atom_table(&structure, &path)?;
            report.atom_table = Some(path);
        }
        Ok::<_, PrepareError>(())
    })?;

    if config.cgenff.enabled {
        report.cgenff = reporter.step("CGenFF", || {
            CgenffDriver::new(config.cgenff.executable.as_deref()).run(
                &config.parent_dir,
                &config.ligand_file(ligand),
                ligand,
            )
        })?;
    }

    if config.stage_toppar {
        report.staged_toppar = reporter.step("Stage toppar", || stage_toppar(&ligand_dir, ligand))?;
    }

    let block_sets: Vec<(Target, BlockSet)> = Target::ALL
        .iter()
        .map(|&t| (t, BlockSet::for_target(&structure, &segmentation, t)))
        .collect();

    reporter.step("Stream", || {
        for (target, blocks) in &block_sets {
            let dir = ligand_dir.join(target.dir_name());
            let path = write_stream(&dir, &config.stream_name, blocks.blocks())
                .map_err(PrepareError::io(&dir))?;
            report.streams.push(path);
        }
        Ok::<_, PrepareError>(())
    })?;

    if let Some(template) = &config.template {
        let charmm = CharmmDriver::new(template.executable.as_deref());
        reporter.step("CHARMM", || {
            for (target, blocks) in &block_sets {
                let target_dir = ligand_dir.join(target.dir_name());
                prepare_template(template, *target, &target_dir, blocks, &charmm, &mut report)?;
            }
            Ok::<_, PrepareError>(())
        })?;
    }

    reporter.report(Progress::LigandFinish);
    info!(
        "Ligand {} prepared: segments {:?}, {} CRD files",
        ligand,
        report.labels,
        report.written.len()
    );
    Ok(report)
}

/// Prepares every ligand in turn. The first error stops the run; ligands
/// already prepared are left as they are.
#[instrument(skip_all, name = "prepare_workflow")]
pub fn run(
    config: &PrepareConfig,
    ligands: &[String],
    reporter: &ProgressReporter,
) -> Result<Vec<LigandReport>, PrepareError> {
    reporter.report(Progress::TaskStart {
        total_steps: ligands.len() as u64,
    });
    let mut reports = Vec::with_capacity(ligands.len());
    for ligand in ligands {
        reports.push(prepare_ligand(config, ligand, reporter)?);
        reporter.report(Progress::TaskIncrement);
    }
    reporter.report(Progress::TaskFinish);
    Ok(reports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::config::PrepareConfigBuilder;
    use std::sync::Mutex;
    use tempfile::{TempDir, tempdir};

    const COMPLEX_PDB: &str = "\
REMARK   1 CREATED BY A VIEWER
ATOM      1  N   GLY A   1      11.104   6.134  -6.504  1.00  0.00           N
ATOM      2  CA  GLY A   1      11.639   6.071  -5.147  1.00  0.00           C
ATOM      3  N   ALA A   2      12.000   7.000  -4.000  1.00  0.00           N
TER
HETATM    4  C1  LIG B 900       1.000   2.000   3.000  1.00  0.00           C
HETATM    5  H1  LIG B 900       1.500   2.500   3.500  1.00  0.00           H
HETATM    6  OH2 TIP3W   1       5.000   5.000   5.000  1.00  0.00           O
END
";

    fn workspace(ligands: &[&str]) -> TempDir {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("original")).unwrap();
        fs::create_dir_all(dir.path().join("ligands")).unwrap();
        for ligand in ligands {
            fs::write(dir.path().join(format!("original/{}.pdb", ligand)), COMPLEX_PDB).unwrap();
        }
        dir
    }

    fn config_for(dir: &Path) -> PrepareConfigBuilder {
        PrepareConfigBuilder::new()
            .parent_dir(dir)
            .original_dir("original")
            .ligands_dir("ligands")
            .input_ext("pdb")
            .ligand_ext("mol2")
    }

    #[test]
    fn discovers_ligands_sorted_by_name() {
        let dir = workspace(&["lig2", "lig1"]);
        fs::write(dir.path().join("original/notes.txt"), "").unwrap();
        let config = config_for(dir.path()).build().unwrap();

        assert_eq!(discover_ligands(&config, None).unwrap(), vec!["lig1", "lig2"]);
    }

    #[test]
    fn requested_ligand_must_exist() {
        let dir = workspace(&["lig1"]);
        let config = config_for(dir.path()).build().unwrap();

        assert_eq!(discover_ligands(&config, Some("lig1")).unwrap(), vec!["lig1"]);
        assert!(matches!(
            discover_ligands(&config, Some("lig9")),
            Err(PrepareError::InputNotFound(_))
        ));
        assert!(matches!(
            discover_ligands(&config, Some("")),
            Err(PrepareError::InvalidLigandName(_))
        ));
    }

    #[test]
    fn folder_tree_is_idempotent() {
        let dir = tempdir().unwrap();
        make_folder_tree(dir.path(), "lig1").unwrap();
        let ligand_dir = make_folder_tree(dir.path(), "lig1").unwrap();

        assert!(ligand_dir.join("complex").is_dir());
        assert!(ligand_dir.join("waterbox").is_dir());
    }

    #[test]
    fn folder_tree_fails_when_a_file_is_in_the_way() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("lig1")).unwrap();
        fs::write(dir.path().join("lig1/complex"), "").unwrap();

        assert!(matches!(
            make_folder_tree(dir.path(), "lig1"),
            Err(PrepareError::Io { .. })
        ));
    }

    #[test]
    fn prepares_crd_files_and_streams() {
        let dir = workspace(&["lig1"]);
        let config = config_for(dir.path()).atom_table(true).build().unwrap();

        let report = prepare_ligand(&config, "lig1", &ProgressReporter::new()).unwrap();

        assert_eq!(report.label_source, LabelSource::ChainLabelled);
        assert_eq!(report.labels, vec!["PROA", "HETA", "SOLV"]);
        let ligand_dir = dir.path().join("lig1");
        assert!(ligand_dir.join("complex/proa.crd").is_file());
        assert!(ligand_dir.join("complex/heta.crd").is_file());
        assert!(ligand_dir.join("waterbox/heta.crd").is_file());
        assert!(!ligand_dir.join("complex/solv.crd").exists());

        let complex = fs::read_to_string(ligand_dir.join("complex/macha.str")).unwrap();
        assert!(complex.contains("generate PROA setup warn first NTER last CTER"));
        assert!(complex.contains("generate HETA setup warn first none last none"));
        assert!(complex.contains("(segid HETA) end"));
        let waterbox = fs::read_to_string(ligand_dir.join("waterbox/macha.str")).unwrap();
        assert!(!waterbox.contains("! PROTEIN:"));

        let table = fs::read_to_string(ligand_dir.join("lig1_atoms.csv")).unwrap();
        assert_eq!(table.lines().count(), 7);
        assert_eq!(report.atom_table, Some(ligand_dir.join("lig1_atoms.csv")));
    }

    #[test]
    fn reports_progress_per_step() {
        let dir = workspace(&["lig1"]);
        let config = config_for(dir.path()).build().unwrap();
        let events = Mutex::new(Vec::new());
        let reporter =
            ProgressReporter::with_callback(Box::new(|e| events.lock().unwrap().push(e)));

        run(&config, &["lig1".to_string()], &reporter).unwrap();
        drop(reporter);

        let events = events.into_inner().unwrap();
        assert_eq!(events.first(), Some(&Progress::TaskStart { total_steps: 1 }));
        assert_eq!(events.last(), Some(&Progress::TaskFinish));
        assert!(events.contains(&Progress::LigandStart {
            ligand: "lig1".to_string()
        }));
        assert!(events.contains(&Progress::StepStart { name: "Export" }));
    }

    #[test]
    fn staging_requires_cgenff_output() {
        let dir = workspace(&["lig1"]);
        let config = config_for(dir.path()).stage_toppar(true).build().unwrap();

        let result = prepare_ligand(&config, "lig1", &ProgressReporter::new());
        assert!(matches!(result, Err(PrepareError::TopparNotFound(_))));
    }

    #[test]
    fn staging_moves_stream_and_log_into_targets() {
        let dir = workspace(&["lig1"]);
        fs::create_dir_all(dir.path().join("lig1")).unwrap();
        fs::write(dir.path().join("lig1/lig1.str"), "* toppar\n").unwrap();
        fs::write(dir.path().join("lig1/lig1.log"), "").unwrap();
        let config = config_for(dir.path()).stage_toppar(true).build().unwrap();

        let report = prepare_ligand(&config, "lig1", &ProgressReporter::new()).unwrap();

        assert_eq!(report.staged_toppar.len(), 4);
        assert!(dir.path().join("lig1/complex/lig1/lig1.str").is_file());
        assert!(dir.path().join("lig1/waterbox/lig1/lig1.log").is_file());
        assert!(!dir.path().join("lig1/lig1.str").exists());
    }

    fn write_template(dir: &Path) -> PathBuf {
        let template = dir.join("templates");
        fs::create_dir_all(template.join("toppar")).unwrap();
        fs::write(
            template.join("step1.inp"),
            "* build\nstream toppar.str\nstop\n",
        )
        .unwrap();
        fs::write(template.join("toppar/top_all36_prot.rtf"), "").unwrap();
        template
    }

    #[test]
    fn templates_are_copied_and_patched_idempotently() {
        let dir = workspace(&["lig1"]);
        let template = write_template(dir.path());
        let config = config_for(dir.path())
            .template_dir(&template)
            .input_script("step1.inp")
            .build()
            .unwrap();

        prepare_ligand(&config, "lig1", &ProgressReporter::new()).unwrap();
        let script = dir.path().join("lig1/complex/step1.inp");
        let first = fs::read_to_string(&script).unwrap();
        prepare_ligand(&config, "lig1", &ProgressReporter::new()).unwrap();
        let second = fs::read_to_string(&script).unwrap();

        assert_eq!(first, second);
        assert!(first.starts_with("* build\nstream toppar.str\n\n!---"));
        assert!(first.contains("generate PROA"));
        assert!(first.ends_with("stop\n"));
        assert!(dir.path().join("lig1/complex/step1.inp.premod").is_file());
        assert!(dir.path().join("lig1/waterbox/toppar/top_all36_prot.rtf").is_file());
    }

    #[test]
    fn run_stops_at_first_failing_ligand() {
        let dir = workspace(&["good"]);
        let config = config_for(dir.path()).build().unwrap();
        let ligands = vec!["good".to_string(), "missing".to_string()];

        let result = run(&config, &ligands, &ProgressReporter::new());

        assert!(matches!(result, Err(PrepareError::Pdb { .. })));
        assert!(dir.path().join("good/complex/proa.crd").is_file());
    }

    #[test]
    fn discovery_skips_extensions_differing_in_case() {
        let dir = workspace(&["lig1"]);
        fs::write(dir.path().join("original/LIG2.PDB"), COMPLEX_PDB).unwrap();
        let config = config_for(dir.path()).build().unwrap();

        let ligands = discover_ligands(&config, None).unwrap();
        assert_eq!(ligands, vec!["lig1"]);
        assert!(run(&config, &ligands, &ProgressReporter::new()).is_ok());
    }

    #[test]
    fn segment_labelled_crd_input_keeps_its_segids() {
        let dir = workspace(&[]);
        let crd = "\
* SEGMENT-LABELLED SYSTEM
*
    3  EXT
         1         1  ALA       CA              0.0000000000        0.0000000000        0.0000000000  PROA      1               0.0000000000
         2         2  LIG       C1              1.0000000000        1.0000000000        1.0000000000  HETA      1               0.0000000000
         3         3  TIP3      OH2             2.0000000000        2.0000000000        2.0000000000  SOLV      1               0.0000000000
";
        fs::write(dir.path().join("original/sys.crd"), crd).unwrap();
        let config = config_for(dir.path()).input_ext("crd").build().unwrap();

        let report = prepare_ligand(&config, "sys", &ProgressReporter::new()).unwrap();

        assert_eq!(report.label_source, LabelSource::SegmentLabelled);
        assert_eq!(report.labels, vec!["PROA", "HETA", "SOLV"]);
        let complex = dir.path().join("sys/complex");
        assert!(complex.join("proa.crd").is_file());
        assert!(complex.join("heta.crd").is_file());
        assert!(!complex.join("solv.crd").exists());
        assert!(!complex.join("proproa.crd").exists());
        assert!(dir.path().join("sys/waterbox/heta.crd").is_file());
    }

    #[test]
    fn unsupported_input_extension_is_rejected() {
        let dir = workspace(&[]);
        fs::write(dir.path().join("original/lig1.xyz"), "").unwrap();
        let config = config_for(dir.path()).input_ext("xyz").build().unwrap();

        assert!(matches!(
            prepare_ligand(&config, "lig1", &ProgressReporter::new()),
            Err(PrepareError::UnsupportedFormat(_))
        ));
    }

    #[cfg(unix)]
    mod external_tools {
        use super::*;
        use crate::drivers::process::test_support::fake_tool;
        use serial_test::serial;

        #[test]
        #[serial]
        fn cgenff_output_is_staged() {
            let dir = workspace(&["lig1"]);
            fs::write(dir.path().join("ligands/lig1.mol2"), "@<TRIPOS>MOLECULE\n").unwrap();
            let bin = tempdir().unwrap();
            let cgenff = fake_tool(
                bin.path(),
                "cgenff",
                "test -f \"$1\" || exit 1\necho '* toppar' > \"$4\"\necho 'log' > \"$6\"",
            );
            let config = config_for(dir.path())
                .cgenff(true, Some(cgenff))
                .stage_toppar(true)
                .build()
                .unwrap();

            let report = prepare_ligand(&config, "lig1", &ProgressReporter::new()).unwrap();

            assert!(report.cgenff.as_ref().unwrap().success());
            assert!(dir.path().join("lig1/complex/lig1/lig1.str").is_file());
        }

        #[test]
        #[serial]
        fn charmm_sections_are_extracted() {
            let dir = workspace(&["lig1"]);
            let template = write_template(dir.path());
            let bin = tempdir().unwrap();
            let charmm = fake_tool(
                bin.path(),
                "charmm",
                "echo START_HBUILD\necho 'placed 0 hydrogens'\necho END_HBUILD\n\
                 echo START_PAR\necho 'BOND CG2R61 CG2R61'\necho END_PAR",
            );
            let config = config_for(dir.path())
                .template_dir(&template)
                .input_script("step1.inp")
                .run_charmm(true, Some(charmm))
                .build()
                .unwrap();

            let report = prepare_ligand(&config, "lig1", &ProgressReporter::new()).unwrap();

            assert_eq!(report.charmm.len(), 2);
            let complex = &report.charmm[0];
            assert_eq!(complex.target, Target::Complex);
            assert_eq!(complex.hbuild_sections, vec!["placed 0 hydrogens"]);
            assert_eq!(complex.parameter_sections, vec!["BOND CG2R61 CG2R61"]);
            assert!(dir.path().join("lig1/complex/step1.out").is_file());
        }
    }
}
