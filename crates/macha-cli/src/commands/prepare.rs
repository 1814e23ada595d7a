use crate::config::AppConfig;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use macha::workflows::prepare::{self, LigandReport};
use macha::workflows::progress::ProgressReporter;
use tracing::{info, warn};

pub fn run(config: AppConfig) -> Result<()> {
    let ligands = prepare::discover_ligands(&config.prepare, config.ligand.as_deref())?;
    if ligands.is_empty() {
        let dir = config.prepare.parent_dir.join(&config.prepare.original_dir);
        warn!("No *.{} files found in {}", config.prepare.input_ext, dir.display());
        println!("Warning: nothing to prepare in {}", dir.display());
        return Ok(());
    }

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!("Preparing {} ligand(s)...", ligands.len());
    info!("Invoking the preparation workflow for {:?}", ligands);

    let reports = prepare::run(&config.prepare, &ligands, &reporter)?;

    for report in &reports {
        print_summary(report);
    }
    Ok(())
}

fn print_summary(report: &LigandReport) {
    println!(
        "✓ {}: segments {} ({} CRD files, {} stream files)",
        report.ligand,
        report.labels.join(" "),
        report.written.len(),
        report.streams.len()
    );

    if let Some(path) = &report.atom_table {
        println!("  Atom table written to: {}", path.display());
    }
    match &report.cgenff {
        Some(output) if output.success() => println!("  CGenFF parametrization finished."),
        Some(output) => println!(
            "  CGenFF failed (exit code {:?}); see the log for details.",
            output.status_code
        ),
        None => {}
    }
    if !report.staged_toppar.is_empty() {
        println!("  Staged {} toppar file(s).", report.staged_toppar.len());
    }
    for script in &report.patched_scripts {
        println!("  Patched {}", script.display());
    }
    for charmm in &report.charmm {
        let status = if charmm.output.success() { "ok" } else { "failed" };
        println!(
            "  CHARMM {} run {}: {} HBUILD section(s), {} parameter section(s)",
            charmm.target,
            status,
            charmm.hbuild_sections.len(),
            charmm.parameter_sections.len()
        );
        for section in charmm.hbuild_sections.iter().chain(&charmm.parameter_sections) {
            info!("{} [{}]:\n{}", report.ligand, charmm.target, section);
        }
    }
}
