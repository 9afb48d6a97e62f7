//! CP12 CLI - build, validate, check, seed
//!
//! Exit codes: 0 on full success, 1 on load/parse failure, 2 on any
//! guard or validation failure. CI gates on the exit code, never on the
//! presence of artifacts — a failed build leaves the previous ones alone.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use cp12_core::{BuildPipeline, InvariantValidator, SchemaSuite, SiteManifest};

#[derive(Parser)]
#[command(name = "cp12-cli")]
#[command(about = "Trạm CP12 site compiler")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Project root containing the source tree
    #[arg(short, long, default_value = ".")]
    root: PathBuf,

    /// Site manifest path, relative to the root
    #[arg(short, long, default_value = "site.manifest.json")]
    manifest: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Assemble the artifacts, run the guards, write, lint, validate
    Build {
        /// Permit empty name/price fields while editing content locally
        #[arg(long)]
        draft: bool,
    },

    /// Re-check the architectural invariants against written artifacts
    Validate,

    /// Run the content-schema suite
    Check,

    /// Generate a stub room catalog from the static image tree
    Seed,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let manifest_path = cli.root.join(&cli.manifest);
    let manifest = match SiteManifest::load(&manifest_path) {
        Ok(manifest) => manifest,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Commands::Build { draft } => {
            println!("\nBuilding Trạm CP12...\n");
            let pipeline = BuildPipeline::new(&cli.root, manifest);
            match pipeline.build(draft) {
                Ok(report) => {
                    for artifact in &report.artifacts {
                        println!(
                            "  wrote {} ({} lines, {:.1} KB)",
                            artifact.name, artifact.lines, artifact.kilobytes
                        );
                    }
                    println!(
                        "\nBuild complete in {:.2}s ({} invariants, build {})\n",
                        report.elapsed_ms as f64 / 1000.0,
                        report.invariants_checked,
                        report.build_id
                    );
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("build failed: {e}");
                    ExitCode::from(2)
                }
            }
        }

        Commands::Validate => match InvariantValidator::new().run(&cli.root, &manifest) {
            Ok(report) => {
                println!("{}", report.render());
                if report.passed() {
                    ExitCode::SUCCESS
                } else {
                    ExitCode::from(2)
                }
            }
            Err(e) => {
                eprintln!("error: {e}");
                ExitCode::FAILURE
            }
        },

        Commands::Check => {
            let report = SchemaSuite::new().run(&cli.root, &manifest);
            println!("{}", report.render());
            if report.passed() {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(2)
            }
        }

        Commands::Seed => match cp12_core::seed::seed_catalog(&cli.root, &manifest) {
            Ok(outcome) if outcome.skipped => {
                println!(
                    "{} has been edited (at least one room has a name); skipping re-seed to protect your edits.",
                    outcome.path.display()
                );
                ExitCode::SUCCESS
            }
            Ok(outcome) => {
                println!("Seeded {} rooms -> {}", outcome.rooms, outcome.path.display());
                println!("Next: fill in name, price, desc, meta, and amenities for each room,");
                println!("review the generated alt text, then run: cp12-cli build");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("error: {e}");
                ExitCode::FAILURE
            }
        },
    }
}
