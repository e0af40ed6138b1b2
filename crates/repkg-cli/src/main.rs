//! CLI entry point for the repkg namespace migration tool.
//!
//! This binary drives the full pipeline: parse the Java corpus, rewrite
//! namespace references per a JSON recipe, and inject Maven dependencies
//! whose usage gates match the rewritten corpus.
//!
//! # Usage
//!
//! ```bash
//! repkg [OPTIONS] <COMMAND>
//!
//! # Rewrite sources and edit the manifest in place
//! repkg run --recipe jakarta.json --source-root ./src/main/java
//!
//! # Dry-run; exit code 1 means changes are pending
//! repkg check --recipe jakarta.json
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

use std::io::Write;
use std::process::ExitCode;

use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use repkg_core::RecipeConfig;
use repkg_engine::{ManifestOutcome, MigrationEngine, RunReport};
use tracing::{debug, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// =============================================================================
// CLI ARGUMENT TYPES
// =============================================================================

/// Renames type namespaces across a Java corpus and keeps the Maven
/// manifest in step.
///
/// The recipe file describes the rename (old prefix, new prefix) and any
/// dependency rules. Source roots and the manifest path may be set in the
/// recipe or overridden here.
#[derive(Parser)]
#[command(name = "repkg", version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    command: Commands,

    /// Path to the JSON recipe file.
    ///
    /// Defaults to `./repkg.json` if not specified.
    #[arg(short, long, global = true, env = "REPKG_RECIPE")]
    recipe: Option<Utf8PathBuf>,

    /// Source root(s) to scan for `.java` documents.
    ///
    /// May be given more than once. Overrides the recipe's `source-roots`
    /// list; when neither is set, the current directory is scanned.
    #[arg(short, long, global = true, env = "REPKG_SOURCE_ROOT")]
    source_root: Vec<Utf8PathBuf>,

    /// Path to the `pom.xml` to edit.
    ///
    /// Overrides the recipe's `manifest` entry.
    #[arg(short, long, global = true, env = "REPKG_MANIFEST")]
    manifest: Option<Utf8PathBuf>,

    /// Enable verbose logging (debug level).
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Apply the recipe and write changed files back in place.
    ///
    /// Each changed document and the edited manifest are replaced
    /// atomically. Exits 1 when any document or the manifest could not
    /// be processed.
    Run {
        /// Rewrite sources but leave the manifest untouched.
        #[arg(long)]
        no_manifest: bool,
    },

    /// Report what would change without writing anything.
    ///
    /// Exits 0 when the corpus is already migrated, 1 when changes are
    /// pending, and 2 when any document or the manifest could not be
    /// processed.
    Check {
        /// List every document that would change.
        #[arg(short, long)]
        detailed: bool,
    },
}

// =============================================================================
// INITIALIZATION FUNCTIONS
// =============================================================================

/// Initializes the tracing subscriber for logging.
///
/// Respects the `RUST_LOG` environment variable if set. Otherwise, uses
/// `debug` level if `--verbose` is set, or `info` level by default. The
/// `ignore` walker is filtered to `warn` level.
fn init_tracing(verbose: bool, no_color: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if verbose { "debug" } else { "info" };
        EnvFilter::new(format!("{level},ignore=warn"))
    });

    // Colors are off when either the flag or the NO_COLOR convention says so
    let use_ansi = !no_color && std::env::var("NO_COLOR").is_err();

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_ansi(use_ansi))
        .with(filter)
        .init();
}

/// Builds a [`RecipeConfig`] from the recipe file and CLI overrides.
///
/// # Errors
///
/// Returns an error if the recipe file is missing or invalid, or if any
/// configured source root or manifest path does not exist.
fn build_recipe(cli: &Cli) -> color_eyre::Result<RecipeConfig> {
    let path = cli
        .recipe
        .clone()
        .unwrap_or_else(|| Utf8PathBuf::from("./repkg.json"));

    if !path.exists() {
        return Err(color_eyre::eyre::eyre!("Recipe file does not exist: {path}"));
    }

    let mut recipe = RecipeConfig::load(&path)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to load recipe {path}: {e}"))?;

    if !cli.source_root.is_empty() {
        recipe.source_roots.clone_from(&cli.source_root);
    }
    if recipe.source_roots.is_empty() {
        recipe.source_roots.push(Utf8PathBuf::from("."));
    }
    if let Some(manifest) = &cli.manifest {
        recipe.manifest = Some(manifest.clone());
    }

    for root in &recipe.source_roots {
        validate_dir(root, "Source root")?;
    }
    if let Some(manifest) = &recipe.manifest {
        if !manifest.exists() {
            return Err(color_eyre::eyre::eyre!("Manifest does not exist: {manifest}"));
        }
    }

    Ok(recipe)
}

fn validate_dir(path: &Utf8PathBuf, label: &str) -> color_eyre::Result<()> {
    if !path.exists() {
        return Err(color_eyre::eyre::eyre!("{label} does not exist: {path}"));
    }
    if !path.is_dir() {
        return Err(color_eyre::eyre::eyre!("{label} is not a directory: {path}"));
    }
    Ok(())
}

// =============================================================================
// COMMAND IMPLEMENTATIONS
// =============================================================================

/// Applies the recipe and writes every changed file back in place.
///
/// # Errors
///
/// Returns an error if the recipe is invalid, corpus discovery fails, or a
/// rewritten file cannot be written back.
fn run_apply(recipe: RecipeConfig) -> color_eyre::Result<ExitCode> {
    info!(
        old = %recipe.old_namespace_prefix,
        new = %recipe.new_namespace_prefix,
        "Applying recipe"
    );

    let engine = MigrationEngine::new(recipe)?;
    let report = engine.run()?;

    let mut written = 0usize;
    for pair in report.changed_documents() {
        write_atomic(pair.path(), &pair.rewritten.print())?;
        debug!(path = %pair.path(), "Rewrote document");
        written += 1;
    }

    if let Some(ManifestOutcome::Edited { manifest, .. }) = &report.manifest {
        if manifest.is_changed() {
            write_atomic(manifest.path(), manifest.text())?;
            debug!(path = %manifest.path(), "Updated manifest");
            written += 1;
        }
    }

    print_run_summary(&report, written);
    print_failures(&report);

    if report.has_failures() {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

/// Runs the pipeline without writing anything and reports pending changes.
///
/// # Errors
///
/// Returns an error if the recipe is invalid or corpus discovery fails.
fn run_check(recipe: RecipeConfig, detailed: bool) -> color_eyre::Result<ExitCode> {
    info!(
        old = %recipe.old_namespace_prefix,
        new = %recipe.new_namespace_prefix,
        "Checking recipe"
    );

    let engine = MigrationEngine::new(recipe)?;
    let report = engine.run()?;

    print_check_summary(&report, detailed);
    print_failures(&report);

    if report.has_failures() {
        return Ok(ExitCode::from(2));
    }
    if report.has_changes() {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

// =============================================================================
// ATOMIC WRITE-BACK
// =============================================================================

/// Replaces `path` with `content` via a temporary file and rename.
///
/// The temporary file is staged in the target's directory so the final
/// rename never crosses a filesystem boundary. When the target already
/// exists its permissions are carried over.
fn write_atomic(path: &Utf8Path, content: &str) -> color_eyre::Result<()> {
    let parent = match path.parent() {
        Some(dir) if !dir.as_str().is_empty() => dir,
        _ => Utf8Path::new("."),
    };

    let mut file = tempfile::NamedTempFile::new_in(parent.as_std_path())
        .map_err(|e| color_eyre::eyre::eyre!("Failed to stage write for {path}: {e}"))?;
    file.write_all(content.as_bytes())
        .map_err(|e| color_eyre::eyre::eyre!("Failed to stage write for {path}: {e}"))?;

    if let Ok(metadata) = std::fs::metadata(path.as_std_path()) {
        let _ = file.as_file().set_permissions(metadata.permissions());
    }

    file.persist(path.as_std_path())
        .map_err(|e| color_eyre::eyre::eyre!("Failed to replace {path}: {e}"))?;

    Ok(())
}

// =============================================================================
// OUTPUT HELPERS
// =============================================================================

/// Prints a summary of an applied run.
fn print_run_summary(report: &RunReport, written: usize) {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();

    let _ = writeln!(handle);
    let _ = writeln!(handle, "Migration Run");
    let _ = writeln!(handle, "=============");
    let _ = writeln!(handle);
    let _ = writeln!(handle, "Documents scanned:  {}", report.documents.len());
    let _ = writeln!(handle, "  Rewritten:        {}", report.changed_count());
    let _ = writeln!(handle, "  Unchanged:        {}", report.unchanged_count());
    let _ = writeln!(handle, "  Excluded:         {}", report.failures.len());
    let _ = writeln!(handle, "Files written:      {written}");

    print_manifest_summary(&mut handle, report);
}

/// Prints a summary of a dry run.
fn print_check_summary(report: &RunReport, detailed: bool) {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();

    let _ = writeln!(handle);
    let _ = writeln!(handle, "Migration Check");
    let _ = writeln!(handle, "===============");
    let _ = writeln!(handle);
    let _ = writeln!(handle, "Documents scanned:  {}", report.documents.len());
    let _ = writeln!(handle, "  Would change:     {}", report.changed_count());
    let _ = writeln!(handle, "  Unchanged:        {}", report.unchanged_count());
    let _ = writeln!(handle, "  Excluded:         {}", report.failures.len());

    if detailed && report.changed_count() > 0 {
        let _ = writeln!(handle);
        let _ = writeln!(handle, "Changed documents ({}):", report.changed_count());
        for pair in report.changed_documents() {
            let _ = writeln!(handle, "  {}", pair.path());
        }
    }

    print_manifest_summary(&mut handle, report);
}

/// Prints the manifest outcome: injected, already-declared, and unused
/// dependencies. Manifest failures are reported with the other errors.
fn print_manifest_summary(handle: &mut impl Write, report: &RunReport) {
    let Some(ManifestOutcome::Edited {
        manifest,
        report: injection,
    }) = &report.manifest
    else {
        return;
    };

    let _ = writeln!(handle);
    let _ = writeln!(handle, "Manifest {}:", manifest.path());
    for dep in &injection.injected {
        let _ = writeln!(handle, "  + {dep}");
    }
    for dep in &injection.already_declared {
        let _ = writeln!(handle, "  = {dep} (already declared)");
    }
    for dep in &injection.unused {
        let _ = writeln!(handle, "  - {dep} (no matching usage)");
    }
}

/// Prints per-document and manifest failures to stderr.
fn print_failures(report: &RunReport) {
    let manifest_failure = report
        .manifest
        .as_ref()
        .filter(|outcome| outcome.is_failed());
    if report.failures.is_empty() && manifest_failure.is_none() {
        return;
    }

    let stderr = std::io::stderr();
    let mut handle = stderr.lock();

    let count = report.failures.len() + usize::from(manifest_failure.is_some());
    let _ = writeln!(handle);
    let _ = writeln!(handle, "Errors ({count}):");
    for failure in &report.failures {
        let _ = writeln!(handle, "  {} - {}", failure.path, failure.error);
    }
    if let Some(ManifestOutcome::Failed { path, error }) = manifest_failure {
        let _ = writeln!(handle, "  {path} - {error}");
    }
}

// =============================================================================
// MAIN ENTRY POINT
// =============================================================================

/// Application entry point.
fn main() -> color_eyre::Result<ExitCode> {
    // Install color-eyre before anything that can fail
    color_eyre::install()?;

    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.no_color);

    match &cli.command {
        Commands::Run { no_manifest } => {
            let mut recipe = build_recipe(&cli)?;
            if *no_manifest {
                recipe.dependencies.clear();
            }
            run_apply(recipe)
        }
        Commands::Check { detailed } => {
            let recipe = build_recipe(&cli)?;
            run_check(recipe, *detailed)
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
