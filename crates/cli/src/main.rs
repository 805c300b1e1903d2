use anyhow::Result;
use clap::{Parser, Subcommand};
use script_slicer::commands::{
    dependencies_command, list_functions_command, list_recipes_command, normalize_command,
    run_recipe_command, slice_command,
};
use tracing_subscriber::EnvFilter;

/// Dependency-closure slicer for PowerShell library scripts.
///
/// This CLI is a thin wrapper around `slice-core` (exposed in code as `slice_core`).
/// All substantive logic lives in the library so it can be tested thoroughly
/// and reused from other frontends.
#[derive(Parser, Debug)]
#[command(
    name = "script-slicer",
    version,
    about = "Slice functions and their dependencies out of PowerShell library scripts",
    long_about = None
)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG when set).
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Produce a minimal script containing the entry functions and their dependencies.
    ///
    /// The result is stripped of comments, blank lines, and verbose/debug
    /// statements. The PSReflect overhead block is appended when needed.
    Slice {
        /// Source script to slice.
        #[arg(long)]
        script: String,

        /// Entry function name (repeatable).
        #[arg(long = "entry", required = true)]
        entries: Vec<String>,

        /// Write the sliced script here instead of stdout.
        #[arg(long)]
        output: Option<String>,

        /// Write a JSON report of the run here.
        #[arg(long)]
        report: Option<String>,

        /// Stop dependency resolution after this many steps.
        #[arg(long)]
        max_steps: Option<usize>,

        /// Overwrite existing output/report files.
        #[arg(long, default_value_t = false)]
        force: bool,
    },

    /// Show the resolved dependency set for the entry functions.
    Deps {
        /// Source script to analyze.
        #[arg(long)]
        script: String,

        /// Entry function name (repeatable).
        #[arg(long = "entry", required = true)]
        entries: Vec<String>,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// List the functions recovered from a script.
    ListFunctions {
        /// Source script to analyze.
        #[arg(long)]
        script: String,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Strip comments, blank lines, and verbose/debug statements from a script.
    Normalize {
        /// Source script to normalize.
        #[arg(long)]
        script: String,

        /// Write the result here instead of stdout.
        #[arg(long)]
        output: Option<String>,

        /// Overwrite an existing output file.
        #[arg(long, default_value_t = false)]
        force: bool,
    },

    /// Run a slice recipe (YAML or JSON).
    RunRecipe {
        /// Path to the recipe file.
        #[arg(long)]
        file: String,

        /// Overwrite existing output and metadata files.
        #[arg(long, default_value_t = false)]
        force: bool,
    },

    /// List slice recipes found in a directory.
    ListRecipes {
        /// Directory to scan. Defaults to the current working directory.
        #[arg(long, default_value = ".")]
        dir: String,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    // Logs go to stderr so stdout only carries script output.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Slice { script, entries, output, report, max_steps, force } => slice_command(
            &script,
            &entries,
            output.as_deref(),
            report.as_deref(),
            max_steps,
            force,
        )?,
        Command::Deps { script, entries, json } => dependencies_command(&script, &entries, json)?,
        Command::ListFunctions { script, json } => list_functions_command(&script, json)?,
        Command::Normalize { script, output, force } => {
            normalize_command(&script, output.as_deref(), force)?
        }
        Command::RunRecipe { file, force } => run_recipe_command(&file, force)?,
        Command::ListRecipes { dir, json } => list_recipes_command(&dir, json)?,
    }

    Ok(())
}
