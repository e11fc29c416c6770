//! Command-line interface implementation for g8gen.
//! Provides argument parsing and help text formatting using clap.

use clap::{error::ErrorKind, CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

/// Command-line arguments structure for g8gen.
#[derive(Parser, Debug)]
#[command(author, version, about = "g8gen: generate projects from giter8 templates", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new project from a template
    #[command(visible_alias = "n")]
    New {
        /// Path or file:// URL of the template directory
        #[arg(value_name = "TEMPLATE")]
        template: String,

        /// Directory in which the project directory will be created
        #[arg(short, long, value_name = "OUTPUT_DIR", default_value = ".")]
        output_dir: PathBuf,

        /// Generate into an existing project directory
        #[arg(short, long)]
        force: bool,

        /// Accept all default values, do not ask for input
        #[arg(long)]
        no_inputs: bool,

        /// Read answers as a JSON object from stdin
        #[arg(short, long)]
        stdin: bool,
    },

    /// Generate files from a scaffold of the current project
    #[command(visible_alias = "sf")]
    Scaffold {
        /// Name of the scaffold under .g8/
        #[arg(value_name = "NAME")]
        name: String,

        /// Project root directory
        #[arg(short = 'C', long, value_name = "PROJECT_DIR", default_value = ".")]
        project_dir: PathBuf,

        /// Accept all default values, do not ask for input
        #[arg(long)]
        no_inputs: bool,

        /// Read answers as a JSON object from stdin
        #[arg(short, long)]
        stdin: bool,
    },
}

/// Parses command line arguments and returns the Args structure.
///
/// # Returns
/// * `Args` - Parsed command line arguments
///
/// # Exits
/// * With status code 1 if required arguments are missing
/// * With clap's default error handling for other argument errors
pub fn get_args() -> Args {
    match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            if e.kind() == ErrorKind::MissingRequiredArgument
                || e.kind() == ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
            {
                let _ = Args::command()
                    .help_template(
                        r#"{about-section}
{usage-heading} {usage}

{all-args}
{after-help}
"#,
                    )
                    .print_help();
                std::process::exit(1);
            } else {
                e.exit();
            }
        }
    }
}
