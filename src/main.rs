//! g8gen's main application entry point and orchestration logic.
//! Handles command-line argument parsing, field collection and dispatch to
//! project generation or scaffold expansion.

use std::io;

use g8gen::{
    cli::{get_args, Args, Command},
    config::{GenerateOptions, TemplateConfig},
    constants::METADATA_FILE,
    error::{default_error_handler, Result},
    generator::{expand_scaffold, new_project, scaffold_dir},
    loader::load_template,
    logger::init_logger,
    prompt::{collect_fields, load_answers, DialoguerPrompter},
    renderer::TemplateEngine,
};
use indexmap::IndexMap;

/// Main application entry point.
fn main() {
    let args = get_args();
    init_logger(args.verbose);

    if let Err(err) = run(args) {
        default_error_handler(err);
    }
}

/// Reads preloaded answers from stdin when requested.
fn preloaded_answers(stdin: bool) -> Result<IndexMap<String, String>> {
    if stdin {
        load_answers(io::stdin().lock())
    } else {
        Ok(IndexMap::new())
    }
}

fn print_description(config: &TemplateConfig) {
    if let Some(description) = config.description() {
        println!("{description}");
    }
}

/// Main application logic execution.
///
/// # Flow
/// 1. Locates the template (or the staged scaffold)
/// 2. Loads its `default.properties`
/// 3. Collects field values from stdin, prompts or defaults
/// 4. Generates the files
fn run(args: Args) -> Result<()> {
    let engine = TemplateEngine::new();
    let prompt = DialoguerPrompter::new();

    match args.command {
        Command::New { template, output_dir, force, no_inputs, stdin } => {
            let layout = load_template(&template)?;
            println!("Using template from the {layout}");

            let config = TemplateConfig::load(layout.metadata_file())?;
            print_description(&config);

            // Stdin is consumed by the answers, so the remaining fields take their defaults.
            let preloaded = preloaded_answers(stdin)?;
            let fields = collect_fields(&prompt, &config, &preloaded, no_inputs || stdin)?;

            let options = GenerateOptions { force, ..GenerateOptions::default() };
            let generation = new_project(&layout, fields, &output_dir, &engine, &options)?;

            println!(
                "Project generated successfully in {} ({} files).",
                generation.target_dir.display(),
                generation.files.len()
            );
        }
        Command::Scaffold { name, project_dir, no_inputs, stdin } => {
            let config = TemplateConfig::load(scaffold_dir(&project_dir, &name).join(METADATA_FILE))?;
            print_description(&config);

            let preloaded = preloaded_answers(stdin)?;
            let fields = collect_fields(&prompt, &config, &preloaded, no_inputs || stdin)?;

            let generation =
                expand_scaffold(&project_dir, &name, fields, &engine, &GenerateOptions::default())?;

            println!("Scaffold '{}' generated {} files.", name, generation.files.len());
        }
    }

    Ok(())
}
