//! Core template processing orchestration.
//! Combines loading, field handling, verbatim matching and rendering to generate
//! a new project or expand a scaffold into an existing one.

use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::{
    config::GenerateOptions,
    constants::SCAFFOLD_HOME,
    error::{Error, Result},
    fields::FieldMap,
    loader::TemplateLayout,
    processor::{write_file, Processor},
    renderer::TemplateRenderer,
    scaffold::copy_tree,
    source::{SourceEntry, SourceTree},
    verbatim::VerbatimMatcher,
};

/// What a generation run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Generation {
    /// Directory the files were generated into
    pub target_dir: PathBuf,
    /// Generated files, in walk order
    pub files: Vec<PathBuf>,
    /// Paths staged under the scaffold home
    pub scaffolds: Vec<PathBuf>,
}

/// Renders every entry through `processor` and writes the result.
///
/// Stops at the first error; files written before it stay on disk.
pub fn generate_entries<I>(entries: I, processor: &Processor) -> Result<Vec<PathBuf>>
where
    I: IntoIterator<Item = Result<SourceEntry>>,
{
    let mut written = Vec::new();
    for entry in entries {
        let Some(file) = processor.process(entry?)? else {
            continue;
        };
        info!("{} '{}'", file.action, file.target.display());
        write_file(&file).map_err(|e| e.in_file(&file.target))?;
        written.push(file.target);
    }
    Ok(written)
}

/// Walks `code_base` and generates its files below `target_root`.
pub fn generate(
    code_base: &Path,
    target_root: &Path,
    fields: &FieldMap,
    verbatim: &VerbatimMatcher,
    engine: &dyn TemplateRenderer,
    options: &GenerateOptions,
) -> Result<Vec<PathBuf>> {
    debug!("Processing code base '{}'", code_base.display());
    let processor = Processor::new(engine, fields, verbatim, target_root, &options.metadata_file);
    let tree = SourceTree::new(code_base).follow_links(true);
    generate_entries(tree.entries(), &processor)
}

/// Creates a new project from a template.
///
/// The target directory is `output_dir/<normalized name>`. It is validated before anything
/// is written: an empty name or an existing directory (without `force`) fails early.
/// Scaffolds are staged under `<target>/.g8/` before the code base is rendered.
pub fn new_project(
    layout: &TemplateLayout,
    mut fields: FieldMap,
    output_dir: &Path,
    engine: &dyn TemplateRenderer,
    options: &GenerateOptions,
) -> Result<Generation> {
    let reserved = fields.take_reserved();
    let target_dir = output_dir.join(reserved.target_name()?);
    let verbatim = VerbatimMatcher::new(&reserved.verbatim)?;

    if target_dir.exists() && !options.force {
        return Err(Error::OutputDirectoryExistsError {
            output_dir: target_dir.display().to_string(),
        });
    }

    let scaffolds = if layout.has_scaffolds() {
        info!("Copying scaffolds...");
        copy_tree(&layout.scaffolds, target_dir.join(SCAFFOLD_HOME))?
    } else {
        Vec::new()
    };

    info!("Generating project...");
    let files = generate(&layout.code_base, &target_dir, &fields, &verbatim, engine, options)?;

    Ok(Generation { target_dir, files, scaffolds })
}

/// Location of a staged scaffold inside a project.
pub fn scaffold_dir(project_dir: &Path, scaffold_name: &str) -> PathBuf {
    project_dir.join(SCAFFOLD_HOME).join(scaffold_name)
}

/// Expands the scaffold `scaffold_name` staged in `project_dir` into the project itself.
///
/// Works like [`new_project`] except that files land directly in `project_dir` and the
/// scaffold's own defaults file is skipped.
pub fn expand_scaffold(
    project_dir: &Path,
    scaffold_name: &str,
    mut fields: FieldMap,
    engine: &dyn TemplateRenderer,
    options: &GenerateOptions,
) -> Result<Generation> {
    let source = scaffold_dir(project_dir, scaffold_name);
    if !source.is_dir() {
        return Err(Error::ScaffoldNotFoundError { scaffold_dir: source.display().to_string() });
    }

    let reserved = fields.take_reserved();
    let verbatim = VerbatimMatcher::new(&reserved.verbatim)?;

    info!("Generating scaffold {}...", scaffold_name);
    let files = generate(&source, project_dir, &fields, &verbatim, engine, options)?;

    Ok(Generation { target_dir: project_dir.to_path_buf(), files, scaffolds: Vec::new() })
}
