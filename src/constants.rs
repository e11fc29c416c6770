//! Common constants used throughout the g8gen application.

/// Parameter defaults file, read for field values and never emitted
pub const METADATA_FILE: &str = "default.properties";

/// Code base walked by the generator, relative to the template root
pub const CODE_BASE_DIR: &str = "src/main/g8";

/// Optional scaffold trees, relative to the template root
pub const SCAFFOLDS_DIR: &str = "src/main/scaffolds";

/// Hidden directory holding scaffolds inside a generated project
pub const SCAFFOLD_HOME: &str = ".g8";

/// Field driving the top-level target directory name
pub const NAME_FIELD: &str = "name";

/// Field holding the verbatim pattern list
pub const VERBATIM_FIELD: &str = "verbatim";

/// Documentation-only field, never rendered against
pub const DESCRIPTION_FIELD: &str = "description";
