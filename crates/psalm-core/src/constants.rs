/// Version of the on-disk index artifact. Bumped on any incompatible change.
pub const INDEX_FORMAT_VERSION: u32 = 1;

/// Heading marker that gives a passage a named id (e.g. `## Psalm 23:1-6`).
pub const HEADING_MARKER: &str = "## ";

/// Prefix for positional unit ids (`unit_1`, `unit_2`, ...).
pub const POSITIONAL_ID_PREFIX: &str = "unit_";

/// Separator used to disambiguate duplicate heading ids.
pub const DUPLICATE_ID_SEPARATOR: char = '~';

/// Log builder progress every N embedded units.
pub const BUILD_PROGRESS_INTERVAL: usize = 25;
