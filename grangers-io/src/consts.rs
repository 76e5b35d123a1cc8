pub const GZ_EXTENSION: &str = "gz";

/// Metadata column filled from BED column 4.
pub const NAME_COLUMN: &str = "name";
/// Metadata column filled from BED column 5.
pub const SCORE_COLUMN: &str = "score";

/// Placeholder for a missing optional BED field.
pub const MISSING_FIELD: &str = ".";
