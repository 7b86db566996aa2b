/// Literal used throughout the historical CSV export for missing values.
pub const MISSING_MARKER: &str = "NA";

/// Number of positional columns in a match row.
pub const MATCH_COLUMNS: usize = 20;

/// Date format used by the CSV export, e.g. "18-04-2008".
pub const CSV_DATE_FORMAT: &str = "%d-%m-%Y";

/// Date format used for human-facing match dates, e.g. "18 Apr 2008".
pub const DISPLAY_DATE_FORMAT: &str = "%d %b %Y";

/// Upper bound on how many matches the iconic-match picker scans.
pub const ICONIC_SAMPLE_LIMIT: usize = 2000;
