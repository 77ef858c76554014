//! CLI Exit Code Registry
//!
//! Single source of truth for `gradesync` exit codes. Scripts rely on them.
//!
//! | Code | Meaning                                      |
//! |------|----------------------------------------------|
//! | 0    | Run completed (mismatches are data, not errors) |
//! | 1    | General error (unspecified)                  |
//! | 2    | Usage error (bad arguments)                  |
//! | 3    | IO error (unreadable input, unwritable output) |
//! | 4    | CSV parse error                              |
//! | 5    | Config error (parse or validation)           |

use gradesync_recon::ReconError;

/// Success - run completed.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments. clap exits with this code on its own errors.
pub const EXIT_USAGE: u8 = 2;

/// Input could not be read or an output file could not be written.
pub const EXIT_IO: u8 = 3;

/// Input is not valid CSV, or lacks the key columns.
pub const EXIT_PARSE: u8 = 4;

/// Config file could not be parsed or failed validation.
pub const EXIT_CONFIG: u8 = 5;

/// Map a ReconError to its exit code.
pub fn recon_exit_code(err: &ReconError) -> u8 {
    match err {
        ReconError::Io { .. } => EXIT_IO,
        ReconError::Csv { .. } | ReconError::MissingColumn { .. } | ReconError::ShortHeader { .. } => {
            EXIT_PARSE
        }
        ReconError::ConfigParse(_) | ReconError::ConfigValidation(_) => EXIT_CONFIG,
        ReconError::UnknownGrade(_) => EXIT_ERROR,
    }
}
