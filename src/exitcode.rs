//! Process exit codes

/// Successful termination, including a version or help short-circuit
pub const OK: i32 = 0;

/// Parse error, configuration defect, or failed run
pub const FAILURE: i32 = 1;
