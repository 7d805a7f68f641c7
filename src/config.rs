use std::path::PathBuf;

pub const DEFAULT_PROTOCOL_PATH: &str = "protocol_numbers.csv";
pub const DEFAULT_LOOKUP_PATH: &str = "lookup_table.csv";
pub const DEFAULT_FLOW_LOG_PATH: &str = "flow_logs.txt";
pub const DEFAULT_OUTPUT_PATH: &str = "output.csv";

/// Where the pipeline reads from and writes to. Relative paths resolve against the
/// working directory.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub protocol_path: PathBuf,
    pub lookup_path: PathBuf,
    pub flow_log_path: PathBuf,
    pub output_path: PathBuf,
    /// Append a section counting malformed rows per input to the report.
    pub report_skipped: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            protocol_path: DEFAULT_PROTOCOL_PATH.into(),
            lookup_path: DEFAULT_LOOKUP_PATH.into(),
            flow_log_path: DEFAULT_FLOW_LOG_PATH.into(),
            output_path: DEFAULT_OUTPUT_PATH.into(),
            report_skipped: false,
        }
    }
}
