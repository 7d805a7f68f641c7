use std::path::PathBuf;

/// Fatal errors. Any of these aborts the remaining stages and no report is written.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("cannot open {}: {source}", path.display())]
    MissingFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is empty", path.display())]
    EmptyInput { path: PathBuf },

    #[error("failed reading {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write report to {}: {source}", path.display())]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
