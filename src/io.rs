use super::{error::PipelineError, types::RowError};
use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
};

/// Open an input file for reading. A file that can't be opened, or can't be read from at all,
/// is missing; a file with no bytes is empty.
pub fn open_input(path: &Path) -> Result<BufReader<File>, PipelineError> {
    let missing = |source: std::io::Error| PipelineError::MissingFile {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = BufReader::new(File::open(path).map_err(missing)?);

    if reader.fill_buf().map_err(missing)?.is_empty() {
        return Err(PipelineError::EmptyInput {
            path: path.to_path_buf(),
        });
    }

    Ok(reader)
}

/// Reads comma separated rows after discarding the first line. Quotes carry no meaning and
/// rows may have any number of fields; judging the shape of a row is left to the caller.
pub struct CsvRowReader {
    path: PathBuf,
    record_iter: csv::StringRecordsIntoIter<BufReader<File>>,
}

impl CsvRowReader {
    pub fn new(path: &Path) -> Result<Self, PipelineError> {
        let mut reader = open_input(path)?;

        // The first line is a header whatever it looks like
        let mut header = Vec::new();
        reader
            .read_until(b'\n', &mut header)
            .map_err(|source| PipelineError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(Self {
            path: path.to_path_buf(),
            record_iter: csv::ReaderBuilder::new()
                .has_headers(false)
                .flexible(true)
                .quoting(false)
                .from_reader(reader)
                .into_records(),
        })
    }
}

impl Iterator for CsvRowReader {
    type Item = Result<Result<csv::StringRecord, RowError>, PipelineError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.record_iter.next().map(|result| match result {
            Ok(record) => Ok(Ok(record)),
            Err(err) => match err.into_kind() {
                csv::ErrorKind::Io(source) => Err(PipelineError::Read {
                    path: self.path.clone(),
                    source,
                }),
                _ => Ok(Err(RowError::Undecodable)),
            },
        })
    }
}

/// Reads every line of a file, header included, with the line terminator removed.
pub struct LineReader {
    path: PathBuf,
    reader: BufReader<File>,
}

impl LineReader {
    pub fn new(path: &Path) -> Result<Self, PipelineError> {
        Ok(Self {
            path: path.to_path_buf(),
            reader: open_input(path)?,
        })
    }
}

impl Iterator for LineReader {
    type Item = Result<Result<String, RowError>, PipelineError>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut line = Vec::new();

        match self.reader.read_until(b'\n', &mut line) {
            Ok(0) => None,
            Ok(_) => {
                if line.ends_with(b"\n") {
                    line.pop();
                    if line.ends_with(b"\r") {
                        line.pop();
                    }
                }
                Some(Ok(String::from_utf8(line).map_err(|_| RowError::Undecodable)))
            }
            Err(source) => Some(Err(PipelineError::Read {
                path: self.path.clone(),
                source,
            })),
        }
    }
}
