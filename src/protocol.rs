use super::{error::PipelineError, io::CsvRowReader, types::RowError};
use std::{collections::HashMap, convert::TryFrom, path::Path};

/// Maps protocol numbers, as written in the flow log, to lowercase protocol keywords.
#[derive(Debug, Default)]
pub struct ProtocolDictionary {
    names: HashMap<String, String>,
    skipped: usize,
}

impl ProtocolDictionary {
    /// Load the IANA style protocol number file. Only the first two columns are read.
    pub fn load(path: &Path) -> Result<Self, PipelineError> {
        let mut dictionary = Self::default();

        for row in CsvRowReader::new(path)? {
            match row?.and_then(|record| ProtocolEntry::try_from(&record)) {
                Ok(entry) => dictionary.insert(entry),
                Err(_) => dictionary.skipped += 1,
            }
        }

        log::debug!(
            "Loaded {} protocols from {} ({} rows skipped)",
            dictionary.len(),
            path.display(),
            dictionary.skipped
        );

        Ok(dictionary)
    }

    /// Later entries for the same number replace earlier ones.
    pub fn insert(&mut self, entry: ProtocolEntry) {
        self.names.insert(entry.number, entry.name);
    }

    pub fn name(&self, number: &str) -> Option<&str> {
        self.names.get(number).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolEntry {
    pub number: String,
    pub name: String,
}

impl TryFrom<&csv::StringRecord> for ProtocolEntry {
    type Error = RowError;

    fn try_from(record: &csv::StringRecord) -> Result<Self, Self::Error> {
        let number = record.get(0).unwrap_or_default().trim();
        if !number.starts_with(|c: char| c.is_ascii_digit()) {
            return Err(RowError::NotNumeric);
        }

        // A row with no second column at all counts as a blank name
        let name = record.get(1).unwrap_or_default().trim();
        if name.is_empty() {
            return Err(RowError::BlankName);
        }

        Ok(Self {
            number: number.to_string(),
            name: name.to_lowercase(),
        })
    }
}
