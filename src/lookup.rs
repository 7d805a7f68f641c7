use super::{
    error::PipelineError,
    io::CsvRowReader,
    types::{PortProtocol, RowError},
};
use std::{collections::HashMap, convert::TryFrom, path::Path};

// Spreadsheet exports of the lookup table tend to leave non-breaking spaces around values
const NBSP: char = '\u{a0}';

const LOOKUP_FIELDS: usize = 3;

/// Maps a destination port and protocol keyword to the tag assigned to it.
#[derive(Debug, Default)]
pub struct TagLookupTable {
    tags: HashMap<PortProtocol, String>,
    skipped: usize,
}

impl TagLookupTable {
    pub fn load(path: &Path) -> Result<Self, PipelineError> {
        let mut table = Self::default();

        for row in CsvRowReader::new(path)? {
            match row?.and_then(|record| LookupEntry::try_from(&record)) {
                Ok(entry) => table.insert(entry),
                Err(_) => table.skipped += 1,
            }
        }

        log::debug!(
            "Loaded {} tag mappings from {} ({} rows skipped)",
            table.len(),
            path.display(),
            table.skipped
        );

        Ok(table)
    }

    /// Later entries for the same key replace earlier ones.
    pub fn insert(&mut self, entry: LookupEntry) {
        self.tags.insert(entry.key, entry.tag);
    }

    pub fn tag(&self, key: &PortProtocol) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LookupEntry {
    pub key: PortProtocol,
    pub tag: String,
}

impl TryFrom<&csv::StringRecord> for LookupEntry {
    type Error = RowError;

    fn try_from(record: &csv::StringRecord) -> Result<Self, Self::Error> {
        let mut fields: Vec<String> = record.iter().map(|field| field.replace(NBSP, "")).collect();

        // Trailing empty columns left behind by the export don't count
        while fields.last().map_or(false, |field| field.is_empty()) {
            fields.pop();
        }

        if fields.len() != LOOKUP_FIELDS {
            return Err(RowError::FieldCount {
                expected: LOOKUP_FIELDS,
                found: fields.len(),
            });
        }

        let fields: LookupFields = csv::StringRecord::from(fields)
            .deserialize(None)
            .map_err(|e| RowError::Deserialize(e.to_string()))?;

        Ok(Self {
            key: PortProtocol::new(fields.dstport.trim(), fields.protocol.trim().to_lowercase()),
            tag: fields.tag.trim().to_string(),
        })
    }
}

/// Positional view of a lookup row, deserialised by the csv crate once the row has the right
/// number of columns.
#[derive(serde::Deserialize, Debug)]
struct LookupFields {
    dstport: String,
    protocol: String,
    tag: String,
}

#[cfg(test)]
mod tests {
    use super::{LookupEntry, PortProtocol, RowError, TagLookupTable};
    use crate::error::PipelineError;
    use std::{convert::TryFrom, fs};
    use tempfile::TempDir;

    fn load(contents: &str) -> TagLookupTable {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("lookup_table.csv");
        fs::write(&path, contents).unwrap();
        TagLookupTable::load(&path).unwrap()
    }

    fn entry(fields: Vec<&str>) -> Result<LookupEntry, RowError> {
        LookupEntry::try_from(&csv::StringRecord::from(fields))
    }

    #[test]
    fn test_entry_normalisation() {
        assert_eq!(
            entry(vec![" 443 ", " TCP", "sv_P1 "]),
            Ok(LookupEntry {
                key: PortProtocol::new("443", "tcp"),
                tag: "sv_P1".into()
            })
        );
    }

    #[test]
    fn test_entry_strips_nbsp() {
        assert_eq!(
            entry(vec!["25\u{a0}", "tcp \u{a0}", "\u{a0}sv_P1"]),
            Ok(LookupEntry {
                key: PortProtocol::new("25", "tcp"),
                tag: "sv_P1".into()
            })
        );
    }

    #[test]
    fn test_entry_field_count() {
        assert_eq!(
            entry(vec!["443", "tcp"]),
            Err(RowError::FieldCount {
                expected: 3,
                found: 2
            })
        );
        assert_eq!(
            entry(vec!["443", "tcp", "sv_P1", "extra"]),
            Err(RowError::FieldCount {
                expected: 3,
                found: 4
            })
        );
        assert!(entry(vec!["443", "tcp", ""]).is_err());
        assert!(entry(vec!["443", "tcp", "sv_P1", ""]).is_ok());
    }

    #[test]
    fn test_load() {
        let table = load(
            "dstport,protocol,tag\n\
             25,tcp,sv_P1\n\
             68,udp,sv_P2\n\
             23,TCP,sv_P1\n\
             443,tcp\n\
             993,tcp,sv_P3,extra\n\
             110,tcp,email\u{a0}\n",
        );

        assert_eq!(table.tag(&PortProtocol::new("25", "tcp")), Some("sv_P1"));
        assert_eq!(table.tag(&PortProtocol::new("68", "udp")), Some("sv_P2"));
        assert_eq!(table.tag(&PortProtocol::new("23", "tcp")), Some("sv_P1"));
        assert_eq!(table.tag(&PortProtocol::new("110", "tcp")), Some("email"));
        assert_eq!(table.tag(&PortProtocol::new("443", "tcp")), None);
        assert_eq!(table.tag(&PortProtocol::new("993", "tcp")), None);
        assert_eq!(table.len(), 4);
        assert_eq!(table.skipped(), 2);
    }

    #[test]
    fn test_last_duplicate_wins() {
        let table = load("dstport,protocol,tag\n25,tcp,first\n25,TCP,second\n");
        assert_eq!(table.tag(&PortProtocol::new("25", "tcp")), Some("second"));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_missing_file_fails() {
        let dir = TempDir::new().unwrap();

        assert!(matches!(
            TagLookupTable::load(&dir.path().join("lookup_table.csv")),
            Err(PipelineError::MissingFile { .. })
        ));
    }
}
