use super::{
    error::PipelineError,
    io::LineReader,
    lookup::TagLookupTable,
    protocol::ProtocolDictionary,
    types::{FlowRecord, PortProtocol},
};
use std::{collections::HashMap, convert::TryFrom, path::Path};

/// Protocol name used when a record's protocol number isn't in the dictionary.
pub const UNKNOWN_PROTOCOL: &str = "unknown";

/// Tag counted when a port/protocol pair has no lookup entry.
pub const UNTAGGED: &str = "Untagged";

#[derive(Debug, Default)]
pub struct State {
    tag_counts: HashMap<String, u64>,
    port_protocol_counts: HashMap<PortProtocol, u64>,
    skipped: usize,
}

impl State {
    /// Stream a flow log through the dictionary and lookup table. Lines that aren't flow log
    /// records are skipped and counted.
    pub fn aggregate(
        path: &Path,
        protocols: &ProtocolDictionary,
        lookup: &TagLookupTable,
    ) -> Result<Self, PipelineError> {
        let mut state = Self::default();

        for line in LineReader::new(path)? {
            match line?.and_then(|line| FlowRecord::try_from(line.as_str())) {
                Ok(record) => state.process(&record, protocols, lookup),
                Err(_) => state.skipped += 1,
            }
        }

        log::debug!(
            "Aggregated {} flow records from {} ({} lines skipped)",
            state.records(),
            path.display(),
            state.skipped
        );

        Ok(state)
    }

    /// Count one record: exactly one tag and one port/protocol pair are incremented.
    pub fn process(
        &mut self,
        record: &FlowRecord,
        protocols: &ProtocolDictionary,
        lookup: &TagLookupTable,
    ) {
        let protocol = protocols
            .name(&record.protocol_number)
            .unwrap_or(UNKNOWN_PROTOCOL)
            .to_lowercase();
        let key = PortProtocol::new(record.dst_port.as_str(), protocol);

        let tag = lookup.tag(&key).unwrap_or(UNTAGGED).to_string();

        *self.tag_counts.entry(tag).or_insert(0) += 1;
        *self.port_protocol_counts.entry(key).or_insert(0) += 1;
    }

    /// Number of records counted so far.
    pub fn records(&self) -> u64 {
        self.tag_counts.values().sum()
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Render both count tables. Rows are sorted so the same input always gives the same
    /// report.
    pub fn write<Writer: std::io::Write>(&self, mut f: Writer) -> Result<(), std::io::Error> {
        writeln!(f, "Tag Counts:")?;
        writeln!(f, "Tag,Count")?;

        let mut tag_counts: Vec<_> = self.tag_counts.iter().collect();
        tag_counts.sort();

        for (tag, count) in tag_counts {
            writeln!(f, "{},{}", tag, count)?;
        }

        writeln!(f)?;
        writeln!(f, "Port/Protocol Combination Counts:")?;
        writeln!(f, "Port,Protocol,Count")?;

        let mut port_protocol_counts: Vec<_> = self.port_protocol_counts.iter().collect();
        port_protocol_counts.sort();

        for (key, count) in port_protocol_counts {
            writeln!(f, "{},{},{}", key.port, key.protocol, count)?;
        }

        Ok(())
    }
}

/// Malformed rows dropped from each input.
#[derive(Debug, Default, PartialEq)]
pub struct SkipSummary {
    pub protocols: usize,
    pub lookup: usize,
    pub flow_logs: usize,
}

impl SkipSummary {
    pub fn new(protocols: &ProtocolDictionary, lookup: &TagLookupTable, state: &State) -> Self {
        Self {
            protocols: protocols.skipped(),
            lookup: lookup.skipped(),
            flow_logs: state.skipped(),
        }
    }

    pub fn write<Writer: std::io::Write>(&self, mut f: Writer) -> Result<(), std::io::Error> {
        writeln!(f)?;
        writeln!(f, "Skipped Rows:")?;
        writeln!(f, "Input,Count")?;
        writeln!(f, "protocols,{}", self.protocols)?;
        writeln!(f, "lookup,{}", self.lookup)?;
        writeln!(f, "flow_logs,{}", self.flow_logs)?;

        Ok(())
    }
}
