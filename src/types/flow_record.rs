use super::RowError;
use std::convert::TryFrom;

/// Number of whitespace separated fields in a version 2 flow log record.
const FLOW_RECORD_FIELDS: usize = 14;

const DST_PORT_FIELD: usize = 6;
const PROTOCOL_FIELD: usize = 7;

/// The two fields of a flow log record that the aggregation cares about. Everything else on the
/// line is only counted, not kept.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowRecord {
    pub dst_port: String,
    pub protocol_number: String,
}

impl TryFrom<&str> for FlowRecord {
    type Error = RowError;

    fn try_from(line: &str) -> Result<Self, Self::Error> {
        let fields: Vec<&str> = line.trim().split_ascii_whitespace().collect();
        if fields.len() != FLOW_RECORD_FIELDS {
            return Err(RowError::FieldCount {
                expected: FLOW_RECORD_FIELDS,
                found: fields.len(),
            });
        }

        Ok(Self {
            dst_port: fields[DST_PORT_FIELD].to_string(),
            protocol_number: fields[PROTOCOL_FIELD].to_string(),
        })
    }
}
