mod flow_record;
mod port_protocol;

pub use flow_record::FlowRecord;
pub use port_protocol::PortProtocol;

/// Why a single input row was skipped. Row errors are counted by the caller and never abort
/// the file being read.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RowError {
    #[error("row is not valid UTF-8")]
    Undecodable,
    #[error("row does not start with a protocol number")]
    NotNumeric,
    #[error("protocol name is blank")]
    BlankName,
    #[error("expected {expected} fields, found {found}")]
    FieldCount { expected: usize, found: usize },
    #[error("cannot deserialize row: {0}")]
    Deserialize(String),
}
