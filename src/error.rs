use thiserror::Error;

/// Main error type for the metadata store
#[derive(Error, Debug)]
pub enum MetadataError {
    /// The persisted document is structurally invalid
    #[error("Parse error: {0}")]
    Parse(String),

    /// A member required by every document version is missing
    #[error("Unsupported metadata document: missing {0}")]
    SchemaVersion(String),

    /// A standard I/O error on the document source or sink
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// No stored field has this sequence number
    #[error("Field not found: seqNo={seq_no}, fields={number_of_fields}")]
    FieldNotFound { seq_no: u32, number_of_fields: u32 },

    /// The frame number is outside the complete frames of the capture
    #[error("Frame not found: frame={frame}, frames={number_of_frames}")]
    FrameNotFound { frame: u32, number_of_frames: u32 },

    /// A field's first/second parity does not match its role in the frame
    #[error("Field order error: frame={frame}, seqNo={seq_no} has the wrong field parity")]
    FieldOrder { frame: u32, seq_no: u32 },

    /// A CLV timecode component is out of range
    #[error("Invalid CLV timecode: {0}")]
    InvalidTimecode(String),

    /// Line bounds or other parameters violate their invariants
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

impl From<serde_json::Error> for MetadataError {
    fn from(e: serde_json::Error) -> Self {
        if e.is_io() {
            MetadataError::Io(e.into())
        } else {
            MetadataError::Parse(e.to_string())
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, MetadataError>;
