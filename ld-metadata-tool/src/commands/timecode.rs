//! CLV frame number and timecode conversion

use std::io::Write;

use ld_metadata::{ClvTimecode, MetadataStore};

use crate::error::{Result, ToolError};

/// What to convert
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimecodeQuery {
    Frame(u32),
    Timecode(String),
}

impl TimecodeQuery {
    pub fn from_args(frame: Option<u32>, timecode: Option<String>) -> Result<Self> {
        match (frame, timecode) {
            (Some(frame), None) => Ok(TimecodeQuery::Frame(frame)),
            (None, Some(timecode)) => Ok(TimecodeQuery::Timecode(timecode)),
            _ => Err(ToolError::Usage(
                "give exactly one of --frame or --timecode".to_string(),
            )),
        }
    }
}

pub fn convert(store: &MetadataStore, query: &TimecodeQuery) -> Result<String> {
    match query {
        TimecodeQuery::Frame(frame) => {
            Ok(store.convert_frame_number_to_clv_timecode(*frame).to_string())
        }
        TimecodeQuery::Timecode(text) => {
            let timecode: ClvTimecode = text.parse()?;
            Ok(store.convert_clv_timecode_to_frame_number(&timecode)?.to_string())
        }
    }
}

pub fn run<W: Write>(store: &MetadataStore, query: &TimecodeQuery, out: &mut W) -> Result<()> {
    writeln!(out, "{}", convert(store, query)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::pal_store;
    use ld_metadata::{MetadataError, VideoParameters};

    #[test]
    fn test_pal_conversion() {
        let store = pal_store(1);
        assert_eq!(convert(&store, &TimecodeQuery::Frame(26)).unwrap(), "0:00:01.01");
        assert_eq!(
            convert(&store, &TimecodeQuery::Timecode("1:00:00.00".to_string())).unwrap(),
            "90000"
        );
    }

    #[test]
    fn test_ntsc_conversion() {
        let mut store = MetadataStore::new();
        store.set_video_parameters(VideoParameters::ntsc()).unwrap();
        assert_eq!(convert(&store, &TimecodeQuery::Frame(30)).unwrap(), "0:00:01.00");
    }

    #[test]
    fn test_invalid_timecode() {
        let store = pal_store(1);
        for text in ["0:00:00.25", "0:61:00.00", "garbage"] {
            let err = convert(&store, &TimecodeQuery::Timecode(text.to_string())).unwrap_err();
            assert!(matches!(err, ToolError::Metadata(MetadataError::InvalidTimecode(_))));
        }
    }

    #[test]
    fn test_query_from_args() {
        assert_eq!(TimecodeQuery::from_args(Some(3), None).unwrap(), TimecodeQuery::Frame(3));
        assert!(TimecodeQuery::from_args(None, None).is_err());
        assert!(TimecodeQuery::from_args(Some(3), Some("0:00:00.03".to_string())).is_err());
    }
}
