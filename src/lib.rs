//! Field metadata repository for laserdisc TBC captures
//!
//! Stores per-field timing, sync quality, VBI/NTSC auxiliary data, VITS
//! metrics and dropouts, and derives the cross-field facts downstream
//! tools need:
//! - active line ranges for the capture's video standard
//! - first/second field pairing into frames
//! - PCM audio sample positions per field
//! - CLV frame number <-> timecode conversion

pub mod audio;
pub mod dropouts;
pub mod error;
pub mod field;
pub mod frames;
pub mod lines;
pub mod pcm_map;
pub(crate) mod schema;
pub mod store;
pub mod timecode;
pub mod video;

#[cfg(test)]
pub(crate) mod tests;

pub use audio::PcmAudioParameters;
pub use dropouts::{DropOuts, DropoutRun};
pub use error::{MetadataError, Result};
pub use field::{Field, Ntsc, Vbi, VitsMetrics};
pub use frames::FramePair;
pub use lines::{LineOverrides, LineParameters};
pub use pcm_map::PcmAudioMap;
pub use store::MetadataStore;
pub use timecode::{ClvTimecode, ClvTimecodeConverter};
pub use video::{VideoParameters, VideoSystem};
