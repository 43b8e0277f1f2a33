//! Video signal description
//!
//! Describes the captured video standard and the sample geometry of a
//! decoded field. Active line bounds are not stored here; they are
//! resolved from these parameters by [`crate::lines`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Video standard of the capture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VideoSystem {
    #[serde(rename = "PAL")]
    Pal,
    #[serde(rename = "NTSC")]
    Ntsc,
}

impl VideoSystem {
    /// Nominal frame rate used for CLV picture numbering.
    ///
    /// NTSC runs at 29.97 frames per second but CLV discs number pictures
    /// as if the rate were exactly 30.
    pub fn frames_per_second(self) -> u32 {
        match self {
            VideoSystem::Pal => 25,
            VideoSystem::Ntsc => 30,
        }
    }

    pub fn is_pal(self) -> bool {
        self == VideoSystem::Pal
    }

    pub fn as_str(self) -> &'static str {
        match self {
            VideoSystem::Pal => "PAL",
            VideoSystem::Ntsc => "NTSC",
        }
    }
}

impl fmt::Display for VideoSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Signal description for one capture
#[derive(Debug, Clone, PartialEq)]
pub struct VideoParameters {
    pub system: VideoSystem,
    pub is_subcarrier_locked: bool,
    pub is_widescreen: bool,

    /// First sample column of the colour burst
    pub colour_burst_start: i32,
    /// End sample column of the colour burst (exclusive)
    pub colour_burst_end: i32,
    /// First sample column of the active picture
    pub active_video_start: i32,
    /// End sample column of the active picture (exclusive)
    pub active_video_end: i32,

    /// 16-bit sample value of reference white (100 IRE)
    pub white_16b_ire: i32,
    /// 16-bit sample value of reference black
    pub black_16b_ire: i32,

    pub field_width: i32,
    pub field_height: i32,
    /// Samples per second of the TBC stream
    pub sample_rate: i32,
    /// Colour subcarrier frequency in Hz
    pub fsc: i32,

    /// Whether the capture has been through disc mapping
    pub is_mapped: bool,

    /// Decoder provenance
    pub git_branch: Option<String>,
    pub git_commit: Option<String>,

    /// Set once the block has been populated from a document or by a producer
    pub is_valid: bool,
}

impl Default for VideoParameters {
    fn default() -> Self {
        Self {
            system: VideoSystem::Pal,
            is_subcarrier_locked: false,
            is_widescreen: false,
            colour_burst_start: 0,
            colour_burst_end: 0,
            active_video_start: 0,
            active_video_end: 0,
            white_16b_ire: 0,
            black_16b_ire: 0,
            field_width: 0,
            field_height: 0,
            sample_rate: 0,
            fsc: 0,
            is_mapped: false,
            git_branch: None,
            git_commit: None,
            is_valid: false,
        }
    }
}

impl VideoParameters {
    /// Typical ld-decode PAL geometry (4fsc sampling)
    pub fn pal() -> Self {
        Self {
            system: VideoSystem::Pal,
            colour_burst_start: 98,
            colour_burst_end: 138,
            active_video_start: 185,
            active_video_end: 1107,
            white_16b_ire: 54016,
            black_16b_ire: 16384,
            field_width: 1135,
            field_height: 313,
            sample_rate: 17_734_475,
            fsc: 4_433_618,
            is_valid: true,
            ..Default::default()
        }
    }

    /// Typical ld-decode NTSC geometry (4fsc sampling)
    pub fn ntsc() -> Self {
        Self {
            system: VideoSystem::Ntsc,
            colour_burst_start: 78,
            colour_burst_end: 110,
            active_video_start: 134,
            active_video_end: 894,
            white_16b_ire: 51200,
            black_16b_ire: 15360,
            field_width: 910,
            field_height: 263,
            sample_rate: 14_318_181,
            fsc: 3_579_545,
            is_valid: true,
            ..Default::default()
        }
    }

    /// Number of sample columns in the active picture
    pub fn active_video_width(&self) -> i32 {
        (self.active_video_end - self.active_video_start).max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frames_per_second() {
        assert_eq!(VideoSystem::Pal.frames_per_second(), 25);
        assert_eq!(VideoSystem::Ntsc.frames_per_second(), 30);
    }

    #[test]
    fn test_system_serde_names() {
        assert_eq!(serde_json::to_string(&VideoSystem::Pal).unwrap(), "\"PAL\"");
        let ntsc: VideoSystem = serde_json::from_str("\"NTSC\"").unwrap();
        assert_eq!(ntsc, VideoSystem::Ntsc);
    }

    #[test]
    fn test_default_is_invalid() {
        let params = VideoParameters::default();
        assert!(!params.is_valid);
        assert!(VideoParameters::pal().is_valid);
    }

    #[test]
    fn test_active_video_width() {
        assert_eq!(VideoParameters::pal().active_video_width(), 922);
        let inverted = VideoParameters {
            active_video_start: 10,
            active_video_end: 5,
            ..Default::default()
        };
        assert_eq!(inverted.active_video_width(), 0);
    }
}
