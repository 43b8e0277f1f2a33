//! CLV timecode conversion
//!
//! Constant linear velocity discs address pictures by
//! hours:minutes:seconds plus a picture number within the second.

use std::fmt;
use std::str::FromStr;

use crate::error::{MetadataError, Result};
use crate::video::VideoSystem;

/// CLV disc timecode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ClvTimecode {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
    pub picture_number: u32,
}

impl ClvTimecode {
    pub fn new(hours: u32, minutes: u32, seconds: u32, picture_number: u32) -> Self {
        Self {
            hours,
            minutes,
            seconds,
            picture_number,
        }
    }
}

/// Formats as `H:MM:SS.PP`
impl fmt::Display for ClvTimecode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{:02}:{:02}.{:02}",
            self.hours, self.minutes, self.seconds, self.picture_number
        )
    }
}

impl FromStr for ClvTimecode {
    type Err = MetadataError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid =
            || MetadataError::InvalidTimecode(format!("expected H:MM:SS.PP, got '{}'", s));

        let (clock, picture) = s.trim().split_once('.').ok_or_else(invalid)?;
        let mut parts = clock.split(':');
        let (hours, minutes, seconds) =
            match (parts.next(), parts.next(), parts.next(), parts.next()) {
                (Some(h), Some(m), Some(sec), None) => (h, m, sec),
                _ => return Err(invalid()),
            };
        let parse = |part: &str| part.parse::<u32>().map_err(|_| invalid());

        Ok(Self {
            hours: parse(hours)?,
            minutes: parse(minutes)?,
            seconds: parse(seconds)?,
            picture_number: parse(picture)?,
        })
    }
}

/// Converts between absolute frame numbers and CLV timecodes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClvTimecodeConverter {
    frames_per_second: u32,
}

impl ClvTimecodeConverter {
    pub fn new(frames_per_second: u32) -> Result<Self> {
        if frames_per_second == 0 {
            return Err(MetadataError::InvalidParameter(
                "frames per second must be positive".to_string(),
            ));
        }
        Ok(Self { frames_per_second })
    }

    pub fn for_system(system: VideoSystem) -> Self {
        Self {
            frames_per_second: system.frames_per_second(),
        }
    }

    pub fn frames_per_second(&self) -> u32 {
        self.frames_per_second
    }

    pub fn frame_to_timecode(&self, frame_number: u32) -> ClvTimecode {
        let fps = self.frames_per_second;
        let total_seconds = frame_number / fps;
        ClvTimecode {
            hours: total_seconds / 3600,
            minutes: (total_seconds / 60) % 60,
            seconds: total_seconds % 60,
            picture_number: frame_number % fps,
        }
    }

    pub fn timecode_to_frame(&self, timecode: &ClvTimecode) -> Result<u32> {
        let fps = self.frames_per_second;
        if timecode.picture_number >= fps {
            return Err(MetadataError::InvalidTimecode(format!(
                "picture number {} must be below {}",
                timecode.picture_number, fps
            )));
        }
        if timecode.minutes >= 60 {
            return Err(MetadataError::InvalidTimecode(format!(
                "minutes {} must be below 60",
                timecode.minutes
            )));
        }
        if timecode.seconds >= 60 {
            return Err(MetadataError::InvalidTimecode(format!(
                "seconds {} must be below 60",
                timecode.seconds
            )));
        }

        timecode
            .hours
            .checked_mul(3600)
            .and_then(|s| s.checked_add(timecode.minutes * 60 + timecode.seconds))
            .and_then(|s| s.checked_mul(fps))
            .and_then(|f| f.checked_add(timecode.picture_number))
            .ok_or_else(|| MetadataError::InvalidTimecode(format!("{} is out of range", timecode)))
    }
}
