//! Active line range resolution
//!
//! Lines are numbered within a field (or within an interlaced frame) and
//! the active ranges are half-open: `last_active_field_line` itself is not
//! part of the picture.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{MetadataError, Result};
use crate::video::VideoSystem;

/// First active field line used when the configured line cannot be
/// trusted. An external line-detection pass refines it.
pub const AUTO_FIRST_ACTIVE_FIELD_LINE: i32 = 1;

/// Documented line defaults for one video standard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineDefaults {
    pub first_active_field_line: i32,
    pub last_active_field_line: i32,
    /// Lowest first active frame line the standard allows
    pub min_first_active_frame_line: i32,
}

pub const PAL_LINE_DEFAULTS: LineDefaults = LineDefaults {
    first_active_field_line: 22,
    last_active_field_line: 308,
    min_first_active_frame_line: 2,
};

pub const NTSC_LINE_DEFAULTS: LineDefaults = LineDefaults {
    first_active_field_line: 20,
    last_active_field_line: 259,
    min_first_active_frame_line: 1,
};

impl LineDefaults {
    pub fn for_system(system: VideoSystem) -> Self {
        match system {
            VideoSystem::Pal => PAL_LINE_DEFAULTS,
            VideoSystem::Ntsc => NTSC_LINE_DEFAULTS,
        }
    }
}

/// Explicit active line bounds supplied by the caller
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineOverrides {
    pub first_active_field_line: Option<i32>,
    pub last_active_field_line: Option<i32>,
}

impl LineOverrides {
    pub fn new(first_active_field_line: i32, last_active_field_line: i32) -> Self {
        Self {
            first_active_field_line: Some(first_active_field_line),
            last_active_field_line: Some(last_active_field_line),
        }
    }

    pub fn is_explicit(&self) -> bool {
        self.first_active_field_line.is_some() || self.last_active_field_line.is_some()
    }
}

/// Resolved active line range of a capture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineParameters {
    pub first_active_field_line: i32,
    pub last_active_field_line: i32,
    pub first_active_frame_line: i32,
    pub last_active_frame_line: i32,
    /// The first line is the auto-detect sentinel, not a validated bound
    pub provisional: bool,
}

impl LineParameters {
    /// Resolve the active line range for a field of `field_height` lines.
    ///
    /// Missing overrides are taken from the standard's defaults, with the
    /// default last line clamped to the field height. A first line whose
    /// frame equivalent is below the standard's minimum is replaced by
    /// [`AUTO_FIRST_ACTIVE_FIELD_LINE`] and the result is marked
    /// provisional.
    pub fn resolve(
        overrides: &LineOverrides,
        system: VideoSystem,
        field_height: i32,
    ) -> Result<Self> {
        let defaults = LineDefaults::for_system(system);

        let mut first = overrides
            .first_active_field_line
            .unwrap_or(defaults.first_active_field_line);
        let last = overrides
            .last_active_field_line
            .unwrap_or_else(|| defaults.last_active_field_line.min(field_height));

        if overrides.is_explicit() && !bounds_valid(first, last, field_height) {
            return Err(MetadataError::InvalidParameter(format!(
                "active field lines {}..{} do not fit a {} field of {} lines",
                first, last, system, field_height
            )));
        }

        let mut provisional = false;
        if first.saturating_mul(2) < defaults.min_first_active_frame_line {
            debug!(
                "First active frame line {} is below the {} minimum {}, using line {}",
                first.saturating_mul(2),
                system,
                defaults.min_first_active_frame_line,
                AUTO_FIRST_ACTIVE_FIELD_LINE
            );
            first = AUTO_FIRST_ACTIVE_FIELD_LINE;
            provisional = true;
        }

        if !bounds_valid(first, last, field_height) {
            return Err(MetadataError::InvalidParameter(format!(
                "field height {} cannot hold active lines {}..{}",
                field_height, first, last
            )));
        }

        let first_frame = first.checked_mul(2);
        let last_frame = last.checked_mul(2);
        match (first_frame, last_frame) {
            (Some(first_active_frame_line), Some(last_active_frame_line)) => Ok(Self {
                first_active_field_line: first,
                last_active_field_line: last,
                first_active_frame_line,
                last_active_frame_line,
                provisional,
            }),
            _ => Err(MetadataError::InvalidParameter(format!(
                "field height {} is out of range",
                field_height
            ))),
        }
    }

    /// Number of active lines in one field
    pub fn active_field_lines(&self) -> i32 {
        self.last_active_field_line - self.first_active_field_line
    }

    /// Whether a field line lies in the active range
    pub fn contains_field_line(&self, line: i32) -> bool {
        line >= self.first_active_field_line && line < self.last_active_field_line
    }
}

fn bounds_valid(first: i32, last: i32, field_height: i32) -> bool {
    0 <= first && first < last && last <= field_height
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve_default(system: VideoSystem, field_height: i32) -> Result<LineParameters> {
        LineParameters::resolve(&LineOverrides::default(), system, field_height)
    }

    fn assert_invariant(lines: &LineParameters, field_height: i32) {
        assert!(0 <= lines.first_active_field_line);
        assert!(lines.first_active_field_line < lines.last_active_field_line);
        assert!(lines.last_active_field_line <= field_height);
        assert_eq!(lines.first_active_frame_line, 2 * lines.first_active_field_line);
        assert_eq!(lines.last_active_frame_line, 2 * lines.last_active_field_line);
    }

    #[test]
    fn test_pal_defaults() {
        let lines = resolve_default(VideoSystem::Pal, 313).unwrap();
        assert_eq!(lines.first_active_field_line, 22);
        assert_eq!(lines.last_active_field_line, 308);
        assert_eq!(lines.first_active_frame_line, 44);
        assert_eq!(lines.last_active_frame_line, 616);
        assert!(!lines.provisional);
        assert_invariant(&lines, 313);
    }

    #[test]
    fn test_ntsc_defaults() {
        let lines = resolve_default(VideoSystem::Ntsc, 263).unwrap();
        assert_eq!(lines.first_active_field_line, 20);
        assert_eq!(lines.last_active_field_line, 259);
        assert_invariant(&lines, 263);
    }

    #[test]
    fn test_default_last_line_clamped_to_height() {
        let lines = resolve_default(VideoSystem::Pal, 300).unwrap();
        assert_eq!(lines.last_active_field_line, 300);
        assert_invariant(&lines, 300);
    }

    #[test]
    fn test_explicit_overrides_accepted() {
        let overrides = LineOverrides::new(30, 250);
        let lines = LineParameters::resolve(&overrides, VideoSystem::Ntsc, 263).unwrap();
        assert_eq!(lines.first_active_field_line, 30);
        assert_eq!(lines.last_active_field_line, 250);
        assert_invariant(&lines, 263);
    }

    #[test]
    fn test_partial_override_merges_with_defaults() {
        let overrides = LineOverrides {
            first_active_field_line: None,
            last_active_field_line: Some(300),
        };
        let lines = LineParameters::resolve(&overrides, VideoSystem::Pal, 313).unwrap();
        assert_eq!(lines.first_active_field_line, 22);
        assert_eq!(lines.last_active_field_line, 300);
    }

    #[test]
    fn test_inverted_override_rejected() {
        let overrides = LineOverrides::new(200, 100);
        let err = LineParameters::resolve(&overrides, VideoSystem::Pal, 313).unwrap_err();
        assert!(matches!(err, MetadataError::InvalidParameter(_)));
    }

    #[test]
    fn test_override_beyond_height_rejected() {
        let overrides = LineOverrides::new(22, 400);
        assert!(LineParameters::resolve(&overrides, VideoSystem::Pal, 313).is_err());
    }

    #[test]
    fn test_first_line_below_minimum_is_provisional() {
        let overrides = LineOverrides::new(0, 300);
        let lines = LineParameters::resolve(&overrides, VideoSystem::Pal, 313).unwrap();
        assert_eq!(lines.first_active_field_line, AUTO_FIRST_ACTIVE_FIELD_LINE);
        assert!(lines.provisional);
        assert_invariant(&lines, 313);
    }

    #[test]
    fn test_degenerate_height_rejected() {
        let err = resolve_default(VideoSystem::Pal, 10).unwrap_err();
        assert!(matches!(err, MetadataError::InvalidParameter(_)));
    }

    #[test]
    fn test_invariant_over_heights() {
        for height in 30..400 {
            for system in [VideoSystem::Pal, VideoSystem::Ntsc] {
                if let Ok(lines) = resolve_default(system, height) {
                    assert_invariant(&lines, height);
                }
            }
        }
    }

    #[test]
    fn test_contains_field_line() {
        let lines = resolve_default(VideoSystem::Pal, 313).unwrap();
        assert!(!lines.contains_field_line(21));
        assert!(lines.contains_field_line(22));
        assert!(lines.contains_field_line(307));
        assert!(!lines.contains_field_line(308));
        assert_eq!(lines.active_field_lines(), 286);
    }
}
