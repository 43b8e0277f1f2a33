//! Per-field dropout runs
//!
//! Runs come from the external dropout detector and are kept exactly as
//! set: no merging, no overlap resolution.

use crate::lines::LineParameters;

/// A contiguous run of corrupt samples on one field line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropoutRun {
    /// First corrupt sample column
    pub start_x: u32,
    /// End sample column (exclusive)
    pub end_x: u32,
    pub field_line: u32,
}

impl DropoutRun {
    pub fn new(start_x: u32, end_x: u32, field_line: u32) -> Self {
        Self {
            start_x,
            end_x,
            field_line,
        }
    }

    pub fn len(&self) -> u64 {
        self.end_x.saturating_sub(self.start_x) as u64
    }

    pub fn is_empty(&self) -> bool {
        self.end_x <= self.start_x
    }
}

/// Ordered dropout runs of one field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DropOuts {
    runs: Vec<DropoutRun>,
}

impl DropOuts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn runs(&self) -> &[DropoutRun] {
        &self.runs
    }

    pub fn push(&mut self, run: DropoutRun) {
        self.runs.push(run);
    }

    pub fn clear(&mut self) {
        self.runs.clear();
    }

    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Sum of all run extents in samples
    pub fn total_length(&self) -> u64 {
        self.runs.iter().map(DropoutRun::len).sum()
    }

    /// Sum of run extents inside the visible picture.
    ///
    /// Only runs on active lines count, and each run is clipped to the
    /// active video columns `[active_video_start, active_video_end)`.
    pub fn visible_length(
        &self,
        lines: &LineParameters,
        active_video_start: i32,
        active_video_end: i32,
    ) -> u64 {
        let video_start = active_video_start.max(0) as u64;
        let video_end = active_video_end.max(0) as u64;

        self.runs
            .iter()
            .filter(|run| {
                i32::try_from(run.field_line)
                    .map(|line| lines.contains_field_line(line))
                    .unwrap_or(false)
            })
            .map(|run| {
                let start = (run.start_x as u64).max(video_start);
                let end = (run.end_x as u64).min(video_end);
                end.saturating_sub(start)
            })
            .sum()
    }
}

impl FromIterator<DropoutRun> for DropOuts {
    fn from_iter<I: IntoIterator<Item = DropoutRun>>(iter: I) -> Self {
        Self {
            runs: iter.into_iter().collect(),
        }
    }
}

impl From<Vec<DropoutRun>> for DropOuts {
    fn from(runs: Vec<DropoutRun>) -> Self {
        Self { runs }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lines::LineOverrides;
    use crate::video::VideoSystem;

    fn pal_lines() -> LineParameters {
        LineParameters::resolve(&LineOverrides::default(), VideoSystem::Pal, 313).unwrap()
    }

    #[test]
    fn test_total_length() {
        let dropouts: DropOuts = vec![
            DropoutRun::new(100, 150, 30),
            DropoutRun::new(10, 12, 5),
            DropoutRun::new(400, 400, 40),
        ]
        .into();
        assert_eq!(dropouts.len(), 3);
        assert_eq!(dropouts.total_length(), 52);
    }

    #[test]
    fn test_preserves_order_and_overlap() {
        let mut dropouts = DropOuts::new();
        dropouts.push(DropoutRun::new(200, 300, 50));
        dropouts.push(DropoutRun::new(250, 350, 50));
        assert_eq!(dropouts.runs()[0].start_x, 200);
        assert_eq!(dropouts.runs()[1].start_x, 250);
        assert_eq!(dropouts.total_length(), 200);
    }

    #[test]
    fn test_clear() {
        let mut dropouts: DropOuts = vec![DropoutRun::new(1, 2, 3)].into();
        dropouts.clear();
        assert!(dropouts.is_empty());
        assert_eq!(dropouts.total_length(), 0);
    }

    #[test]
    fn test_visible_length_clips_columns_and_lines() {
        let lines = pal_lines();
        let dropouts: DropOuts = vec![
            // straddles the start of active video
            DropoutRun::new(150, 200, 100),
            // inside
            DropoutRun::new(500, 510, 22),
            // on the excluded last line
            DropoutRun::new(500, 600, 308),
            // above the active area
            DropoutRun::new(500, 600, 10),
            // straddles the end of active video
            DropoutRun::new(1100, 1130, 200),
        ]
        .into();
        assert_eq!(dropouts.visible_length(&lines, 185, 1107), 15 + 10 + 7);
    }
}
