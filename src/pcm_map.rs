//! PCM audio sample map
//!
//! Field duration and audio sample rate are not commensurate, so each
//! field's reported `audio_samples` is taken as ground truth and the
//! position of a field's audio in the continuous stream is the running
//! sum of everything before it.

use std::ops::Range;

use crate::field::Field;

/// Start and length of every field's audio, indexed by `seq_no - 1`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PcmAudioMap {
    starts: Vec<u64>,
    lengths: Vec<u32>,
    total_samples: u64,
}

impl PcmAudioMap {
    /// Build the map in one pass over the fields
    pub fn build(fields: &[Field]) -> Self {
        let mut starts = Vec::with_capacity(fields.len());
        let mut lengths = Vec::with_capacity(fields.len());
        let mut position = 0u64;

        for field in fields {
            starts.push(position);
            lengths.push(field.audio_samples);
            position += field.audio_samples as u64;
        }

        Self {
            starts,
            lengths,
            total_samples: position,
        }
    }

    pub fn len(&self) -> usize {
        self.starts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.starts.is_empty()
    }

    /// First sample of field `seq_no`
    pub fn start(&self, seq_no: u32) -> Option<u64> {
        index(seq_no).and_then(|i| self.starts.get(i).copied())
    }

    /// Sample count of field `seq_no`
    pub fn length(&self, seq_no: u32) -> Option<u32> {
        index(seq_no).and_then(|i| self.lengths.get(i).copied())
    }

    /// Half-open sample range of field `seq_no`
    pub fn sample_range(&self, seq_no: u32) -> Option<Range<u64>> {
        let start = self.start(seq_no)?;
        let length = self.length(seq_no)?;
        Some(start..start + length as u64)
    }

    pub fn total_samples(&self) -> u64 {
        self.total_samples
    }
}

fn index(seq_no: u32) -> Option<usize> {
    (seq_no as usize).checked_sub(1)
}
