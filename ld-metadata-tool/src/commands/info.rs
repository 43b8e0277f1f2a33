//! Document summary

use std::fmt;
use std::io::Write;

use ld_metadata::{LineParameters, MetadataStore, VideoSystem};

use crate::error::Result;

/// Summary of one capture's metadata
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub system: VideoSystem,
    pub field_width: i32,
    pub field_height: i32,
    pub number_of_fields: u32,
    pub number_of_frames: u32,
    pub padded_fields: u32,
    pub lines: Option<LineParameters>,
    pub pcm_sample_rate: Option<i32>,
    pub total_pcm_samples: u64,
    pub dropout_runs: usize,
    pub dropout_samples: u64,
    pub decoder_commit: Option<String>,
}

pub fn summarize(store: &MetadataStore) -> Summary {
    let video = store.video_parameters();
    let pcm = store.pcm_audio_parameters();
    let fields = store.fields();

    Summary {
        system: video.system,
        field_width: video.field_width,
        field_height: video.field_height,
        number_of_fields: store.number_of_fields(),
        number_of_frames: store.number_of_frames(),
        padded_fields: fields.iter().filter(|f| f.pad).count() as u32,
        lines: store.line_parameters().copied(),
        pcm_sample_rate: pcm.is_valid.then_some(pcm.sample_rate),
        total_pcm_samples: store.total_pcm_audio_samples(),
        dropout_runs: fields.iter().map(|f| f.drop_outs.len()).sum(),
        dropout_samples: fields.iter().map(|f| f.drop_outs.total_length()).sum(),
        decoder_commit: video.git_commit.clone(),
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "System:          {}", self.system)?;
        writeln!(f, "Field size:      {}x{}", self.field_width, self.field_height)?;
        writeln!(
            f,
            "Fields:          {} ({} frames, {} padded)",
            self.number_of_fields, self.number_of_frames, self.padded_fields
        )?;
        match &self.lines {
            Some(lines) => writeln!(
                f,
                "Active lines:    field {}-{}, frame {}-{}{}",
                lines.first_active_field_line,
                lines.last_active_field_line,
                lines.first_active_frame_line,
                lines.last_active_frame_line,
                if lines.provisional { " (provisional)" } else { "" }
            )?,
            None => writeln!(f, "Active lines:    unknown")?,
        }
        match self.pcm_sample_rate {
            Some(rate) if rate > 0 => writeln!(
                f,
                "PCM audio:       {} samples ({:.2}s at {} Hz)",
                self.total_pcm_samples,
                self.total_pcm_samples as f64 / rate as f64,
                rate
            )?,
            _ => writeln!(f, "PCM audio:       {} samples", self.total_pcm_samples)?,
        }
        writeln!(
            f,
            "Dropouts:        {} runs, {} samples",
            self.dropout_runs, self.dropout_samples
        )?;
        if let Some(commit) = &self.decoder_commit {
            writeln!(f, "Decoder commit:  {}", commit)?;
        }
        Ok(())
    }
}

pub fn run<W: Write>(store: &MetadataStore, out: &mut W) -> Result<()> {
    write!(out, "{}", summarize(store))?;
    Ok(())
}
