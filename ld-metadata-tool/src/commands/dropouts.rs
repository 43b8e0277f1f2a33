//! Per-frame dropout analysis
//!
//! A frame's dropout length is the sum of its two fields' lengths.

use std::io::Write;

use ld_metadata::MetadataStore;
use tracing::debug;

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameDropouts {
    pub frame: u32,
    pub first_field: u32,
    pub second_field: u32,
    pub length: u64,
}

/// Dropout length of every frame, optionally limited to the visible area
pub fn frame_dropouts(store: &MetadataStore, visible_only: bool) -> Result<Vec<FrameDropouts>> {
    let field_length = |seq_no: u32| {
        if visible_only {
            store.field_visible_dropout_length(seq_no)
        } else {
            store.field_dropout_length(seq_no)
        }
    };

    let mut frames = Vec::with_capacity(store.number_of_frames() as usize);
    for frame in 1..=store.number_of_frames() {
        let pair = store.field_pair(frame)?;
        frames.push(FrameDropouts {
            frame,
            first_field: pair.first_field,
            second_field: pair.second_field,
            length: field_length(pair.first_field)? + field_length(pair.second_field)?,
        });
    }
    Ok(frames)
}

pub fn run<W: Write>(store: &MetadataStore, visible_only: bool, out: &mut W) -> Result<()> {
    let frames = frame_dropouts(store, visible_only)?;

    writeln!(out, "frame\tfirst\tsecond\tlength")?;
    for frame in &frames {
        writeln!(
            out,
            "{}\t{}\t{}\t{}",
            frame.frame, frame.first_field, frame.second_field, frame.length
        )?;
    }

    let total: u64 = frames.iter().map(|f| f.length).sum();
    if let Some(worst) = frames.iter().max_by_key(|f| f.length) {
        debug!(
            "{} frames, {} dropout samples, worst frame {} ({})",
            frames.len(),
            total,
            worst.frame,
            worst.length
        );
    }
    Ok(())
}
