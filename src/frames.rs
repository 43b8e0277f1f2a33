//! Frame addressing
//!
//! Frame `k` (1-based) is built from stored fields `2k-1` and `2k`. When
//! the capture is first-field-first, field `2k-1` must be a first field
//! and `2k` a second field; otherwise the roles are swapped. A stored
//! parity that disagrees means a field was dropped or duplicated
//! upstream and has not been repaired with padding.

use crate::error::{MetadataError, Result};
use crate::field::Field;

/// The two fields composing a frame, by sequence number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FramePair {
    pub first_field: u32,
    pub second_field: u32,
}

/// Number of complete frames; a trailing unpaired field is not counted
pub fn number_of_frames(number_of_fields: u32) -> u32 {
    number_of_fields / 2
}

pub(crate) fn field_count(fields: &[Field]) -> u32 {
    u32::try_from(fields.len()).unwrap_or(u32::MAX)
}

/// Resolve the fields of `frame`, checking their stored parity
pub fn field_pair(fields: &[Field], is_first_field_first: bool, frame: u32) -> Result<FramePair> {
    let frames = number_of_frames(field_count(fields));
    if frame == 0 || frame > frames {
        return Err(MetadataError::FrameNotFound {
            frame,
            number_of_frames: frames,
        });
    }

    let leading = frame * 2 - 1;
    let trailing = frame * 2;
    let pair = if is_first_field_first {
        FramePair {
            first_field: leading,
            second_field: trailing,
        }
    } else {
        FramePair {
            first_field: trailing,
            second_field: leading,
        }
    };

    check_parity(fields, frame, pair.first_field, true)?;
    check_parity(fields, frame, pair.second_field, false)?;
    Ok(pair)
}

/// Sequence number of the first field of `frame`
pub fn first_field_number(fields: &[Field], is_first_field_first: bool, frame: u32) -> Result<u32> {
    field_pair(fields, is_first_field_first, frame).map(|pair| pair.first_field)
}

/// Sequence number of the second field of `frame`
pub fn second_field_number(
    fields: &[Field],
    is_first_field_first: bool,
    frame: u32,
) -> Result<u32> {
    field_pair(fields, is_first_field_first, frame).map(|pair| pair.second_field)
}

/// Frame containing field `seq_no`
pub fn frame_number_for_field(
    fields: &[Field],
    is_first_field_first: bool,
    seq_no: u32,
) -> Result<u32> {
    let count = field_count(fields);
    if seq_no == 0 || seq_no > count {
        return Err(MetadataError::FieldNotFound {
            seq_no,
            number_of_fields: count,
        });
    }

    let frame = (seq_no - 1) / 2 + 1;
    let frames = number_of_frames(count);
    if frame > frames {
        return Err(MetadataError::FrameNotFound {
            frame,
            number_of_frames: frames,
        });
    }

    let leading = seq_no % 2 == 1;
    check_parity(fields, frame, seq_no, leading == is_first_field_first)?;
    Ok(frame)
}

fn check_parity(fields: &[Field], frame: u32, seq_no: u32, expect_first: bool) -> Result<()> {
    let field = fields
        .get((seq_no as usize).wrapping_sub(1))
        .ok_or(MetadataError::FieldNotFound {
            seq_no,
            number_of_fields: field_count(fields),
        })?;
    if field.is_first_field != expect_first {
        return Err(MetadataError::FieldOrder { frame, seq_no });
    }
    Ok(())
}
