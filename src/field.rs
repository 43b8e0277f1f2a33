//! Field record model

use crate::dropouts::DropOuts;

/// Signal quality measured on the vertical interval test signal
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VitsMetrics {
    /// White level signal-to-noise ratio
    pub w_snr: f64,
    /// Black level peak signal-to-noise ratio
    pub b_psnr: f64,
}

/// Decoded VBI words, stored opaquely
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vbi {
    pub vbi_data: Vec<i32>,
}

/// NTSC-only auxiliary data
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Ntsc {
    pub is_fm_code_data_valid: bool,
    pub fm_code_data: i32,
    pub field_flag: bool,
    pub white_flag: bool,
    pub cc_data0: i32,
    pub cc_data1: i32,
}

/// One decoded field
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Field {
    /// 1-based position in the capture, assigned by the store
    pub seq_no: u32,
    pub is_first_field: bool,
    pub sync_conf: i32,
    pub median_burst_ire: f64,
    /// Subcarrier phase class of the field
    pub field_phase_id: i32,
    /// PCM audio samples captured during this field
    pub audio_samples: u32,

    pub vits_metrics: Option<VitsMetrics>,
    pub vbi: Option<Vbi>,
    pub ntsc: Option<Ntsc>,
    pub drop_outs: DropOuts,

    /// Synthetic filler inserted to repair a gap in the capture
    pub pad: bool,

    /// Position on the disc
    pub disk_loc: f64,
    /// Sample offset in the raw capture file
    pub file_loc: i64,
    pub decode_faults: i32,
    /// EFM symbol errors
    pub efm_t_values: i32,
}

impl Field {
    pub fn new(is_first_field: bool) -> Self {
        Self {
            is_first_field,
            ..Default::default()
        }
    }

    /// Filler field with every metric zeroed and no auxiliary blocks
    pub fn padding(is_first_field: bool) -> Self {
        Self {
            is_first_field,
            pad: true,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_padding_field() {
        let field = Field::padding(false);
        assert!(field.pad);
        assert!(!field.is_first_field);
        assert_eq!(field.audio_samples, 0);
        assert!(field.vits_metrics.is_none());
        assert!(field.vbi.is_none());
        assert!(field.ntsc.is_none());
        assert!(field.drop_outs.is_empty());
    }
}
