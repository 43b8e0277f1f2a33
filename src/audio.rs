//! PCM audio stream format

/// Format of the analogue audio captured alongside the video
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PcmAudioParameters {
    pub sample_rate: i32,
    pub is_little_endian: bool,
    pub is_signed: bool,
    pub bits: i32,
    pub is_valid: bool,
}

/// The PCM stream is always interleaved stereo
pub const PCM_AUDIO_CHANNELS: u64 = 2;

impl Default for PcmAudioParameters {
    fn default() -> Self {
        Self {
            sample_rate: 0,
            is_little_endian: false,
            is_signed: false,
            bits: 0,
            is_valid: false,
        }
    }
}

impl PcmAudioParameters {
    /// ld-decode's standard output: 44.1kHz signed 16-bit little endian
    pub fn cd_quality() -> Self {
        Self {
            sample_rate: 44100,
            is_little_endian: true,
            is_signed: true,
            bits: 16,
            is_valid: true,
        }
    }

    /// Bytes occupied by one stereo sample frame, or 0 if the bit depth
    /// is not a whole number of bytes
    pub fn bytes_per_sample(&self) -> u64 {
        if self.bits <= 0 || self.bits % 8 != 0 {
            return 0;
        }
        (self.bits as u64 / 8) * PCM_AUDIO_CHANNELS
    }
}
