//! Metadata store
//!
//! The single in-memory representation of one capture's metadata. The
//! store owns the field sequence and both parameter blocks. Active line
//! bounds are re-resolved whenever the video parameters or line
//! overrides are replaced; the PCM audio map is rebuilt lazily on the
//! first audio query after any change to field audio sample counts.
//!
//! The store is not internally synchronized. A failed operation leaves
//! it unmodified.

use std::cell::OnceCell;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::audio::PcmAudioParameters;
use crate::dropouts::DropOuts;
use crate::error::{MetadataError, Result};
use crate::field::{Field, Ntsc, Vbi, VitsMetrics};
use crate::frames::{self, FramePair};
use crate::lines::{LineOverrides, LineParameters};
use crate::pcm_map::PcmAudioMap;
use crate::schema::Document;
use crate::timecode::{ClvTimecode, ClvTimecodeConverter};
use crate::video::VideoParameters;

#[derive(Debug)]
pub struct MetadataStore {
    video_parameters: VideoParameters,
    pcm_audio_parameters: PcmAudioParameters,
    line_overrides: LineOverrides,
    line_parameters: Option<LineParameters>,
    fields: Vec<Field>,
    is_first_field_first: bool,
    audio_map: OnceCell<PcmAudioMap>,
}

impl Default for MetadataStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MetadataStore {
    /// Create an empty store with invalid parameter blocks
    pub fn new() -> Self {
        Self {
            video_parameters: VideoParameters::default(),
            pcm_audio_parameters: PcmAudioParameters::default(),
            line_overrides: LineOverrides::default(),
            line_parameters: None,
            fields: Vec::new(),
            is_first_field_first: true,
            audio_map: OnceCell::new(),
        }
    }

    /// Create a store and load a metadata document from `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut store = Self::new();
        store.read_file(path)?;
        Ok(store)
    }

    // ---- Persistence ----

    /// Replace the store's contents with a parsed metadata document.
    ///
    /// A document whose field height cannot hold the standard's active
    /// lines still loads, with [`line_parameters`](Self::line_parameters)
    /// left unresolved. Explicit line overrides that do not fit the
    /// document fail with `InvalidParameter`.
    pub fn read<R: Read>(&mut self, reader: R) -> Result<()> {
        let value: Value = serde_json::from_reader(reader)?;
        let parts = Document::from_value(value)?.into_parts()?;
        let line_parameters = match resolve_lines(&parts.video_parameters, &self.line_overrides) {
            Ok(lines) => lines,
            Err(e) if !self.line_overrides.is_explicit() => {
                warn!("No active lines for the document's field geometry: {}", e);
                None
            }
            Err(e) => return Err(e),
        };

        self.video_parameters = parts.video_parameters;
        self.pcm_audio_parameters = parts.pcm_audio_parameters;
        self.line_parameters = line_parameters;
        self.fields = parts.fields;
        self.invalidate_audio_map();

        debug!(
            "Loaded {} fields ({} frames), {}",
            self.fields.len(),
            self.number_of_frames(),
            self.video_parameters.system
        );
        Ok(())
    }

    pub fn read_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        info!("Reading metadata from {}", path.display());
        let file = File::open(path)?;
        self.read(BufReader::new(file))
    }

    /// Serialize the store as a metadata document
    pub fn write<W: Write>(&self, mut writer: W) -> Result<()> {
        let document = Document::from_parts(
            &self.video_parameters,
            &self.pcm_audio_parameters,
            &self.fields,
        );
        serde_json::to_writer(&mut writer, &document)?;
        writer.flush()?;
        Ok(())
    }

    pub fn write_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        info!("Writing metadata for {} fields to {}", self.fields.len(), path.display());
        let file = File::create(path)?;
        self.write(BufWriter::new(file))
    }

    // ---- Parameter blocks ----

    pub fn video_parameters(&self) -> &VideoParameters {
        &self.video_parameters
    }

    /// Replace the video parameters and re-resolve the active lines
    pub fn set_video_parameters(&mut self, video_parameters: VideoParameters) -> Result<()> {
        self.line_parameters = resolve_lines(&video_parameters, &self.line_overrides)?;
        self.video_parameters = video_parameters;
        Ok(())
    }

    pub fn pcm_audio_parameters(&self) -> &PcmAudioParameters {
        &self.pcm_audio_parameters
    }

    pub fn set_pcm_audio_parameters(&mut self, pcm_audio_parameters: PcmAudioParameters) {
        self.pcm_audio_parameters = pcm_audio_parameters;
    }

    pub fn line_overrides(&self) -> &LineOverrides {
        &self.line_overrides
    }

    /// Replace the explicit line bounds and re-resolve the active lines
    pub fn set_line_overrides(&mut self, line_overrides: LineOverrides) -> Result<()> {
        self.line_parameters = resolve_lines(&self.video_parameters, &line_overrides)?;
        self.line_overrides = line_overrides;
        Ok(())
    }

    /// Resolved active lines, or `None` until valid video parameters are set
    pub fn line_parameters(&self) -> Option<&LineParameters> {
        self.line_parameters.as_ref()
    }

    // ---- Fields ----

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn number_of_fields(&self) -> u32 {
        frames::field_count(&self.fields)
    }

    pub fn number_of_frames(&self) -> u32 {
        frames::number_of_frames(self.number_of_fields())
    }

    pub fn field(&self, seq_no: u32) -> Result<&Field> {
        let index = self.index_of(seq_no)?;
        Ok(&self.fields[index])
    }

    /// Append a field, returning its assigned sequence number
    pub fn append_field(&mut self, mut field: Field) -> u32 {
        let seq_no = self.number_of_fields() + 1;
        field.seq_no = seq_no;
        self.fields.push(field);
        self.invalidate_audio_map();
        seq_no
    }

    /// Replace the field stored at `seq_no`
    pub fn update_field(&mut self, seq_no: u32, mut field: Field) -> Result<()> {
        let index = self.index_of(seq_no)?;
        field.seq_no = seq_no;
        let audio_changed = self.fields[index].audio_samples != field.audio_samples;
        self.fields[index] = field;
        if audio_changed {
            self.invalidate_audio_map();
        }
        Ok(())
    }

    /// Truncate or pad the field sequence to `number_of_fields` fields.
    ///
    /// Padding fields continue the first/second alternation of the last
    /// stored field so frame pairing stays consistent.
    pub fn set_number_of_fields(&mut self, number_of_fields: u32) {
        let current = self.number_of_fields();
        if number_of_fields < current {
            debug!("Truncating {} fields to {}", current, number_of_fields);
            self.fields.truncate(number_of_fields as usize);
        } else if number_of_fields > current {
            debug!(
                "Padding {} fields with {} filler fields",
                current,
                number_of_fields - current
            );
            let mut next_is_first = self
                .fields
                .last()
                .map(|f| !f.is_first_field)
                .unwrap_or(self.is_first_field_first);
            for seq_no in current + 1..=number_of_fields {
                let mut field = Field::padding(next_is_first);
                field.seq_no = seq_no;
                self.fields.push(field);
                next_is_first = !next_is_first;
            }
        } else {
            return;
        }
        self.invalidate_audio_map();
    }

    pub fn field_vits_metrics(&self, seq_no: u32) -> Result<Option<&VitsMetrics>> {
        Ok(self.field(seq_no)?.vits_metrics.as_ref())
    }

    pub fn update_field_vits_metrics(
        &mut self,
        seq_no: u32,
        vits_metrics: Option<VitsMetrics>,
    ) -> Result<()> {
        self.field_mut(seq_no)?.vits_metrics = vits_metrics;
        Ok(())
    }

    pub fn field_vbi(&self, seq_no: u32) -> Result<Option<&Vbi>> {
        Ok(self.field(seq_no)?.vbi.as_ref())
    }

    pub fn update_field_vbi(&mut self, seq_no: u32, vbi: Option<Vbi>) -> Result<()> {
        self.field_mut(seq_no)?.vbi = vbi;
        Ok(())
    }

    pub fn field_ntsc(&self, seq_no: u32) -> Result<Option<&Ntsc>> {
        Ok(self.field(seq_no)?.ntsc.as_ref())
    }

    pub fn update_field_ntsc(&mut self, seq_no: u32, ntsc: Option<Ntsc>) -> Result<()> {
        self.field_mut(seq_no)?.ntsc = ntsc;
        Ok(())
    }

    // ---- Dropouts ----

    pub fn field_dropouts(&self, seq_no: u32) -> Result<&DropOuts> {
        Ok(&self.field(seq_no)?.drop_outs)
    }

    pub fn update_field_dropouts(&mut self, seq_no: u32, drop_outs: DropOuts) -> Result<()> {
        self.field_mut(seq_no)?.drop_outs = drop_outs;
        Ok(())
    }

    pub fn clear_field_dropouts(&mut self, seq_no: u32) -> Result<()> {
        self.field_mut(seq_no)?.drop_outs.clear();
        Ok(())
    }

    /// Total dropout extent of one field in samples
    pub fn field_dropout_length(&self, seq_no: u32) -> Result<u64> {
        Ok(self.field(seq_no)?.drop_outs.total_length())
    }

    /// Dropout extent of one field inside the visible picture area
    pub fn field_visible_dropout_length(&self, seq_no: u32) -> Result<u64> {
        let field = self.field(seq_no)?;
        let lines = self.line_parameters.as_ref().ok_or_else(|| {
            MetadataError::InvalidParameter("video parameters have not been set".to_string())
        })?;
        Ok(field.drop_outs.visible_length(
            lines,
            self.video_parameters.active_video_start,
            self.video_parameters.active_video_end,
        ))
    }

    // ---- Frame addressing ----

    pub fn is_first_field_first(&self) -> bool {
        self.is_first_field_first
    }

    pub fn set_is_first_field_first(&mut self, is_first_field_first: bool) {
        self.is_first_field_first = is_first_field_first;
    }

    pub fn field_pair(&self, frame: u32) -> Result<FramePair> {
        frames::field_pair(&self.fields, self.is_first_field_first, frame)
    }

    pub fn first_field_number(&self, frame: u32) -> Result<u32> {
        frames::first_field_number(&self.fields, self.is_first_field_first, frame)
    }

    pub fn second_field_number(&self, frame: u32) -> Result<u32> {
        frames::second_field_number(&self.fields, self.is_first_field_first, frame)
    }

    pub fn frame_number_for_field(&self, seq_no: u32) -> Result<u32> {
        frames::frame_number_for_field(&self.fields, self.is_first_field_first, seq_no)
    }

    // ---- CLV timecodes ----

    pub fn clv_converter(&self) -> ClvTimecodeConverter {
        ClvTimecodeConverter::for_system(self.video_parameters.system)
    }

    pub fn convert_frame_number_to_clv_timecode(&self, frame_number: u32) -> ClvTimecode {
        self.clv_converter().frame_to_timecode(frame_number)
    }

    pub fn convert_clv_timecode_to_frame_number(&self, timecode: &ClvTimecode) -> Result<u32> {
        self.clv_converter().timecode_to_frame(timecode)
    }

    // ---- PCM audio ----

    /// The per-field audio map, rebuilt here if stale
    pub fn pcm_audio_map(&self) -> &PcmAudioMap {
        self.audio_map.get_or_init(|| {
            debug!("Building PCM audio map for {} fields", self.fields.len());
            PcmAudioMap::build(&self.fields)
        })
    }

    pub fn field_pcm_audio_start(&self, seq_no: u32) -> Result<u64> {
        self.index_of(seq_no)?;
        self.pcm_audio_map()
            .start(seq_no)
            .ok_or_else(|| self.field_not_found(seq_no))
    }

    pub fn field_pcm_audio_length(&self, seq_no: u32) -> Result<u32> {
        self.index_of(seq_no)?;
        self.pcm_audio_map()
            .length(seq_no)
            .ok_or_else(|| self.field_not_found(seq_no))
    }

    pub fn total_pcm_audio_samples(&self) -> u64 {
        self.pcm_audio_map().total_samples()
    }

    /// Byte offset of a field's audio in the raw PCM file
    pub fn field_pcm_audio_byte_offset(&self, seq_no: u32) -> Result<u64> {
        let bytes_per_sample = self.pcm_audio_parameters.bytes_per_sample();
        if !self.pcm_audio_parameters.is_valid || bytes_per_sample == 0 {
            return Err(MetadataError::InvalidParameter(format!(
                "PCM audio parameters do not describe a byte-aligned stream ({} bits)",
                self.pcm_audio_parameters.bits
            )));
        }
        Ok(self.field_pcm_audio_start(seq_no)? * bytes_per_sample)
    }

    // ---- Internals ----

    fn index_of(&self, seq_no: u32) -> Result<usize> {
        if seq_no == 0 || seq_no > self.number_of_fields() {
            return Err(self.field_not_found(seq_no));
        }
        Ok(seq_no as usize - 1)
    }

    fn field_mut(&mut self, seq_no: u32) -> Result<&mut Field> {
        let index = self.index_of(seq_no)?;
        Ok(&mut self.fields[index])
    }

    fn field_not_found(&self, seq_no: u32) -> MetadataError {
        MetadataError::FieldNotFound {
            seq_no,
            number_of_fields: self.number_of_fields(),
        }
    }

    fn invalidate_audio_map(&mut self) {
        self.audio_map.take();
    }
}

fn resolve_lines(
    video_parameters: &VideoParameters,
    line_overrides: &LineOverrides,
) -> Result<Option<LineParameters>> {
    if !video_parameters.is_valid {
        return Ok(None);
    }
    LineParameters::resolve(
        line_overrides,
        video_parameters.system,
        video_parameters.field_height,
    )
    .map(Some)
}
