//! Persisted JSON document
//!
//! Member names follow the decoder's camelCase output. The document is
//! untrusted input: mandatory members are checked before typed decoding,
//! and dropout arrays are bounds-checked when converted to the model.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::audio::PcmAudioParameters;
use crate::dropouts::{DropOuts, DropoutRun};
use crate::error::{MetadataError, Result};
use crate::field::{Field, Ntsc, Vbi, VitsMetrics};
use crate::video::{VideoParameters, VideoSystem};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Document {
    #[serde(rename = "videoParameters")]
    pub video_parameters: DocVideoParameters,

    #[serde(
        rename = "pcmAudioParameters",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub pcm_audio_parameters: Option<DocPcmAudioParameters>,

    pub fields: Vec<DocField>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DocVideoParameters {
    #[serde(default)]
    pub number_of_sequential_fields: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<VideoSystem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_source_pal: Option<bool>,
    #[serde(default)]
    pub is_subcarrier_locked: bool,
    #[serde(default)]
    pub is_widescreen: bool,
    #[serde(default)]
    pub colour_burst_start: i32,
    #[serde(default)]
    pub colour_burst_end: i32,
    #[serde(default)]
    pub active_video_start: i32,
    #[serde(default)]
    pub active_video_end: i32,
    #[serde(default, rename = "white16bIre")]
    pub white_16b_ire: i32,
    #[serde(default, rename = "black16bIre")]
    pub black_16b_ire: i32,
    pub field_width: i32,
    pub field_height: i32,
    #[serde(default)]
    pub sample_rate: i32,
    #[serde(default)]
    pub fsc: i32,
    #[serde(default)]
    pub is_mapped: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git_branch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git_commit: Option<String>,
    /// Absent in decoder output; written only when false
    #[serde(default = "default_is_valid", skip_serializing_if = "is_valid_set")]
    pub is_valid: bool,
}

fn default_is_valid() -> bool {
    true
}

fn is_valid_set(is_valid: &bool) -> bool {
    *is_valid
}

/// serde_json writes non-finite floats as `null`; read those back as NaN
fn nullable_f64<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DocPcmAudioParameters {
    #[serde(default)]
    pub sample_rate: i32,
    #[serde(default)]
    pub is_little_endian: bool,
    #[serde(default)]
    pub is_signed: bool,
    #[serde(default)]
    pub bits: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct DocVitsMetrics {
    #[serde(default, rename = "wSNR", deserialize_with = "nullable_f64")]
    pub w_snr: f64,
    #[serde(default, rename = "bPSNR", deserialize_with = "nullable_f64")]
    pub b_psnr: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DocVbi {
    #[serde(default)]
    pub vbi_data: Vec<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DocNtsc {
    #[serde(default)]
    pub is_fm_code_data_valid: bool,
    #[serde(default)]
    pub fm_code_data: i32,
    #[serde(default)]
    pub field_flag: bool,
    #[serde(default)]
    pub white_flag: bool,
    #[serde(default, rename = "ccData0")]
    pub cc_data0: i32,
    #[serde(default, rename = "ccData1")]
    pub cc_data1: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct DocDropOuts {
    #[serde(default)]
    pub startx: Vec<u32>,
    #[serde(default)]
    pub endx: Vec<u32>,
    #[serde(default, rename = "fieldLine")]
    pub field_line: Vec<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DocField {
    #[serde(default)]
    pub seq_no: Option<i64>,
    pub is_first_field: bool,
    #[serde(default)]
    pub sync_conf: i32,
    #[serde(
        default,
        rename = "medianBurstIRE",
        deserialize_with = "nullable_f64"
    )]
    pub median_burst_ire: f64,
    #[serde(default, rename = "fieldPhaseID")]
    pub field_phase_id: i32,
    #[serde(default)]
    pub audio_samples: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vits_metrics: Option<DocVitsMetrics>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vbi: Option<DocVbi>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ntsc: Option<DocNtsc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drop_outs: Option<DocDropOuts>,
    #[serde(default)]
    pub pad: bool,
    #[serde(default, deserialize_with = "nullable_f64")]
    pub disk_loc: f64,
    #[serde(default)]
    pub file_loc: i64,
    #[serde(default)]
    pub decode_faults: i32,
    #[serde(default, rename = "efmTValues")]
    pub efm_t_values: i32,
}

/// The decoded model of one document
pub(crate) struct DocumentParts {
    pub video_parameters: VideoParameters,
    pub pcm_audio_parameters: PcmAudioParameters,
    pub fields: Vec<Field>,
}

impl Document {
    /// Check mandatory members, then decode
    pub fn from_value(value: Value) -> Result<Self> {
        check_mandatory(&value)?;
        Ok(serde_json::from_value(value)?)
    }

    pub fn into_parts(self) -> Result<DocumentParts> {
        if let Some(declared) = self.video_parameters.number_of_sequential_fields {
            if declared != self.fields.len() as i64 {
                warn!(
                    "numberOfSequentialFields is {} but the document holds {} fields",
                    declared,
                    self.fields.len()
                );
            }
        }
        let video_parameters = self.video_parameters.into_model()?;

        let pcm_audio_parameters = self
            .pcm_audio_parameters
            .map(|p| PcmAudioParameters {
                sample_rate: p.sample_rate,
                is_little_endian: p.is_little_endian,
                is_signed: p.is_signed,
                bits: p.bits,
                is_valid: true,
            })
            .unwrap_or_default();

        let fields = self
            .fields
            .into_iter()
            .enumerate()
            .map(|(index, field)| field.into_model(index))
            .collect::<Result<Vec<_>>>()?;

        Ok(DocumentParts {
            video_parameters,
            pcm_audio_parameters,
            fields,
        })
    }

    pub fn from_parts(
        video_parameters: &VideoParameters,
        pcm_audio_parameters: &PcmAudioParameters,
        fields: &[Field],
    ) -> Self {
        let vp = video_parameters;
        Self {
            video_parameters: DocVideoParameters {
                number_of_sequential_fields: Some(fields.len() as i64),
                system: Some(vp.system),
                is_source_pal: Some(vp.system.is_pal()),
                is_subcarrier_locked: vp.is_subcarrier_locked,
                is_widescreen: vp.is_widescreen,
                colour_burst_start: vp.colour_burst_start,
                colour_burst_end: vp.colour_burst_end,
                active_video_start: vp.active_video_start,
                active_video_end: vp.active_video_end,
                white_16b_ire: vp.white_16b_ire,
                black_16b_ire: vp.black_16b_ire,
                field_width: vp.field_width,
                field_height: vp.field_height,
                sample_rate: vp.sample_rate,
                fsc: vp.fsc,
                is_mapped: vp.is_mapped,
                git_branch: vp.git_branch.clone(),
                git_commit: vp.git_commit.clone(),
                is_valid: vp.is_valid,
            },
            pcm_audio_parameters: pcm_audio_parameters.is_valid.then(|| DocPcmAudioParameters {
                sample_rate: pcm_audio_parameters.sample_rate,
                is_little_endian: pcm_audio_parameters.is_little_endian,
                is_signed: pcm_audio_parameters.is_signed,
                bits: pcm_audio_parameters.bits,
            }),
            fields: fields.iter().map(DocField::from_model).collect(),
        }
    }
}

impl DocVideoParameters {
    fn into_model(self) -> Result<VideoParameters> {
        let system = match (self.system, self.is_source_pal) {
            (Some(system), Some(is_pal)) => {
                if system.is_pal() != is_pal {
                    warn!(
                        "videoParameters.system is {} but isSourcePal is {}, using system",
                        system, is_pal
                    );
                }
                system
            }
            (Some(system), None) => system,
            (None, Some(true)) => VideoSystem::Pal,
            (None, Some(false)) => VideoSystem::Ntsc,
            (None, None) => {
                return Err(MetadataError::SchemaVersion(
                    "videoParameters.system".to_string(),
                ))
            }
        };

        if self.field_width < 0 || self.field_height < 0 {
            return Err(MetadataError::Parse(format!(
                "negative field dimensions {}x{}",
                self.field_width, self.field_height
            )));
        }

        Ok(VideoParameters {
            system,
            is_subcarrier_locked: self.is_subcarrier_locked,
            is_widescreen: self.is_widescreen,
            colour_burst_start: self.colour_burst_start,
            colour_burst_end: self.colour_burst_end,
            active_video_start: self.active_video_start,
            active_video_end: self.active_video_end,
            white_16b_ire: self.white_16b_ire,
            black_16b_ire: self.black_16b_ire,
            field_width: self.field_width,
            field_height: self.field_height,
            sample_rate: self.sample_rate,
            fsc: self.fsc,
            is_mapped: self.is_mapped,
            git_branch: self.git_branch,
            git_commit: self.git_commit,
            is_valid: self.is_valid,
        })
    }
}

impl DocField {
    fn into_model(self, index: usize) -> Result<Field> {
        let seq_no = u32::try_from(index + 1)
            .map_err(|_| MetadataError::Parse("too many fields".to_string()))?;
        if let Some(stored) = self.seq_no {
            if stored != seq_no as i64 {
                warn!("Field at position {} has seqNo {}, renumbering", seq_no, stored);
            }
        }

        let drop_outs = match self.drop_outs {
            Some(d) => d.into_model(seq_no)?,
            None => DropOuts::new(),
        };

        Ok(Field {
            seq_no,
            is_first_field: self.is_first_field,
            sync_conf: self.sync_conf,
            median_burst_ire: self.median_burst_ire,
            field_phase_id: self.field_phase_id,
            audio_samples: self.audio_samples,
            vits_metrics: self.vits_metrics.map(|v| VitsMetrics {
                w_snr: v.w_snr,
                b_psnr: v.b_psnr,
            }),
            vbi: self.vbi.map(|v| Vbi { vbi_data: v.vbi_data }),
            ntsc: self.ntsc.map(|n| Ntsc {
                is_fm_code_data_valid: n.is_fm_code_data_valid,
                fm_code_data: n.fm_code_data,
                field_flag: n.field_flag,
                white_flag: n.white_flag,
                cc_data0: n.cc_data0,
                cc_data1: n.cc_data1,
            }),
            drop_outs,
            pad: self.pad,
            disk_loc: self.disk_loc,
            file_loc: self.file_loc,
            decode_faults: self.decode_faults,
            efm_t_values: self.efm_t_values,
        })
    }

    fn from_model(field: &Field) -> Self {
        Self {
            seq_no: Some(field.seq_no as i64),
            is_first_field: field.is_first_field,
            sync_conf: field.sync_conf,
            median_burst_ire: field.median_burst_ire,
            field_phase_id: field.field_phase_id,
            audio_samples: field.audio_samples,
            vits_metrics: field.vits_metrics.map(|v| DocVitsMetrics {
                w_snr: v.w_snr,
                b_psnr: v.b_psnr,
            }),
            vbi: field.vbi.as_ref().map(|v| DocVbi {
                vbi_data: v.vbi_data.clone(),
            }),
            ntsc: field.ntsc.map(|n| DocNtsc {
                is_fm_code_data_valid: n.is_fm_code_data_valid,
                fm_code_data: n.fm_code_data,
                field_flag: n.field_flag,
                white_flag: n.white_flag,
                cc_data0: n.cc_data0,
                cc_data1: n.cc_data1,
            }),
            drop_outs: (!field.drop_outs.is_empty())
                .then(|| DocDropOuts::from_model(&field.drop_outs)),
            pad: field.pad,
            disk_loc: field.disk_loc,
            file_loc: field.file_loc,
            decode_faults: field.decode_faults,
            efm_t_values: field.efm_t_values,
        }
    }
}

impl DocDropOuts {
    fn into_model(self, seq_no: u32) -> Result<DropOuts> {
        if self.startx.len() != self.endx.len() || self.startx.len() != self.field_line.len() {
            return Err(MetadataError::Parse(format!(
                "field {}: dropOuts arrays differ in length (startx={}, endx={}, fieldLine={})",
                seq_no,
                self.startx.len(),
                self.endx.len(),
                self.field_line.len()
            )));
        }

        self.startx
            .iter()
            .zip(&self.endx)
            .zip(&self.field_line)
            .map(|((&start_x, &end_x), &field_line)| {
                if start_x > end_x {
                    Err(MetadataError::Parse(format!(
                        "field {}: dropout on line {} ends at {} before it starts at {}",
                        seq_no, field_line, end_x, start_x
                    )))
                } else {
                    Ok(DropoutRun::new(start_x, end_x, field_line))
                }
            })
            .collect()
    }

    fn from_model(drop_outs: &DropOuts) -> Self {
        let runs = drop_outs.runs();
        Self {
            startx: runs.iter().map(|r| r.start_x).collect(),
            endx: runs.iter().map(|r| r.end_x).collect(),
            field_line: runs.iter().map(|r| r.field_line).collect(),
        }
    }
}

fn check_mandatory(value: &Value) -> Result<()> {
    let root = value
        .as_object()
        .ok_or_else(|| MetadataError::Parse("document root must be an object".to_string()))?;

    let video = root
        .get("videoParameters")
        .ok_or_else(|| MetadataError::SchemaVersion("videoParameters".to_string()))?
        .as_object()
        .ok_or_else(|| MetadataError::Parse("videoParameters must be an object".to_string()))?;

    for member in ["fieldWidth", "fieldHeight"] {
        if !video.contains_key(member) {
            return Err(MetadataError::SchemaVersion(format!("videoParameters.{}", member)));
        }
    }
    if !video.contains_key("system") && !video.contains_key("isSourcePal") {
        return Err(MetadataError::SchemaVersion("videoParameters.system".to_string()));
    }

    let fields = root
        .get("fields")
        .ok_or_else(|| MetadataError::SchemaVersion("fields".to_string()))?
        .as_array()
        .ok_or_else(|| MetadataError::Parse("fields must be an array".to_string()))?;

    for (index, field) in fields.iter().enumerate() {
        let field = field
            .as_object()
            .ok_or_else(|| MetadataError::Parse(format!("fields[{}] must be an object", index)))?;
        if !field.contains_key("isFirstField") {
            return Err(MetadataError::SchemaVersion(format!("fields[{}].isFirstField", index)));
        }
    }

    Ok(())
}
