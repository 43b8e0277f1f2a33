//! Document round trips

use tempfile::NamedTempFile;

use super::fixtures::{decoded_field, ntsc_store, pal_store};
use crate::error::MetadataError;
use crate::field::VitsMetrics;
use crate::store::MetadataStore;
use crate::video::VideoSystem;

fn round_trip(store: &MetadataStore) -> MetadataStore {
    let mut buffer = Vec::new();
    store.write(&mut buffer).unwrap();
    let mut loaded = MetadataStore::new();
    loaded.read(buffer.as_slice()).unwrap();
    loaded
}

fn assert_same(a: &MetadataStore, b: &MetadataStore) {
    assert_eq!(a.number_of_fields(), b.number_of_fields());
    assert_eq!(a.video_parameters(), b.video_parameters());
    assert_eq!(a.pcm_audio_parameters(), b.pcm_audio_parameters());
    assert_eq!(a.line_parameters(), b.line_parameters());
    for (left, right) in a.fields().iter().zip(b.fields()) {
        assert_eq!(left, right, "field {} differs", left.seq_no);
    }
}

#[test]
fn test_pal_round_trip() {
    let store = pal_store(25);
    let loaded = round_trip(&store);
    assert_same(&store, &loaded);
    assert_eq!(
        loaded.total_pcm_audio_samples(),
        store.total_pcm_audio_samples()
    );
}

#[test]
fn test_ntsc_round_trip() {
    let store = ntsc_store(10);
    let loaded = round_trip(&store);
    assert_same(&store, &loaded);
    assert_eq!(loaded.video_parameters().system, VideoSystem::Ntsc);
    assert!(loaded.field_ntsc(2).unwrap().is_some());
    assert!(loaded.field_ntsc(1).unwrap().is_none());
}

#[test]
fn test_padded_round_trip() {
    let mut store = pal_store(3);
    store.set_number_of_fields(11);
    let loaded = round_trip(&store);
    assert_same(&store, &loaded);
    assert!(loaded.field(11).unwrap().pad);
}

#[test]
fn test_empty_store_round_trip() {
    let store = MetadataStore::new();
    let loaded = round_trip(&store);
    assert_same(&store, &loaded);
    assert!(!loaded.video_parameters().is_valid);
    assert!(loaded.line_parameters().is_none());
}

#[test]
fn test_fields_only_round_trip() {
    let mut store = MetadataStore::new();
    store.append_field(decoded_field(1, true));
    store.append_field(decoded_field(2, false));

    let loaded = round_trip(&store);
    assert_same(&store, &loaded);
    assert!(loaded.line_parameters().is_none());
    assert_eq!(loaded.field_pair(1).unwrap().second_field, 2);
}

#[test]
fn test_non_finite_metrics_read_back() {
    let mut store = pal_store(1);
    let mut field = store.field(1).unwrap().clone();
    field.vits_metrics = Some(VitsMetrics {
        w_snr: f64::NAN,
        b_psnr: f64::INFINITY,
    });
    store.update_field(1, field).unwrap();

    let loaded = round_trip(&store);
    let vits = loaded.field_vits_metrics(1).unwrap().unwrap();
    assert!(vits.w_snr.is_nan());
    assert!(vits.b_psnr.is_nan());
    assert_eq!(loaded.field(2).unwrap(), store.field(2).unwrap());
}

#[test]
fn test_file_round_trip() {
    let store = pal_store(8);
    let file = NamedTempFile::new().unwrap();
    store.write_file(file.path()).unwrap();

    let loaded = MetadataStore::open(file.path()).unwrap();
    assert_same(&store, &loaded);
}

#[test]
fn test_open_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = MetadataStore::open(dir.path().join("missing.tbc.json")).unwrap_err();
    assert!(matches!(err, MetadataError::Io(_)));
}

#[test]
fn test_decoder_shaped_document() {
    let json = r#"{
        "pcmAudioParameters": {
            "bits": 16, "isLittleEndian": true, "isSigned": true, "sampleRate": 44100
        },
        "videoParameters": {
            "activeVideoEnd": 1107, "activeVideoStart": 185, "black16bIre": 16384,
            "colourBurstEnd": 138, "colourBurstStart": 98, "fieldHeight": 313, "fieldWidth": 1135,
            "fsc": 4433618, "isSourcePal": true, "isSubcarrierLocked": true, "isWidescreen": false,
            "numberOfSequentialFields": 3, "sampleRate": 17734475, "white16bIre": 54016,
            "gitBranch": "master", "gitCommit": "v7.2.0", "isMapped": false
        },
        "fields": [
            { "audioSamples": 882, "decodeFaults": 0, "diskLoc": 1.0, "efmTValues": 0,
              "fieldPhaseID": 1, "fileLoc": 0, "isFirstField": true, "medianBurstIRE": 20.1,
              "seqNo": 1, "syncConf": 100,
              "vbi": { "vbiData": [9150464, 15736883, 15736883] },
              "vitsMetrics": { "bPSNR": 44.2, "wSNR": 40.9 } },
            { "audioSamples": 883, "diskLoc": 1.5, "fieldPhaseID": 2, "fileLoc": 355255,
              "isFirstField": false, "medianBurstIRE": 20.3, "seqNo": 2, "syncConf": 100,
              "dropOuts": { "endx": [410, 60], "fieldLine": [100, 7], "startx": [400, 20] } },
            { "audioSamples": 882, "isFirstField": true, "seqNo": 3, "syncConf": 90 }
        ]
    }"#;

    let mut store = MetadataStore::new();
    store.read(json.as_bytes()).unwrap();

    assert_eq!(store.number_of_fields(), 3);
    assert_eq!(store.number_of_frames(), 1);
    assert_eq!(store.video_parameters().git_commit.as_deref(), Some("v7.2.0"));
    assert!(store.pcm_audio_parameters().is_valid);
    assert_eq!(store.field_vbi(1).unwrap().unwrap().vbi_data[0], 9150464);
    assert_eq!(store.field_vits_metrics(1).unwrap().unwrap().w_snr, 40.9);
    assert_eq!(store.field_dropout_length(2).unwrap(), 50);
    assert_eq!(store.field_visible_dropout_length(2).unwrap(), 10);
    assert_eq!(store.field_pcm_audio_start(3).unwrap(), 882 + 883);
    assert_eq!(store.line_parameters().unwrap().first_active_field_line, 22);
}

#[test]
fn test_seq_no_taken_from_position() {
    let json = r#"{
        "videoParameters": { "system": "NTSC", "fieldWidth": 910, "fieldHeight": 263 },
        "fields": [ { "seqNo": 7, "isFirstField": true }, { "seqNo": 3, "isFirstField": false } ]
    }"#;
    let mut store = MetadataStore::new();
    store.read(json.as_bytes()).unwrap();
    assert_eq!(store.field(1).unwrap().seq_no, 1);
    assert_eq!(store.field(2).unwrap().seq_no, 2);
}
