//! End-to-end scenarios: decode a dump, edit it, re-encode it.

use fseq_edit::RangeEditor;
use fseq_formats::{checksum, decode, encode, recognize, DeviceId};
use fseq_ir::{
    clamp_frequency, frequency_to_int, int_to_frequency, FrameFormat, PatchModel, Track,
    FRAME_COUNT, MAX_FREQUENCY,
};
use fseq_master::Controller;

fn vowel_patch() -> PatchModel {
    let mut model = PatchModel::default();
    model.set_name("Vowels");
    model.format = FrameFormat::F512;
    for i in 1..=FRAME_COUNT {
        let frame = model.frame_mut(i);
        frame.pitch = 9000 + (i % 40) as u16 * 10;
        for op in 1..=8u8 {
            let o = frame.operator_mut(op);
            o.voiced_frequency = 8000 + op as u16 * 400 + (i % 16) as u16;
            o.voiced_level = ((i + op as usize * 13) % 100) as u8;
            o.unvoiced_frequency = 10000 + op as u16 * 200;
            o.unvoiced_level = (op * 8) % 64;
        }
    }
    model
}

#[test]
fn default_patch_message_shape() {
    let data = encode(&PatchModel::default(), DeviceId::default(), true, false);
    assert_eq!(FrameFormat::F128.byte_count(), 32 + 50 * 128);
    assert_eq!(data.len(), 6443);
    assert_eq!(data[0], 0xF0);
    assert_eq!(data[3], 0x5E);
}

#[test]
fn frequency_round_trip_is_within_one_unit() {
    for v in 0..=MAX_FREQUENCY {
        let back = frequency_to_int(int_to_frequency(v));
        assert!((back - v as i32).abs() <= 1, "{} -> {}", v, back);
    }
}

#[test]
fn edited_dump_survives_re_encoding() {
    let data = encode(&vowel_patch(), DeviceId::new(4).unwrap(), true, false);
    let mut ctl = Controller::new();
    ctl.load_sysex(&data).unwrap();

    ctl.apply(|ed, m| ed.set_pitch(m, 1, 10, 440.0)).unwrap();
    ctl.apply(|ed, m| Ok(ed.cut_frames(m, 100, 149))).unwrap();
    ctl.apply(|ed, m| ed.paste_frames(m, 100)).unwrap();
    ctl.apply(|ed, m| Ok(ed.smooth_frames(m))).unwrap();

    let out = ctl.to_sysex(true);
    assert!(recognize(&out));
    let slot = out.len() - 2;
    assert_eq!(checksum(&out[4..slot]), out[slot]);
    assert_eq!(&decode(&out, false), ctl.model());
}

#[test]
fn cut_paste_undo_chain_restores_original() {
    let original = vowel_patch();
    let mut ctl = Controller::new();
    ctl.load_file(&encode(&original, DeviceId::default(), false, true)).unwrap();
    let loaded = ctl.model().clone();

    ctl.apply(|ed, m| Ok(ed.cut_frames(m, 10, 20))).unwrap();
    ctl.apply(|ed, m| ed.paste_frames(m, 10)).unwrap();
    assert_eq!(ctl.model(), &loaded);

    // cut and paste are separate undo steps
    assert!(ctl.undo());
    assert_ne!(ctl.model(), &loaded);
    assert!(ctl.undo());
    assert_eq!(ctl.model(), &loaded);
    assert!(!ctl.undo());
}

#[test]
fn set_pitch_matches_formula() {
    let mut editor = RangeEditor::detached();
    let mut model = vowel_patch();
    editor.set_pitch(&mut model, 1, 10, 440.0).unwrap();
    let expected = clamp_frequency(frequency_to_int(440.0));
    assert!(model.frames()[..10].iter().all(|f| f.pitch == expected));
    assert_eq!(model.frame(11).pitch, vowel_patch().frame(11).pitch);
}

#[test]
fn normalize_whole_patch_hits_full_scale() {
    let mut editor = RangeEditor::detached();
    let mut model = vowel_patch();
    editor.normalize_frames(&mut model, Track::All, 1, 512, true, true);
    let max = model
        .frames()
        .iter()
        .flat_map(|f| f.operators.iter())
        .flat_map(|o| [o.voiced_level, o.unvoiced_level])
        .max()
        .unwrap_or(0);
    assert_eq!(max, 127);
}

#[test]
fn smoothing_keeps_values_in_range() {
    let mut editor = RangeEditor::detached();
    let mut model = vowel_patch();
    model.frame_mut(256).pitch = MAX_FREQUENCY;
    model.frame_mut(257).operator_mut(1).voiced_level = 127;
    editor.smooth_frames(&mut model);
    let snapshot = model.clone();
    model.revise();
    assert_eq!(model, snapshot);
}

#[test]
fn bad_manufacturer_rejected() {
    let mut data = encode(&vowel_patch(), DeviceId::default(), true, false);
    data[1] = 0x00;
    assert!(!recognize(&data));
    assert!(Controller::new().load_sysex(&data).is_err());
}
