//! Range operations driven the way a host application uses them.

use fseq_edit::{ClipboardStore, EditError, FrameSource, NullLink, RangeEditor, UndoHistory};
use fseq_ir::{clamp_frequency, Fields, PatchModel, Track, FRAME_COUNT};

fn textured() -> PatchModel {
    let mut model = PatchModel::default();
    model.format = fseq_ir::FrameFormat::F512;
    for i in 1..=FRAME_COUNT {
        let frame = model.frame_mut(i);
        frame.pitch = (i * 29 % 16384) as u16;
        for op in 1..=8u8 {
            let o = frame.operator_mut(op);
            o.voiced_frequency = ((i * 41 + op as usize * 700) % 16384) as u16;
            o.voiced_level = ((i * 3 + op as usize) % 128) as u8;
            o.unvoiced_frequency = ((i * 11 + op as usize * 300) % 16384) as u16;
            o.unvoiced_level = ((i + op as usize * 9) % 128) as u8;
        }
    }
    model
}

#[test]
fn set_pitch_assigns_converted_value() {
    let mut editor = RangeEditor::detached();
    let mut model = textured();
    editor.set_pitch(&mut model, 1, 10, 440.0).unwrap();

    let expected = clamp_frequency((738.662 * (181752.0f64 * 440.0).ln()).round() as i32);
    for i in 1..=10 {
        assert_eq!(model.frame(i).pitch, expected, "frame {}", i);
    }
    assert_eq!(model.frame(11).pitch, (11 * 29) as u16);
}

#[test]
fn cut_then_paste_restores_everything() {
    let mut editor = RangeEditor::detached();
    let original = textured();
    let mut model = original.clone();

    editor.cut_frames(&mut model, 10, 20);
    assert_ne!(model, original);
    editor.paste_frames(&mut model, 10).unwrap();
    assert_eq!(model.frames(), original.frames());
}

#[test]
fn normalize_scales_to_full_level() {
    let mut editor = RangeEditor::detached();
    let mut model = PatchModel::default();
    let levels = [[10u8, 64, 0, 1, 2, 3, 4, 5], [33, 7, 8, 9, 60, 61, 62, 63]];
    for (f, row) in levels.iter().enumerate() {
        for (op, &v) in row.iter().enumerate() {
            model.frame_mut(f + 1).operators[op].voiced_level = v;
            model.frame_mut(f + 1).operators[op].unvoiced_level = 100;
        }
    }

    editor.normalize_frames(&mut model, Track::All, 1, 5, true, false);

    for (f, row) in levels.iter().enumerate() {
        for (op, &v) in row.iter().enumerate() {
            let expected = (127.0 * v as f64 / 64.0).round() as u8;
            assert_eq!(model.frame(f + 1).operators[op].voiced_level, expected);
            assert_eq!(model.frame(f + 1).operators[op].unvoiced_level, 100);
        }
    }
}

#[test]
fn swap_twice_is_identity_for_every_pair() {
    let mut editor = RangeEditor::detached();
    let original = textured();
    let mut model = original.clone();
    for a in 1..=8u8 {
        for b in 1..=8u8 {
            editor.swap_tracks(&mut model, Track::Operator(a), Track::Operator(b), 5, 400).unwrap();
            editor.swap_tracks(&mut model, Track::Operator(a), Track::Operator(b), 5, 400).unwrap();
            assert_eq!(model, original, "swap {} <-> {}", a, b);
        }
    }
}

#[test]
fn normalize_is_noop_when_selection_is_silent() {
    let mut editor = RangeEditor::detached();
    let mut model = textured();
    for i in 100..=120 {
        model.frame_mut(i).operator_mut(4).unvoiced_level = 0;
    }
    let before = model.clone();
    let outcome = editor.normalize_frames(&mut model, Track::Operator(4), 100, 120, false, true);
    assert!(!outcome.changed);
    assert_eq!(model, before);
}

#[test]
fn editors_sharing_a_clipboard_exchange_frames() {
    let shared = ClipboardStore::new();
    let mut left = RangeEditor::new(shared.clone(), NullLink::new());
    let mut right = RangeEditor::new(shared, NullLink::new());
    let private = RangeEditor::detached();

    let source = textured();
    let mut target = PatchModel::default();
    left.copy_frames(&source, 50, 59);
    right
        .overwrite_frames(&mut target, Track::All, 1, Fields::ALL)
        .unwrap();

    assert_eq!(&target.frames()[..10], &source.frames()[49..59]);
    assert!(private.clipboard().is_empty());
}

#[test]
fn clipboard_transfer_by_move() {
    let mut editor = RangeEditor::detached();
    let source = textured();
    let mut target = PatchModel::default();
    editor.copy_frames(&source, 1, 3);
    let clip = editor.clipboard().snapshot().unwrap();
    let (lo, hi) = clip.bounds();
    for (k, from) in (lo..=hi).enumerate() {
        editor.move_frame(
            &mut target,
            FrameSource::Other(clip.model()),
            from,
            300 + k as isize,
            Track::Operator(5),
            Fields::new(false, true, false),
        );
    }
    assert_eq!(
        target.frame(301).operator(5).unvoiced_level,
        source.frame(2).operator(5).unvoiced_level
    );
    assert_eq!(target.frame(301).operator(5).voiced_level, 0);
    assert_eq!(target.frame(301).pitch, 0);
}

#[test]
fn undo_history_tracks_edits() {
    let mut editor = RangeEditor::detached();
    let mut history = UndoHistory::new();
    let original = textured();
    let mut model = original.clone();

    history.record(editor.smooth_frames(&mut model));
    let smoothed = model.clone();
    history.record(editor.distribute_frame(&mut model, 1, 1, 512, Track::All, Fields::ALL));
    assert!(!history.record(editor.clear_frame(&mut PatchModel::default(), 1, Track::All, Fields::ALL)));
    assert_eq!(history.len(), 2);

    assert!(history.undo(&mut model));
    assert_eq!(model, smoothed);
    assert!(history.undo(&mut model));
    assert_eq!(model, original);
    assert!(history.redo(&mut model));
    assert_eq!(model, smoothed);
}

#[test]
fn failed_edits_send_nothing() {
    let mut editor = RangeEditor::detached();
    let mut model = textured();
    assert!(matches!(editor.paste_frames(&mut model, 1), Err(EditError::ClipboardEmpty)));
    assert!(matches!(
        editor.set_pitch(&mut model, 1, 2, 30000.0),
        Err(EditError::FrequencyOutOfRange(_))
    ));
    assert!(matches!(
        editor.copy_track_to(&mut model, Track::All, Track::Operator(1), 1, 2),
        Err(EditError::NotAnOperator(Track::All))
    ));
    assert_eq!(editor.link().sends(), 0);
}
