//! Subcommand implementations. Each returns a printable error message.

use std::path::Path;

use fseq_ir::{format_frequency, note_name, PITCH_TUNING_CENTER};
use fseq_master::{Controller, Track};

use crate::config::Config;
use crate::{take_flag, take_option};

type CmdResult = Result<(), String>;

fn controller(config: &Config) -> Controller {
    Controller::with_settings(config.device_id(), config.undo_depth(), Default::default())
}

fn load(config: &Config, path: &str) -> Result<Controller, String> {
    let mut ctl = controller(config);
    ctl.load_path(Path::new(path))
        .map_err(|e| format!("Failed to load {}: {}", path, e))?;
    Ok(ctl)
}

fn save(ctl: &Controller, path: &str) -> CmdResult {
    ctl.save_path(Path::new(path))
        .map_err(|e| format!("Failed to write {}: {}", path, e))
}

fn in_out(args: &[String], usage: &str) -> Result<(String, String), String> {
    match args {
        [input, output, ..] => Ok((input.clone(), output.clone())),
        _ => Err(format!("Usage: {}", usage)),
    }
}

fn parse_frame(value: Option<String>, default: usize) -> Result<usize, String> {
    match value {
        None => Ok(default),
        Some(v) => match v.parse::<usize>() {
            Ok(n) if (1..=fseq_ir::FRAME_COUNT).contains(&n) => Ok(n),
            _ => Err(format!("frame '{}' is not in 1..=512", v)),
        },
    }
}

fn parse_track(value: Option<String>) -> Result<Track, String> {
    match value.as_deref() {
        None | Some("all") => Ok(Track::All),
        Some(v) => v
            .parse::<u8>()
            .ok()
            .and_then(Track::from_index)
            .ok_or_else(|| format!("track '{}' is not 1-8 or 'all'", v)),
    }
}

pub fn info(config: &Config, args: &[String]) -> CmdResult {
    let path = args.first().ok_or("Usage: fseqed info FILE")?;
    let data = std::fs::read(path).map_err(|e| format!("Failed to read {}: {}", path, e))?;
    let mut ctl = controller(config);
    ctl.load_file(&data)
        .map_err(|e| format!("Failed to parse {}: {}", path, e))?;

    let m = ctl.model();
    let location = m.location.display_name().unwrap_or_else(|| format!("{:?}", m.location));
    println!("Name:      {}", m.name);
    println!("Location:  {}", location);
    println!("Format:    {}", m.format.name());
    println!("Loop:      {}-{} ({})", m.loop_start, m.loop_end, m.loop_mode.name());
    println!("End step:  {}", m.end_step);
    println!(
        "Pitch:     {}, note {}, tuning {:+}",
        m.pitch_mode.name(),
        note_name(m.note_assign),
        m.pitch_tuning as i16 - PITCH_TUNING_CENTER as i16
    );
    println!(
        "Speed:     {}, velocity sens {}, delay {}",
        m.speed_adjust, m.velocity_sensitivity_for_tempo, m.sequence_delay
    );
    println!("Frame 1:   {} Hz", format_frequency(m.frame(1).pitch, false));
    let checksum = if fseq_formats::checksum_matches(&data) {
        "ok"
    } else {
        "mismatch (ignored)"
    };
    println!("Checksum:  {}", checksum);
    Ok(())
}

pub fn smooth(config: &Config, args: &[String]) -> CmdResult {
    let (input, output) = in_out(args, "fseqed smooth IN OUT")?;
    let mut ctl = load(config, &input)?;
    ctl.apply(|ed, m| Ok(ed.smooth_frames(m)))
        .map_err(|e| e.to_string())?;
    save(&ctl, &output)?;
    println!("Smoothed {} -> {}", input, output);
    Ok(())
}

pub fn normalize(config: &Config, args: &[String]) -> CmdResult {
    let mut args = args.to_vec();
    let track = parse_track(take_option(&mut args, "--track"))?;
    let from = parse_frame(take_option(&mut args, "--from"), 1)?;
    let to = parse_frame(take_option(&mut args, "--to"), fseq_ir::FRAME_COUNT)?;
    let both = take_flag(&mut args, "--both");
    let unvoiced = both || take_flag(&mut args, "--unvoiced");
    let voiced = both || !unvoiced;
    let (input, output) = in_out(
        &args,
        "fseqed normalize IN OUT [--track N|all] [--from A] [--to B] [--unvoiced|--both]",
    )?;
    if from > to {
        return Err(format!("--from {} is after --to {}", from, to));
    }

    let mut ctl = load(config, &input)?;
    let changed = ctl
        .apply(|ed, m| Ok(ed.normalize_frames(m, track, from, to, voiced, unvoiced)))
        .map_err(|e| e.to_string())?;
    save(&ctl, &output)?;
    if !changed {
        println!("Nothing to normalize in frames {}-{}", from, to);
    }
    Ok(())
}

pub fn pitch(config: &Config, args: &[String]) -> CmdResult {
    let mut args = args.to_vec();
    let from = parse_frame(take_option(&mut args, "--from"), 1)?;
    let to = parse_frame(take_option(&mut args, "--to"), fseq_ir::FRAME_COUNT)?;
    let usage = "Usage: fseqed pitch IN OUT HZ [--from A] [--to B]";
    let [input, output, hz, ..] = args.as_slice() else {
        return Err(usage.to_string());
    };
    let hz: f64 = hz.parse().map_err(|_| format!("'{}' is not a frequency", hz))?;

    let mut ctl = load(config, input)?;
    ctl.apply(|ed, m| ed.set_pitch(m, from, to, hz))
        .map_err(|e| e.to_string())?;
    save(&ctl, output)
}

pub fn request(config: &Config) -> CmdResult {
    println!("{}", hex(&controller(config).request_dump()));
    Ok(())
}

pub fn dump(config: &Config, args: &[String]) -> CmdResult {
    let path = args.first().ok_or("Usage: fseqed dump FILE")?;
    let ctl = load(config, path)?;
    let data = if config.write_to_working_memory() {
        ctl.to_sysex(true)
    } else {
        ctl.to_file_bytes()
    };
    for (i, chunk) in data.chunks(16).enumerate() {
        println!("{:05X}  {}", i * 16, hex(chunk));
    }
    Ok(())
}

fn hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ")
}
