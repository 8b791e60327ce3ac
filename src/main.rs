//! `musicpak` - inspect, build and follow music packages from the terminal.
//!
//! Usage:
//!   musicpak info <package> [--json]
//!   musicpak lyrics <package> [--at <ms>]
//!   musicpak pack <out> [--audio F] [--cover F] [--lyrics F] [--title T] [--artist A] [--album A]
//!   musicpak follow <package>

use std::path::{Path, PathBuf};

use tokio::sync::mpsc;

use musicpak::config::Config;
use musicpak::constants::container::PACKAGE_EXTENSION;
use musicpak::error::{Error, Result};
use musicpak::lyrics::{current_index, format_tag, format_time};
use musicpak::media::format_byte_size;
use musicpak::package::{PackageModel, ZipPackageStore};
use musicpak::services::{
    EditorSession, PlaybackClock, PlaybackEvent, SessionEvent, WallClock,
};
use musicpak::types::{LyricFormat, MetadataField};

const USAGE: &str = "\
Usage:
  musicpak info <package> [--json]
  musicpak lyrics <package> [--at <ms>]
  musicpak pack <out> [--audio F] [--cover F] [--lyrics F] [--title T] [--artist A] [--album A]
  musicpak follow <package>
  musicpak --version";

#[tokio::main]
async fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Err(e) = run(&args).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(args: &[String]) -> Result<()> {
    let config = Config::load()?;
    let (command, rest) = args.split_first().ok_or_else(|| Error::from(USAGE))?;
    if command == "--version" {
        println!("{} {}", config.app_name(), config.app_version());
        return Ok(());
    }
    let target = rest
        .first()
        .map(PathBuf::from)
        .ok_or_else(|| Error::from(USAGE))?;

    match command.as_str() {
        "info" => info(&target, has_flag(rest, "--json")),
        "lyrics" => {
            let at = flag_value(rest, "--at")
                .map(|ms| {
                    ms.parse::<i64>()
                        .map_err(|_| Error::Msg(format!("--at expects milliseconds, got {ms:?}")))
                })
                .transpose()?;
            lyrics(&target, at)
        }
        "pack" => {
            let out = if target.extension().is_none() {
                target.with_extension(PACKAGE_EXTENSION)
            } else {
                target
            };
            pack(config, &out, rest).await
        }
        "follow" => follow(config, &target).await,
        _ => Err(Error::from(USAGE)),
    }
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

fn open(path: &Path) -> Result<PackageModel> {
    let mut model = PackageModel::new();
    model.load(path)?;
    Ok(model)
}

fn info(path: &Path, json: bool) -> Result<()> {
    if json {
        let manifest = ZipPackageStore::new()
            .read_manifest(path)
            .map_err(|source| Error::Load {
                path: path.to_path_buf(),
                source,
            })?;
        let text = serde_json::to_string_pretty(&manifest)
            .map_err(|e| Error::Msg(format!("Could not encode manifest: {e}")))?;
        println!("{text}");
        return Ok(());
    }

    let model = open(path)?;
    let meta = model.metadata();
    println!("=== {} ===", path.display());
    for &field in MetadataField::all() {
        let value = meta.field_text(field);
        if !value.is_empty() {
            println!("  {:<12} {value}", field.label());
        }
    }

    match model.audio() {
        Some(audio) => println!(
            "  Audio        {} ({}, {})",
            audio.source_filename(),
            audio.content_type(),
            audio.display_size()
        ),
        None => println!("  Audio        -"),
    }
    match model.cover() {
        Some(cover) => println!("  Cover        {}", cover.info()),
        None => println!("  Cover        -"),
    }
    match model.lyrics() {
        Some(lyrics) => println!(
            "  Lyrics       {} ({} timed lines, {})",
            lyrics.format(),
            lyrics.lines().len(),
            format_byte_size(lyrics.text().len() as u64)
        ),
        None => println!("  Lyrics       -"),
    }
    Ok(())
}

fn lyrics(path: &Path, at: Option<i64>) -> Result<()> {
    let model = open(path)?;
    let Some(lyrics) = model.lyrics().filter(|l| !l.is_blank()) else {
        println!("No lyrics in {}", path.display());
        return Ok(());
    };

    if lyrics.format() == LyricFormat::None || lyrics.lines().is_empty() {
        println!("{}", lyrics.text());
        return Ok(());
    }

    let current = at.and_then(|ms| current_index(lyrics.lines(), ms));
    for (i, line) in lyrics.lines().iter().enumerate() {
        let marker = if Some(i) == current { '>' } else { ' ' };
        println!("{marker} {}{}", format_tag(line.time_ms), line.text);
    }
    Ok(())
}

async fn pack(config: Config, out: &Path, args: &[String]) -> Result<()> {
    let (mut session, _events) = EditorSession::new(config);
    session.create_new();

    if let Some(audio) = flag_value(args, "--audio") {
        session.import_audio_file(Path::new(audio)).await?;
    }
    if let Some(cover) = flag_value(args, "--cover") {
        session.import_cover_file(Path::new(cover)).await?;
    }
    if let Some(lyrics) = flag_value(args, "--lyrics") {
        session.import_lyrics_file(Path::new(lyrics)).await?;
    }

    for (flag, field) in [
        ("--title", MetadataField::Title),
        ("--artist", MetadataField::Artist),
        ("--album", MetadataField::Album),
    ] {
        if let Some(value) = flag_value(args, flag) {
            session.edit_field(field, value)?;
        }
    }

    session.save_as(out)?;
    println!("{}", session.status());
    Ok(())
}

async fn follow(config: Config, path: &Path) -> Result<()> {
    let poll_interval = config.poll_interval;
    let (mut session, mut events) = EditorSession::new(config);
    session.load(path)?;

    let meta = session.model().metadata();
    println!("{} - {}", meta.artist, meta.title);
    if session.lyric_lines().is_empty() {
        println!("No timed lyrics to follow");
        return Ok(());
    }

    let duration_ms = match u64::from(meta.duration_ms) {
        0 => session.lyric_lines().last().map_or(0, |l| l.time_ms + 5_000),
        d => d,
    };
    let mut clock = WallClock::new(duration_ms);
    session.handle_playback_event(PlaybackEvent::Opened { duration_ms });
    clock.play();

    let mut ticker = tokio::time::interval(poll_interval);
    loop {
        ticker.tick().await;
        session.poll(&clock);
        if clock.is_finished() {
            session.handle_playback_event(PlaybackEvent::Ended);
        }
        print_events(&session, &mut events);
        if clock.is_finished() {
            break;
        }
    }
    println!("[{}] End", format_time(clock.duration_ms()));
    Ok(())
}

fn print_events(session: &EditorSession, events: &mut mpsc::UnboundedReceiver<SessionEvent>) {
    while let Ok(event) = events.try_recv() {
        match event {
            SessionEvent::CurrentLineChanged(Some(index)) => {
                if let Some(line) = session.lyric_lines().get(index) {
                    println!("{}{}", format_tag(line.time_ms), line.text);
                }
            }
            SessionEvent::StatusChanged(status) => tracing::info!("{status}"),
            SessionEvent::LyricsReset => tracing::debug!("Lyrics reset"),
            _ => {}
        }
    }
}
