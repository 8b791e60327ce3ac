//! Best-effort property probing for imported audio and images.
//!
//! Probes never fail: anything they cannot read comes back as `None` and the
//! caller keeps whatever it already has.

use std::io::Cursor;

use id3::{Tag, TagLike};
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::{MediaSourceStream, MediaSourceStreamOptions};
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::core::units::TimeBase;

use crate::types::Metadata;

/// Tag values read from an audio buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AudioProperties {
    /// Track title.
    pub title: Option<String>,
    /// Performing artist.
    pub artist: Option<String>,
    /// Album name.
    pub album: Option<String>,
    /// Release year.
    pub year: Option<String>,
    /// Duration in milliseconds.
    pub duration_ms: Option<u32>,
    /// Bitrate in kbit/s.
    pub bitrate_kbps: Option<u32>,
    /// Sample rate in Hz.
    pub sample_rate_hz: Option<u32>,
    /// Number of audio channels.
    pub channel_count: Option<u16>,
}

/// Dimensions read from an image buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImageProperties {
    /// Pixel width.
    pub width: Option<u32>,
    /// Pixel height.
    pub height: Option<u32>,
}

/// Music/image property probe collaborator.
pub trait PropertyProbe {
    /// Read whatever tags `data` carries.
    fn probe_audio(&self, data: &[u8], file_name: &str) -> AudioProperties;

    /// Read the pixel dimensions of `data`.
    fn probe_image(&self, data: &[u8], file_name: &str) -> ImageProperties;
}

/// Probe reading ID3 tags, audio stream headers and image headers.
#[derive(Debug, Clone, Copy, Default)]
pub struct TagProbe;

impl PropertyProbe for TagProbe {
    fn probe_audio(&self, data: &[u8], file_name: &str) -> AudioProperties {
        let mut props = match Tag::read_from2(Cursor::new(data)) {
            Ok(tag) => tag_properties(&tag),
            Err(e) => {
                tracing::debug!("No readable tag in {file_name}: {e}");
                AudioProperties::default()
            }
        };

        if let Some(stream) = stream_properties(data, file_name) {
            // An explicit TLEN frame wins over the container's frame count.
            props.duration_ms = props.duration_ms.or(stream.duration_ms);
            props.sample_rate_hz = stream.sample_rate_hz;
            props.channel_count = stream.channel_count;
        }
        props.bitrate_kbps = props.duration_ms.and_then(|ms| average_kbps(data.len(), ms));
        props
    }

    fn probe_image(&self, data: &[u8], file_name: &str) -> ImageProperties {
        let dimensions = image::ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(image::ImageError::from)
            .and_then(image::ImageReader::into_dimensions);

        match dimensions {
            Ok((width, height)) => ImageProperties {
                width: Some(width),
                height: Some(height),
            },
            Err(e) => {
                tracing::debug!("Could not read dimensions of {file_name}: {e}");
                ImageProperties::default()
            }
        }
    }
}

fn tag_properties(tag: &Tag) -> AudioProperties {
    let text = |value: Option<&str>| {
        value
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
    };

    AudioProperties {
        title: text(tag.title()),
        artist: text(tag.artist()),
        album: text(tag.album()),
        year: tag.year().filter(|y| *y > 0).map(|y| y.to_string()),
        duration_ms: tag.duration().filter(|d| *d > 0),
        ..AudioProperties::default()
    }
}

/// Duration, sample rate and channels read from the audio stream itself.
struct StreamProperties {
    duration_ms: Option<u32>,
    sample_rate_hz: Option<u32>,
    channel_count: Option<u16>,
}

fn stream_properties(data: &[u8], file_name: &str) -> Option<StreamProperties> {
    let mss = MediaSourceStream::new(
        Box::new(Cursor::new(data.to_vec())),
        MediaSourceStreamOptions::default(),
    );

    let mut hint = Hint::new();
    if let Some(ext) = std::path::Path::new(file_name).extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = match symphonia::default::get_probe().format(
        &hint,
        mss,
        &FormatOptions::default(),
        &MetadataOptions::default(),
    ) {
        Ok(probed) => probed,
        Err(e) => {
            tracing::debug!("No readable audio stream in {file_name}: {e}");
            return None;
        }
    };

    let params = &probed.format.default_track()?.codec_params;
    let time_base = params
        .time_base
        .or_else(|| params.sample_rate.filter(|r| *r > 0).map(|rate| TimeBase::new(1, rate)));

    Some(StreamProperties {
        duration_ms: time_base
            .zip(params.n_frames)
            .and_then(|(tb, frames)| duration_ms(tb, frames)),
        sample_rate_hz: params.sample_rate.filter(|r| *r > 0),
        channel_count: params
            .channels
            .and_then(|c| u16::try_from(c.count()).ok())
            .filter(|c| *c > 0),
    })
}

fn duration_ms(time_base: TimeBase, frames: u64) -> Option<u32> {
    if time_base.denom == 0 {
        return None;
    }
    let ms = u128::from(frames) * 1_000 * u128::from(time_base.numer) / u128::from(time_base.denom);
    u32::try_from(ms).ok().filter(|ms| *ms > 0)
}

/// Average bitrate over the whole buffer, tags included.
fn average_kbps(byte_len: usize, duration_ms: u32) -> Option<u32> {
    if duration_ms == 0 {
        return None;
    }
    // bits per millisecond is kbit/s
    let kbps = u64::try_from(byte_len).ok()? * 8 / u64::from(duration_ms);
    u32::try_from(kbps).ok().filter(|k| *k > 0)
}

impl Metadata {
    /// Copy probed values into fields that are still empty or zero.
    ///
    /// Returns whether any field was filled.
    pub fn fill_missing(&mut self, props: &AudioProperties) -> bool {
        fn fill_text(slot: &mut String, value: Option<&String>) -> bool {
            match value {
                Some(v) if slot.trim().is_empty() => {
                    slot.clone_from(v);
                    true
                }
                _ => false,
            }
        }
        fn fill_number<T: Copy + Default + PartialEq>(slot: &mut T, value: Option<T>) -> bool {
            match value {
                Some(v) if *slot == T::default() && v != T::default() => {
                    *slot = v;
                    true
                }
                _ => false,
            }
        }

        let mut filled = fill_text(&mut self.title, props.title.as_ref());
        filled |= fill_text(&mut self.artist, props.artist.as_ref());
        filled |= fill_text(&mut self.album, props.album.as_ref());
        filled |= fill_text(&mut self.year, props.year.as_ref());
        filled |= fill_number(&mut self.duration_ms, props.duration_ms);
        filled |= fill_number(&mut self.bitrate_kbps, props.bitrate_kbps);
        filled |= fill_number(&mut self.sample_rate_hz, props.sample_rate_hz);
        filled |= fill_number(&mut self.channel_count, props.channel_count);
        filled
    }
}
