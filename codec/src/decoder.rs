use std::fs::File;
use std::path::Path;

use anyhow::Context;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::au;
use crate::Audio;

/// Decode an audio file to mono f32 at its native sample rate.
///
/// Multi-channel input is downmixed by channel averaging. Sun AU files are
/// handled by a built-in reader, everything else goes through symphonia.
pub fn decode_file(path: &Path) -> anyhow::Result<Audio> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    if ext == "au" {
        return au::decode_au(path);
    }

    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if !ext.is_empty() {
        hint.with_extension(&ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .with_context(|| format!("Unrecognized audio format: {}", path.display()))?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .with_context(|| format!("No audio track in {}", path.display()))?;

    let track_id = track.id;
    let codec_params = track.codec_params.clone();
    let sample_rate = codec_params
        .sample_rate
        .with_context(|| format!("Unknown sample rate in {}", path.display()))?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&codec_params, &DecoderOptions::default())
        .context("Failed to create decoder")?;

    let mut samples = Vec::<f32>::new();
    let mut sample_buf: Option<SampleBuffer<f32>> = None;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(symphonia::core::errors::Error::IoError(e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => return Err(e).context("Failed to read packet"),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            // Skip undecodable packets, e.g. leading garbage in MP3 streams.
            Err(symphonia::core::errors::Error::DecodeError(_)) => continue,
            Err(e) => return Err(e).context("Failed to decode packet"),
        };

        let spec = *decoded.spec();
        let channels = spec.channels.count();

        let buf = match &mut sample_buf {
            Some(buf) if buf.capacity() >= decoded.capacity() * channels => buf,
            _ => sample_buf.insert(SampleBuffer::new(decoded.capacity() as u64, spec)),
        };

        buf.copy_interleaved_ref(decoded);
        mixdown(buf.samples(), channels, &mut samples);
    }

    anyhow::ensure!(
        !samples.is_empty(),
        "No audio samples decoded from {}",
        path.display()
    );

    Ok(Audio {
        samples,
        sample_rate,
    })
}

/// Average interleaved frames down to mono.
fn mixdown(interleaved: &[f32], channels: usize, output: &mut Vec<f32>) {
    if channels == 1 {
        output.extend_from_slice(interleaved);
        return;
    }

    output.extend(
        interleaved
            .chunks_exact(channels)
            .map(|frame| frame.iter().sum::<f32>() / channels as f32),
    );
}
