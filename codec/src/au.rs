use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use anyhow::Context;

use crate::Audio;

const AU_MAGIC: u32 = 0x2e73_6e64; // ".snd"

const ENCODING_PCM_8: u32 = 2;
const ENCODING_PCM_16: u32 = 3;
const ENCODING_PCM_24: u32 = 4;
const ENCODING_PCM_32: u32 = 5;
const ENCODING_FLOAT_32: u32 = 6;

/// Decode a Sun AU file to mono f32.
///
/// Symphonia has no AU demuxer; the format is a 24-byte big-endian header
/// followed by raw big-endian samples. GTZAN ships 16-bit linear PCM.
pub(crate) fn decode_au(path: &Path) -> anyhow::Result<Audio> {
    let mut reader = BufReader::new(
        File::open(path).with_context(|| format!("Failed to open {}", path.display()))?,
    );

    let mut header = [0u8; 24];
    reader
        .read_exact(&mut header)
        .with_context(|| format!("Truncated AU header in {}", path.display()))?;

    let magic = read_be_u32(&header[0..4]);
    anyhow::ensure!(magic == AU_MAGIC, "Not an AU file: {}", path.display());

    let data_offset = read_be_u32(&header[4..8]) as usize;
    let encoding = read_be_u32(&header[12..16]);
    let sample_rate = read_be_u32(&header[16..20]);
    let channels = read_be_u32(&header[20..24]) as usize;

    anyhow::ensure!(sample_rate > 0, "Zero sample rate in {}", path.display());
    anyhow::ensure!(channels > 0, "Zero channel count in {}", path.display());
    anyhow::ensure!(data_offset >= 24, "Bad data offset in {}", path.display());

    // Skip the optional annotation field between header and data.
    let mut annotation = vec![0u8; data_offset - 24];
    reader.read_exact(&mut annotation)?;

    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;

    let interleaved = decode_samples(&data, encoding)
        .with_context(|| format!("Unsupported AU encoding {encoding} in {}", path.display()))?;

    anyhow::ensure!(
        !interleaved.is_empty(),
        "No audio samples in {}",
        path.display()
    );

    let samples = if channels == 1 {
        interleaved
    } else {
        interleaved
            .chunks_exact(channels)
            .map(|frame| frame.iter().sum::<f32>() / channels as f32)
            .collect()
    };

    Ok(Audio {
        samples,
        sample_rate,
    })
}

fn decode_samples(data: &[u8], encoding: u32) -> anyhow::Result<Vec<f32>> {
    let samples = match encoding {
        ENCODING_PCM_8 => data.iter().map(|&b| f32::from(b as i8) / 128.0).collect(),
        ENCODING_PCM_16 => data
            .chunks_exact(2)
            .map(|b| f32::from(i16::from_be_bytes([b[0], b[1]])) / 32768.0)
            .collect(),
        ENCODING_PCM_24 => data
            .chunks_exact(3)
            .map(|b| {
                let value = i32::from_be_bytes([b[0], b[1], b[2], 0]) >> 8;
                value as f32 / 8_388_608.0
            })
            .collect(),
        ENCODING_PCM_32 => data
            .chunks_exact(4)
            .map(|b| i32::from_be_bytes([b[0], b[1], b[2], b[3]]) as f32 / 2_147_483_648.0)
            .collect(),
        ENCODING_FLOAT_32 => data
            .chunks_exact(4)
            .map(|b| f32::from_be_bytes([b[0], b[1], b[2], b[3]]))
            .collect(),
        _ => anyhow::bail!("encoding {encoding} is not linear PCM"),
    };
    Ok(samples)
}

fn read_be_u32(bytes: &[u8]) -> u32 {
    u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn au_bytes(encoding: u32, sample_rate: u32, channels: u32, data: &[u8]) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&AU_MAGIC.to_be_bytes());
        bytes.extend_from_slice(&24u32.to_be_bytes());
        bytes.extend_from_slice(&(data.len() as u32).to_be_bytes());
        bytes.extend_from_slice(&encoding.to_be_bytes());
        bytes.extend_from_slice(&sample_rate.to_be_bytes());
        bytes.extend_from_slice(&channels.to_be_bytes());
        bytes.extend_from_slice(data);
        bytes
    }

    fn decode_bytes(bytes: &[u8]) -> anyhow::Result<Audio> {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.au");
        std::fs::write(&path, bytes).unwrap();
        decode_au(&path)
    }

    #[test]
    fn test_decode_pcm16_mono() {
        let data: Vec<u8> = [0i16, 16384, -16384, 32767]
            .iter()
            .flat_map(|s| s.to_be_bytes())
            .collect();
        let audio = decode_bytes(&au_bytes(ENCODING_PCM_16, 22050, 1, &data)).unwrap();

        assert_eq!(22050, audio.sample_rate);
        assert_eq!(4, audio.samples.len());
        assert_eq!(0.0, audio.samples[0]);
        assert!((audio.samples[1] - 0.5).abs() < 1e-4);
        assert!((audio.samples[2] + 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_decode_pcm16_stereo_downmixes() {
        let data: Vec<u8> = [16384i16, -16384, 8192, 8192]
            .iter()
            .flat_map(|s| s.to_be_bytes())
            .collect();
        let audio = decode_bytes(&au_bytes(ENCODING_PCM_16, 44100, 2, &data)).unwrap();

        assert_eq!(2, audio.samples.len());
        assert!(audio.samples[0].abs() < 1e-4);
        assert!((audio.samples[1] - 0.25).abs() < 1e-4);
    }

    #[test]
    fn test_rejects_bad_magic() {
        let mut bytes = au_bytes(ENCODING_PCM_16, 22050, 1, &[0, 0]);
        bytes[0] = b'X';
        assert!(decode_bytes(&bytes).is_err());
    }

    #[test]
    fn test_rejects_unknown_encoding() {
        // Encoding 1 is mu-law, not linear PCM.
        let bytes = au_bytes(1, 22050, 1, &[0, 0]);
        assert!(decode_bytes(&bytes).is_err());
    }

    #[test]
    fn test_rejects_truncated_header() {
        assert!(decode_bytes(&[0x2e, 0x73, 0x6e]).is_err());
    }
}
