//! Symphonia Probe - 读取容器元数据或累加包时长得到音频时长

use std::io::Cursor;

use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::core::units::TimeBase;

use crate::application::ports::AudioProbePort;

/// 基于 symphonia 的音频时长探测
#[derive(Debug, Default, Clone, Copy)]
pub struct SymphoniaProbe;

impl SymphoniaProbe {
    pub fn new() -> Self {
        Self
    }

    fn probe(&self, data: &[u8], extension: &str) -> Option<u64> {
        let cursor = Cursor::new(data.to_vec());
        let mss = MediaSourceStream::new(Box::new(cursor), Default::default());

        let mut hint = Hint::new();
        hint.with_extension(extension);

        let probed = symphonia::default::get_probe()
            .format(
                &hint,
                mss,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .ok()?;
        let mut format = probed.format;

        let track = format.default_track()?;
        let track_id = track.id;
        let params = track.codec_params.clone();

        let time_base = params
            .time_base
            .or_else(|| params.sample_rate.map(|rate| TimeBase::new(1, rate)))?;

        // 容器头中已记录总帧数（WAV 等）
        if let Some(frames) = params.n_frames {
            return Some(to_millis(time_base, frames));
        }

        // 否则逐包累加（MP3 无 Xing 头时）
        let mut total: u64 = 0;
        while let Ok(packet) = format.next_packet() {
            if packet.track_id() == track_id {
                total += packet.dur();
            }
        }

        (total > 0).then(|| to_millis(time_base, total))
    }
}

fn to_millis(time_base: TimeBase, ts: u64) -> u64 {
    let time = time_base.calc_time(ts);
    time.seconds * 1000 + (time.frac * 1000.0).round() as u64
}

impl AudioProbePort for SymphoniaProbe {
    fn duration_ms(&self, data: &[u8], extension: &str) -> Option<u64> {
        if data.is_empty() {
            return None;
        }

        let duration = self.probe(data, extension);
        if duration.is_none() {
            tracing::debug!(
                extension = %extension,
                size = data.len(),
                "Could not probe audio duration"
            );
        }
        duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 构造 16-bit 单声道 PCM WAV
    fn wav_bytes(sample_rate: u32, samples: u32) -> Vec<u8> {
        let data_len = samples * 2;
        let mut out = Vec::with_capacity(44 + data_len as usize);
        out.extend_from_slice(b"RIFF");
        out.extend_from_slice(&(36 + data_len).to_le_bytes());
        out.extend_from_slice(b"WAVE");
        out.extend_from_slice(b"fmt ");
        out.extend_from_slice(&16u32.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&sample_rate.to_le_bytes());
        out.extend_from_slice(&(sample_rate * 2).to_le_bytes());
        out.extend_from_slice(&2u16.to_le_bytes());
        out.extend_from_slice(&16u16.to_le_bytes());
        out.extend_from_slice(b"data");
        out.extend_from_slice(&data_len.to_le_bytes());
        out.resize(44 + data_len as usize, 0);
        out
    }

    #[test]
    fn test_wav_duration() {
        let probe = SymphoniaProbe::new();
        assert_eq!(probe.duration_ms(&wav_bytes(8000, 8000), "wav"), Some(1000));
        assert_eq!(probe.duration_ms(&wav_bytes(16000, 4000), "wav"), Some(250));
    }

    #[test]
    fn test_garbage_returns_none() {
        let probe = SymphoniaProbe::new();
        assert_eq!(probe.duration_ms(b"not audio at all", "mp3"), None);
        assert_eq!(probe.duration_ms(&[], "mp3"), None);
    }
}
