//! Audio Probe Port - 音频时长探测

/// Audio Probe Port
pub trait AudioProbePort: Send + Sync {
    /// 探测编码音频的时长（毫秒），无法识别时返回 None
    fn duration_ms(&self, data: &[u8], extension: &str) -> Option<u64>;
}
