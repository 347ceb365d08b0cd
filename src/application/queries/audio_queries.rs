//! Audio Queries

/// 读取存储中的音频文件
#[derive(Debug, Clone)]
pub struct GetAudioFile {
    /// 存储根目录下的相对路径
    pub path: String,
}
