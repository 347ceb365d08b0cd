//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod audio_probe;
mod audio_storage;
mod auth;
mod repositories;
mod tts_engine;

pub use audio_probe::AudioProbePort;
pub use audio_storage::{AudioStoragePort, StorageError, StoredAudio};
pub use auth::{AuthError, PasswordHasherPort, TokenKind, TokenServicePort};
pub use repositories::{
    AffirmationAudioRecord, AffirmationAudioRepositoryPort, AffirmationRecord,
    AffirmationRepositoryPort, CategoryRecord, CategoryRepositoryPort, LinkedAudio,
    OverlaySettings, RepositoryError, UserAffirmationRecord, UserAffirmationRepositoryPort,
    UserConfigRecord, UserConfigRepositoryPort, UserRecord, UserRepositoryPort, VoiceRecord,
    VoiceRepositoryPort,
};
pub use tts_engine::{
    ProviderVoice, SpeechAudio, SpeechRequest, SubscriptionInfo, TtsEnginePort, TtsError,
};
