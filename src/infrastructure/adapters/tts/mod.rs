//! TTS Adapter - ElevenLabs 客户端与测试用 Fake 实现

mod elevenlabs_client;
mod fake_tts_client;

pub use elevenlabs_client::{ElevenLabsClient, ElevenLabsClientConfig, VoiceSettings};
pub use fake_tts_client::{FakeTtsClient, FakeTtsClientConfig};
