//! Storage Adapter - 本地文件系统存储

mod file_storage;

pub use file_storage::LocalAudioStorage;
