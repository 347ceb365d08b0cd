//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（TtsEngine、AudioStorage、AudioProbe、Auth、Repositories）
//! - commands: CQRS 命令及处理器
//! - queries: CQRS 查询及处理器
//! - materializer: 共享音频物化（缓存、并发去重）
//! - targets / access: 肯定语目标解析与订阅校验
//! - error: 应用层错误定义

pub mod access;
pub mod commands;
pub mod error;
pub mod materializer;
pub mod ports;
pub mod queries;
pub mod targets;

// Re-exports
pub use commands::{
    // Affirmation commands
    AffirmationUpdate,
    BatchUpdateAffirmations,
    CreateCustomAffirmation,
    DeleteCustomAffirmation,
    UpdateAffirmation,
    // Audio commands
    DeleteAudio,
    UploadAudio,
    // Config commands
    UpdateUserConfig,
    // Generate commands
    BatchGenerate,
    GenerateAffirmationAudio,
    GenerateDefaults,
    PreviewSpeech,
    // User commands
    Login,
    RefreshToken,
    Register,
    SetUserPlan,
    // Handlers
    handlers::{
        BatchGenerateHandler, BatchUpdateAffirmationsHandler, CreateCustomAffirmationHandler,
        DeleteAudioHandler, DeleteCustomAffirmationHandler, GenerateAffirmationAudioHandler,
        GenerateDefaultsHandler, LoginHandler, PreviewSpeechHandler, RefreshTokenHandler,
        RegisterHandler, SetUserPlanHandler, UpdateAffirmationHandler, UpdateUserConfigHandler,
        UploadAudioHandler,
    },
};

pub use error::ApplicationError;
pub use materializer::{AudioMaterializer, MaterializeRequest, MaterializedAudio};
pub use targets::{AffirmationTarget, TargetResolver};

pub use ports::{
    // Audio
    AudioProbePort,
    AudioStoragePort,
    StorageError,
    StoredAudio,
    // Auth
    AuthError,
    PasswordHasherPort,
    TokenKind,
    TokenServicePort,
    // Repositories
    AffirmationAudioRepositoryPort,
    AffirmationRepositoryPort,
    CategoryRepositoryPort,
    RepositoryError,
    UserAffirmationRepositoryPort,
    UserConfigRepositoryPort,
    UserRepositoryPort,
    VoiceRepositoryPort,
    // TTS engine
    SpeechAudio,
    SpeechRequest,
    TtsEnginePort,
    TtsError,
};

pub use queries::{
    // Audio queries
    GetAudioFile,
    // Catalog queries
    ListCategories,
    ListDefaultAffirmations,
    ListUserAffirmations,
    // Usage queries
    EstimateCatalog,
    EstimateUsage,
    // User queries
    GetCurrentUser,
    GetUserConfig,
    // Voice queries
    GetDefaultVoice,
    GetSubscriptionInfo,
    GetVoicePreview,
    ListConfiguredVoices,
    ListProviderVoices,
    ListRecommendedVoices,
    // Handlers
    handlers::{
        EstimateCatalogHandler, EstimateUsageHandler, GetAudioFileHandler, GetCurrentUserHandler,
        GetDefaultVoiceHandler, GetSubscriptionInfoHandler, GetUserConfigHandler,
        GetVoicePreviewHandler, ListCategoriesHandler, ListConfiguredVoicesHandler,
        ListDefaultAffirmationsHandler, ListProviderVoicesHandler, ListRecommendedVoicesHandler,
        ListUserAffirmationsHandler,
    },
};
