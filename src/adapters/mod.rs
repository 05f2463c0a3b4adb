// Adapters - External system implementations

pub mod exec_ffmpeg;
pub mod toml_config;
pub mod zip_archive;

// Re-export adapters
pub use exec_ffmpeg::FFmpegAdapter;
pub use toml_config::Settings;
pub use zip_archive::ZipArchiveAdapter;
