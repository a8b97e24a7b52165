// gladia-live-cli ライブラリ
// テストから各モジュールにアクセスできるようにするため

pub mod audio;
pub mod chunks;
pub mod client;
pub mod config;
pub mod models;
pub mod streaming;
