use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// APIキーを上書きする環境変数名
pub const API_KEY_ENV: &str = "GLADIA_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    pub audio: AudioConfig,
    pub streaming: StreamingConfig,
    pub language: LanguageConfigSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    /// GLADIA_API_KEY 環境変数が設定されている場合はそちらを優先
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "ApiConfig::default_timeout_seconds")]
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    pub sample_rate: u32,
    pub channels: u16,
    pub bit_depth: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamingConfig {
    pub chunk_frames: usize,
    pub pacing_ms: u64,
    /// TLS証明書検証を無効化する（既定は検証有効）
    #[serde(default)]
    pub accept_invalid_certs: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageConfigSettings {
    pub source_languages: Vec<String>,
    pub code_switching: bool,
    pub default_target: String,
}

impl ApiConfig {
    const fn default_timeout_seconds() -> u64 {
        60
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                base_url: "https://api.gladia.io".to_string(),
                api_key: String::new(),
                timeout_seconds: ApiConfig::default_timeout_seconds(),
            },
            audio: AudioConfig {
                sample_rate: 16000,
                channels: 1,
                bit_depth: 16,
            },
            streaming: StreamingConfig {
                chunk_frames: 1024,
                pacing_ms: 30,
                accept_invalid_certs: false,
            },
            language: LanguageConfigSettings {
                source_languages: vec!["ta".to_string()],
                code_switching: false,
                default_target: "en".to_string(),
            },
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn load_or_create_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = if path.as_ref().exists() {
            match Self::load_from_file(&path) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!(
                        "設定ファイルの読み込みに失敗しました: {}. デフォルト設定を使用します。",
                        e
                    );
                    let config = Self::default();
                    config.save_to_file(&path)?;
                    config
                }
            }
        } else {
            let config = Self::default();
            config.save_to_file(&path)?;
            log::info!(
                "デフォルト設定ファイルを作成しました: {}",
                path.as_ref().display()
            );
            config
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// 環境変数によるAPIキーの上書き
    pub fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.is_empty() {
                self.api.api_key = key;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.is_empty() {
            return Err(anyhow::anyhow!("APIベースURLが設定されていません"));
        }

        if self.api.api_key.is_empty() {
            return Err(anyhow::anyhow!(
                "APIキーが設定されていません。config.toml の [api] api_key か環境変数 {} を設定してください",
                API_KEY_ENV
            ));
        }

        if self.audio.sample_rate == 0 {
            return Err(anyhow::anyhow!(
                "無効なサンプリングレート: {}",
                self.audio.sample_rate
            ));
        }

        if self.audio.channels != 1 {
            return Err(anyhow::anyhow!(
                "チャンネル数はモノラル(1)のみ対応しています: {}",
                self.audio.channels
            ));
        }

        if self.audio.bit_depth != 16 {
            return Err(anyhow::anyhow!(
                "ビット深度は16のみ対応しています: {}",
                self.audio.bit_depth
            ));
        }

        if self.streaming.chunk_frames == 0 {
            return Err(anyhow::anyhow!("チャンクサイズは1フレーム以上である必要があります"));
        }

        if self.language.source_languages.is_empty() {
            return Err(anyhow::anyhow!("ソース言語が設定されていません"));
        }

        Ok(())
    }
}
