use serde::{Deserialize, Serialize};

use crate::config::Config;

/// サーバー側の後処理完了を示す終端メッセージタイプ
pub const POST_PROCESSING_RESULT: &str = "post_processing_result";

/// 結果構造が期待通りでない場合に出力する固定文字列
pub const TRANSLATION_FALLBACK: &str = "Translation not available.";

// =============================================================================
// セッション作成 (POST /v2/live)
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct SessionRequest {
    pub encoding: String,
    pub sample_rate: u32,
    pub bit_depth: u16,
    pub channels: u16,
    pub language_config: LanguageConfig,
    pub realtime_processing: RealtimeProcessing,
}

#[derive(Debug, Clone, Serialize)]
pub struct LanguageConfig {
    pub languages: Vec<String>,
    pub code_switching: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RealtimeProcessing {
    pub translation: bool,
    pub translation_config: TranslationConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct TranslationConfig {
    pub target_languages: Vec<String>,
}

impl SessionRequest {
    /// 設定とターゲット言語からセッション作成リクエストを組み立てる
    pub fn from_config(config: &Config, target_language: &str) -> Self {
        Self {
            encoding: "wav/pcm".to_string(),
            sample_rate: config.audio.sample_rate,
            bit_depth: config.audio.bit_depth,
            channels: config.audio.channels,
            language_config: LanguageConfig {
                languages: config.language.source_languages.clone(),
                code_switching: config.language.code_switching,
            },
            realtime_processing: RealtimeProcessing {
                translation: true,
                translation_config: TranslationConfig {
                    target_languages: vec![target_language.to_string()],
                },
            },
        }
    }
}

/// セッション作成レスポンス。idとwebsocket URLのみ使用する
#[derive(Debug, Clone, Deserialize)]
pub struct Session {
    pub id: String,
    pub url: String,
}

// =============================================================================
// WebSocketメッセージ
// =============================================================================

/// クライアント→サーバーのメッセージ
#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    #[serde(rename = "audio_chunk")]
    AudioChunk { data: AudioChunkData },

    #[serde(rename = "stop_recording")]
    StopRecording,
}

#[derive(Debug, Serialize)]
pub struct AudioChunkData {
    /// base64エンコードされたPCMバイト列
    pub chunk: String,
}

impl ClientMessage {
    pub fn audio_chunk(encoded: String) -> Self {
        ClientMessage::AudioChunk {
            data: AudioChunkData { chunk: encoded },
        }
    }
}

/// サーバー→クライアントのメッセージ。typeフィールドのみ検査する
#[derive(Debug, Deserialize)]
pub struct ServerMessage {
    #[serde(rename = "type")]
    pub kind: String,
}

impl ServerMessage {
    pub fn is_terminal(&self) -> bool {
        self.kind == POST_PROCESSING_RESULT
    }
}

// =============================================================================
// 最終結果 (GET /v2/live/{id})
// =============================================================================

// result -> translation -> results[0] -> full_transcript を辿る。
// どの階層が欠けていてもエラーにせずフォールバック文字列を返す。

#[derive(Debug, Default, Deserialize)]
pub struct SessionResult {
    #[serde(default)]
    pub result: Option<ResultPayload>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ResultPayload {
    #[serde(default)]
    pub translation: Option<TranslationPayload>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TranslationPayload {
    #[serde(default)]
    pub results: Vec<TranslationEntry>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TranslationEntry {
    #[serde(default)]
    pub full_transcript: Option<String>,
}

impl SessionResult {
    /// 翻訳テキストを取り出す。構造が欠けている場合は固定文字列
    pub fn full_transcript(&self) -> &str {
        self.result
            .as_ref()
            .and_then(|r| r.translation.as_ref())
            .and_then(|t| t.results.first())
            .and_then(|entry| entry.full_transcript.as_deref())
            .unwrap_or(TRANSLATION_FALLBACK)
    }
}
