use gladia_live_cli::config::Config;
use gladia_live_cli::models::*;
use serde_json::json;

/// audio_chunkエンベロープのJSON形状テスト
#[test]
fn test_audio_chunk_envelope_shape() {
    let message = ClientMessage::audio_chunk("QUJDRA==".to_string());
    let value = serde_json::to_value(&message).unwrap();

    assert_eq!(
        value,
        json!({
            "type": "audio_chunk",
            "data": { "chunk": "QUJDRA==" }
        })
    );
}

/// stop_recordingエンベロープのJSON形状テスト
#[test]
fn test_stop_recording_envelope_shape() {
    let value = serde_json::to_value(&ClientMessage::StopRecording).unwrap();
    assert_eq!(value, json!({ "type": "stop_recording" }));
}

/// サーバーメッセージはtypeフィールドのみ検査する
#[test]
fn test_server_message_type_inspection() {
    let terminal: ServerMessage =
        serde_json::from_str(r#"{"type":"post_processing_result","data":{"foo":1}}"#).unwrap();
    assert!(terminal.is_terminal());

    let interim: ServerMessage =
        serde_json::from_str(r#"{"type":"partial_transcript","text":"..."}"#).unwrap();
    assert!(!interim.is_terminal());
    assert_eq!(interim.kind, "partial_transcript");
}

/// typeフィールドの無いメッセージはパースエラー
#[test]
fn test_server_message_requires_type() {
    let result: Result<ServerMessage, _> = serde_json::from_str(r#"{"data":{}}"#);
    assert!(result.is_err());
}

/// セッション作成リクエストの形状テスト
#[test]
fn test_session_request_shape() {
    let config = Config::default();
    let request = SessionRequest::from_config(&config, "fr");
    let value = serde_json::to_value(&request).unwrap();

    assert_eq!(
        value,
        json!({
            "encoding": "wav/pcm",
            "sample_rate": 16000,
            "bit_depth": 16,
            "channels": 1,
            "language_config": {
                "languages": ["ta"],
                "code_switching": false
            },
            "realtime_processing": {
                "translation": true,
                "translation_config": {
                    "target_languages": ["fr"]
                }
            }
        })
    );
}

/// セッションレスポンスのパーステスト
#[test]
fn test_session_parse() {
    let session: Session = serde_json::from_str(
        r#"{"id":"abc-123","url":"wss://api.gladia.io/v2/live?token=xyz","extra":true}"#,
    )
    .unwrap();
    assert_eq!(session.id, "abc-123");
    assert_eq!(session.url, "wss://api.gladia.io/v2/live?token=xyz");
}

/// idまたはurlが欠けたレスポンスはエラー
#[test]
fn test_session_missing_fields_fail() {
    let result: Result<Session, _> = serde_json::from_str(r#"{"id":"abc-123"}"#);
    assert!(result.is_err());
}

/// 完全な結果構造からfull_transcriptを取り出す
#[test]
fn test_full_transcript_extraction() {
    let payload = json!({
        "result": {
            "translation": {
                "results": [
                    { "full_transcript": "hello world", "languages": ["en"] }
                ]
            }
        }
    });

    let result: SessionResult = serde_json::from_value(payload).unwrap();
    assert_eq!(result.full_transcript(), "hello world");
}

/// 期待する構造が欠けている場合はフォールバック文字列を返し、エラーにしない
#[test]
fn test_fallback_on_missing_structure() {
    let cases = vec![
        json!({}),
        json!({ "result": null }),
        json!({ "result": {} }),
        json!({ "result": { "translation": null } }),
        json!({ "result": { "translation": {} } }),
        json!({ "result": { "translation": { "results": [] } } }),
        json!({ "result": { "translation": { "results": [{}] } } }),
    ];

    for case in cases {
        let result: SessionResult = serde_json::from_value(case.clone()).unwrap();
        assert_eq!(
            result.full_transcript(),
            "Translation not available.",
            "フォールバックにならないケース: {}",
            case
        );
    }
}

/// フォールバック文字列の定数値
#[test]
fn test_fallback_literal() {
    assert_eq!(TRANSLATION_FALLBACK, "Translation not available.");
    assert_eq!(POST_PROCESSING_RESULT, "post_processing_result");
}
