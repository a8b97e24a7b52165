use anyhow::Result;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use futures_util::{SinkExt, StreamExt};
use std::time::Duration;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tokio_tungstenite::{connect_async, connect_async_tls_with_config, Connector};

use crate::config::StreamingConfig;
use crate::models::{ClientMessage, ServerMessage};

/// セッションのwebsocketへ音声を送信し、後処理完了まで待機する。
///
/// フェーズは厳密に逐次:
/// 1. 全チャンクをペーシング付きで順番に送信
/// 2. stop_recordingを1回送信
/// 3. 終端メッセージ（post_processing_result）または正常クローズまで受信
pub async fn stream_audio<I>(url: &str, chunks: I, config: &StreamingConfig) -> Result<()>
where
    I: IntoIterator<Item = Result<Vec<u8>>>,
{
    let (mut ws, _response) = if config.accept_invalid_certs {
        log::warn!("TLS証明書検証を無効化して接続します（accept_invalid_certs = true）");
        let connector = native_tls::TlsConnector::builder()
            .danger_accept_invalid_certs(true)
            .danger_accept_invalid_hostnames(true)
            .build()?;
        connect_async_tls_with_config(url, None, false, Some(Connector::NativeTls(connector)))
            .await?
    } else {
        connect_async(url).await?
    };

    log::info!("websocket接続を確立しました: {}", url);

    // 送信フェーズ: リアルタイム配信を近似する固定レートのスロットリング
    let pacing = Duration::from_millis(config.pacing_ms);
    let mut sent_chunks = 0usize;

    for chunk in chunks {
        let chunk = chunk?;
        let message = ClientMessage::audio_chunk(BASE64_STANDARD.encode(&chunk));
        ws.send(Message::Text(serde_json::to_string(&message)?.into()))
            .await?;
        sent_chunks += 1;
        tokio::time::sleep(pacing).await;
    }

    ws.send(Message::Text(
        serde_json::to_string(&ClientMessage::StopRecording)?.into(),
    ))
    .await?;

    log::info!("{}チャンクを送信し、停止シグナルを送りました", sent_chunks);

    // 受信フェーズ: 終端メッセージまでドレインする。
    // 終端前の正常クローズも受理する（後処理結果はHTTPで取得できるため）
    loop {
        let frame = match ws.next().await {
            Some(Ok(frame)) => frame,
            Some(Err(WsError::ConnectionClosed)) | None => break,
            Some(Err(e)) => return Err(anyhow::anyhow!("websocket受信エラー: {}", e)),
        };

        match frame {
            Message::Text(text) => {
                let message: ServerMessage = serde_json::from_str(&text)
                    .map_err(|e| anyhow::anyhow!("メッセージのJSONパースエラー: {}", e))?;

                if message.is_terminal() {
                    log::info!("後処理完了メッセージを受信しました");
                    break;
                }

                // 中間メッセージは破棄する
                log::debug!("メッセージを破棄: type={}", message.kind);
            }
            Message::Close(frame) => {
                let normal = frame
                    .as_ref()
                    .map(|f| f.code == CloseCode::Normal)
                    .unwrap_or(true);

                if normal {
                    log::info!("サーバーが接続を正常にクローズしました");
                    break;
                }

                return Err(anyhow::anyhow!(
                    "websocketが異常クローズされました: {:?}",
                    frame
                ));
            }
            // ping/pong等の制御フレームは無視
            _ => continue,
        }
    }

    // 既にクローズ済みの場合のエラーは無視してよい
    let _ = ws.close(None).await;

    Ok(())
}
