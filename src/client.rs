use std::time::Duration;

use crate::config::Config;
use crate::models::{Session, SessionRequest, SessionResult};

/// Gladia v2 live APIのHTTPクライアント。
/// セッション作成と最終結果の取得のみを担当する（ストリーミングはstreaming.rs）。
#[derive(Debug, Clone)]
pub struct GladiaClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug)]
pub enum ClientError {
    Network(reqwest::Error),
    InvalidResponse(String),
    ServerError(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(error: reqwest::Error) -> Self {
        ClientError::Network(error)
    }
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientError::Network(err) => write!(f, "ネットワークエラー: {}", err),
            ClientError::InvalidResponse(msg) => write!(f, "無効なレスポンス: {}", msg),
            ClientError::ServerError(msg) => write!(f, "サーバーエラー: {}", msg),
        }
    }
}

impl std::error::Error for ClientError {}

impl GladiaClient {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.api.timeout_seconds))
            .danger_accept_invalid_certs(config.streaming.accept_invalid_certs)
            .build()
            .map_err(|e| anyhow::anyhow!("HTTPクライアントの作成に失敗しました: {}", e))?;

        Ok(Self {
            client,
            base_url: config.api.base_url.trim_end_matches('/').to_string(),
            api_key: config.api.api_key.clone(),
        })
    }

    /// ライブ翻訳セッションを作成する。非2xxは即時エラー（リトライなし）
    pub async fn initiate_session(
        &self,
        request: &SessionRequest,
    ) -> Result<Session, ClientError> {
        let url = format!("{}/v2/live", self.base_url);
        let response = self
            .client
            .post(&url)
            .header("X-Gladia-Key", &self.api_key)
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ClientError::ServerError(format!(
                "HTTP {}: {}",
                response.status(),
                response.text().await.unwrap_or_default()
            )));
        }

        let session: Session = response
            .json()
            .await
            .map_err(|e| ClientError::InvalidResponse(format!("JSONパースエラー: {}", e)))?;

        log::info!("セッションを作成しました: id={}", session.id);

        Ok(session)
    }

    /// 後処理完了後の最終結果を取得する
    pub async fn fetch_result(&self, session_id: &str) -> Result<SessionResult, ClientError> {
        let url = format!("{}/v2/live/{}", self.base_url, session_id);
        let response = self
            .client
            .get(&url)
            .header("X-Gladia-Key", &self.api_key)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ClientError::ServerError(format!(
                "HTTP {}: {}",
                response.status(),
                response.text().await.unwrap_or_default()
            )));
        }

        let result: SessionResult = response
            .json()
            .await
            .map_err(|e| ClientError::InvalidResponse(format!("JSONパースエラー: {}", e)))?;

        Ok(result)
    }
}
