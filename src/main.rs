mod audio;
mod chunks;
mod client;
mod config;
mod models;
mod streaming;

use crate::audio::AudioNormalizer;
use crate::chunks::AudioChunks;
use crate::client::GladiaClient;
use crate::config::Config;
use crate::models::SessionRequest;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ログの初期化（進捗はstderr、stdoutは最終結果のみ）
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!("使い方: {} <input_audio_file> [target_language]", args[0]);
        std::process::exit(1);
    }

    let input_audio_file = &args[1];

    // 設定ファイルの読み込みと検証
    let config = Config::load_or_create_default("config.toml")?;
    config.validate()?;

    let target_language = args
        .get(2)
        .cloned()
        .unwrap_or_else(|| config.language.default_target.clone());

    log::info!("入力ファイル: {}", input_audio_file);
    log::info!("翻訳ターゲット言語: {}", target_language);

    // 音声の正規化（モノラル・16kHz・16-bit PCM）
    let normalizer = AudioNormalizer::new(&config);
    let normalized = normalizer.normalize(input_audio_file)?;

    // セッション作成。ここで失敗した場合はwebsocket接続を試みない
    let client = GladiaClient::new(&config)?;
    let request = SessionRequest::from_config(&config, &target_language);
    let session = client.initiate_session(&request).await?;

    // ストリーミングと後処理待ち
    let audio_chunks = AudioChunks::open(normalized.path(), config.streaming.chunk_frames)?;
    streaming::stream_audio(&session.url, audio_chunks, &config.streaming).await?;

    // 最終結果の取得と出力
    let result = client.fetch_result(&session.id).await?;
    println!("{}", result.full_transcript());

    Ok(())
}
