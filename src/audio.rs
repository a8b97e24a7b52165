use anyhow::Result;
use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};
use std::fs::File;
use std::path::Path;
use symphonia::core::audio::{AudioBufferRef, Signal};
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tempfile::NamedTempFile;

use crate::config::Config;

/// 入力音声をストリーミング用の正規形（モノラル・16kHz・16-bit PCM）に変換する
pub struct AudioNormalizer {
    target_sample_rate: u32,
}

impl AudioNormalizer {
    pub fn new(config: &Config) -> Self {
        Self {
            target_sample_rate: config.audio.sample_rate,
        }
    }

    /// 任意の音声ファイルをデコードし、正規化済みWAVを一時ファイルに書き出す。
    /// 一時ファイルはハンドルのdropと同時に削除される。
    pub fn normalize<P: AsRef<Path>>(&self, input: P) -> Result<NamedTempFile> {
        let (samples, source_rate) = decode_to_mono(input.as_ref())?;

        let samples = if source_rate != self.target_sample_rate {
            resample(samples, source_rate as f64, self.target_sample_rate as f64)?
        } else {
            samples
        };

        let temp_file = NamedTempFile::with_suffix(".wav")?;
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: self.target_sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };

        let mut writer = hound::WavWriter::create(temp_file.path(), spec)?;
        for sample in &samples {
            let value = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
            writer.write_sample(value)?;
        }
        writer.finalize()?;

        log::debug!(
            "音声を正規化しました: {}フレーム / {}Hz -> {}",
            samples.len(),
            self.target_sample_rate,
            temp_file.path().display()
        );

        Ok(temp_file)
    }
}

/// 音声ファイルをモノラルf32サンプルにデコードし、元のサンプリングレートと共に返す
pub fn decode_to_mono(path: &Path) -> Result<(Vec<f32>, u32)> {
    if !path.exists() {
        return Err(anyhow::anyhow!(
            "音声ファイルが見つかりません: {}",
            path.display()
        ));
    }

    let file = File::open(path)?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(extension) = path.extension().and_then(|ext| ext.to_str()) {
        hint.with_extension(extension);
    }

    let meta_opts: MetadataOptions = Default::default();
    let fmt_opts: FormatOptions = Default::default();

    let probed = symphonia::default::get_probe().format(&hint, mss, &fmt_opts, &meta_opts)?;
    let mut format = probed.format;

    let (track_id, codec_params) = {
        let track = format
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or_else(|| anyhow::anyhow!("音声トラックが見つかりません"))?;

        (track.id, track.codec_params.clone())
    };

    let dec_opts: DecoderOptions = Default::default();
    let mut decoder = symphonia::default::get_codecs().make(&codec_params, &dec_opts)?;

    let mut samples = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(symphonia::core::errors::Error::ResetRequired) => break,
            Err(symphonia::core::errors::Error::IoError(ref err))
                if err.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(err) => return Err(anyhow::anyhow!("パケット読み込みエラー: {}", err)),
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(audio_buf) => {
                downmix_into(&audio_buf, &mut samples)?;
            }
            Err(symphonia::core::errors::Error::IoError(ref err))
                if err.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(err) => return Err(anyhow::anyhow!("デコードエラー: {}", err)),
        }
    }

    if samples.is_empty() {
        return Err(anyhow::anyhow!("音声データが空です"));
    }

    let source_rate = decoder
        .codec_params()
        .sample_rate
        .or(codec_params.sample_rate)
        .ok_or_else(|| anyhow::anyhow!("サンプリングレートが取得できません"))?;

    Ok((samples, source_rate))
}

/// デコード済みバッファをモノラルに平均化して追記する
fn downmix_into(audio_buf: &AudioBufferRef, samples: &mut Vec<f32>) -> Result<()> {
    match audio_buf {
        AudioBufferRef::F32(buf) => {
            let ch = buf.spec().channels.count();
            let frames = buf.frames();
            for i in 0..frames {
                let mut sum = 0.0f32;
                for c in 0..ch {
                    sum += buf.chan(c)[i];
                }
                samples.push(sum / ch as f32);
            }
        }
        AudioBufferRef::S32(buf) => {
            let ch = buf.spec().channels.count();
            let frames = buf.frames();
            for i in 0..frames {
                let mut sum = 0.0f32;
                for c in 0..ch {
                    sum += buf.chan(c)[i] as f32 / i32::MAX as f32;
                }
                samples.push(sum / ch as f32);
            }
        }
        AudioBufferRef::S16(buf) => {
            let ch = buf.spec().channels.count();
            let frames = buf.frames();
            for i in 0..frames {
                let mut sum = 0.0f32;
                for c in 0..ch {
                    sum += buf.chan(c)[i] as f32 / i16::MAX as f32;
                }
                samples.push(sum / ch as f32);
            }
        }
        _ => return Err(anyhow::anyhow!("サポートされていない音声フォーマットです")),
    }
    Ok(())
}

/// モノラルサンプル列をターゲットレートにリサンプリングする
pub fn resample(samples: Vec<f32>, input_rate: f64, output_rate: f64) -> Result<Vec<f32>> {
    if (input_rate - output_rate).abs() < 1.0 {
        return Ok(samples);
    }

    let params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };

    let mut resampler = SincFixedIn::<f32>::new(
        output_rate / input_rate,
        2.0,
        params,
        samples.len(),
        1, // モノラル
    )?;

    let input_channels = vec![samples];
    let output_channels = resampler.process(&input_channels, None)?;

    Ok(output_channels[0].clone())
}
