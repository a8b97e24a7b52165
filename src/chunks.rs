use anyhow::Result;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// 正規化済みWAVを固定フレーム数ずつ読み出す遅延イテレータ。
/// 前方一方向・単一パスで、最初の空読みで終端する。
pub struct AudioChunks {
    reader: hound::WavReader<BufReader<File>>,
    chunk_frames: usize,
}

impl AudioChunks {
    pub fn open<P: AsRef<Path>>(path: P, chunk_frames: usize) -> Result<Self> {
        let reader = hound::WavReader::open(path.as_ref()).map_err(|e| {
            anyhow::anyhow!(
                "正規化済み音声ファイルを開けません: {} - {}",
                path.as_ref().display(),
                e
            )
        })?;

        let spec = reader.spec();
        if spec.bits_per_sample != 16 || spec.sample_format != hound::SampleFormat::Int {
            return Err(anyhow::anyhow!(
                "16-bit PCM以外のフォーマットです: {}bit",
                spec.bits_per_sample
            ));
        }

        Ok(Self {
            reader,
            chunk_frames,
        })
    }

    /// ファイル全体のフレーム数
    pub fn total_frames(&self) -> u32 {
        self.reader.duration()
    }
}

impl Iterator for AudioChunks {
    type Item = Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        // モノラル16-bitなので1フレーム = 2バイト
        let mut chunk = Vec::with_capacity(self.chunk_frames * 2);

        for sample in self.reader.samples::<i16>().take(self.chunk_frames) {
            match sample {
                Ok(value) => chunk.extend_from_slice(&value.to_le_bytes()),
                Err(e) => return Some(Err(anyhow::anyhow!("フレーム読み込みエラー: {}", e))),
            }
        }

        if chunk.is_empty() {
            None
        } else {
            Some(Ok(chunk))
        }
    }
}
