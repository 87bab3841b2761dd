//! Text-to-speech for summaries.
//!
//! Uses the Google Translate TTS endpoint, which accepts at most 100
//! characters per request and answers with MP3 audio. Longer text is split
//! on word boundaries and the MP3 segments are concatenated in order;
//! concatenated MP3 frames play back as one stream.

use futures::stream::{self, StreamExt, TryStreamExt};
use reqwest::Client;
use std::error::Error;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tracing::{debug, info, instrument};

const TTS_URL: &str = "https://translate.google.com/translate_tts";

/// Maximum characters the endpoint accepts per request.
pub const MAX_CHUNK_CHARS: usize = 100;

/// Split `text` into chunks of at most `max` characters, breaking between
/// words. A single word longer than `max` is split mid-word.
pub fn chunk_text(text: &str, max: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();

        if word_len > max {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let chars: Vec<char> = word.chars().collect();
            for piece in chars.chunks(max) {
                chunks.push(piece.iter().collect());
            }
            continue;
        }

        let needed = if current.is_empty() { word_len } else { current_len + 1 + word_len };
        if needed > max {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if !current.is_empty() {
            current.push(' ');
            current_len += 1;
        }
        current.push_str(word);
        current_len += word_len;
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

/// Client for the speech endpoint.
#[derive(Debug, Clone)]
pub struct SpeechClient {
    http: Client,
    language: String,
}

impl SpeechClient {
    pub fn new(language: impl Into<String>, timeout: Duration) -> Result<Self, Box<dyn Error>> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            language: language.into(),
        })
    }

    /// Request URL for one chunk.
    fn chunk_url(&self, chunk: &str, idx: usize, total: usize) -> String {
        format!(
            "{}?ie=UTF-8&client=tw-ob&tl={}&q={}&total={}&idx={}&textlen={}",
            TTS_URL,
            urlencoding::encode(&self.language),
            urlencoding::encode(chunk),
            total,
            idx,
            chunk.chars().count()
        )
    }

    /// Synthesize `text` into MP3 bytes.
    #[instrument(level = "info", skip_all, fields(chars = text.chars().count()))]
    pub async fn synthesize(&self, text: &str) -> Result<Vec<u8>, Box<dyn Error>> {
        let chunks = chunk_text(text, MAX_CHUNK_CHARS);
        let total = chunks.len();
        debug!(total, "Synthesizing speech");

        let segments: Vec<Vec<u8>> = stream::iter(chunks.iter().enumerate())
            .then(|(idx, chunk)| {
                let url = self.chunk_url(chunk, idx, total);
                async move {
                    let resp = self.http.get(&url).send().await?.error_for_status()?;
                    Ok::<Vec<u8>, reqwest::Error>(resp.bytes().await?.to_vec())
                }
            })
            .try_collect()
            .await?;

        let audio: Vec<u8> = segments.into_iter().flatten().collect();
        info!(bytes = audio.len(), segments = total, "Synthesized speech");
        Ok(audio)
    }

    /// Synthesize `text` and write the MP3 to `dir/name.mp3`.
    pub async fn speak_to_file(
        &self,
        text: &str,
        dir: &Path,
        name: &str,
    ) -> Result<PathBuf, Box<dyn Error>> {
        let audio = self.synthesize(text).await?;
        fs::create_dir_all(dir).await?;
        let path = dir.join(format!("{}.mp3", name));
        fs::write(&path, audio).await?;
        info!(path = %path.display(), "Wrote spoken summary");
        Ok(path)
    }
}
