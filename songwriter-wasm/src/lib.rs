//! WASM bindings for songwriter, powering the interactive web demo.

use wasm_bindgen::prelude::*;

use songwriter::core::rhymes::PronouncingDictionary;
use songwriter::core::songwriter::Songwriter;
use songwriter::schema::scheme::VerseScheme;

// ---------------------------------------------------------------------------
// Embedded demo data, compiled into the WASM binary
// ---------------------------------------------------------------------------
mod data {
    pub const DEMO_CORPUS: &str = include_str!("../../corpus_data/demo_corpus.txt");
    pub const DEMO_DICT: &str = include_str!("../../corpus_data/demo_dict.txt");
}

// ---------------------------------------------------------------------------
// JSON helper types for communication across the WASM boundary
// ---------------------------------------------------------------------------
#[derive(serde::Serialize)]
struct VerseBatch {
    verses: Vec<Vec<String>>,
    failed: usize,
}

/// Rhymed couplets of eight-syllable lines suit the small demo corpus.
fn demo_scheme() -> VerseScheme {
    VerseScheme::from_pattern("AABB", &[("A", 8), ("B", 8)], 1)
}

fn build_writer(corpus: &str, dict: &str, seed: u64) -> Result<Songwriter, JsError> {
    let dict = PronouncingDictionary::parse(dict)
        .map_err(|e| JsError::new(&format!("Dictionary parse error: {e}")))?;
    Songwriter::builder()
        .seed(seed)
        .scheme(demo_scheme())
        .build(corpus, &dict, &dict)
        .map_err(|e| JsError::new(&format!("Songwriter build error: {e}")))
}

// ---------------------------------------------------------------------------
// SongwriterDemo, the main exported struct
// ---------------------------------------------------------------------------
#[wasm_bindgen]
pub struct SongwriterDemo {
    writer: Songwriter,
}

#[wasm_bindgen]
impl SongwriterDemo {
    /// Create a demo instance over the embedded corpus and dictionary.
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u64) -> Result<SongwriterDemo, JsError> {
        SongwriterDemo::from_sources(data::DEMO_CORPUS, data::DEMO_DICT, seed)
    }

    /// Create a demo instance over user-supplied text and dictionary contents.
    pub fn from_sources(corpus: &str, dict: &str, seed: u64) -> Result<SongwriterDemo, JsError> {
        let writer = build_writer(corpus, dict, seed)?;
        Ok(SongwriterDemo { writer })
    }

    /// Write `count` verses. Returns JSON `{ "verses": [[line, ...], ...], "failed": n }`.
    pub fn write_verses(&mut self, count: usize) -> Result<String, JsError> {
        let report = self
            .writer
            .write_verses(count)
            .map_err(|e| JsError::new(&format!("Verse error: {e}")))?;
        let batch = VerseBatch {
            verses: report
                .verses
                .iter()
                .map(|v| v.texts().into_iter().map(str::to_string).collect())
                .collect(),
            failed: report.failures.len(),
        };
        serde_json::to_string(&batch)
            .map_err(|e| JsError::new(&format!("Serialization error: {e}")))
    }

    /// Return the index build statistics as JSON.
    pub fn stats(&self) -> Result<String, JsError> {
        serde_json::to_string(self.writer.stats())
            .map_err(|e| JsError::new(&format!("Serialization error: {e}")))
    }

    /// Restart generation from a new seed. The index is kept.
    pub fn reset(&mut self, seed: u64) {
        self.writer.reseed(seed);
    }
}
