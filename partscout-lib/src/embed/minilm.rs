use std::path::PathBuf;
use std::sync::Mutex;

use fastembed::{EmbeddingModel, OutputKey, Pooling, SingleBatchOutput, TextEmbedding, TextInitOptions};
use tracing::{debug, info};

use crate::config::{Config, DEFAULT_MODEL};
use crate::embed::{Embedder, Embedding};
use crate::{Error, Result};

/// Session outputs to read token embeddings from, in order of preference
const OUTPUT_PRECEDENCE: &[OutputKey] = &[
    OutputKey::OnlyOne,
    OutputKey::ByName("last_hidden_state"),
    OutputKey::ByName("sentence_embedding"),
];

/// Multilingual MiniLM embedder.
///
/// Produces raw mean-pooled vectors. fastembed's `embed` would L2-normalize
/// every row, so inference goes through `transform` and pools here instead.
///
/// fastembed needs `&mut self` for inference, so the model sits behind a
/// mutex; that keeps [`Embedder`] methods on `&self` and lets a built
/// retriever be shared between readers.
pub struct MiniLmEmbedder {
    model: Mutex<TextEmbedding>,
    name: String,
    dimension: usize,
}

impl MiniLmEmbedder {
    /// Create the default multilingual embedder.
    ///
    /// Downloads the model on first use (~470MB).
    pub fn new() -> Result<Self> {
        Self::with_options(DEFAULT_MODEL, None)
    }

    /// Create an embedder from the model settings in `config`.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::with_options(&config.model, config.cache_dir.clone())
    }

    /// Create an embedder for a named model, optionally caching model files
    /// under `cache_dir`.
    pub fn with_options(model_name: &str, cache_dir: Option<PathBuf>) -> Result<Self> {
        let (model, dimension) = parse_model_name(model_name)?;

        let mut opts = TextInitOptions::new(model).with_show_download_progress(true);
        if let Some(dir) = cache_dir {
            opts = opts.with_cache_dir(dir);
        }

        info!(model = model_name, "loading embedding model");
        let model = TextEmbedding::try_new(opts).map_err(|e| Error::Embedding(e.to_string()))?;

        Ok(Self {
            model: Mutex::new(model),
            name: model_name.to_string(),
            dimension,
        })
    }
}

impl Embedder for MiniLmEmbedder {
    fn model_name(&self) -> &str {
        &self.name
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn embed(&self, texts: &[&str]) -> Result<Vec<Embedding>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let mut model = self
            .model
            .lock()
            .map_err(|e| Error::Embedding(format!("model lock poisoned: {e}")))?;

        debug!(count = texts.len(), "embedding batch");
        let embeddings = model
            .transform(texts, None)
            .and_then(|output| output.export_with_transformer(mean_pooled))
            .map_err(|e| Error::Embedding(e.to_string()))?;

        if embeddings.len() != texts.len() {
            return Err(Error::Embedding(format!(
                "model returned {} embeddings for {} texts",
                embeddings.len(),
                texts.len()
            )));
        }
        Ok(embeddings)
    }
}

/// Mean-pool each batch over its attention mask, leaving vectors unnormalized.
fn mean_pooled(batches: &[SingleBatchOutput]) -> std::result::Result<Vec<Embedding>, fastembed::Error> {
    let mut embeddings = Vec::new();
    for batch in batches {
        let pooled = batch.select_and_pool_output(&OUTPUT_PRECEDENCE, Some(Pooling::Mean))?;
        embeddings.extend(pooled.rows().into_iter().map(|row| row.to_vec()));
    }
    Ok(embeddings)
}

/// Map a configured model name to the fastembed model and its dimension.
fn parse_model_name(name: &str) -> Result<(EmbeddingModel, usize)> {
    match name.to_lowercase().as_str() {
        "paraphrase-multilingual-minilm-l12-v2" | "paraphrasemlminilml12v2" => {
            Ok((EmbeddingModel::ParaphraseMLMiniLML12V2, 384))
        }
        "paraphrase-multilingual-minilm-l12-v2-q" | "paraphrasemlminilml12v2q" => {
            Ok((EmbeddingModel::ParaphraseMLMiniLML12V2Q, 384))
        }
        _ => Err(Error::InvalidInput(format!(
            "unknown model: {name}. Supported models: {DEFAULT_MODEL} (add -q suffix for quantized)"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_model_name() {
        assert!(matches!(
            parse_model_name("paraphrase-multilingual-MiniLM-L12-v2"),
            Ok((EmbeddingModel::ParaphraseMLMiniLML12V2, 384))
        ));
        assert!(matches!(
            parse_model_name("paraphrase-multilingual-MiniLM-L12-v2-q"),
            Ok((EmbeddingModel::ParaphraseMLMiniLML12V2Q, 384))
        ));
    }

    #[test]
    fn test_parse_unknown_model() {
        assert!(matches!(
            parse_model_name("bge-large-en-v1.5"),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    #[ignore = "requires model download"]
    fn test_embed_is_deterministic() {
        let embedder = MiniLmEmbedder::new().unwrap();
        let a = embedder.embed_one("моторчик омывателя Golf 6").unwrap();
        let b = embedder.embed_one("моторчик омывателя Golf 6").unwrap();

        assert_eq!(a.len(), embedder.dimension());
        for (x, y) in a.iter().zip(&b) {
            assert!((x - y).abs() < 1e-6);
        }
    }

    #[test]
    #[ignore = "requires model download"]
    fn test_embeddings_are_not_normalized() {
        let embedder = MiniLmEmbedder::new().unwrap();
        let embeddings = embedder
            .embed(&["Моторчик омывателя Golf 6", "Слушайте внимательно клиента."])
            .unwrap();

        for embedding in embeddings {
            let norm = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
            assert!((norm - 1.0).abs() > 1e-3, "vector was normalized (norm {norm})");
        }
    }

    #[test]
    #[ignore = "requires model download"]
    fn test_embed_batch_matches_single() {
        let embedder = MiniLmEmbedder::new().unwrap();
        let texts = ["Задний фонарь Passat B7", "Слушайте внимательно клиента."];
        let batch = embedder.embed(&texts).unwrap();

        assert_eq!(batch.len(), 2);
        let single = embedder.embed_one(texts[1]).unwrap();
        for (x, y) in batch[1].iter().zip(&single) {
            assert!((x - y).abs() < 1e-4);
        }
    }
}
