//! Local sentence embeddings via Candle
//!
//! Query text has to be embedded with the same model the collection was
//! built with. The default is all-MiniLM-L6-v2 (384 dimensions).

use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config};
use hf_hub::{api::sync::Api, Repo, RepoType};
use std::sync::Arc;
use tokenizers::Tokenizer;
use tracing::info;

use crate::errors::{ReportError, Result};

/// Text to vector conversion
pub trait Embedder: Send + Sync {
    /// Embed a batch of texts
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>>;

    /// Vector dimension produced by this embedder
    fn dimension(&self) -> usize;

    /// Embed a single text
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_batch(&[text])?
            .pop()
            .ok_or_else(|| ReportError::EmbeddingError("Empty embedding batch".to_string()))
    }
}

/// BERT sentence-transformer embedding engine
pub struct EmbeddingEngine {
    model: Arc<BertModel>,
    tokenizer: Arc<Tokenizer>,
    device: Device,
    dimension: usize,
}

impl EmbeddingEngine {
    /// Load `model_id` from the HuggingFace Hub (downloaded on first use)
    pub fn new(model_id: &str) -> Result<Self> {
        let device = Device::Cpu;
        info!(model = model_id, "Loading embedding model");

        let api = Api::new().map_err(embedding_err)?;
        let repo = api.repo(Repo::new(model_id.to_string(), RepoType::Model));

        let config_path = repo.get("config.json").map_err(embedding_err)?;
        let tokenizer_path = repo.get("tokenizer.json").map_err(embedding_err)?;
        let weights_path = repo.get("model.safetensors").map_err(embedding_err)?;

        let config_contents = std::fs::read_to_string(config_path)?;
        let config: Config = serde_json::from_str(&config_contents)?;
        let raw_config: serde_json::Value = serde_json::from_str(&config_contents)?;
        let dimension = raw_config["hidden_size"]
            .as_u64()
            .ok_or_else(|| embedding_err("Model config lacks hidden_size"))?
            as usize;

        let tokenizer = Tokenizer::from_file(tokenizer_path).map_err(embedding_err)?;

        // SAFETY: the safetensors file is not modified while mapped
        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, &device)
                .map_err(embedding_err)?
        };

        let model = BertModel::load(vb, &config).map_err(embedding_err)?;

        Ok(Self {
            model: Arc::new(model),
            tokenizer: Arc::new(tokenizer),
            device,
            dimension,
        })
    }

    fn forward(&self, texts: &[&str]) -> candle_core::Result<Vec<Vec<f32>>> {
        let encodings = self
            .tokenizer
            .encode_batch(texts.to_vec(), true)
            .map_err(candle_core::Error::msg)?;

        let max_len = encodings.iter().map(|e| e.get_ids().len()).max().unwrap_or(0);
        let batch_size = texts.len();

        let mut flat_ids = vec![0u32; batch_size * max_len];
        let mut flat_mask = vec![0u32; batch_size * max_len];

        for (i, encoding) in encodings.iter().enumerate() {
            let ids = encoding.get_ids();
            let mask = encoding.get_attention_mask();
            let row = i * max_len;
            flat_ids[row..row + ids.len()].copy_from_slice(ids);
            flat_mask[row..row + mask.len()].copy_from_slice(mask);
        }

        let token_ids = Tensor::from_vec(flat_ids, (batch_size, max_len), &self.device)?;
        let attention_mask = Tensor::from_vec(flat_mask, (batch_size, max_len), &self.device)?;
        let token_type_ids = token_ids.zeros_like()?;

        let hidden = self
            .model
            .forward(&token_ids, &token_type_ids, Some(&attention_mask))?;

        let pooled = Self::mean_pool(&hidden, &attention_mask)?;
        let normalized = pooled.broadcast_div(&pooled.sqr()?.sum_keepdim(1)?.sqrt()?)?;

        normalized.to_vec2::<f32>()
    }

    /// Mean pooling with attention mask
    fn mean_pool(embeddings: &Tensor, attention_mask: &Tensor) -> candle_core::Result<Tensor> {
        let mask_expanded = attention_mask
            .unsqueeze(2)?
            .expand(embeddings.shape())?
            .to_dtype(embeddings.dtype())?;

        let sum_embeddings = (embeddings * &mask_expanded)?.sum(1)?;
        let sum_mask = mask_expanded.sum(1)?.clamp(1e-9, f64::MAX)?;

        sum_embeddings.broadcast_div(&sum_mask)
    }
}

impl Embedder for EmbeddingEngine {
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        self.forward(texts).map_err(embedding_err)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

fn embedding_err(err: impl std::fmt::Display) -> ReportError {
    ReportError::EmbeddingError(err.to_string())
}
