use ndarray::{Array2, Axis};
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use std::path::Path;
use std::sync::Mutex;
use tokenizers::Tokenizer;

use crate::config::EmbedderConfig;
use crate::EmbedderError;

/// Local ONNX encoder: tokenizer + session, shared across requests.
///
/// `Session::run` needs `&mut self`, so concurrent encode calls serialize on
/// the session mutex; everything else is read-only.
pub(crate) struct OnnxEncoder {
    tokenizer: Tokenizer,
    session: Mutex<Session>,
    max_sequence_length: usize,
}

impl OnnxEncoder {
    pub(crate) fn load(cfg: &EmbedderConfig) -> Result<Self, EmbedderError> {
        if !cfg.model_path.exists() {
            return Err(EmbedderError::ModelLoad(format!(
                "model file not found: {}",
                cfg.model_path.display()
            )));
        }
        if !cfg.tokenizer_path.exists() {
            return Err(EmbedderError::ModelLoad(format!(
                "tokenizer file not found: {}",
                cfg.tokenizer_path.display()
            )));
        }

        let tokenizer = load_tokenizer(&cfg.tokenizer_path)?;
        let session = Session::builder()
            .map_err(|e| EmbedderError::ModelLoad(e.to_string()))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| EmbedderError::ModelLoad(e.to_string()))?
            .with_intra_threads(cfg.intra_threads)
            .map_err(|e| EmbedderError::ModelLoad(e.to_string()))?
            .commit_from_file(&cfg.model_path)
            .map_err(|e| {
                EmbedderError::ModelLoad(format!(
                    "failed to load {}: {e}",
                    cfg.model_path.display()
                ))
            })?;

        Ok(Self {
            tokenizer,
            session: Mutex::new(session),
            max_sequence_length: cfg.max_sequence_length,
        })
    }

    /// Encode a batch in a single session run. Output vectors are mean-pooled
    /// over non-padding tokens and NOT normalized; normalization belongs to
    /// the handler layer.
    pub(crate) fn encode_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbedderError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let (encoded, max_len) = encode_documents(&self.tokenizer, texts, self.max_sequence_length)?;
        let (input_ids, attn_mask) = build_padded_arrays(encoded, max_len)?;
        self.run_session(input_ids, attn_mask)
    }

    fn run_session(
        &self,
        input_ids: Array2<i64>,
        attn_mask: Array2<i64>,
    ) -> Result<Vec<Vec<f32>>, EmbedderError> {
        let (batch, seq_len) = input_ids.dim();
        let mask_flat: Vec<i64> = attn_mask.iter().copied().collect();
        let token_type_ids = Array2::<i64>::zeros((batch, seq_len));

        let mut session = self
            .session
            .lock()
            .map_err(|_| EmbedderError::Inference("session lock poisoned".into()))?;

        let outputs = session
            .run(
                ort::inputs![
                    "input_ids" => Value::from_array(input_ids)
                        .map_err(|e| EmbedderError::Inference(e.to_string()))?,
                    "attention_mask" => Value::from_array(attn_mask)
                        .map_err(|e| EmbedderError::Inference(e.to_string()))?,
                    "token_type_ids" => Value::from_array(token_type_ids)
                        .map_err(|e| EmbedderError::Inference(e.to_string()))?,
                ],
            )
            .map_err(|e| EmbedderError::Inference(e.to_string()))?;

        // Token-level output [batch, seq, hidden]; pool by attention-weighted mean.
        let hidden = outputs[0]
            .try_extract_array::<f32>()
            .map_err(|e| EmbedderError::Inference(e.to_string()))?;
        let shape = hidden.shape();
        if shape.len() != 3 || shape[0] != batch {
            return Err(EmbedderError::Inference(format!(
                "unexpected model output shape {shape:?} for batch of {batch}"
            )));
        }

        let hidden_dim = shape[2];
        let mut vectors = Vec::with_capacity(batch);
        for batch_idx in 0..batch {
            let item = hidden.index_axis(Axis(0), batch_idx);
            let item_mask = &mask_flat[batch_idx * seq_len..(batch_idx + 1) * seq_len];

            let mut pooled = vec![0.0f32; hidden_dim];
            let mut mask_sum = 0.0f32;
            for (token_idx, &mask_value) in item_mask.iter().enumerate().take(shape[1]) {
                let weight = mask_value as f32;
                mask_sum += weight;
                for (j, slot) in pooled.iter_mut().enumerate() {
                    *slot += item[[token_idx, j]] * weight;
                }
            }
            let denom = mask_sum.max(1e-9);
            for slot in &mut pooled {
                *slot /= denom;
            }
            vectors.push(pooled);
        }

        Ok(vectors)
    }
}

fn load_tokenizer(path: &Path) -> Result<Tokenizer, EmbedderError> {
    Tokenizer::from_file(path).map_err(|e| EmbedderError::ModelLoad(e.to_string()))
}

struct EncodedDoc {
    ids: Vec<i64>,
    mask: Vec<i64>,
}

fn encode_documents(
    tokenizer: &Tokenizer,
    texts: &[String],
    max_sequence_length: usize,
) -> Result<(Vec<EncodedDoc>, usize), EmbedderError> {
    let mut encoded = Vec::with_capacity(texts.len());
    let mut max_len = 0usize;

    for text in texts {
        let encoding = tokenizer
            .encode(text.as_str(), true)
            .map_err(|e| EmbedderError::Inference(e.to_string()))?;
        let ids: Vec<i64> = encoding.get_ids().iter().map(|&x| x as i64).collect();
        let mask: Vec<i64> = encoding
            .get_attention_mask()
            .iter()
            .map(|&x| x as i64)
            .collect();
        max_len = max_len.max(ids.len());
        encoded.push(EncodedDoc { ids, mask });
    }

    // Truncate rather than chunk: the request cap keeps batches small and the
    // model's own sequence limit is the hard ceiling.
    max_len = max_len.min(max_sequence_length);
    for doc in &mut encoded {
        if doc.ids.len() > max_sequence_length {
            doc.ids.truncate(max_sequence_length);
            doc.mask.truncate(max_sequence_length);
        }
    }

    Ok((encoded, max_len))
}

fn build_padded_arrays(
    encoded: Vec<EncodedDoc>,
    max_len: usize,
) -> Result<(Array2<i64>, Array2<i64>), EmbedderError> {
    let seq_len = max_len.max(1);
    let batch = encoded.len();
    let mut id_storage = Vec::with_capacity(batch * seq_len);
    let mut mask_storage = Vec::with_capacity(batch * seq_len);

    for EncodedDoc { ids, mask } in encoded {
        if ids.len() != mask.len() {
            return Err(EmbedderError::Inference(
                "tokenizer produced mismatched id/mask lengths".into(),
            ));
        }
        let pad = seq_len.saturating_sub(ids.len());
        id_storage.extend(ids);
        mask_storage.extend(mask);
        if pad > 0 {
            id_storage.extend(std::iter::repeat_n(0, pad));
            mask_storage.extend(std::iter::repeat_n(0, pad));
        }
    }

    let input_ids = Array2::from_shape_vec((batch, seq_len), id_storage)
        .map_err(|e| EmbedderError::Inference(e.to_string()))?;
    let attn_mask = Array2::from_shape_vec((batch, seq_len), mask_storage)
        .map_err(|e| EmbedderError::Inference(e.to_string()))?;
    Ok((input_ids, attn_mask))
}
