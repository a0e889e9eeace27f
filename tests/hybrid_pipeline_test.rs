use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use rankfuse::error::{RankfuseError, Result};
use rankfuse::fusion::types::{PointId, RankedList, ScoredItem};
use rankfuse::hybrid::encoder::{DenseEncoder, SparseEncoder};
use rankfuse::hybrid::searcher::{HybridSearchConfig, HybridSearcher};
use rankfuse::hybrid::store::{IndexSchema, Point, SearchRequest, VectorData, VectorStore};
use rankfuse::sparse::tensor::{ImportanceTensor, ValidityMask};

const VOCAB: &[&str] = &[
    "[PAD]", "tamagoyaki", "is", "one", "of", "the", "egg", "dishes", "sushi", "a", "japanese",
    "rice", "dish", "ramen", "noodles", "in", "hot", "soup", "omelet", "made", "with", "and",
    "butter",
];

const TEXTS: &[&str] = &[
    "tamagoyaki is one of the egg dishes",
    "sushi is a japanese rice dish",
    "ramen noodles in hot soup",
    "omelet made with egg and butter",
];

/// Hashes tokens into a small bag-of-words embedding.
struct HashingDenseEncoder {
    dimension: usize,
}

#[async_trait]
impl DenseEncoder for HashingDenseEncoder {
    async fn encode(&self, text: &str) -> Result<Vec<f32>> {
        let mut vector = vec![0.0; self.dimension];
        for token in text.split_whitespace() {
            let bucket = token
                .bytes()
                .fold(0usize, |acc, b| acc.wrapping_mul(31).wrapping_add(b as usize));
            vector[bucket % self.dimension] += 1.0;
        }
        Ok(vector)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

/// Emits logit 2.0 for each known token, plus one masked padding row.
struct LookupSparseEncoder;

#[async_trait]
impl SparseEncoder for LookupSparseEncoder {
    async fn encode_logits(&self, text: &str) -> Result<(ImportanceTensor, ValidityMask)> {
        let mut rows = Vec::new();
        for token in text.split_whitespace() {
            let mut row = vec![-1.0; VOCAB.len()];
            if let Some(id) = VOCAB.iter().position(|v| *v == token) {
                row[id] = 2.0;
            }
            rows.push(row);
        }
        rows.push(vec![5.0; VOCAB.len()]);

        let mut mask = vec![1u32; rows.len() - 1];
        mask.push(0);
        Ok((
            ImportanceTensor::from_logit_rows(rows)?,
            ValidityMask::from(mask),
        ))
    }

    fn vocab_size(&self) -> usize {
        VOCAB.len()
    }
}

/// Returns embeddings of the wrong size.
struct BrokenDenseEncoder;

#[async_trait]
impl DenseEncoder for BrokenDenseEncoder {
    async fn encode(&self, _text: &str) -> Result<Vec<f32>> {
        Ok(vec![1.0; 3])
    }

    fn dimension(&self) -> usize {
        4
    }
}

/// Encodes whole batches natively and counts how it was called.
#[derive(Default)]
struct CountingDenseEncoder {
    single_calls: AtomicUsize,
    batch_calls: AtomicUsize,
    drop_last: bool,
}

#[async_trait]
impl DenseEncoder for CountingDenseEncoder {
    async fn encode(&self, text: &str) -> Result<Vec<f32>> {
        self.single_calls.fetch_add(1, Ordering::SeqCst);
        HashingDenseEncoder { dimension: 16 }.encode(text).await
    }

    fn dimension(&self) -> usize {
        16
    }

    async fn encode_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        self.batch_calls.fetch_add(1, Ordering::SeqCst);
        let inner = HashingDenseEncoder { dimension: 16 };
        let mut vectors = Vec::with_capacity(texts.len());
        for text in texts {
            vectors.push(inner.encode(text).await?);
        }
        if self.drop_last {
            vectors.pop();
        }
        Ok(vectors)
    }
}

/// Reports a vocabulary one larger than the tensors it emits.
struct MisreportedSparseEncoder;

#[async_trait]
impl SparseEncoder for MisreportedSparseEncoder {
    async fn encode_logits(&self, text: &str) -> Result<(ImportanceTensor, ValidityMask)> {
        LookupSparseEncoder.encode_logits(text).await
    }

    fn vocab_size(&self) -> usize {
        VOCAB.len() + 1
    }
}

/// Brute-force in-memory store: cosine for dense spaces, dot product for sparse.
#[derive(Default)]
struct MemoryStore {
    collections: Mutex<HashMap<String, (IndexSchema, Vec<Point>)>>,
}

fn cosine(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

#[async_trait]
impl VectorStore for MemoryStore {
    async fn create_index(&self, collection: &str, schema: &IndexSchema) -> Result<()> {
        let mut collections = self.collections.lock().unwrap();
        if collections.contains_key(collection) {
            return Err(RankfuseError::store(format!("{collection} already exists")));
        }
        collections.insert(collection.to_string(), (schema.clone(), Vec::new()));
        Ok(())
    }

    async fn upsert(&self, collection: &str, points: Vec<Point>) -> Result<()> {
        let mut collections = self.collections.lock().unwrap();
        let (_, stored) = collections
            .get_mut(collection)
            .ok_or_else(|| RankfuseError::store(format!("{collection} not found")))?;
        for point in points {
            stored.retain(|p| p.id != point.id);
            stored.push(point);
        }
        Ok(())
    }

    async fn search(
        &self,
        collection: &str,
        requests: &[SearchRequest],
    ) -> Result<Vec<RankedList>> {
        let collections = self.collections.lock().unwrap();
        let (schema, points) = collections
            .get(collection)
            .ok_or_else(|| RankfuseError::store(format!("{collection} not found")))?;

        let mut lists = Vec::with_capacity(requests.len());
        for request in requests {
            let mut hits: Vec<ScoredItem> = points
                .iter()
                .filter_map(|point| {
                    let stored = point.vectors.get(&request.name)?;
                    match (&request.vector, stored) {
                        (VectorData::Dense(q), VectorData::Dense(v))
                            if schema.dense.contains_key(&request.name) =>
                        {
                            Some(ScoredItem::new(point.id.clone(), cosine(q, v)))
                        }
                        (VectorData::Sparse(q), VectorData::Sparse(v))
                            if schema.sparse.contains(&request.name) =>
                        {
                            let score = q.dot(v);
                            (score > 0.0).then(|| ScoredItem::new(point.id.clone(), score))
                        }
                        _ => None,
                    }
                })
                .collect();
            hits.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.id.cmp(&b.id)));
            hits.truncate(request.limit);
            lists.push(RankedList::new(hits));
        }
        Ok(lists)
    }

    async fn delete_index(&self, collection: &str) -> Result<()> {
        self.collections
            .lock()
            .unwrap()
            .remove(collection)
            .map(|_| ())
            .ok_or_else(|| RankfuseError::store(format!("{collection} not found")))
    }
}

fn searcher(store: Arc<MemoryStore>) -> HybridSearcher {
    HybridSearcher::new(
        Arc::new(HashingDenseEncoder { dimension: 16 }),
        Arc::new(LookupSparseEncoder),
        store,
        HybridSearchConfig::default(),
    )
    .unwrap()
}

#[tokio::test]
async fn test_index_search_delete() {
    let store = Arc::new(MemoryStore::default());
    let searcher = searcher(Arc::clone(&store));

    searcher.create_index("sample").await.unwrap();
    let inserted = searcher.index_texts("sample", TEXTS).await.unwrap();
    assert_eq!(inserted, TEXTS.len());

    let results = searcher.search("sample", TEXTS[0], 10).await.unwrap();

    assert_eq!(results.dense.len(), TEXTS.len());
    assert_eq!(results.dense.items()[0].id, PointId::Num(0));
    assert_eq!(results.sparse.items()[0].id, PointId::Num(0));

    // The sushi text shares "is" and the omelet text shares "egg" with the
    // query; ramen shares nothing. Equal sparse scores come back by id.
    assert_eq!(results.sparse.len(), 3);
    assert_eq!(results.sparse.items()[1].id, PointId::Num(1));
    assert_eq!(results.sparse.items()[2].id, PointId::Num(3));

    let top = &results.fused[0];
    assert_eq!(top.id, PointId::Num(0));
    assert_eq!(top.ranks, vec![Some(0), Some(0)]);
    assert_eq!(top.fusion_score, 2.0 / 61.0);
    assert_eq!(results.fused.len(), TEXTS.len());

    searcher.delete_index("sample").await.unwrap();
    let err = searcher.search("sample", TEXTS[0], 10).await.unwrap_err();
    assert!(matches!(err, RankfuseError::Store(_)));
}

#[tokio::test]
async fn test_top_n_limits_every_list() {
    let store = Arc::new(MemoryStore::default());
    let searcher = searcher(store);
    searcher.create_index("sample").await.unwrap();
    searcher.index_texts("sample", TEXTS).await.unwrap();

    let results = searcher.search("sample", "egg", 2).await.unwrap();
    assert!(results.dense.len() <= 2);
    assert!(results.sparse.len() <= 2);
    assert!(results.fused.len() <= 2);
}

#[tokio::test]
async fn test_sparse_vectors_ignore_padding() {
    let searcher = searcher(Arc::new(MemoryStore::default()));

    let vector = searcher.sparse_vector("sushi is a japanese rice dish").await.unwrap();
    assert_eq!(vector.len(), 6);
    assert!(vector.get(0).is_none());

    let unknown = searcher.sparse_vector("zzz qqq").await.unwrap();
    assert!(unknown.is_empty());
}

#[tokio::test]
async fn test_stored_points_carry_both_vectors() {
    let store = Arc::new(MemoryStore::default());
    let searcher = searcher(Arc::clone(&store));
    searcher.create_index("sample").await.unwrap();
    searcher.index_texts("sample", &TEXTS[..2]).await.unwrap();

    let collections = store.collections.lock().unwrap();
    let (schema, points) = &collections["sample"];
    assert_eq!(schema.dense["dense"].size, 16);
    assert!(schema.sparse.contains("sparse"));
    assert_eq!(points.len(), 2);
    for point in points {
        assert!(matches!(point.vectors["dense"], VectorData::Dense(ref v) if v.len() == 16));
        assert!(matches!(point.vectors["sparse"], VectorData::Sparse(ref v) if !v.is_empty()));
    }
}

#[tokio::test]
async fn test_dense_dimension_mismatch() {
    let searcher = HybridSearcher::new(
        Arc::new(BrokenDenseEncoder),
        Arc::new(LookupSparseEncoder),
        Arc::new(MemoryStore::default()),
        HybridSearchConfig::default(),
    )
    .unwrap();
    searcher.create_index("sample").await.unwrap();

    let err = searcher.index_texts("sample", TEXTS).await.unwrap_err();
    assert!(matches!(err, RankfuseError::Encoder(_)));
}

#[tokio::test]
async fn test_empty_corpus() {
    let store = Arc::new(MemoryStore::default());
    let searcher = searcher(store);
    searcher.create_index("empty").await.unwrap();
    assert_eq!(searcher.index_texts("empty", &[]).await.unwrap(), 0);

    let results = searcher.search("empty", "egg", 10).await.unwrap();
    assert!(results.dense.is_empty());
    assert!(results.sparse.is_empty());
    assert!(results.fused.is_empty());
}

#[tokio::test]
async fn test_index_texts_encodes_dense_vectors_in_one_batch() {
    let encoder = Arc::new(CountingDenseEncoder::default());
    let searcher = HybridSearcher::new(
        Arc::clone(&encoder) as Arc<dyn DenseEncoder>,
        Arc::new(LookupSparseEncoder),
        Arc::new(MemoryStore::default()),
        HybridSearchConfig::default(),
    )
    .unwrap();
    searcher.create_index("sample").await.unwrap();

    assert_eq!(searcher.index_texts("sample", TEXTS).await.unwrap(), TEXTS.len());
    assert_eq!(encoder.batch_calls.load(Ordering::SeqCst), 1);
    assert_eq!(encoder.single_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_short_dense_batch_is_rejected() {
    let store = Arc::new(MemoryStore::default());
    let searcher = HybridSearcher::new(
        Arc::new(CountingDenseEncoder {
            drop_last: true,
            ..Default::default()
        }),
        Arc::new(LookupSparseEncoder),
        Arc::clone(&store) as Arc<dyn VectorStore>,
        HybridSearchConfig::default(),
    )
    .unwrap();
    searcher.create_index("sample").await.unwrap();

    let err = searcher.index_texts("sample", TEXTS).await.unwrap_err();
    assert!(matches!(err, RankfuseError::Encoder(_)));
    assert!(store.collections.lock().unwrap()["sample"].1.is_empty());
}

#[tokio::test]
async fn test_sparse_vocab_size_mismatch() {
    let searcher = HybridSearcher::new(
        Arc::new(HashingDenseEncoder { dimension: 16 }),
        Arc::new(MisreportedSparseEncoder),
        Arc::new(MemoryStore::default()),
        HybridSearchConfig::default(),
    )
    .unwrap();

    let err = searcher.sparse_vector("sushi is a japanese rice dish").await.unwrap_err();
    assert!(matches!(err, RankfuseError::InputShapeMismatch(_)));

    searcher.create_index("sample").await.unwrap();
    let err = searcher.index_texts("sample", TEXTS).await.unwrap_err();
    assert!(matches!(err, RankfuseError::InputShapeMismatch(_)));
}
