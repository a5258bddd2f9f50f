//! End-to-end retrieval tests with deterministic embedders.

mod common;

use std::sync::Arc;
use std::sync::atomic::Ordering;

use common::{FailingEmbedder, InFlightEmbedder, ShortBatchEmbedder, VocabularyEmbedder};
use docqa_rag::{
    EmbeddingProvider, FlatL2Index, IndexHandle, Passage, RagConfig, RagError, Retriever,
};

const ANIMALS: &str = "Cats chase mice. Grass is green. The sky is blue.";

fn retriever(
    provider: Arc<dyn EmbeddingProvider>,
    chunk_size: usize,
    overlap: usize,
) -> Retriever {
    let config = RagConfig::builder()
        .chunk_size(chunk_size)
        .chunk_overlap(overlap)
        .top_k(3)
        .build()
        .unwrap();
    Retriever::builder().config(config).embedding_provider(provider).build().unwrap()
}

/// **Property 9: End-to-end scenario**
#[tokio::test]
async fn grass_passage_is_retrieved_for_grass_question() {
    let retriever = retriever(Arc::new(VocabularyEmbedder::colors()), 20, 5);
    let handle = retriever.index_document("The sky is blue. Grass is green.").await.unwrap();
    assert_eq!(handle.passages().len(), 2);

    let passages = retriever.query(&handle, "What color is grass?").await.unwrap();
    assert!(passages.len() <= 3);
    assert!(passages.iter().any(|p| p.text.contains("Grass is green")));
    assert!(passages[0].text.contains("Grass is green"));
}

#[tokio::test]
async fn results_are_closest_first_with_distances() {
    let retriever = retriever(Arc::new(VocabularyEmbedder::colors()), 18, 2);
    let handle = retriever.index_document(ANIMALS).await.unwrap();

    let results = retriever.search(&handle, "grass green", 3).await.unwrap();
    let order: Vec<usize> = results.iter().map(|r| r.passage.index).collect();
    assert_eq!(order, [1, 0, 2]);
    let distances: Vec<f32> = results.iter().map(|r| r.distance).collect();
    assert_eq!(distances, [1.0, 5.0, 6.0]);
}

#[tokio::test]
async fn equal_distances_keep_document_order() {
    let retriever = retriever(Arc::new(VocabularyEmbedder::colors()), 18, 2);
    let handle = retriever.index_document(ANIMALS).await.unwrap();

    let passages = retriever.query(&handle, "sky blue").await.unwrap();
    let order: Vec<usize> = passages.iter().map(|p| p.index).collect();
    assert_eq!(order, [2, 0, 1]);
}

#[tokio::test]
async fn top_k_override_limits_results() {
    let retriever = retriever(Arc::new(VocabularyEmbedder::colors()), 18, 2);
    let handle = retriever.index_document(ANIMALS).await.unwrap();

    let one = retriever.query_with_top_k(&handle, "grass green", 1).await.unwrap();
    assert_eq!(one.len(), 1);
    assert_eq!(one[0].index, 1);

    let all = retriever.query_with_top_k(&handle, "grass green", 100).await.unwrap();
    assert_eq!(all.len(), 3);
}

#[tokio::test]
async fn index_is_built_once_and_reused_across_queries() {
    let embedder = Arc::new(VocabularyEmbedder::colors());
    let retriever = retriever(embedder.clone(), 18, 2);
    let handle = retriever.index_document(ANIMALS).await.unwrap();
    assert_eq!(embedder.calls.load(Ordering::SeqCst), 3);

    retriever.query(&handle, "grass").await.unwrap();
    retriever.query(&handle, "sky").await.unwrap();
    assert_eq!(embedder.calls.load(Ordering::SeqCst), 5);
}

#[tokio::test]
async fn empty_document_has_no_passages_to_query() {
    let retriever = retriever(Arc::new(VocabularyEmbedder::colors()), 20, 5);
    let handle = retriever.index_document("").await.unwrap();
    assert!(handle.is_empty());
    assert!(handle.index().is_none());

    let err = retriever.query(&handle, "anything").await.unwrap_err();
    assert!(matches!(err, RagError::NoPassagesAvailable));
}

#[tokio::test]
async fn empty_question_is_invalid_input() {
    let retriever = retriever(Arc::new(VocabularyEmbedder::colors()), 20, 5);
    let handle = retriever.index_document(ANIMALS).await.unwrap();
    let err = retriever.query(&handle, "").await.unwrap_err();
    assert!(matches!(err, RagError::InvalidInput(_)));
}

#[tokio::test]
async fn embedding_failure_aborts_indexing() {
    let retriever = retriever(Arc::new(FailingEmbedder), 20, 5);
    let err = retriever.index_document(ANIMALS).await.unwrap_err();
    assert!(matches!(err, RagError::EmbeddingService { .. }));
}

#[tokio::test]
async fn wrong_vector_count_is_an_embedding_error() {
    let retriever = retriever(Arc::new(ShortBatchEmbedder), 20, 5);
    let err = retriever.index_document(ANIMALS).await.unwrap_err();
    assert!(matches!(err, RagError::EmbeddingService { .. }));
}

#[tokio::test]
async fn indexing_honours_configured_embedding_concurrency() {
    let text = "abcdefghij".repeat(20);
    for concurrency in [1, 3] {
        let embedder = Arc::new(InFlightEmbedder::new());
        let config = RagConfig::builder()
            .chunk_size(10)
            .chunk_overlap(0)
            .embedding_concurrency(concurrency)
            .build()
            .unwrap();
        let retriever = Retriever::builder()
            .config(config)
            .embedding_provider(embedder.clone())
            .build()
            .unwrap();

        let handle = retriever.index_document(&text).await.unwrap();
        assert_eq!(handle.passages().len(), 20);
        assert_eq!(embedder.peak.load(Ordering::SeqCst), concurrency);
    }
}

#[test]
fn handle_rejects_mismatched_passage_count() {
    let index = FlatL2Index::build(vec![vec![1.0, 0.0]]).unwrap();
    let passages = vec![
        Passage { index: 0, start: 0, end: 1, text: "a".to_string() },
        Passage { index: 1, start: 1, end: 2, text: "b".to_string() },
    ];
    let err = IndexHandle::new(index, passages).unwrap_err();
    match err {
        RagError::InvalidInput(message) => {
            assert!(message.contains('1') && message.contains('2'));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn builder_requires_embedding_provider() {
    let err = Retriever::builder().config(RagConfig::default()).build().err().unwrap();
    assert!(matches!(err, RagError::InvalidConfiguration(_)));
}

#[test]
fn builder_rejects_invalid_chunking() {
    let config = RagConfig { chunk_size: 10, chunk_overlap: 10, ..RagConfig::default() };
    let err = Retriever::builder()
        .config(config)
        .embedding_provider(Arc::new(VocabularyEmbedder::colors()))
        .build()
        .err()
        .unwrap();
    assert!(matches!(err, RagError::InvalidConfiguration(_)));
}
