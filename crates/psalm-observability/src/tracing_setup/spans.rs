//! Span definitions per operation: build, retrieval, embedding, reflection.

/// Create an index build span.
#[macro_export]
macro_rules! build_span {
    ($model:expr, $units:expr) => {
        tracing::info_span!("psalm.build", model = %$model, units = $units)
    };
}

/// Create a retrieval span.
#[macro_export]
macro_rules! retrieval_span {
    ($k:expr) => {
        tracing::info_span!("psalm.retrieval", k = $k)
    };
}

/// Create an embedding span.
#[macro_export]
macro_rules! embedding_span {
    ($model:expr, $batch:expr) => {
        tracing::debug_span!("psalm.embedding", model = %$model, batch = $batch)
    };
}

/// Create a reflection span.
#[macro_export]
macro_rules! reflection_span {
    ($unit_id:expr) => {
        tracing::info_span!("psalm.reflection", unit_id = %$unit_id)
    };
}
