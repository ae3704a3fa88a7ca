mod embedder;
mod reflection_generator;

pub use embedder::IEmbedder;
pub use reflection_generator::IReflectionGenerator;
