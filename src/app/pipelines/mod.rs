pub mod evaluation_pipeline;

pub use evaluation_pipeline::EvaluationPipeline;
