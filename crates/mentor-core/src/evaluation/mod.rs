//! Code evaluation domain module.
//!
//! - `model`: the immutable `CodeEvaluation` record and its sub-scores
//! - `request`: typed payloads and the `EvaluationOp` protocol

mod model;
mod request;

pub use model::{
    CodeEvaluation, CodeQualityScores, ComplexityAssessment, EdgeCaseCoverage,
};
pub use request::{
    EvaluateCodeRequest, EvaluationOp, FeedbackResult, ImprovementAction, ImprovementResult,
};
