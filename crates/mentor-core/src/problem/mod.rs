//! Coding problem domain module.
//!
//! - `model`: `CodingProblem`, `Difficulty`, usage tracking
//! - `catalog`: the built-in seed catalog
//! - `request`: typed payloads and the `ProblemOp` protocol

mod catalog;
mod model;
mod request;

pub use catalog::seed_catalog;
pub use model::{CodingProblem, Difficulty, ProblemExample, ProblemUsage};
pub use request::{
    FilterProblemsRequest, ProblemList, ProblemOp, ProblemSuggestions, ProvideProblemRequest,
    RequestProblemRequest, SuggestProblemsRequest,
};
