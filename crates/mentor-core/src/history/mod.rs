//! Session history domain module.

mod model;
mod request;

pub use model::{HistoryAnalysis, ProblemAttempt, SessionHistory, Trend};
pub use request::{
    AnalyzeHistoryRequest, FetchHistoryRequest, HistoryOp, HistoryRecords, HistorySaved,
    SaveHistoryRequest, TimeRange,
};
