//! Candidate selection, validation sequencing and output

pub mod orchestrator;
pub mod output;
pub mod selector;

pub use orchestrator::{PipelineOrchestrator, RunReport, RunSummary, run_pipeline};
pub use selector::{CandidateSelector, SelectionDecision};
