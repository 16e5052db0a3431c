pub mod diagnostic;
pub mod language;
pub mod loaders;
pub mod problem;
pub mod response;
pub mod result;
pub mod submission;

pub use diagnostic::{Annotation, Diagnostic, Marker, Severity};
pub use language::Language;
pub use loaders::{load_problem_run, load_source};
pub use problem::ProblemRun;
pub use response::ActionResponse;
pub use result::{CaseVerdict, ExecutionResult, JudgeStatus, RawSubmissionResult};
pub use submission::{SourceSubmission, SubmissionToken, TestCase};
