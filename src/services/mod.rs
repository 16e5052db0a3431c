pub mod annotation_projector;
pub mod diagnostic_parser;
pub mod submission_service;

pub use diagnostic_parser::DiagnosticParser;
pub use submission_service::SubmissionService;
