pub mod branch;
pub mod error;
pub mod issue;
pub mod outcome;
pub mod patch;

pub use error::AgentError;
pub use issue::IssueRef;
pub use outcome::{Step, StepOutcome, TestOutcome, TestReport};
pub use patch::GeneratedPatch;
