//! Budget calculation and validation engine
//!
//! Every component here is a pure function of its inputs. Reads come in as
//! slices of models, and the only write path is
//! [`PeriodDraft::commit`](draft::PeriodDraft::commit).

pub mod allocation;
pub mod assignment;
pub mod draft;
pub mod percentage;
pub mod period;
pub mod prefill;
pub mod validation;

pub use allocation::{AllocationEngine, AllocationSummary, PeriodTotals};
pub use assignment::{Assignment, AssignmentResolver};
pub use draft::{AllocationDraft, CreationOutcome, CreationStep, PeriodDraft};
pub use percentage::{BucketReport, BucketTargets, PercentageReconciler, TargetStatus};
pub use period::PeriodValidator;
pub use prefill::PrefillComposer;
pub use validation::ValidationRules;
