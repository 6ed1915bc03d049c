//! Submission intake: validation, identity-keyed reconciliation, best-effort
//! operator notification, and CSV export.

pub mod domain;
pub mod export;
pub mod forms;
pub mod notify;
pub mod service;
pub mod store;
pub mod validate;

pub use domain::{
    CaregiverProfile, CaregiverRecord, ParentProfile, ParentRecord, SubmissionKind,
};
pub use forms::{ApplicationForm, CaregiverForm, ParentForm};
pub use notify::{NotificationSender, Notifier, NotifyError, OperatorMessage, SmtpSender};
pub use service::{IntakeService, SubmissionOutcome};
pub use store::{InterestStore, StoreError, UpsertOutcome};
pub use validate::Validation;
