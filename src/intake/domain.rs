use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Hard cap applied to the free-text note on the parent interest form.
pub const PARENT_NOTE_MAX: usize = 280;
/// Hard cap applied to the note on the basic caregiver form.
pub const CAREGIVER_NOTE_MAX: usize = 280;
/// Hard cap applied to the composed note built by the extended application form.
pub const APPLICATION_NOTE_MAX: usize = 500;

/// Which form produced a submission. Drives the thank-you redirect target and
/// the operator notification subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmissionKind {
    Parent,
    Caregiver,
    Nanny,
}

impl SubmissionKind {
    pub const fn thank_you_type(self) -> &'static str {
        match self {
            SubmissionKind::Parent => "parent",
            SubmissionKind::Caregiver => "caregiver",
            SubmissionKind::Nanny => "nanny",
        }
    }

    pub const fn notification_subject(self) -> &'static str {
        match self {
            SubmissionKind::Parent => "New Parent Interest - Tahoe Night Nurse",
            SubmissionKind::Caregiver | SubmissionKind::Nanny => {
                "New Caregiver Application - Tahoe Night Nurse"
            }
        }
    }
}

/// Validated, normalized parent submission ready for reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentProfile {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub baby_timing: String,
    pub start_timeframe: String,
    pub notes: Option<String>,
    pub updates_opt_in: bool,
}

/// Stored parent record, one per normalized email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentRecord {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub baby_timing: String,
    pub start_timeframe: String,
    pub notes: Option<String>,
    pub updates_opt_in: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated, normalized caregiver submission ready for reconciliation. Both
/// the basic form and the extended application reduce to this shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaregiverProfile {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub certs: Option<String>,
    pub years_experience: Option<i64>,
    pub availability: String,
    pub notes: Option<String>,
    pub updates_opt_in: bool,
}

/// Stored caregiver record, one per normalized email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaregiverRecord {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub certs: Option<String>,
    pub years_experience: Option<i64>,
    pub availability: String,
    pub notes: Option<String>,
    pub updates_opt_in: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Canonical storage rendering of a timestamp: RFC 3339 with microseconds in
/// UTC. Lexicographic order matches chronological order in this form.
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// The reconciliation key: trimmed, lowercased email address.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Truncate to at most `max` characters, respecting char boundaries.
pub fn truncate_chars(raw: &str, max: usize) -> &str {
    match raw.char_indices().nth(max) {
        Some((index, _)) => &raw[..index],
        None => raw,
    }
}

/// Trim a free-text note, cap it, and collapse blanks to absent.
pub fn clamp_note(raw: Option<&str>, max: usize) -> Option<String> {
    let trimmed = raw.map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        return None;
    }
    Some(truncate_chars(trimmed, max).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_normalization_lowercases_and_trims() {
        assert_eq!(normalize_email(" Jane@Example.COM "), "jane@example.com");
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let note = "déjà vu".repeat(60);
        let capped = truncate_chars(&note, 280);
        assert_eq!(capped.chars().count(), 280);
    }

    #[test]
    fn clamp_note_drops_blank_input() {
        assert_eq!(clamp_note(Some("   "), PARENT_NOTE_MAX), None);
        assert_eq!(clamp_note(None, PARENT_NOTE_MAX), None);
        assert_eq!(
            clamp_note(Some("  hello  "), PARENT_NOTE_MAX),
            Some("hello".to_string())
        );
    }

    #[test]
    fn nanny_submissions_share_the_caregiver_subject() {
        assert_eq!(
            SubmissionKind::Nanny.notification_subject(),
            SubmissionKind::Caregiver.notification_subject()
        );
        assert_eq!(SubmissionKind::Nanny.thank_you_type(), "nanny");
    }
}
