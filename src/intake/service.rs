use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use super::domain::{
    clamp_note, normalize_email, truncate_chars, CaregiverProfile, CaregiverRecord, ParentProfile,
    ParentRecord, SubmissionKind, APPLICATION_NOTE_MAX, CAREGIVER_NOTE_MAX, PARENT_NOTE_MAX,
};
use super::forms::{ApplicationForm, CaregiverForm, ParentForm};
use super::notify::Notifier;
use super::store::{InterestStore, StoreError};
use super::validate::{validate_application, validate_caregiver, validate_parent};

/// What happened to a submission. Bot submissions are deliberately
/// indistinguishable from accepted ones at the HTTP surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Accepted { duplicate: bool },
    Bot,
    Invalid(BTreeMap<&'static str, String>),
}

/// Orchestrates one submission: validate, normalize, reconcile, then hand the
/// raw fields to the notifier off the request path.
pub struct IntakeService {
    store: Arc<InterestStore>,
    notifier: Notifier,
}

impl IntakeService {
    pub fn new(store: Arc<InterestStore>, notifier: Notifier) -> Self {
        Self { store, notifier }
    }

    pub fn submit_parent(&self, form: ParentForm) -> Result<SubmissionOutcome, StoreError> {
        let validation = validate_parent(&form);
        if validation.bot {
            debug!("honeypot tripped on parent form");
            return Ok(SubmissionOutcome::Bot);
        }
        if !validation.is_clean() {
            return Ok(SubmissionOutcome::Invalid(validation.errors));
        }

        let profile = ParentProfile {
            full_name: form.full_name.trim().to_string(),
            email: normalize_email(&form.email),
            phone: form.phone.trim().to_string(),
            baby_timing: form.baby_timing.trim().to_string(),
            start_timeframe: form.start_timeframe.clone(),
            notes: clamp_note(form.notes.as_deref(), PARENT_NOTE_MAX),
            updates_opt_in: form.updates_opt_in,
        };

        let outcome = self.store.upsert_parent(&profile)?;
        let _ = self
            .notifier
            .dispatch(SubmissionKind::Parent, form.notification_fields());

        Ok(SubmissionOutcome::Accepted {
            duplicate: outcome.duplicate,
        })
    }

    pub fn submit_caregiver(&self, form: CaregiverForm) -> Result<SubmissionOutcome, StoreError> {
        let validation = validate_caregiver(&form);
        if validation.bot {
            debug!("honeypot tripped on caregiver form");
            return Ok(SubmissionOutcome::Bot);
        }
        if !validation.is_clean() {
            return Ok(SubmissionOutcome::Invalid(validation.errors));
        }

        let profile = CaregiverProfile {
            full_name: form.full_name.trim().to_string(),
            email: normalize_email(&form.email),
            phone: form.phone.trim().to_string(),
            certs: join_multi(&form.certs),
            years_experience: parse_years(form.years_experience.as_deref()),
            availability: form.availability.clone(),
            notes: clamp_note(form.notes.as_deref(), CAREGIVER_NOTE_MAX),
            updates_opt_in: form.updates_opt_in,
        };

        let outcome = self.store.upsert_caregiver(&profile)?;
        let _ = self
            .notifier
            .dispatch(SubmissionKind::Caregiver, form.notification_fields());

        Ok(SubmissionOutcome::Accepted {
            duplicate: outcome.duplicate,
        })
    }

    /// Extended application path. The location/work-areas/schedule/rate/
    /// experience answers are composed into a single pipe-delimited note.
    pub fn submit_application(
        &self,
        form: ApplicationForm,
    ) -> Result<SubmissionOutcome, StoreError> {
        let validation = validate_application(&form);
        if validation.bot {
            debug!("honeypot tripped on application form");
            return Ok(SubmissionOutcome::Bot);
        }
        if !validation.is_clean() {
            return Ok(SubmissionOutcome::Invalid(validation.errors));
        }

        let profile = CaregiverProfile {
            full_name: form.full_name.trim().to_string(),
            email: normalize_email(&form.email),
            phone: form.phone.trim().to_string(),
            certs: join_multi(&form.certs),
            years_experience: parse_years(form.years_experience.as_deref()),
            availability: form.availability.clone(),
            notes: composed_note(&form),
            updates_opt_in: form.updates_opt_in,
        };

        let outcome = self.store.upsert_caregiver(&profile)?;
        let _ = self
            .notifier
            .dispatch(SubmissionKind::Nanny, form.notification_fields());

        Ok(SubmissionOutcome::Accepted {
            duplicate: outcome.duplicate,
        })
    }

    pub fn parents(&self) -> Result<Vec<ParentRecord>, StoreError> {
        self.store.parents()
    }

    pub fn caregivers(&self) -> Result<Vec<CaregiverRecord>, StoreError> {
        self.store.caregivers()
    }
}

fn join_multi(values: &[String]) -> Option<String> {
    if values.is_empty() {
        None
    } else {
        Some(values.join(", "))
    }
}

/// Lenient integer parse mirroring the forms' behavior in production: leading
/// digits count, anything else (including zero) falls out as absent.
fn parse_years(raw: Option<&str>) -> Option<i64> {
    let trimmed = raw?.trim();
    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let leading: String = digits.chars().take_while(char::is_ascii_digit).collect();
    let value = leading.parse::<i64>().ok()?;
    let value = if negative { -value } else { value };
    (value != 0).then_some(value)
}

fn composed_note(form: &ApplicationForm) -> Option<String> {
    let work_areas = form.work_areas.join(", ");
    let segments = [
        (!form.location.is_empty()).then(|| format!("Location: {}", form.location)),
        (!work_areas.is_empty()).then(|| format!("Work Areas: {work_areas}")),
        form.availability_notes
            .as_deref()
            .filter(|notes| !notes.is_empty())
            .map(|notes| format!("Schedule: {notes}")),
        form.hourly_rate
            .as_deref()
            .filter(|rate| !rate.is_empty())
            .map(|rate| format!("Rate: {rate}")),
        (!form.experience_summary.is_empty())
            .then(|| format!("Experience: {}", form.experience_summary)),
    ];

    let note = segments
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" | ");
    if note.is_empty() {
        None
    } else {
        Some(truncate_chars(&note, APPLICATION_NOTE_MAX).to_string())
    }
}
