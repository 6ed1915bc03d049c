use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;

use super::forms::{ApplicationForm, CaregiverForm, ParentForm};

/// Minimum length for the experience summary on the extended application.
const EXPERIENCE_SUMMARY_MIN: usize = 50;

/// Outcome of running a rule set over a submission. Every violated rule lands
/// in `errors`; the honeypot sets `bot` without adding a field error.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Validation {
    pub errors: BTreeMap<&'static str, String>,
    pub bot: bool,
}

impl Validation {
    fn flag(&mut self, field: &'static str, message: &str) {
        self.errors.insert(field, message.to_string());
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Deliberately permissive: one `@`, no whitespace, a dotted domain. Not full
/// RFC validation.
fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
    })
}

fn looks_like_email(raw: &str) -> bool {
    email_pattern().is_match(raw)
}

fn honeypot_tripped(company: Option<&str>) -> bool {
    company.is_some_and(|value| !value.is_empty())
}

/// Rules for the parent interest form. All rules run; nothing short-circuits.
pub fn validate_parent(form: &ParentForm) -> Validation {
    let mut validation = Validation::default();

    if form.full_name.trim().is_empty() {
        validation.flag(
            "full_name",
            "Please add your name so we can address you properly.",
        );
    }
    if !looks_like_email(&form.email) {
        validation.flag("email", "Please add your email so we can follow up.");
    }
    if form.phone.trim().is_empty() {
        validation.flag("phone", "Please add your phone number.");
    }
    if form.baby_timing.trim().is_empty() {
        validation.flag("baby_timing", "Please tell us your due date or baby's age.");
    }
    if form.start_timeframe.is_empty() {
        validation.flag("start_timeframe", "Please select when you might need care.");
    }
    if !form.consent {
        validation.flag(
            "consent",
            "Please confirm you understand this is an interest list.",
        );
    }

    validation.bot = honeypot_tripped(form.company.as_deref());
    validation
}

/// Rules for the basic caregiver form.
pub fn validate_caregiver(form: &CaregiverForm) -> Validation {
    let mut validation = Validation::default();

    if form.full_name.trim().is_empty() {
        validation.flag("full_name", "Please add your name.");
    }
    if !looks_like_email(&form.email) {
        validation.flag("email", "Please add your email so we can follow up.");
    }
    if form.phone.trim().is_empty() {
        validation.flag("phone", "Please add your phone number.");
    }
    if form.availability.is_empty() {
        validation.flag("availability", "Please select your availability.");
    }
    if !form.consent {
        validation.flag(
            "consent",
            "Please confirm you understand background checks may be required.",
        );
    }

    validation.bot = honeypot_tripped(form.company.as_deref());
    validation
}

/// Rules for the extended caregiver application.
pub fn validate_application(form: &ApplicationForm) -> Validation {
    let mut validation = Validation::default();

    if form.full_name.trim().is_empty() {
        validation.flag("full_name", "Full name is required.");
    }
    if !looks_like_email(&form.email) {
        validation.flag("email", "Valid email is required.");
    }
    if form.phone.trim().is_empty() {
        validation.flag("phone", "Phone number is required.");
    }
    if form.location.trim().is_empty() {
        validation.flag("location", "Location is required.");
    }
    if form
        .years_experience
        .as_deref()
        .map(str::trim)
        .unwrap_or_default()
        .is_empty()
    {
        validation.flag("years_experience", "Years of experience is required.");
    }
    if form.availability.is_empty() {
        validation.flag("availability", "Availability is required.");
    }
    if form.experience_summary.trim().chars().count() < EXPERIENCE_SUMMARY_MIN {
        validation.flag(
            "experience_summary",
            "Experience summary is required (minimum 50 characters).",
        );
    }

    validation.bot = honeypot_tripped(form.company.as_deref());
    validation
}
