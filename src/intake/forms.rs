//! Wire-level form payloads. The same DTOs deserialize from urlencoded form
//! posts and JSON bodies, so the field helpers accept both representations
//! (checkbox strings vs booleans, single values vs lists, numbers vs strings).

use serde::{Deserialize, Deserializer};

/// Parent interest form (`POST /api/parents`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ParentForm {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub baby_timing: String,
    #[serde(default)]
    pub start_timeframe: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default, deserialize_with = "checkbox")]
    pub updates_opt_in: bool,
    #[serde(default, deserialize_with = "checkbox")]
    pub consent: bool,
    /// Honeypot. Hidden from humans; any value flags the submission as a bot.
    #[serde(default)]
    pub company: Option<String>,
}

/// Basic caregiver form (`POST /api/caregivers`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CaregiverForm {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default, deserialize_with = "string_or_seq")]
    pub certs: Vec<String>,
    #[serde(default, deserialize_with = "number_or_string")]
    pub years_experience: Option<String>,
    #[serde(default)]
    pub availability: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default, deserialize_with = "checkbox")]
    pub updates_opt_in: bool,
    #[serde(default, deserialize_with = "checkbox")]
    pub consent: bool,
    #[serde(default)]
    pub company: Option<String>,
}

/// Extended caregiver application (`POST /api/caregivers/apply`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApplicationForm {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub location: String,
    #[serde(default, deserialize_with = "string_or_seq")]
    pub certs: Vec<String>,
    #[serde(default, deserialize_with = "string_or_seq")]
    pub work_areas: Vec<String>,
    #[serde(default, deserialize_with = "number_or_string")]
    pub years_experience: Option<String>,
    #[serde(default)]
    pub availability: String,
    #[serde(default)]
    pub availability_notes: Option<String>,
    #[serde(default)]
    pub hourly_rate: Option<String>,
    #[serde(default)]
    pub experience_summary: String,
    #[serde(default, deserialize_with = "checkbox")]
    pub updates_opt_in: bool,
    #[serde(default)]
    pub company: Option<String>,
}

impl ParentForm {
    /// Label/value pairs for the operator notification, in form order.
    pub fn notification_fields(&self) -> Vec<(String, String)> {
        vec![
            ("full_name".to_string(), self.full_name.clone()),
            ("email".to_string(), self.email.clone()),
            ("phone".to_string(), self.phone.clone()),
            ("baby_timing".to_string(), self.baby_timing.clone()),
            ("start_timeframe".to_string(), self.start_timeframe.clone()),
            ("notes".to_string(), self.notes.clone().unwrap_or_default()),
            (
                "updates_opt_in".to_string(),
                checkbox_value(self.updates_opt_in),
            ),
            ("consent".to_string(), checkbox_value(self.consent)),
        ]
    }
}

impl CaregiverForm {
    pub fn notification_fields(&self) -> Vec<(String, String)> {
        vec![
            ("full_name".to_string(), self.full_name.clone()),
            ("email".to_string(), self.email.clone()),
            ("phone".to_string(), self.phone.clone()),
            ("certs".to_string(), self.certs.join(", ")),
            (
                "years_experience".to_string(),
                self.years_experience.clone().unwrap_or_default(),
            ),
            ("availability".to_string(), self.availability.clone()),
            ("notes".to_string(), self.notes.clone().unwrap_or_default()),
            (
                "updates_opt_in".to_string(),
                checkbox_value(self.updates_opt_in),
            ),
            ("consent".to_string(), checkbox_value(self.consent)),
        ]
    }
}

impl ApplicationForm {
    pub fn notification_fields(&self) -> Vec<(String, String)> {
        vec![
            ("full_name".to_string(), self.full_name.clone()),
            ("email".to_string(), self.email.clone()),
            ("phone".to_string(), self.phone.clone()),
            ("location".to_string(), self.location.clone()),
            ("certs".to_string(), self.certs.join(", ")),
            ("work_areas".to_string(), self.work_areas.join(", ")),
            (
                "years_experience".to_string(),
                self.years_experience.clone().unwrap_or_default(),
            ),
            ("availability".to_string(), self.availability.clone()),
            (
                "availability_notes".to_string(),
                self.availability_notes.clone().unwrap_or_default(),
            ),
            (
                "hourly_rate".to_string(),
                self.hourly_rate.clone().unwrap_or_default(),
            ),
            (
                "experience_summary".to_string(),
                self.experience_summary.clone(),
            ),
            (
                "updates_opt_in".to_string(),
                checkbox_value(self.updates_opt_in),
            ),
            (
                "form_type".to_string(),
                "Enhanced Nanny Network Application".to_string(),
            ),
        ]
    }
}

fn checkbox_value(flag: bool) -> String {
    if flag {
        "on".to_string()
    } else {
        String::new()
    }
}

/// HTML checkboxes arrive as `"on"`; JSON clients send booleans.
fn checkbox<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Flag(bool),
        Text(String),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Flag(flag)) => flag,
        Some(Raw::Text(text)) => matches!(text.as_str(), "on" | "true" | "1"),
        None => false,
    })
}

/// Multi-select fields arrive as a JSON array or a single joined string.
fn string_or_seq<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::One(value)) if value.is_empty() => Vec::new(),
        Some(Raw::One(value)) => vec![value],
        Some(Raw::Many(values)) => values,
        None => Vec::new(),
    })
}

/// Numeric fields arrive as strings from forms and numbers from JSON; the raw
/// text is kept so the lenient integer parse happens in one place.
fn number_or_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Float(f64),
        Text(String),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Int(value)) => Some(value.to_string()),
        Some(Raw::Float(value)) => Some(value.to_string()),
        Some(Raw::Text(text)) if text.is_empty() => None,
        Some(Raw::Text(text)) => Some(text),
        None => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkbox_accepts_form_and_json_shapes() {
        let form: ParentForm =
            serde_urlencoded::from_str("updates_opt_in=on&consent=on").expect("form parses");
        assert!(form.updates_opt_in);
        assert!(form.consent);

        let json: ParentForm =
            serde_json::from_str(r#"{"updates_opt_in": true, "consent": "on"}"#)
                .expect("json parses");
        assert!(json.updates_opt_in);
        assert!(json.consent);

        let unchecked: ParentForm = serde_json::from_str("{}").expect("empty parses");
        assert!(!unchecked.updates_opt_in);
    }

    #[test]
    fn certs_accept_array_or_single_value() {
        let json: CaregiverForm =
            serde_json::from_str(r#"{"certs": ["CPR", "Newborn Care"]}"#).expect("array parses");
        assert_eq!(json.certs, vec!["CPR", "Newborn Care"]);

        let form: CaregiverForm = serde_urlencoded::from_str("certs=CPR").expect("form parses");
        assert_eq!(form.certs, vec!["CPR"]);
    }

    #[test]
    fn years_experience_keeps_raw_text_from_either_shape() {
        let json: CaregiverForm =
            serde_json::from_str(r#"{"years_experience": 7}"#).expect("number parses");
        assert_eq!(json.years_experience.as_deref(), Some("7"));

        let form: CaregiverForm =
            serde_urlencoded::from_str("years_experience=7").expect("form parses");
        assert_eq!(form.years_experience.as_deref(), Some("7"));
    }

    #[test]
    fn application_fields_carry_the_form_type_tag() {
        let form = ApplicationForm::default();
        let fields = form.notification_fields();
        let (label, value) = fields.last().expect("fields present");
        assert_eq!(label, "form_type");
        assert_eq!(value, "Enhanced Nanny Network Application");
    }
}
