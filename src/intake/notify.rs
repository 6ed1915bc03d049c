//! Best-effort operator notifications. Persistence is the source of truth;
//! everything here runs off the request path and failures never reach the
//! submitter.

use std::sync::Arc;

use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::MailSettings;

use super::domain::SubmissionKind;

const FROM_ADDRESS: &str = "Tahoe Night Nurse <noreply@tahoenightnurse.com>";
const HONEYPOT_FIELD: &str = "company";

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}

/// Rendered notification ready for a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatorMessage {
    pub subject: String,
    pub html_body: String,
}

/// Transport seam so the service can be exercised without a mail server.
pub trait NotificationSender: Send + Sync {
    fn send(&self, message: &OperatorMessage) -> Result<(), NotifyError>;
}

/// Render the submitted fields as a two-column label/value table. The
/// honeypot field is dropped and blank values display as `N/A`.
pub fn compose(kind: SubmissionKind, fields: &[(String, String)]) -> OperatorMessage {
    let subject = kind.notification_subject().to_string();

    let mut html = format!("<h2>{subject}</h2>");
    html.push_str("<table style=\"border-collapse: collapse; width: 100%;\">");
    for (field, value) in fields {
        if field == HONEYPOT_FIELD {
            continue;
        }
        let label = title_case(field);
        let display = if value.is_empty() { "N/A" } else { value.as_str() };
        html.push_str(&format!(
            "<tr>\
             <td style=\"padding: 8px; border: 1px solid #ddd; font-weight: bold;\">{label}:</td>\
             <td style=\"padding: 8px; border: 1px solid #ddd;\">{display}</td>\
             </tr>"
        ));
    }
    html.push_str("</table>");

    OperatorMessage {
        subject,
        html_body: html,
    }
}

fn title_case(field: &str) -> String {
    field
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Dispatches notifications on a detached task. Without a configured sender
/// every dispatch is a logged no-op.
#[derive(Clone)]
pub struct Notifier {
    sender: Option<Arc<dyn NotificationSender>>,
}

impl Notifier {
    pub fn new(sender: Arc<dyn NotificationSender>) -> Self {
        Self {
            sender: Some(sender),
        }
    }

    pub fn disabled() -> Self {
        Self { sender: None }
    }

    /// Fire-and-forget. The returned handle exists so tests can await the
    /// send; the request path drops it.
    pub fn dispatch(
        &self,
        kind: SubmissionKind,
        fields: Vec<(String, String)>,
    ) -> Option<JoinHandle<()>> {
        let Some(sender) = self.sender.clone() else {
            debug!("operator notification skipped - transport not configured");
            return None;
        };

        let message = compose(kind, &fields);
        Some(tokio::task::spawn_blocking(move || {
            match sender.send(&message) {
                Ok(()) => info!(kind = kind.thank_you_type(), "operator notification sent"),
                Err(err) => warn!(%err, "operator notification failed"),
            }
        }))
    }
}

/// SMTP delivery over STARTTLS.
pub struct SmtpSender {
    transport: SmtpTransport,
    from: Mailbox,
    to: Mailbox,
}

impl SmtpSender {
    pub fn from_settings(settings: &MailSettings) -> Result<Self, NotifyError> {
        let transport = SmtpTransport::starttls_relay(&settings.host)
            .map_err(|err| NotifyError::Transport(err.to_string()))?
            .port(settings.port)
            .credentials(Credentials::new(
                settings.username.clone(),
                settings.password.clone(),
            ))
            .build();

        let from: Mailbox = FROM_ADDRESS
            .parse()
            .map_err(|err| NotifyError::Transport(format!("invalid from address: {err}")))?;
        let to: Mailbox = settings
            .operator_email
            .parse()
            .map_err(|err| NotifyError::Transport(format!("invalid operator address: {err}")))?;

        Ok(Self {
            transport,
            from,
            to,
        })
    }
}

impl NotificationSender for SmtpSender {
    fn send(&self, message: &OperatorMessage) -> Result<(), NotifyError> {
        let email = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(message.subject.clone())
            .header(ContentType::TEXT_HTML)
            .body(message.html_body.clone())
            .map_err(|err| NotifyError::Transport(err.to_string()))?;

        self.transport
            .send(&email)
            .map(|_| ())
            .map_err(|err| NotifyError::Transport(err.to_string()))
    }
}
