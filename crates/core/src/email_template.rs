//! Placeholder rendering for the RSVP notification and confirmation emails.
//!
//! Subjects and bodies come from the template's `email` config section and
//! may reference `{firstName}`, `{lastName}`, `{email}`, `{attendance}`,
//! `{guestCount}`, `{guestNames}`, `{message}` and `{siteName}`.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde_json::Value;

use crate::rsvp::{Attendance, RsvpSubmission};

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([a-zA-Z][a-zA-Z0-9]*)\}").expect("valid regex"));

/// Replace `{name}` placeholders using `lookup`. Unknown placeholders are left as-is.
pub fn render<F>(template: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    PLACEHOLDER_RE
        .replace_all(template, |caps: &Captures<'_>| {
            lookup(&caps[1]).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// A rendered email ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEmail {
    pub to: Vec<String>,
    pub subject: String,
    pub body: String,
}

/// The two emails triggered by a successful RSVP.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsvpEmails {
    /// To the owner and any configured recipients. `None` if nobody is configured.
    pub notification: Option<RenderedEmail>,
    /// To the guest.
    pub confirmation: RenderedEmail,
}

fn attendance_label(attendance: Attendance) -> &'static str {
    match attendance {
        Attendance::Attending => "attending",
        Attendance::NotAttending => "not attending",
    }
}

fn email_setting<'a>(config: &'a Value, key: &str, fallback: &'a str) -> &'a str {
    config
        .get("email")
        .and_then(|e| e.get(key))
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(fallback)
}

/// Build the notification and confirmation emails for a submission.
///
/// `config` is the fully merged template config; `owner_email` is the
/// template owner's address, if any.
pub fn rsvp_emails(
    config: &Value,
    site_name: &str,
    owner_email: Option<&str>,
    rsvp: &RsvpSubmission,
) -> RsvpEmails {
    let lookup = |name: &str| -> Option<String> {
        let value = match name {
            "firstName" => rsvp.first_name.clone(),
            "lastName" => rsvp.last_name.clone(),
            "email" => rsvp.email.clone(),
            "attendance" => attendance_label(rsvp.attendance).to_string(),
            "guestCount" => rsvp.guest_count.clone(),
            "guestNames" => rsvp.guest_names.clone().unwrap_or_default(),
            "message" => rsvp.message.clone().unwrap_or_default(),
            "siteName" => site_name.to_string(),
            _ => return None,
        };
        Some(value)
    };

    let mut recipients: Vec<String> = owner_email
        .into_iter()
        .map(str::to_string)
        .chain(
            config
                .get("email")
                .and_then(|e| e.get("recipients"))
                .and_then(Value::as_array)
                .into_iter()
                .flatten()
                .filter_map(Value::as_str)
                .map(str::to_string),
        )
        .map(|r| r.trim().to_lowercase())
        .filter(|r| !r.is_empty())
        .collect();
    recipients.sort();
    recipients.dedup();

    let notification = (!recipients.is_empty()).then(|| RenderedEmail {
        to: recipients,
        subject: render(
            email_setting(config, "notificationSubject", "New RSVP from {firstName} {lastName}"),
            &lookup,
        ),
        body: render(
            email_setting(
                config,
                "notificationBody",
                "{firstName} {lastName} ({email}) responded: {attendance}. Guests: {guestCount}.",
            ),
            &lookup,
        ),
    });

    let confirmation = RenderedEmail {
        to: vec![rsvp.email.clone()],
        subject: render(
            email_setting(config, "confirmationSubject", "Thank you for your RSVP"),
            &lookup,
        ),
        body: render(
            email_setting(
                config,
                "confirmationBody",
                "Dear {firstName},\n\nWe received your response ({attendance}).",
            ),
            &lookup,
        ),
    };

    RsvpEmails {
        notification,
        confirmation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn submission() -> RsvpSubmission {
        RsvpSubmission {
            first_name: "Ann".into(),
            last_name: "Lee".into(),
            email: "ann@example.com".into(),
            guest_count: "2".into(),
            guest_names: Some("Bo".into()),
            attendance: Attendance::Attending,
            message: None,
        }
    }

    #[test]
    fn render_replaces_known_and_keeps_unknown() {
        let out = render("Hi {name}, {unknown}!", |k| (k == "name").then(|| "Ann".to_string()));
        assert_eq!(out, "Hi Ann, {unknown}!");
    }

    #[test]
    fn builds_both_emails_from_config() {
        let config = json!({
            "email": {
                "recipients": ["Couple@Example.com", "owner@example.com", ""],
                "notificationSubject": "RSVP: {firstName} ({attendance})",
                "confirmationBody": "Thanks {firstName}, see you at {siteName}"
            }
        });
        let emails = rsvp_emails(&config, "Ann & Lee", Some("owner@example.com"), &submission());

        let notification = emails.notification.unwrap();
        assert_eq!(notification.to, vec!["couple@example.com", "owner@example.com"]);
        assert_eq!(notification.subject, "RSVP: Ann (attending)");
        assert_eq!(emails.confirmation.to, vec!["ann@example.com"]);
        assert_eq!(emails.confirmation.body, "Thanks Ann, see you at Ann & Lee");
        assert_eq!(emails.confirmation.subject, "Thank you for your RSVP");
    }

    #[test]
    fn no_recipients_means_no_notification() {
        let emails = rsvp_emails(&json!({}), "Site", None, &submission());
        assert!(emails.notification.is_none());
    }
}
