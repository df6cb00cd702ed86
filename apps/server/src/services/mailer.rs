//! # Notification Mailer
//!
//! Sends the customer notification email when a booking is submitted.
//!
//! ## Delivery Semantics
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  Booking Notification Delivery                          │
//! │                                                                         │
//! │  submit booking (send_email = true)                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  collect contact emails for the customer                               │
//! │       │                                                                 │
//! │       ├── zero recipients → skip with a warning                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  render subject/body (tera), send via SMTP per recipient               │
//! │       │                                                                 │
//! │       └── send failure → warn, submission still succeeds               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A failed or skipped email never fails the booking submission.

use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tera::Tera;
use tracing::{debug, info, warn};

use booking_core::{Booking, BookingItem};

use crate::config::ServerConfig;

/// Built-in template used when no template directory is configured and the
/// booking names no template of its own.
const DEFAULT_TEMPLATE: &str = "booking_notification.html";

const DEFAULT_TEMPLATE_BODY: &str = r#"<p>Dear {{ booking.customer_name | default(value=booking.customer) }},</p>
<p>Your booking has been confirmed for
{{ booking.start_date }} to {{ booking.end_date }}.</p>
<table>
  <tr><th>Item</th><th>Qty</th><th>Rate</th><th>Amount</th></tr>
  {% for item in items %}
  <tr>
    <td>{{ item.item_name }}</td>
    <td>{{ item.qty }}</td>
    <td>{{ item.rate }}</td>
    <td>{{ item.amount }}</td>
  </tr>
  {% endfor %}
</table>
<p>Total: {{ booking.total }}</p>
"#;

/// Suffix convention: a template named `<body>.subject` holds the subject
/// line rendered alongside the `<body>` template.
const SUBJECT_SUFFIX: &str = ".subject";

const DEFAULT_SUBJECT_TEMPLATE: &str = "booking_notification.html.subject";
const DEFAULT_SUBJECT: &str = "Booking confirmation for {{ booking.customer_name | default(value=booking.customer) }}";

/// Customer notification mailer.
///
/// Holds the SMTP transport (absent when email is unconfigured) and the
/// tera template set used to render subject and body.
pub struct Mailer {
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
    templates: Tera,
    from: String,
}

impl Mailer {
    /// Builds a mailer from server configuration.
    ///
    /// With no SMTP host configured the mailer is disabled: notifications
    /// log a warning and are dropped.
    pub fn new(config: &ServerConfig) -> anyhow::Result<Self> {
        let mut templates = match &config.template_dir {
            Some(dir) => {
                let pattern = format!("{dir}/**/*.{{html,subject}}");
                let tera = Tera::new(&pattern)?;
                debug!(template_dir = %dir, "Email templates loaded");
                tera
            }
            None => Tera::default(),
        };

        if !templates
            .get_template_names()
            .any(|name| name == DEFAULT_TEMPLATE)
        {
            templates.add_raw_template(DEFAULT_TEMPLATE, DEFAULT_TEMPLATE_BODY)?;
        }
        if !templates
            .get_template_names()
            .any(|name| name == DEFAULT_SUBJECT_TEMPLATE)
        {
            templates.add_raw_template(DEFAULT_SUBJECT_TEMPLATE, DEFAULT_SUBJECT)?;
        }

        let transport = if config.email_enabled() {
            let mut builder = if config.smtp_tls {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            } else {
                AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.smtp_host)
            }
            .port(config.smtp_port);

            if let (Some(user), Some(pass)) = (&config.smtp_username, &config.smtp_password) {
                builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
            }

            info!(host = %config.smtp_host, port = config.smtp_port, "SMTP transport configured");
            Some(builder.build())
        } else {
            info!("SMTP not configured, notification emails disabled");
            None
        };

        Ok(Mailer {
            transport,
            templates,
            from: config.email_from.clone(),
        })
    }

    /// Renders the notification subject and body for a booking.
    ///
    /// The chosen template's `<name>.subject` companion supplies the subject
    /// line when present; otherwise the default subject applies.
    fn render(&self, booking: &Booking, items: &[BookingItem]) -> tera::Result<(String, String)> {
        let mut context = tera::Context::new();
        context.insert("booking", booking);
        context.insert("items", items);

        // The booking may name its own template; fall back to the built-in
        let template = booking
            .email_template
            .as_deref()
            .filter(|name| self.templates.get_template_names().any(|t| t == *name))
            .unwrap_or(DEFAULT_TEMPLATE);

        let subject_template = format!("{template}{SUBJECT_SUFFIX}");
        let subject = if self
            .templates
            .get_template_names()
            .any(|t| t == subject_template)
        {
            self.templates.render(&subject_template, &context)?
        } else {
            self.templates.render(DEFAULT_SUBJECT_TEMPLATE, &context)?
        };
        let body = self.templates.render(template, &context)?;
        Ok((subject, body))
    }

    /// Sends the booking notification to every recipient.
    ///
    /// Never fails the caller: zero recipients, rendering problems and SMTP
    /// failures are logged and swallowed.
    pub async fn notify_booking(
        &self,
        booking: &Booking,
        items: &[BookingItem],
        recipients: &[String],
    ) {
        if recipients.is_empty() {
            warn!(
                booking_id = %booking.id,
                customer = %booking.customer,
                "No contact emails for customer, skipping notification"
            );
            return;
        }

        let Some(transport) = &self.transport else {
            warn!(booking_id = %booking.id, "SMTP disabled, skipping notification");
            return;
        };

        let (subject, body) = match self.render(booking, items) {
            Ok(rendered) => rendered,
            Err(e) => {
                warn!(booking_id = %booking.id, error = %e, "Failed to render notification");
                return;
            }
        };

        for recipient in recipients {
            let message = Message::builder()
                .from(match self.from.parse() {
                    Ok(from) => from,
                    Err(e) => {
                        warn!(from = %self.from, error = %e, "Invalid from address");
                        return;
                    }
                })
                .to(match recipient.parse() {
                    Ok(to) => to,
                    Err(e) => {
                        warn!(to = %recipient, error = %e, "Invalid recipient, skipping");
                        continue;
                    }
                })
                .subject(&subject)
                .header(ContentType::TEXT_HTML)
                .body(body.clone());

            let message = match message {
                Ok(m) => m,
                Err(e) => {
                    warn!(to = %recipient, error = %e, "Failed to build message");
                    continue;
                }
            };

            match transport.send(message).await {
                Ok(_) => info!(booking_id = %booking.id, to = %recipient, "Notification sent"),
                Err(e) => {
                    warn!(booking_id = %booking.id, to = %recipient, error = %e, "Notification failed")
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    fn disabled_config() -> ServerConfig {
        ServerConfig {
            http_port: 8080,
            database_path: ":memory:".to_string(),
            smtp_host: String::new(),
            smtp_port: 587,
            smtp_username: None,
            smtp_password: None,
            smtp_tls: true,
            email_from: "Booking Suite <noreply@localhost>".to_string(),
            template_dir: None,
            status_refresh_interval_secs: 300,
        }
    }

    fn demo_booking() -> (Booking, Vec<BookingItem>) {
        let now = Utc::now();
        let booking = Booking {
            id: "BK-1".to_string(),
            company: "Acme Rentals".to_string(),
            customer: "CUST-001".to_string(),
            customer_name: Some("Jordan Lee".to_string()),
            title: None,
            note: None,
            sales_person: None,
            email_template: None,
            send_email: true,
            create_sales_invoice: false,
            issue_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            start_date: now,
            end_date: now,
            status: booking_core::BookingStatus::Pending,
            total: 950.0,
            created_at: now,
            updated_at: now,
        };
        let items = vec![BookingItem {
            id: "LI-1".to_string(),
            booking_id: "BK-1".to_string(),
            item_code: "CHAIR-01".to_string(),
            item_name: "Folding Chair".to_string(),
            description: None,
            qty: 10.0,
            uom: "Nos".to_string(),
            rate: 100.0,
            discount_percentage: 5.0,
            amount: 950.0,
            created_at: now,
        }];
        (booking, items)
    }

    #[test]
    fn test_render_default_template() {
        let mailer = Mailer::new(&disabled_config()).unwrap();
        let (booking, items) = demo_booking();

        let (subject, body) = mailer.render(&booking, &items).unwrap();
        assert!(subject.contains("Jordan Lee"));
        assert!(body.contains("Folding Chair"));
        assert!(body.contains("950"));
    }

    #[test]
    fn test_custom_template_overrides_subject() {
        let mut mailer = Mailer::new(&disabled_config()).unwrap();
        mailer
            .templates
            .add_raw_template("vip.html", "<p>VIP booking {{ booking.id }}</p>")
            .unwrap();
        mailer
            .templates
            .add_raw_template("vip.html.subject", "VIP booking for {{ booking.customer }}")
            .unwrap();

        let (mut booking, items) = demo_booking();
        booking.email_template = Some("vip.html".to_string());

        let (subject, body) = mailer.render(&booking, &items).unwrap();
        assert_eq!(subject, "VIP booking for CUST-001");
        assert!(body.contains("BK-1"));
    }

    #[test]
    fn test_custom_template_without_subject_uses_default() {
        let mut mailer = Mailer::new(&disabled_config()).unwrap();
        mailer
            .templates
            .add_raw_template("plain.html", "<p>{{ booking.id }}</p>")
            .unwrap();

        let (mut booking, items) = demo_booking();
        booking.email_template = Some("plain.html".to_string());

        let (subject, _) = mailer.render(&booking, &items).unwrap();
        assert!(subject.contains("Jordan Lee"));
    }

    #[tokio::test]
    async fn test_disabled_mailer_never_errors() {
        let mailer = Mailer::new(&disabled_config()).unwrap();
        let (booking, items) = demo_booking();

        // Disabled transport: both calls just log and return
        mailer
            .notify_booking(&booking, &items, &["jordan@example.com".to_string()])
            .await;
        mailer.notify_booking(&booking, &items, &[]).await;
    }
}
