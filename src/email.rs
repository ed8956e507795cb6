//! Utilities for sending emails.

use askama::Template;
use async_trait::async_trait;
use lettre::{
    message::{Mailbox, MultiPart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use crate::{config::Config, messages::Lang};

/// An email template asking an applicant to verify their application.
#[derive(Template)]
#[template(path = "email/verification_en.html")]
struct VerificationMessageEn<'a> {
    /// The applicant's name.
    name: &'a str,

    /// The verification code.
    code: &'a str,

    /// The capitalized category title.
    title: &'static str,
}

impl MessageTemplate for VerificationMessageEn<'_> {
    fn subject(&self) -> String {
        format!("Verify Your BORNOVAMUN {} Application", self.title)
    }
}

/// The Turkish variant of the verification email template.
#[derive(Template)]
#[template(path = "email/verification_tr.html")]
struct VerificationMessageTr<'a> {
    /// The applicant's name.
    name: &'a str,

    /// The verification code.
    code: &'a str,

    /// The capitalized category title.
    title: &'static str,
}

impl MessageTemplate for VerificationMessageTr<'_> {
    fn subject(&self) -> String {
        format!("BORNOVAMUN {} Başvurusu Doğrulama", self.title)
    }
}

/// An HTML [`Template`] for an email message.
trait MessageTemplate: Template {
    /// Gets the message's subject line.
    fn subject(&self) -> String;

    /// Renders the message into its subject line and HTML body.
    ///
    /// # Errors
    ///
    /// Returns an error if the template fails to render.
    fn render_parts(&self) -> anyhow::Result<(String, String)> {
        Ok((self.subject(), self.render()?))
    }
}

/// Renders the verification email for an applicant's language.
///
/// Returns the subject line and HTML body.
///
/// # Errors
///
/// Returns an error if the template fails to render.
pub fn verification_message(
    lang: Lang,
    name: &str,
    code: &str,
    title: &'static str,
) -> anyhow::Result<(String, String)> {
    match lang {
        Lang::En => VerificationMessageEn { name, code, title }.render_parts(),
        Lang::Tr => VerificationMessageTr { name, code, title }.render_parts(),
    }
}

/// A transactional email sender.
#[async_trait]
pub trait EmailSender: Send + Sync {
    /// Sends an HTML email.
    ///
    /// # Errors
    ///
    /// Returns an error if the message can't be built or delivered.
    async fn send(&self, to: Mailbox, subject: &str, html: &str) -> anyhow::Result<()>;
}

/// The [`EmailSender`] backed by an authenticated SMTP relay.
#[derive(Debug)]
pub struct SmtpSender {
    /// The SMTP transport messages are sent over.
    transport: AsyncSmtpTransport<Tokio1Executor>,

    /// The mailbox automated emails are sent from.
    from: Mailbox,
}

impl SmtpSender {
    /// Creates a sender from the configured SMTP relay credentials.
    ///
    /// # Errors
    ///
    /// Returns an error if the relay can't be initialized.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_hostname)?
            .credentials(Credentials::new(
                config.smtp_username.clone(),
                config.smtp_password.clone(),
            ))
            .build();

        Ok(Self {
            transport,
            from: config.from_mailbox.clone(),
        })
    }
}

#[async_trait]
impl EmailSender for SmtpSender {
    async fn send(&self, to: Mailbox, subject: &str, html: &str) -> anyhow::Result<()> {
        let plain = html2text::from_read(html.as_bytes(), usize::MAX);

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(subject)
            .multipart(MultiPart::alternative_plain_html(plain, html.to_owned()))?;

        self.transport.send(message).await?;

        Ok(())
    }
}
