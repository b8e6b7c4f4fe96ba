use tokio::time::Instant;

use crate::client::{ClientError, MessageSender};
use crate::features::messages::dtos::CreateMessageDto;
use crate::shared::constants::{messages, ALERT_DISMISS_AFTER};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
}

/// Feedback shown above the contact form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub message: String,
    pub severity: Severity,
    shown_at: Instant,
}

impl Alert {
    fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            severity,
            shown_at: Instant::now(),
        }
    }

    fn expired(&self) -> bool {
        self.shown_at.elapsed() >= ALERT_DISMISS_AFTER
    }
}

/// State of the public contact form
#[derive(Debug, Clone, Default)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub title: String,
    pub content: String,
    is_loading: bool,
    alert: Option<Alert>,
}

impl ContactForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// The current alert, `None` once it has been shown for five seconds
    pub fn alert(&self) -> Option<&Alert> {
        self.alert.as_ref().filter(|alert| !alert.expired())
    }

    /// Mark the form as submitting and build the request payload
    pub fn begin_submit(&mut self) -> CreateMessageDto {
        self.is_loading = true;
        CreateMessageDto {
            name: Some(self.name.clone()),
            email: Some(self.email.clone()),
            title: Some(self.title.clone()),
            content: Some(self.content.clone()),
        }
    }

    /// Record the outcome of a submission
    ///
    /// Fields are reset only on success.
    pub fn finish_submit(&mut self, outcome: Result<String, ClientError>) {
        self.is_loading = false;

        let alert = match outcome {
            Ok(message) => {
                self.name.clear();
                self.email.clear();
                self.title.clear();
                self.content.clear();
                Alert::new(message, Severity::Success)
            }
            Err(ClientError::Rejected { message, .. }) => Alert::new(message, Severity::Error),
            Err(e) => {
                tracing::warn!("Contact form submission failed: {}", e);
                Alert::new(messages::REQUEST_PROCESSING_FAILED, Severity::Error)
            }
        };
        self.alert = Some(alert);
    }

    /// Send the form through `sender`
    pub async fn submit(&mut self, sender: &dyn MessageSender) {
        let payload = self.begin_submit();
        let outcome = sender.send(&payload).await;
        self.finish_submit(outcome);
    }
}
