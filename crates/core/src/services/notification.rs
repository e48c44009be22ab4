//! Best-effort notification pipeline.
//!
//! Notifications ride an in-memory channel to a background worker. Dispatch
//! never blocks a request and never fails one: a full queue drops the
//! notification, a transport failure is logged in the worker. There are no
//! retries.

use markethall_db::records::{Enquiry, Order, Professional};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::services::email::{EmailMessage, EmailService};

/// Channel buffer size for notifications.
const QUEUE_SIZE: usize = 1000;

/// Notification job types.
#[derive(Debug, Clone)]
pub enum Notification {
    /// A professional listing was self-submitted.
    ProfessionalSubmitted { professional: Professional },
    /// A professional listing was approved or rejected.
    ProfessionalStatusChanged { professional: Professional },
    /// An order was submitted.
    OrderSubmitted { order: Order },
    /// An order was approved, rejected or completed.
    OrderStatusChanged { order: Order },
    /// An enquiry was received.
    EnquiryReceived { enquiry: Enquiry },
}

/// Handle for dispatching notifications.
#[derive(Clone)]
pub struct NotificationSender {
    sender: mpsc::Sender<Notification>,
}

impl NotificationSender {
    /// Dispatch a notification. Infallible from the caller's perspective:
    /// a full or closed queue drops the notification with a warning.
    pub fn dispatch(&self, notification: Notification) {
        if let Err(e) = self.sender.try_send(notification) {
            warn!(error = %e, "Notification queue unavailable, dropping notification");
        }
    }
}

/// Worker context for processing notifications.
#[derive(Clone)]
pub struct NotificationWorkerContext {
    /// Email transport.
    pub email: EmailService,
    /// Back-office mailbox for new-submission notices.
    pub admin_address: Option<String>,
}

/// Notification processing service.
pub struct NotificationService {
    sender: mpsc::Sender<Notification>,
    receiver: Option<mpsc::Receiver<Notification>>,
}

impl NotificationService {
    /// Create a new notification service.
    #[must_use]
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel(QUEUE_SIZE);
        Self {
            sender,
            receiver: Some(receiver),
        }
    }

    /// Get a sender handle for dispatching notifications.
    #[must_use]
    pub fn sender(&self) -> NotificationSender {
        NotificationSender {
            sender: self.sender.clone(),
        }
    }

    /// Start the background worker. Consumes the receiver; later calls on a
    /// started service are a programming error and log instead of panicking.
    pub fn start(mut self, context: NotificationWorkerContext) {
        let Some(mut receiver) = self.receiver.take() else {
            warn!("Notification service already started");
            return;
        };

        tokio::spawn(async move {
            info!("Notification worker starting");
            while let Some(notification) = receiver.recv().await {
                process_notification(notification, &context).await;
            }
            info!("Notification worker stopped");
        });
    }
}

impl Default for NotificationService {
    fn default() -> Self {
        Self::new()
    }
}

/// Process one notification. Failures are logged and dropped.
async fn process_notification(notification: Notification, context: &NotificationWorkerContext) {
    for message in render(&notification, context.admin_address.as_deref()) {
        let to = message.to.clone();
        match context.email.send(message).await {
            Ok(()) => debug!(to = %to, "Notification email sent"),
            Err(e) => warn!(to = %to, error = %e, "Notification email failed"),
        }
    }
}

/// Compose the outbound messages for a notification.
fn render(notification: &Notification, admin_address: Option<&str>) -> Vec<EmailMessage> {
    let mut messages = Vec::new();

    match notification {
        Notification::ProfessionalSubmitted { professional } => {
            if let Some(admin) = admin_address {
                messages.push(EmailMessage {
                    to: admin.to_string(),
                    subject: format!(
                        "New professional submission: {} {}",
                        professional.first_name, professional.last_name
                    ),
                    text_body: format!(
                        "A new professional listing is awaiting review.\n\n\
                        Name: {} {}\nCity: {}\nSubmission ID: {}",
                        professional.first_name,
                        professional.last_name,
                        professional.city.as_deref().unwrap_or("-"),
                        professional.id
                    ),
                    html_body: None,
                });
            }
            if let Some(email) = &professional.email {
                messages.push(EmailMessage {
                    to: email.clone(),
                    subject: "We received your submission".to_string(),
                    text_body: format!(
                        "Hi {},\n\nYour listing has been received and is awaiting review.\n\
                        We will let you know once it has been processed.",
                        professional.first_name
                    ),
                    html_body: None,
                });
            }
        }

        Notification::ProfessionalStatusChanged { professional } => {
            if let Some(email) = &professional.email {
                let outcome = professional.status.to_string();
                let mut body = format!(
                    "Hi {},\n\nYour listing has been {outcome}.",
                    professional.first_name
                );
                if let Some(reason) = &professional.rejection_reason {
                    body.push_str(&format!("\n\nReason: {reason}"));
                }
                messages.push(EmailMessage {
                    to: email.clone(),
                    subject: format!("Your listing has been {outcome}"),
                    text_body: body,
                    html_body: None,
                });
            }
        }

        Notification::OrderSubmitted { order } => {
            messages.push(EmailMessage {
                to: order.customer_email.clone(),
                subject: "Your order has been received".to_string(),
                text_body: format!(
                    "Hi {},\n\nYour order {} has been received and is awaiting review.\n\
                    We will contact you on WhatsApp at {} once it is processed.",
                    order.customer_name, order.id, order.customer_whatsapp
                ),
                html_body: None,
            });
            if let Some(admin) = admin_address {
                messages.push(EmailMessage {
                    to: admin.to_string(),
                    subject: format!("New order from {}", order.customer_name),
                    text_body: format!(
                        "A new order is awaiting review.\n\n\
                        Order ID: {}\nCustomer: {} <{}>\nProfessional: {}",
                        order.id, order.customer_name, order.customer_email, order.professional_id
                    ),
                    html_body: None,
                });
            }
        }

        Notification::OrderStatusChanged { order } => {
            let outcome = order.status.to_string();
            let mut body = format!(
                "Hi {},\n\nYour order {} has been {outcome}.",
                order.customer_name, order.id
            );
            if let Some(reason) = &order.rejection_reason {
                body.push_str(&format!("\n\nReason: {reason}"));
            }
            messages.push(EmailMessage {
                to: order.customer_email.clone(),
                subject: format!("Your order has been {outcome}"),
                text_body: body,
                html_body: None,
            });
        }

        Notification::EnquiryReceived { enquiry } => {
            if let Some(admin) = admin_address {
                messages.push(EmailMessage {
                    to: admin.to_string(),
                    subject: format!("New enquiry from {}", enquiry.name),
                    text_body: format!(
                        "A new enquiry has arrived.\n\n\
                        From: {} <{}>\nCompany: {}\n\n{}",
                        enquiry.name,
                        enquiry.email,
                        enquiry.company.as_deref().unwrap_or("-"),
                        enquiry.message.as_deref().unwrap_or("")
                    ),
                    html_body: None,
                });
            }
        }
    }

    messages
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use markethall_db::entities::professional::ProfessionalStatus;

    fn professional(email: Option<&str>, status: ProfessionalStatus) -> Professional {
        Professional {
            id: "p1".to_string(),
            first_name: "Amina".to_string(),
            last_name: "Hassan".to_string(),
            email: email.map(String::from),
            profile_url: None,
            linkedin_url: None,
            tiktok_url: None,
            facebook_url: None,
            youtube_url: None,
            followers_count: None,
            verified: false,
            agency_owner: false,
            agent: true,
            developer_employee: false,
            gender: None,
            nationality: None,
            city: Some("Dubai".to_string()),
            languages: vec![],
            image_url: None,
            status,
            submitted_by: Some("user1".to_string()),
            submitted_by_admin: None,
            approved_by: None,
            approved_at: None,
            rejected_by: None,
            rejected_at: None,
            rejection_reason: None,
            admin_comments: None,
            is_active: true,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    #[test]
    fn submission_produces_admin_and_submitter_pair() {
        let notification = Notification::ProfessionalSubmitted {
            professional: professional(Some("amina@example.com"), ProfessionalStatus::Pending),
        };
        let messages = render(&notification, Some("back-office@markethall.example"));

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].to, "back-office@markethall.example");
        assert_eq!(messages[1].to, "amina@example.com");
    }

    #[test]
    fn status_change_without_submitter_address_renders_nothing() {
        let notification = Notification::ProfessionalStatusChanged {
            professional: professional(None, ProfessionalStatus::Approved),
        };
        assert!(render(&notification, Some("admin@x")).is_empty());
    }

    #[test]
    fn dispatch_with_dropped_receiver_does_not_fail() {
        let service = NotificationService::new();
        let sender = service.sender();
        drop(service);

        // Must not panic or error.
        sender.dispatch(Notification::ProfessionalSubmitted {
            professional: professional(None, ProfessionalStatus::Pending),
        });
    }
}
