//! Business logic services.

pub mod captcha;
pub mod email;
pub mod enquiry;
pub mod notification;
pub mod order;
pub mod professional;

pub use captcha::{CaptchaService, HttpScoreProvider, ScoreProvider};
pub use email::{EmailMessage, EmailService};
pub use enquiry::{EnquiryInput, EnquiryService};
pub use notification::{
    Notification, NotificationSender, NotificationService, NotificationWorkerContext,
};
pub use order::{OrderInput, OrderService, OrderUpdate};
pub use professional::{
    AdminProfessionalInput, LANGUAGES, ProfessionalInput, ProfessionalService, ProfessionalUpdate,
};
