//! Report rendering and transactional email delivery.

pub mod report;
mod resend;
mod types;

pub use resend::ResendMailer;
pub use types::{MailError, Mailer};
