pub mod constant_contact;
pub mod factory;
pub mod mailchimp;
pub mod provider;
pub mod service;

pub use constant_contact::ConstantContactClient;
pub use factory::{create_provider, create_service};
pub use mailchimp::MailchimpClient;
pub use provider::{Contact, EmailProvider};
pub use service::{is_valid_email, ContactForm, DemoRequest, EmailService, SubmissionResult};
