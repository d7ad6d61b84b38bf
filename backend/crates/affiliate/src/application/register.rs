//! Register Use Case
//!
//! Checks a registration form and that the email is free. Accounts are
//! not persisted by the mock provider.

use std::sync::Arc;

use crate::application::forms::RegisterForm;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{Email, UserRole};
use crate::error::{AffiliateError, AffiliateResult};

/// Register output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterOutput {
    pub name: String,
    pub email: Email,
    pub role: UserRole,
}

/// Register use case
pub struct RegisterUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
}

impl<R> RegisterUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, form: RegisterForm) -> AffiliateResult<RegisterOutput> {
        let registration = form.validate()?;

        if self.repo.exists_by_email(&registration.email).await? {
            return Err(AffiliateError::EmailTaken);
        }

        tracing::info!(
            email_domain = %registration.email.domain(),
            role = %registration.role,
            "Registration accepted"
        );

        Ok(RegisterOutput {
            name: registration.name,
            email: registration.email,
            role: registration.role,
        })
    }
}
