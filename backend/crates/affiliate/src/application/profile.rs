//! Profile Use Cases

use std::sync::Arc;

use kernel::id::UserId;

use crate::application::forms::UpdateProfileForm;
use crate::domain::entity::UserProfile;
use crate::domain::repository::UserRepository;
use crate::error::{AffiliateError, AffiliateResult};

/// Get profile use case
pub struct GetProfileUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
}

impl<R> GetProfileUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, user_id: &UserId) -> AffiliateResult<UserProfile> {
        self.repo
            .find_profile(user_id)
            .await?
            .ok_or(AffiliateError::UserNotFound)
    }
}

/// Update profile use case
pub struct UpdateProfileUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
}

impl<R> UpdateProfileUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(
        &self,
        user_id: &UserId,
        form: UpdateProfileForm,
    ) -> AffiliateResult<UserProfile> {
        let update = form.validate()?;

        self.repo
            .update_profile(user_id, &update)
            .await?
            .ok_or(AffiliateError::UserNotFound)
    }
}
