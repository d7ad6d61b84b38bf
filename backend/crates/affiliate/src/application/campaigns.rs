//! Campaign Use Cases
//!
//! Listing with pagination plus create, read, update and delete.

use std::sync::Arc;

use kernel::id::CampaignId;

use crate::application::forms::{CreateCampaignForm, UpdateCampaignForm};
use crate::application::pagination::{Page, PageRequest};
use crate::domain::entity::Campaign;
use crate::domain::filter::CampaignFilter;
use crate::domain::repository::CampaignRepository;
use crate::error::{AffiliateError, AffiliateResult};

/// List campaigns input
#[derive(Debug)]
pub struct ListCampaignsInput {
    pub filter: CampaignFilter,
    pub page: PageRequest,
}

/// List campaigns use case
pub struct ListCampaignsUseCase<R>
where
    R: CampaignRepository,
{
    repo: Arc<R>,
}

impl<R> ListCampaignsUseCase<R>
where
    R: CampaignRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, input: ListCampaignsInput) -> AffiliateResult<Page<Campaign>> {
        let campaigns = self.repo.list(&input.filter).await?;
        Ok(Page::slice(campaigns, input.page))
    }
}

/// Get campaign use case
pub struct GetCampaignUseCase<R>
where
    R: CampaignRepository,
{
    repo: Arc<R>,
}

impl<R> GetCampaignUseCase<R>
where
    R: CampaignRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, id: &CampaignId) -> AffiliateResult<Campaign> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(AffiliateError::CampaignNotFound)
    }
}

/// Create campaign use case
pub struct CreateCampaignUseCase<R>
where
    R: CampaignRepository,
{
    repo: Arc<R>,
}

impl<R> CreateCampaignUseCase<R>
where
    R: CampaignRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, form: CreateCampaignForm) -> AffiliateResult<Campaign> {
        let draft = form.validate()?;
        self.repo.create(draft).await
    }
}

/// Update campaign use case
pub struct UpdateCampaignUseCase<R>
where
    R: CampaignRepository,
{
    repo: Arc<R>,
}

impl<R> UpdateCampaignUseCase<R>
where
    R: CampaignRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(
        &self,
        id: &CampaignId,
        form: UpdateCampaignForm,
    ) -> AffiliateResult<Campaign> {
        let current = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(AffiliateError::CampaignNotFound)?;
        let patch = form.validate(&current)?;

        self.repo
            .update(id, patch)
            .await?
            .ok_or(AffiliateError::CampaignNotFound)
    }
}

/// Delete campaign use case
pub struct DeleteCampaignUseCase<R>
where
    R: CampaignRepository,
{
    repo: Arc<R>,
}

impl<R> DeleteCampaignUseCase<R>
where
    R: CampaignRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, id: &CampaignId) -> AffiliateResult<()> {
        if !self.repo.delete(id).await? {
            return Err(AffiliateError::CampaignNotFound);
        }
        Ok(())
    }
}
