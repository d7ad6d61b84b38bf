//! Tracking Use Cases
//!
//! Public endpoints hit by shoppers and advertiser systems: short-link
//! redirects, click tracking and conversion webhooks.

use std::sync::Arc;

use chrono::Utc;
use kernel::id::{ClickId, ConversionId, LinkId};
use platform::audit::{SecurityEvent, SecurityLevel, log_security_event};
use platform::config::SecurityConfig;
use platform::crypto::verify_hmac_sha256_hex;
use platform::url_guard::{UrlRejection, validate_url};
use serde::Serialize;

use crate::application::config::AffiliateConfig;
use crate::domain::entity::{
    AffiliateLink, Conversion, ConversionEvent, ConversionWebhook, WebhookPayload,
};
use crate::domain::repository::{ConversionRepository, LinkRepository};
use crate::error::{AffiliateError, AffiliateResult};

/// Header carrying the webhook HMAC-SHA256 signature (hex)
pub const WEBHOOK_SIGNATURE_HEADER: &str = "x-webhook-signature";

/// Who triggered a tracking request
#[derive(Debug, Clone, Default)]
pub struct ClientContext {
    pub ip: String,
    pub user_agent: Option<String>,
}

impl ClientContext {
    fn event(&self, name: &str, level: SecurityLevel) -> SecurityEvent {
        let event = SecurityEvent::new(name, level).with_ip(self.ip.clone());
        match &self.user_agent {
            Some(agent) => event.with_user_agent(agent.clone()),
            None => event,
        }
    }
}

// ============================================================================
// Redirect
// ============================================================================

/// Redirect output
pub struct RedirectOutput {
    pub link_id: LinkId,
    /// Destination with UTM parameters applied
    pub location: String,
}

/// Resolve a short link and count the click
pub struct RedirectUseCase<R>
where
    R: LinkRepository,
{
    repo: Arc<R>,
    config: Arc<AffiliateConfig>,
    security: Arc<SecurityConfig>,
}

impl<R> RedirectUseCase<R>
where
    R: LinkRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AffiliateConfig>, security: Arc<SecurityConfig>) -> Self {
        Self {
            repo,
            config,
            security,
        }
    }

    /// `previous_link` is the link the visitor last came through, if known;
    /// the click is unique unless it names this link
    pub async fn execute(
        &self,
        slug: &str,
        previous_link: Option<&str>,
        client: &ClientContext,
    ) -> AffiliateResult<RedirectOutput> {
        let link = self
            .repo
            .find_by_slug(slug)
            .await?
            .ok_or(AffiliateError::LinkNotFound)?;

        if !link.is_available(Utc::now()) {
            return Err(AffiliateError::LinkUnavailable);
        }

        let location = link
            .tracking_url()
            .map_err(|_| AffiliateError::UnsafeUrl(UrlRejection::Malformed))?;

        if let Err(rejection) = validate_url(&location, &self.config.allowed_redirect_domains) {
            let event = client
                .event("blocked_redirect", SecurityLevel::High)
                .with_details(serde_json::json!({
                    "slug": slug,
                    "linkId": link.id,
                    "reason": rejection.to_string(),
                }));
            log_security_event(&event, &self.security);
            return Err(rejection.into());
        }

        let unique = previous_link != Some(link.id.as_str());
        self.repo.record_click(&link.id, unique).await?;

        tracing::info!(link_id = %link.id, unique, "Link redirect");

        Ok(RedirectOutput {
            link_id: link.id,
            location,
        })
    }
}

// ============================================================================
// Click Tracking
// ============================================================================

/// Track click input
pub struct TrackClickInput {
    pub link_id: LinkId,
    pub unique: bool,
}

/// Track click output
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackClickOutput {
    pub click_id: ClickId,
    pub link_id: LinkId,
    pub clicks: u64,
    pub unique_clicks: u64,
}

/// Track click use case
pub struct TrackClickUseCase<R>
where
    R: LinkRepository,
{
    repo: Arc<R>,
}

impl<R> TrackClickUseCase<R>
where
    R: LinkRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, input: TrackClickInput) -> AffiliateResult<TrackClickOutput> {
        let link = self
            .repo
            .find_by_id(&input.link_id)
            .await?
            .ok_or(AffiliateError::LinkNotFound)?;

        if !link.is_available(Utc::now()) {
            return Err(AffiliateError::LinkUnavailable);
        }

        let link: AffiliateLink = self
            .repo
            .record_click(&link.id, input.unique)
            .await?
            .ok_or(AffiliateError::LinkNotFound)?;

        let click_id = ClickId::generate();
        tracing::info!(
            click_id = %click_id,
            link_id = %link.id,
            campaign_id = %link.campaign_id,
            "Click tracked"
        );

        Ok(TrackClickOutput {
            click_id,
            link_id: link.id,
            clicks: link.clicks,
            unique_clicks: link.unique_clicks,
        })
    }
}

// ============================================================================
// Webhook Ingestion
// ============================================================================

/// What happened to an accepted webhook
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookOutcome {
    pub event: String,
    /// False for events this service does not handle
    pub processed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversion_id: Option<ConversionId>,
}

/// Webhook ingestion use case
pub struct IngestWebhookUseCase<R>
where
    R: ConversionRepository,
{
    repo: Arc<R>,
    config: Arc<AffiliateConfig>,
    security: Arc<SecurityConfig>,
}

impl<R> IngestWebhookUseCase<R>
where
    R: ConversionRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AffiliateConfig>, security: Arc<SecurityConfig>) -> Self {
        Self {
            repo,
            config,
            security,
        }
    }

    /// Verify the raw body against the signature, then apply the event
    pub async fn execute(
        &self,
        body: &[u8],
        signature: Option<&str>,
        client: &ClientContext,
    ) -> AffiliateResult<WebhookOutcome> {
        if let Some(key) = self.config.webhook_key() {
            let Some(signature) = signature else {
                log_security_event(
                    &client.event("webhook_unsigned", SecurityLevel::Medium),
                    &self.security,
                );
                return Err(AffiliateError::MissingSignature);
            };
            if !verify_hmac_sha256_hex(key, body, signature) {
                log_security_event(
                    &client.event("webhook_bad_signature", SecurityLevel::High),
                    &self.security,
                );
                return Err(AffiliateError::InvalidSignature);
            }
        }

        let payload: WebhookPayload = serde_json::from_slice(body)?;
        let event = payload.event.clone();

        let Some(webhook) = ConversionWebhook::from_payload(payload)? else {
            tracing::info!(event = %event, "Ignoring unhandled webhook event");
            return Ok(WebhookOutcome {
                event,
                processed: false,
                conversion_id: None,
            });
        };

        let incoming = webhook.data.conversion;
        let conversion_id = incoming.id.clone();

        let stored = self.repo.find_by_id(&conversion_id).await?;
        match (webhook.event, stored) {
            (ConversionEvent::Created, None) => {
                self.repo.save(incoming).await?;
            }
            // Redelivered or replayed creations are held to the lifecycle too
            (ConversionEvent::Created | ConversionEvent::Updated, Some(stored)) => {
                self.apply_update(stored, incoming).await?;
            }
            (ConversionEvent::Updated, None) => return Err(AffiliateError::ConversionNotFound),
        }

        tracing::info!(
            event = %event,
            conversion_id = %conversion_id,
            campaign_id = %webhook.data.campaign.id,
            "Webhook processed"
        );

        Ok(WebhookOutcome {
            event,
            processed: true,
            conversion_id: Some(conversion_id),
        })
    }

    /// Overwrite a stored conversion, keeping its status on the lifecycle
    async fn apply_update(&self, mut stored: Conversion, incoming: Conversion) -> AffiliateResult<()> {
        let now = Utc::now();
        if incoming.status != stored.status {
            stored.transition_to(incoming.status, now)?;
        }

        self.repo
            .save(Conversion {
                status: stored.status,
                created_at: stored.created_at,
                updated_at: now,
                ..incoming
            })
            .await
    }
}
