//! HTTP Handlers

use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::IntoResponse;
use chrono::Utc;
use kernel::id::{CampaignId, UserId};
use platform::audit::{SecurityEvent, SecurityLevel, log_security_event};
use platform::config::SecurityConfig;
use platform::cookie::{CookieConfig, extract_cookie};
use platform::csrf::{CSRF_HEADER, csrf_cookie_config, generate_csrf_token};
use platform::upload::{UploadVerdict, validate_file_upload};
use platform::url_guard::UrlRejection;

use crate::application::config::AffiliateConfig;
use crate::application::tracking::WEBHOOK_SIGNATURE_HEADER;
use crate::application::{
    ChartData, ChartDataUseCase, CreateCampaignForm, CreateCampaignUseCase, DashboardMetricsUseCase,
    DeleteCampaignUseCase, GetCampaignUseCase, GetProfileUseCase, IngestWebhookUseCase,
    ListCampaignsUseCase, RedirectUseCase, RegisterForm, RegisterUseCase, TrackClickInput,
    TrackClickOutput, TrackClickUseCase, UpdateCampaignForm, UpdateCampaignUseCase,
    UpdateProfileForm, UpdateProfileUseCase, UserStatsUseCase, WebhookOutcome,
};
use crate::domain::entity::{
    AffiliateLink, Campaign, Conversion, DashboardMetrics, User, UserProfile, UserStats,
};
use crate::domain::repository::{
    ConversionRepository, DashboardRepository, LinkRepository, UserRepository,
};
use crate::error::{AffiliateError, AffiliateResult};
use crate::presentation::dto::{
    CampaignListQuery, ChartQuery, ConversionListQuery, CsrfTokenResponse, RegisterResponse,
    TrackClickRequest, UploadValidateRequest,
};
use crate::presentation::middleware::Client;
use crate::presentation::response::ApiResponse;

/// Cookie remembering the last link a visitor came through
pub const REFERRAL_COOKIE: &str = "aff_ref";

/// Attribution window of the referral cookie (30 days)
const REFERRAL_MAX_AGE_SECS: i64 = 30 * 24 * 3600;

/// Shared state for affiliate handlers
#[derive(Clone)]
pub struct AffiliateAppState<R>
where
    R: DashboardRepository,
{
    pub repo: Arc<R>,
    pub config: Arc<AffiliateConfig>,
    pub security: Arc<SecurityConfig>,
}

fn user_id(raw: String) -> AffiliateResult<UserId> {
    UserId::parse(raw).map_err(|_| AffiliateError::UserNotFound)
}

fn campaign_id(raw: String) -> AffiliateResult<CampaignId> {
    CampaignId::parse(raw).map_err(|_| AffiliateError::CampaignNotFound)
}

// ============================================================================
// Users
// ============================================================================

/// GET /users
pub async fn list_users<R>(
    State(state): State<AffiliateAppState<R>>,
) -> AffiliateResult<ApiResponse<Vec<User>>>
where
    R: DashboardRepository,
{
    let users = UserRepository::list(state.repo.as_ref()).await?;
    Ok(ApiResponse::ok(users))
}

/// GET /users/{id}
pub async fn get_user<R>(
    State(state): State<AffiliateAppState<R>>,
    Path(id): Path<String>,
) -> AffiliateResult<ApiResponse<User>>
where
    R: DashboardRepository,
{
    let id = user_id(id)?;
    let user = UserRepository::find_by_id(state.repo.as_ref(), &id)
        .await?
        .ok_or(AffiliateError::UserNotFound)?;
    Ok(ApiResponse::ok(user))
}

/// GET /users/{id}/stats
pub async fn user_stats<R>(
    State(state): State<AffiliateAppState<R>>,
    Path(id): Path<String>,
) -> AffiliateResult<ApiResponse<UserStats>>
where
    R: DashboardRepository,
{
    let id = user_id(id)?;
    let stats = UserStatsUseCase::new(state.repo.clone()).execute(&id).await?;
    Ok(ApiResponse::ok(stats))
}

/// GET /users/{id}/profile
pub async fn get_profile<R>(
    State(state): State<AffiliateAppState<R>>,
    Path(id): Path<String>,
) -> AffiliateResult<ApiResponse<UserProfile>>
where
    R: DashboardRepository,
{
    let id = user_id(id)?;
    let profile = GetProfileUseCase::new(state.repo.clone()).execute(&id).await?;
    Ok(ApiResponse::ok(profile))
}

/// PATCH /users/{id}/profile
pub async fn update_profile<R>(
    State(state): State<AffiliateAppState<R>>,
    Path(id): Path<String>,
    Json(form): Json<UpdateProfileForm>,
) -> AffiliateResult<ApiResponse<UserProfile>>
where
    R: DashboardRepository,
{
    let id = user_id(id)?;
    let profile = UpdateProfileUseCase::new(state.repo.clone())
        .execute(&id, form)
        .await?;
    Ok(ApiResponse::ok(profile).with_message("Profile updated"))
}

// ============================================================================
// Campaigns
// ============================================================================

/// GET /campaigns
pub async fn list_campaigns<R>(
    State(state): State<AffiliateAppState<R>>,
    Query(query): Query<CampaignListQuery>,
) -> AffiliateResult<ApiResponse<Vec<Campaign>>>
where
    R: DashboardRepository,
{
    let input = query.into_input(&state.config)?;
    let page = ListCampaignsUseCase::new(state.repo.clone())
        .execute(input)
        .await?;
    Ok(ApiResponse::paginated(page))
}

/// POST /campaigns
pub async fn create_campaign<R>(
    State(state): State<AffiliateAppState<R>>,
    Json(form): Json<CreateCampaignForm>,
) -> AffiliateResult<impl IntoResponse>
where
    R: DashboardRepository,
{
    let campaign = CreateCampaignUseCase::new(state.repo.clone())
        .execute(form)
        .await?;
    Ok((
        StatusCode::CREATED,
        ApiResponse::ok(campaign).with_message("Campaign created"),
    ))
}

/// GET /campaigns/{id}
pub async fn get_campaign<R>(
    State(state): State<AffiliateAppState<R>>,
    Path(id): Path<String>,
) -> AffiliateResult<ApiResponse<Campaign>>
where
    R: DashboardRepository,
{
    let id = campaign_id(id)?;
    let campaign = GetCampaignUseCase::new(state.repo.clone()).execute(&id).await?;
    Ok(ApiResponse::ok(campaign))
}

/// PATCH /campaigns/{id}
pub async fn update_campaign<R>(
    State(state): State<AffiliateAppState<R>>,
    Path(id): Path<String>,
    Json(form): Json<UpdateCampaignForm>,
) -> AffiliateResult<ApiResponse<Campaign>>
where
    R: DashboardRepository,
{
    let id = campaign_id(id)?;
    let campaign = UpdateCampaignUseCase::new(state.repo.clone())
        .execute(&id, form)
        .await?;
    Ok(ApiResponse::ok(campaign).with_message("Campaign updated"))
}

/// DELETE /campaigns/{id}
pub async fn delete_campaign<R>(
    State(state): State<AffiliateAppState<R>>,
    Path(id): Path<String>,
) -> AffiliateResult<ApiResponse<()>>
where
    R: DashboardRepository,
{
    let id = campaign_id(id)?;
    DeleteCampaignUseCase::new(state.repo.clone())
        .execute(&id)
        .await?;
    Ok(ApiResponse::ok(()).with_message("Campaign deleted"))
}

// ============================================================================
// Conversions & Links
// ============================================================================

/// GET /conversions
pub async fn list_conversions<R>(
    State(state): State<AffiliateAppState<R>>,
    Query(query): Query<ConversionListQuery>,
) -> AffiliateResult<ApiResponse<Vec<Conversion>>>
where
    R: DashboardRepository,
{
    let filter = query.into_filter(Utc::now())?;
    let conversions = ConversionRepository::list(state.repo.as_ref(), &filter).await?;
    Ok(ApiResponse::ok(conversions))
}

/// GET /affiliates/{id}/links
pub async fn affiliate_links<R>(
    State(state): State<AffiliateAppState<R>>,
    Path(id): Path<String>,
) -> AffiliateResult<ApiResponse<Vec<AffiliateLink>>>
where
    R: DashboardRepository,
{
    let id = user_id(id)?;
    let links = state.repo.list_by_affiliate(&id).await?;
    Ok(ApiResponse::ok(links))
}

// ============================================================================
// Analytics
// ============================================================================

/// GET /dashboard/metrics
pub async fn dashboard_metrics<R>(
    State(state): State<AffiliateAppState<R>>,
) -> AffiliateResult<ApiResponse<DashboardMetrics>>
where
    R: DashboardRepository,
{
    let metrics = DashboardMetricsUseCase::new(state.repo.clone())
        .execute()
        .await?;
    Ok(ApiResponse::ok(metrics))
}

/// GET /analytics/chart
pub async fn analytics_chart<R>(
    State(state): State<AffiliateAppState<R>>,
    Query(query): Query<ChartQuery>,
) -> AffiliateResult<ApiResponse<ChartData>>
where
    R: DashboardRepository,
{
    let chart = ChartDataUseCase::new(state.repo.clone(), state.config.clone())
        .execute(query.days)
        .await?;
    Ok(ApiResponse::ok(chart))
}

// ============================================================================
// Uploads
// ============================================================================

/// POST /uploads/validate
pub async fn validate_upload<R>(
    State(state): State<AffiliateAppState<R>>,
    Client(client): Client,
    Json(req): Json<UploadValidateRequest>,
) -> ApiResponse<UploadVerdict>
where
    R: DashboardRepository,
{
    let verdict = validate_file_upload(
        &req.filename,
        &req.mimetype,
        req.size,
        &state.config.upload_policy,
    );

    if let Some(reason) = verdict.error {
        let event = SecurityEvent::new("upload_rejected", SecurityLevel::Medium)
            .with_ip(client.ip)
            .with_details(serde_json::json!({
                "filename": req.filename,
                "mimetype": req.mimetype,
                "size": req.size,
                "reason": reason,
            }));
        log_security_event(&event, &state.security);
    }

    ApiResponse::ok(verdict)
}

// ============================================================================
// CSRF & Registration
// ============================================================================

/// GET /csrf
pub async fn csrf_token<R>(State(state): State<AffiliateAppState<R>>) -> impl IntoResponse
where
    R: DashboardRepository,
{
    let token = generate_csrf_token();
    let cookie = csrf_cookie_config(state.config.cookie_secure).header_value(&token);

    (
        [(header::SET_COOKIE, cookie)],
        ApiResponse::ok(CsrfTokenResponse {
            csrf_token: token,
            header_name: CSRF_HEADER,
        }),
    )
}

/// POST /auth/register
pub async fn register<R>(
    State(state): State<AffiliateAppState<R>>,
    Json(form): Json<RegisterForm>,
) -> AffiliateResult<ApiResponse<RegisterResponse>>
where
    R: DashboardRepository,
{
    let output = RegisterUseCase::new(state.repo.clone()).execute(form).await?;
    Ok(ApiResponse::ok(RegisterResponse::from(output)).with_message("Registration is valid"))
}

// ============================================================================
// Public Tracking
// ============================================================================

/// POST /track
pub async fn track_click<R>(
    State(state): State<AffiliateAppState<R>>,
    Json(req): Json<TrackClickRequest>,
) -> AffiliateResult<ApiResponse<TrackClickOutput>>
where
    R: DashboardRepository,
{
    let output = TrackClickUseCase::new(state.repo.clone())
        .execute(TrackClickInput {
            link_id: req.link_id,
            unique: req.unique,
        })
        .await?;
    Ok(ApiResponse::ok(output))
}

/// POST /webhook
///
/// The body is taken raw so the signature covers the exact bytes sent.
pub async fn webhook<R>(
    State(state): State<AffiliateAppState<R>>,
    Client(client): Client,
    headers: HeaderMap,
    body: Bytes,
) -> AffiliateResult<ApiResponse<WebhookOutcome>>
where
    R: DashboardRepository,
{
    let signature = headers
        .get(WEBHOOK_SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok());

    let outcome = IngestWebhookUseCase::new(
        state.repo.clone(),
        state.config.clone(),
        state.security.clone(),
    )
    .execute(&body, signature, &client)
    .await?;

    Ok(ApiResponse::ok(outcome))
}

/// GET /redirect/{slug}
///
/// Answers 302 to the tracking URL and remembers the link in the referral
/// cookie.
pub async fn redirect<R>(
    State(state): State<AffiliateAppState<R>>,
    Client(client): Client,
    headers: HeaderMap,
    Path(slug): Path<String>,
) -> AffiliateResult<impl IntoResponse>
where
    R: DashboardRepository,
{
    let previous = extract_cookie(&headers, REFERRAL_COOKIE);

    let output = RedirectUseCase::new(
        state.repo.clone(),
        state.config.clone(),
        state.security.clone(),
    )
    .execute(&slug, previous.as_deref(), &client)
    .await?;

    let location = HeaderValue::try_from(output.location)
        .map_err(|_| AffiliateError::UnsafeUrl(UrlRejection::Malformed))?;

    let cookie = CookieConfig::new(REFERRAL_COOKIE)
        .secure(state.config.cookie_secure)
        .max_age(REFERRAL_MAX_AGE_SECS)
        .header_value(output.link_id.as_str());

    Ok((
        StatusCode::FOUND,
        [(header::LOCATION, location), (header::SET_COOKIE, cookie)],
    ))
}
