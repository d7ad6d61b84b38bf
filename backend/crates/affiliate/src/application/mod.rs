//! Application Layer
//!
//! Use cases, input forms, pagination and configuration.

pub mod analytics;
pub mod campaigns;
pub mod config;
pub mod forms;
pub mod pagination;
pub mod profile;
pub mod register;
pub mod tracking;

// Re-exports
pub use analytics::{ChartData, ChartDataUseCase, DashboardMetricsUseCase, UserStatsUseCase};
pub use campaigns::{
    CreateCampaignUseCase, DeleteCampaignUseCase, GetCampaignUseCase, ListCampaignsInput,
    ListCampaignsUseCase, UpdateCampaignUseCase,
};
pub use config::AffiliateConfig;
pub use forms::{CreateCampaignForm, LoginForm, RegisterForm, UpdateCampaignForm, UpdateProfileForm};
pub use pagination::{Page, PageRequest};
pub use profile::{GetProfileUseCase, UpdateProfileUseCase};
pub use register::{RegisterOutput, RegisterUseCase};
pub use tracking::{
    ClientContext, IngestWebhookUseCase, RedirectOutput, RedirectUseCase, TrackClickInput,
    TrackClickOutput, TrackClickUseCase, WebhookOutcome,
};
