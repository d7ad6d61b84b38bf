//! Entity Module

pub mod campaign;
pub mod conversion;
pub mod link;
pub mod metrics;
pub mod notification;
pub mod payment;
pub mod user;
pub mod webhook;

pub use campaign::{Campaign, CampaignDraft, CampaignPatch};
pub use conversion::Conversion;
pub use link::{AffiliateLink, UtmParams};
pub use metrics::{
    AffiliatePerformance, CampaignPerformance, ChartDataPoint, ChartSeries, CountryPerformance,
    DailyStat, DashboardMetrics, Growth, MetricsPeriod,
};
pub use notification::{Notification, NotificationKind};
pub use payment::{Payment, PaymentMethod, PaymentMethodType};
pub use user::{
    NotificationPreferences, ProfileDetails, ProfileUpdate, User, UserPreferences, UserProfile,
    UserStats,
};
pub use webhook::{AffiliateSummary, ConversionEvent, ConversionWebhook, ConversionWebhookData, WebhookPayload};
