//! Seed data for the in-memory provider

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use kernel::id::{CampaignId, ClickId, ConversionId, LinkId, PaymentMethodId, UserId};

use crate::domain::entity::{
    AffiliatePerformance, AffiliateLink, Campaign, CampaignPerformance, Conversion,
    CountryPerformance, DashboardMetrics, Growth, MetricsPeriod, PaymentMethod,
    PaymentMethodType, User, UtmParams,
};
use crate::domain::value_object::{
    CampaignStatus, CommissionType, ConversionStatus, Device, Email, UserRole,
};

fn ts(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .expect("fixture timestamps are valid RFC 3339")
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[allow(clippy::too_many_arguments)]
fn user(
    n: u32,
    email: &str,
    name: &str,
    role: UserRole,
    avatar: &str,
    phone: &str,
    last_login: &str,
    created_at: &str,
) -> User {
    User {
        id: UserId::from_suffix(n),
        email: Email::from_trusted(email),
        name: name.to_string(),
        role,
        avatar: Some(format!(
            "https://images.unsplash.com/{avatar}?w=150&h=150&fit=crop&crop=face"
        )),
        phone: Some(phone.to_string()),
        country: Some("BR".to_string()),
        timezone: Some("America/Sao_Paulo".to_string()),
        is_verified: true,
        is_active: true,
        last_login: Some(ts(last_login)),
        created_at: ts(created_at),
        updated_at: ts(last_login),
    }
}

pub fn users() -> Vec<User> {
    vec![
        user(
            1,
            "admin@vibe.com",
            "Admin VIBE",
            UserRole::Admin,
            "photo-1472099645785-5658abf4ff4e",
            "+55 11 99999-9999",
            "2024-08-24T08:30:00Z",
            "2024-01-01T00:00:00Z",
        ),
        user(
            2,
            "affiliate@example.com",
            "João Silva",
            UserRole::Affiliate,
            "photo-1507003211169-0a1dd7228f2d",
            "+55 11 88888-8888",
            "2024-08-23T18:45:00Z",
            "2024-02-15T00:00:00Z",
        ),
        user(
            3,
            "advertiser@company.com",
            "Maria Santos",
            UserRole::Advertiser,
            "photo-1494790108755-2616b612b2ad",
            "+55 11 77777-7777",
            "2024-08-24T09:15:00Z",
            "2024-03-01T00:00:00Z",
        ),
    ]
}

fn image(id: &str, size: &str) -> String {
    format!("https://images.unsplash.com/{id}?{size}&fit=crop")
}

pub fn campaigns() -> Vec<Campaign> {
    let advertiser = UserId::from_suffix(3);

    vec![
        Campaign {
            id: CampaignId::from_suffix(1),
            name: "Black Friday 2024 - Electronics".to_string(),
            description: Some(
                "Promoção especial Black Friday com até 70% de desconto em eletrônicos".to_string(),
            ),
            status: CampaignStatus::Active,
            category: "Eletrônicos".to_string(),
            budget: 100_000.0,
            spent: 65_000.0,
            revenue: 325_000.0,
            commission_rate: 8.5,
            commission_type: CommissionType::Percentage,
            clicks: 15_420,
            conversions: 1_285,
            conversion_rate: 8.33,
            ctr: 3.2,
            epc: 21.08,
            countries: strings(&["BR", "AR", "CL", "MX"]),
            devices: vec![Device::Desktop, Device::Mobile, Device::Tablet],
            traffic_sources: strings(&["google", "facebook", "instagram", "tiktok"]),
            start_date: ts("2024-11-01T00:00:00Z"),
            end_date: Some(ts("2024-12-01T23:59:59Z")),
            created_at: ts("2024-10-15T00:00:00Z"),
            updated_at: ts("2024-08-24T10:00:00Z"),
            advertiser_id: advertiser.clone(),
            created_by: advertiser.clone(),
            images: vec![
                image("photo-1560472354-b33ff0c44a43", "w=800&h=400"),
                image("photo-1586953208448-b95a79798f07", "w=800&h=400"),
            ],
            banner_url: Some(image("photo-1607082348824-0a96f2a4b9da", "w=1200&h=300")),
            landing_page_url: "https://exemplo-loja.com/black-friday".to_string(),
            is_private: false,
            requires_approval: true,
            max_daily_budget: Some(5_000.0),
        },
        Campaign {
            id: CampaignId::from_suffix(2),
            name: "Curso de Marketing Digital".to_string(),
            description: Some(
                "Curso completo de marketing digital com certificado reconhecido".to_string(),
            ),
            status: CampaignStatus::Active,
            category: "Educação".to_string(),
            budget: 50_000.0,
            spent: 23_000.0,
            revenue: 150_000.0,
            commission_rate: 25.0,
            commission_type: CommissionType::Percentage,
            clicks: 8_930,
            conversions: 567,
            conversion_rate: 6.35,
            ctr: 4.1,
            epc: 16.80,
            countries: strings(&["BR", "PT"]),
            devices: vec![Device::Desktop, Device::Mobile],
            traffic_sources: strings(&["youtube", "google", "facebook"]),
            start_date: ts("2024-08-01T00:00:00Z"),
            end_date: Some(ts("2024-12-31T23:59:59Z")),
            created_at: ts("2024-07-15T00:00:00Z"),
            updated_at: ts("2024-08-23T15:30:00Z"),
            advertiser_id: advertiser.clone(),
            created_by: advertiser.clone(),
            images: vec![image("photo-1516321318423-f06f85e504b3", "w=800&h=400")],
            banner_url: None,
            landing_page_url: "https://cursosdigitais.com/marketing".to_string(),
            is_private: false,
            requires_approval: false,
            max_daily_budget: Some(2_000.0),
        },
        Campaign {
            id: CampaignId::from_suffix(3),
            name: "Produtos de Beleza Premium".to_string(),
            description: Some(
                "Linha completa de cosméticos premium com ingredientes naturais".to_string(),
            ),
            status: CampaignStatus::Paused,
            category: "Beleza e Cuidados".to_string(),
            budget: 75_000.0,
            spent: 41_000.0,
            revenue: 205_000.0,
            commission_rate: 12.0,
            commission_type: CommissionType::Percentage,
            clicks: 12_350,
            conversions: 985,
            conversion_rate: 7.97,
            ctr: 2.8,
            epc: 16.60,
            countries: strings(&["BR"]),
            devices: vec![Device::Mobile, Device::Desktop],
            traffic_sources: strings(&["instagram", "tiktok", "youtube"]),
            start_date: ts("2024-06-01T00:00:00Z"),
            end_date: None,
            created_at: ts("2024-05-15T00:00:00Z"),
            updated_at: ts("2024-08-20T11:20:00Z"),
            advertiser_id: advertiser.clone(),
            created_by: advertiser,
            images: vec![image("photo-1596462502278-27bfdc403348", "w=800&h=400")],
            banner_url: None,
            landing_page_url: "https://belezapremium.com".to_string(),
            is_private: true,
            requires_approval: true,
            max_daily_budget: None,
        },
    ]
}

pub fn conversions() -> Vec<Conversion> {
    vec![
        Conversion {
            id: ConversionId::from_suffix(1),
            campaign_id: CampaignId::from_suffix(1),
            affiliate_id: UserId::from_suffix(2),
            advertiser_id: UserId::from_suffix(3),
            click_id: ClickId::from_suffix(123456),
            transaction_id: Some("tx_789012".to_string()),
            order_id: Some("order_345678".to_string()),
            amount: 299.90,
            currency: "BRL".to_string(),
            commission: 25.49,
            status: ConversionStatus::Approved,
            click_timestamp: ts("2024-08-23T14:30:00Z"),
            conversion_timestamp: ts("2024-08-23T14:45:00Z"),
            customer_country: Some("BR".to_string()),
            customer_device: Device::Mobile,
            customer_os: Some("iOS".to_string()),
            customer_browser: Some("Safari".to_string()),
            referrer: Some("https://instagram.com".to_string()),
            utm_source: Some("instagram".to_string()),
            utm_medium: Some("social".to_string()),
            utm_campaign: Some("blackfriday2024".to_string()),
            created_at: ts("2024-08-23T14:45:00Z"),
            updated_at: ts("2024-08-24T09:00:00Z"),
        },
        Conversion {
            id: ConversionId::from_suffix(2),
            campaign_id: CampaignId::from_suffix(2),
            affiliate_id: UserId::from_suffix(2),
            advertiser_id: UserId::from_suffix(3),
            click_id: ClickId::from_suffix(654321),
            transaction_id: None,
            order_id: None,
            amount: 497.00,
            currency: "BRL".to_string(),
            commission: 124.25,
            status: ConversionStatus::Pending,
            click_timestamp: ts("2024-08-24T10:15:00Z"),
            conversion_timestamp: ts("2024-08-24T10:30:00Z"),
            customer_country: Some("BR".to_string()),
            customer_device: Device::Desktop,
            customer_os: Some("Windows".to_string()),
            customer_browser: Some("Chrome".to_string()),
            referrer: None,
            utm_source: Some("google".to_string()),
            utm_medium: Some("search".to_string()),
            utm_campaign: Some("marketing-curso".to_string()),
            created_at: ts("2024-08-24T10:30:00Z"),
            updated_at: ts("2024-08-24T10:30:00Z"),
        },
    ]
}

fn utm(campaign: &str) -> UtmParams {
    UtmParams {
        source: Some("vibe".to_string()),
        medium: Some("affiliate".to_string()),
        campaign: Some(campaign.to_string()),
        content: Some("user_2".to_string()),
        term: None,
    }
}

pub fn links() -> Vec<AffiliateLink> {
    vec![
        AffiliateLink {
            id: LinkId::from_suffix(1),
            campaign_id: CampaignId::from_suffix(1),
            affiliate_id: UserId::from_suffix(2),
            short_url: "https://vibe.ly/bf2024".to_string(),
            original_url: "https://exemplo-loja.com/black-friday?aff=user_2&camp=camp_1"
                .to_string(),
            slug: Some("bf2024".to_string()),
            clicks: 5_420,
            unique_clicks: 4_890,
            conversions: 425,
            is_active: true,
            expires_at: None,
            utm_params: utm("blackfriday2024"),
            created_at: ts("2024-11-01T00:00:00Z"),
            updated_at: ts("2024-08-24T08:00:00Z"),
        },
        AffiliateLink {
            id: LinkId::from_suffix(2),
            campaign_id: CampaignId::from_suffix(2),
            affiliate_id: UserId::from_suffix(2),
            short_url: "https://vibe.ly/marketing-curso".to_string(),
            original_url: "https://cursosdigitais.com/marketing?aff=user_2&camp=camp_2"
                .to_string(),
            slug: None,
            clicks: 2_180,
            unique_clicks: 1_950,
            conversions: 145,
            is_active: true,
            expires_at: None,
            utm_params: utm("marketing-digital"),
            created_at: ts("2024-08-01T00:00:00Z"),
            updated_at: ts("2024-08-24T07:30:00Z"),
        },
    ]
}

pub fn payment_methods() -> Vec<PaymentMethod> {
    vec![PaymentMethod {
        id: PaymentMethodId::from_suffix(1),
        user_id: UserId::from_suffix(2),
        kind: PaymentMethodType::Pix,
        details: BTreeMap::from([("key".to_string(), "affiliate@example.com".to_string())]),
        is_default: true,
        is_verified: true,
        created_at: ts("2024-02-15T00:00:00Z"),
        updated_at: ts("2024-02-15T00:00:00Z"),
    }]
}

fn campaign_performance(
    n: u32,
    name: &str,
    revenue: f64,
    conversions: u64,
    clicks: u64,
    conversion_rate: f64,
) -> CampaignPerformance {
    CampaignPerformance {
        campaign_id: CampaignId::from_suffix(n),
        campaign_name: name.to_string(),
        revenue,
        conversions,
        clicks,
        conversion_rate,
    }
}

fn country(code: &str, name: &str, revenue: f64, conversions: u64, clicks: u64) -> CountryPerformance {
    CountryPerformance {
        country: code.to_string(),
        country_name: name.to_string(),
        revenue,
        conversions,
        clicks,
    }
}

pub fn dashboard_metrics() -> DashboardMetrics {
    DashboardMetrics {
        period: MetricsPeriod {
            start: ts("2024-08-17T00:00:00Z"),
            end: ts("2024-08-24T23:59:59Z"),
        },
        total_revenue: 125_487.50,
        total_commissions: 15_685.94,
        total_clicks: 28_450,
        total_conversions: 1_856,
        conversion_rate: 6.52,
        click_through_rate: 3.8,
        average_order_value: 67.60,
        earnings_per_click: 0.55,
        growth: Growth {
            revenue: 18.5,
            commissions: 22.3,
            clicks: 15.7,
            conversions: 12.4,
        },
        top_campaigns: vec![
            campaign_performance(1, "Black Friday 2024 - Electronics", 75_250.00, 1_120, 18_420, 6.08),
            campaign_performance(2, "Curso de Marketing Digital", 35_180.50, 485, 7_200, 6.74),
            campaign_performance(3, "Produtos de Beleza Premium", 15_057.00, 251, 2_830, 8.87),
        ],
        top_affiliates: vec![AffiliatePerformance {
            affiliate_id: UserId::from_suffix(2),
            affiliate_name: "João Silva".to_string(),
            revenue: 89_420.50,
            conversions: 1_285,
            commissions: 11_226.67,
        }],
        top_countries: vec![
            country("BR", "Brasil", 98_750.25, 1_456, 22_180),
            country("AR", "Argentina", 15_420.50, 285, 4_120),
            country("CL", "Chile", 8_950.75, 115, 2_150),
        ],
    }
}
