//! Input Forms
//!
//! Request bodies submitted by the dashboard. Each `validate()` sanitizes
//! free text, then checks every field and reports all failures at once as
//! [`AffiliateError::Validation`].

use chrono::{DateTime, Utc};
use platform::password::ClearTextPassword;
use platform::sanitize::{sanitize_optional, sanitize_string};
use platform::url_guard::validate_url;
use serde::Deserialize;

use crate::domain::entity::{Campaign, CampaignDraft, CampaignPatch, ProfileUpdate};
use crate::domain::value_object::{CampaignStatus, CommissionType, Email, UserRole};
use crate::error::{AffiliateError, AffiliateResult, FieldError};

const NAME_MIN_CHARS: usize = 2;
const NAME_MAX_CHARS: usize = 100;
const CAMPAIGN_NAME_MAX_CHARS: usize = 200;
const DESCRIPTION_MAX_CHARS: usize = 2000;
const BIO_MAX_CHARS: usize = 500;
const PHONE_MIN_DIGITS: usize = 8;
const PHONE_MAX_CHARS: usize = 20;

/// Collects field failures while a form is checked
#[derive(Debug, Default)]
struct Violations(Vec<FieldError>);

impl Violations {
    fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError::new(field, message));
    }

    fn check(&mut self, ok: bool, field: &'static str, message: &str) {
        if !ok {
            self.push(field, message);
        }
    }

    fn finish<T>(self, value: T) -> AffiliateResult<T> {
        if self.0.is_empty() {
            Ok(value)
        } else {
            Err(AffiliateError::Validation(self.0))
        }
    }
}

fn char_len(value: &str) -> usize {
    value.chars().count()
}

fn person_name(value: &str, violations: &mut Violations) -> String {
    let name = sanitize_string(value);
    let len = char_len(&name);
    violations.check(
        (NAME_MIN_CHARS..=NAME_MAX_CHARS).contains(&len),
        "name",
        "Name must be between 2 and 100 characters",
    );
    name
}

fn email(value: &str, violations: &mut Violations) -> Option<Email> {
    match Email::new(value) {
        Ok(email) => Some(email),
        Err(err) => {
            violations.push("email", err.message());
            None
        }
    }
}

fn public_url(field: &'static str, value: &str, violations: &mut Violations) {
    if let Err(rejection) = validate_url(value, &[]) {
        violations.push(field, rejection.to_string());
    }
}

/// ISO 3166-1 alpha-2 code, upper-cased
fn country_code(value: &str) -> Option<String> {
    let code = value.trim();
    (code.len() == 2 && code.chars().all(|c| c.is_ascii_alphabetic()))
        .then(|| code.to_ascii_uppercase())
}

fn countries(values: &[String], violations: &mut Violations) -> Vec<String> {
    let codes: Vec<String> = values.iter().filter_map(|c| country_code(c)).collect();
    violations.check(
        codes.len() == values.len(),
        "countries",
        "Countries must be two-letter ISO codes",
    );
    codes
}

fn commission_rate(rate: f64, kind: CommissionType, violations: &mut Violations) {
    let ok = match kind {
        CommissionType::Percentage => rate.is_finite() && (0.0..=100.0).contains(&rate),
        CommissionType::Fixed => rate.is_finite() && rate >= 0.0,
    };
    violations.check(ok, "commissionRate", match kind {
        CommissionType::Percentage => "Commission rate must be between 0 and 100",
        CommissionType::Fixed => "Commission must not be negative",
    });
}

fn non_negative(value: f64, field: &'static str, message: &str, violations: &mut Violations) {
    violations.check(value.is_finite() && value >= 0.0, field, message);
}

// ============================================================================
// Login
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub remember_me: bool,
}

/// Login credentials with a well-formed email
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    pub email: Email,
    pub password: String,
    pub remember_me: bool,
}

impl LoginForm {
    /// Only shape is checked; the password policy applies at registration
    pub fn validate(&self) -> AffiliateResult<LoginCredentials> {
        let mut violations = Violations::default();

        let email = email(&self.email, &mut violations);
        violations.check(!self.password.is_empty(), "password", "Password is required");

        match email {
            Some(email) => violations.finish(LoginCredentials {
                email,
                password: self.password.clone(),
                remember_me: self.remember_me,
            }),
            None => Err(AffiliateError::Validation(violations.0)),
        }
    }
}

// ============================================================================
// Register
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default)]
    pub accept_terms: bool,
}

/// Registration that passed every check
#[derive(Debug)]
pub struct Registration {
    pub name: String,
    pub email: Email,
    pub password: ClearTextPassword,
    pub role: UserRole,
}

impl RegisterForm {
    pub fn validate(&self) -> AffiliateResult<Registration> {
        let mut violations = Violations::default();

        let name = person_name(&self.name, &mut violations);
        let email = email(&self.email, &mut violations);

        let password = match ClearTextPassword::new(self.password.clone()) {
            Ok(password) => Some(password),
            Err(err) => {
                violations.push("password", err.to_string());
                None
            }
        };
        violations.check(
            self.password == self.confirm_password,
            "confirmPassword",
            "Passwords do not match",
        );
        violations.check(
            self.role.is_self_service(),
            "role",
            "Role cannot be chosen at registration",
        );
        violations.check(self.accept_terms, "acceptTerms", "Terms must be accepted");

        match (email, password) {
            (Some(email), Some(password)) => violations.finish(Registration {
                name,
                email,
                password,
                role: self.role,
            }),
            _ => Err(AffiliateError::Validation(violations.0)),
        }
    }
}

// ============================================================================
// Campaigns
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCampaignForm {
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub landing_page_url: String,
    pub budget: f64,
    pub commission_rate: f64,
    #[serde(default)]
    pub commission_type: CommissionType,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub countries: Vec<String>,
    pub requires_approval: Option<bool>,
}

impl CreateCampaignForm {
    pub fn validate(&self) -> AffiliateResult<CampaignDraft> {
        let mut violations = Violations::default();

        let name = sanitize_string(&self.name);
        violations.check(!name.is_empty(), "name", "Name is required");
        violations.check(
            char_len(&name) <= CAMPAIGN_NAME_MAX_CHARS,
            "name",
            "Name must be at most 200 characters",
        );

        let description = sanitize_optional(self.description.as_deref());
        violations.check(
            description
                .as_deref()
                .is_none_or(|d| char_len(d) <= DESCRIPTION_MAX_CHARS),
            "description",
            "Description must be at most 2000 characters",
        );

        let category = sanitize_string(&self.category);
        violations.check(!category.is_empty(), "category", "Category is required");

        let landing_page_url = self.landing_page_url.trim().to_string();
        public_url("landingPageUrl", &landing_page_url, &mut violations);

        non_negative(self.budget, "budget", "Budget must not be negative", &mut violations);
        commission_rate(self.commission_rate, self.commission_type, &mut violations);

        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            violations.check(end >= start, "endDate", "End date must not be before start date");
        }

        let countries = countries(&self.countries, &mut violations);

        violations.finish(CampaignDraft {
            name: Some(name),
            description,
            category: Some(category),
            budget: Some(self.budget),
            commission_rate: Some(self.commission_rate),
            commission_type: Some(self.commission_type),
            countries: (!countries.is_empty()).then_some(countries),
            start_date: self.start_date,
            end_date: self.end_date,
            landing_page_url: Some(landing_page_url),
            requires_approval: self.requires_approval,
            ..Default::default()
        })
    }
}

/// Partial campaign edit; only present fields are checked
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCampaignForm {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<CampaignStatus>,
    pub category: Option<String>,
    pub landing_page_url: Option<String>,
    pub budget: Option<f64>,
    pub commission_rate: Option<f64>,
    pub commission_type: Option<CommissionType>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub countries: Option<Vec<String>>,
    pub is_private: Option<bool>,
    pub requires_approval: Option<bool>,
    pub max_daily_budget: Option<f64>,
}

impl UpdateCampaignForm {
    /// Check the patch against the campaign it applies to
    ///
    /// Rate and type, and start and end dates, are checked as pairs after
    /// merging with `current`, so changing one side alone cannot leave the
    /// stored campaign inconsistent.
    pub fn validate(&self, current: &Campaign) -> AffiliateResult<CampaignPatch> {
        let mut violations = Violations::default();

        let name = self.name.as_deref().map(sanitize_string);
        if let Some(name) = &name {
            violations.check(!name.is_empty(), "name", "Name cannot be empty");
            violations.check(
                char_len(name) <= CAMPAIGN_NAME_MAX_CHARS,
                "name",
                "Name must be at most 200 characters",
            );
        }

        let description = self.description.as_deref().map(sanitize_string);
        violations.check(
            description
                .as_deref()
                .is_none_or(|d| char_len(d) <= DESCRIPTION_MAX_CHARS),
            "description",
            "Description must be at most 2000 characters",
        );

        let category = self.category.as_deref().map(sanitize_string);
        violations.check(
            category.as_deref().is_none_or(|c| !c.is_empty()),
            "category",
            "Category cannot be empty",
        );

        let landing_page_url = self.landing_page_url.as_deref().map(str::trim);
        if let Some(url) = landing_page_url {
            public_url("landingPageUrl", url, &mut violations);
        }

        if let Some(budget) = self.budget {
            non_negative(budget, "budget", "Budget must not be negative", &mut violations);
        }
        if let Some(max) = self.max_daily_budget {
            non_negative(max, "maxDailyBudget", "Daily budget must not be negative", &mut violations);
        }
        if self.commission_rate.is_some() || self.commission_type.is_some() {
            commission_rate(
                self.commission_rate.unwrap_or(current.commission_rate),
                self.commission_type.unwrap_or(current.commission_type),
                &mut violations,
            );
        }
        if self.start_date.is_some() || self.end_date.is_some() {
            let start = self.start_date.unwrap_or(current.start_date);
            if let Some(end) = self.end_date.or(current.end_date) {
                violations.check(end >= start, "endDate", "End date must not be before start date");
            }
        }

        let countries = self
            .countries
            .as_deref()
            .map(|values| countries(values, &mut violations));

        violations.finish(CampaignPatch {
            name,
            description,
            status: self.status,
            category,
            budget: self.budget,
            commission_rate: self.commission_rate,
            commission_type: self.commission_type,
            countries,
            start_date: self.start_date,
            end_date: self.end_date,
            landing_page_url: landing_page_url.map(str::to_string),
            is_private: self.is_private,
            requires_approval: self.requires_approval,
            max_daily_budget: self.max_daily_budget,
            ..Default::default()
        })
    }
}

// ============================================================================
// Profile
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileForm {
    pub name: String,
    pub bio: Option<String>,
    pub website: Option<String>,
    pub company: Option<String>,
    pub phone: Option<String>,
    pub country: Option<String>,
}

fn is_phone(value: &str) -> bool {
    let digits = value.chars().filter(char::is_ascii_digit).count();
    value.len() <= PHONE_MAX_CHARS
        && digits >= PHONE_MIN_DIGITS
        && value
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | ' ' | '(' | ')'))
}

impl UpdateProfileForm {
    pub fn validate(&self) -> AffiliateResult<ProfileUpdate> {
        let mut violations = Violations::default();

        let name = person_name(&self.name, &mut violations);

        let bio = sanitize_optional(self.bio.as_deref());
        violations.check(
            bio.as_deref().is_none_or(|b| char_len(b) <= BIO_MAX_CHARS),
            "bio",
            "Bio must be at most 500 characters",
        );

        let website = self
            .website
            .as_deref()
            .map(str::trim)
            .filter(|w| !w.is_empty())
            .map(str::to_string);
        if let Some(url) = &website {
            public_url("website", url, &mut violations);
        }

        let company = sanitize_optional(self.company.as_deref());

        let phone = sanitize_optional(self.phone.as_deref());
        violations.check(
            phone.as_deref().is_none_or(is_phone),
            "phone",
            "Phone number is invalid",
        );

        let country = match self.country.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
            Some(raw) => {
                let code = country_code(raw);
                violations.check(code.is_some(), "country", "Country must be a two-letter ISO code");
                code
            }
            None => None,
        };

        violations.finish(ProfileUpdate {
            name,
            bio,
            website,
            company,
            phone,
            country,
        })
    }
}
