//! Value Object Module

pub mod campaign_status;
pub mod commission_type;
pub mod conversion_status;
pub mod device;
pub mod email;
pub mod payment_status;
pub mod user_role;

pub use campaign_status::CampaignStatus;
pub use commission_type::CommissionType;
pub use conversion_status::ConversionStatus;
pub use device::Device;
pub use email::Email;
pub use payment_status::PaymentStatus;
pub use user_role::UserRole;
