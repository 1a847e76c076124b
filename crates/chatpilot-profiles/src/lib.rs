#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod business;
mod company;
mod context;
mod healthcare;
mod profile;
mod real_estate;
mod restaurant;

pub use business::{BusinessInfo, BusinessInfoBuilder, BusinessInfoBuilderError};
pub use business::{NamedEntry, WeeklyHours};
pub use company::{CompanyProfile, Product, ShippingPolicy, SupportDesk};
pub use context::{ContextProvider, FnContext, from_fn};
pub use healthcare::{
    Appointments, EmergencyContacts, HealthResources, HealthcareProfile, Insurance,
    MedicalServices, PaymentOptions, Physician, SafetyMeasures, Scheduling,
};
pub use profile::{Profile, ProfileKind};
pub use real_estate::{
    Agent, AgencyServices, Community, Financing, MarketReport, MarketStats, Property,
    RealEstateProfile,
};
pub use restaurant::{
    Dietary, DiningServices, Menu, MenuItem, Reservations, RestaurantProfile,
};

/// Tracing target for profile loading.
pub const TRACING_TARGET: &str = "chatpilot_profiles";
