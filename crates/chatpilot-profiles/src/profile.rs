//! Selection and loading of business profiles.

use chatpilot_core::{Error, Result};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

use crate::{
    CompanyProfile, ContextProvider, HealthcareProfile, RealEstateProfile, RestaurantProfile,
    TRACING_TARGET,
};

/// The kinds of business profile, each with bundled sample data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize)]
#[derive(AsRefStr, Display, EnumIter, EnumString, IntoStaticStr)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum ProfileKind {
    Company,
    Healthcare,
    #[strum(to_string = "real-estate", serialize = "real_estate", serialize = "realestate")]
    RealEstate,
    Restaurant,
}

impl ProfileKind {
    /// Returns the bundled sample data as JSON.
    pub fn sample_json(self) -> &'static str {
        match self {
            Self::Company => include_str!("../data/company.json"),
            Self::Healthcare => include_str!("../data/healthcare.json"),
            Self::RealEstate => include_str!("../data/real-estate.json"),
            Self::Restaurant => include_str!("../data/restaurant.json"),
        }
    }
}

/// A loaded business profile of any kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Profile {
    Company(CompanyProfile),
    Healthcare(HealthcareProfile),
    RealEstate(RealEstateProfile),
    Restaurant(RestaurantProfile),
}

impl Profile {
    /// Loads the bundled sample profile for `kind`.
    pub fn sample(kind: ProfileKind) -> Result<Self> {
        Self::from_json(kind, kind.sample_json())
    }

    /// Parses a profile of the given kind from JSON.
    ///
    /// Unknown keys are ignored and missing ones default to empty.
    pub fn from_json(kind: ProfileKind, json: &str) -> Result<Self> {
        let profile = match kind {
            ProfileKind::Company => Self::Company(parse(kind, json)?),
            ProfileKind::Healthcare => Self::Healthcare(parse(kind, json)?),
            ProfileKind::RealEstate => Self::RealEstate(parse(kind, json)?),
            ProfileKind::Restaurant => Self::Restaurant(parse(kind, json)?),
        };

        tracing::debug!(
            target: TRACING_TARGET,
            profile = %kind,
            name = %profile.name(),
            "Loaded business profile"
        );

        Ok(profile)
    }

    /// Returns the kind of this profile.
    pub fn kind(&self) -> ProfileKind {
        match self {
            Self::Company(_) => ProfileKind::Company,
            Self::Healthcare(_) => ProfileKind::Healthcare,
            Self::RealEstate(_) => ProfileKind::RealEstate,
            Self::Restaurant(_) => ProfileKind::Restaurant,
        }
    }

    /// Returns the business name.
    pub fn name(&self) -> &str {
        match self {
            Self::Company(p) => &p.info.name,
            Self::Healthcare(p) => &p.info.name,
            Self::RealEstate(p) => &p.info.name,
            Self::Restaurant(p) => &p.info.name,
        }
    }

    /// Formats the profile as prompt context.
    pub fn to_context(&self) -> String {
        match self {
            Self::Company(p) => p.to_context(),
            Self::Healthcare(p) => p.to_context(),
            Self::RealEstate(p) => p.to_context(),
            Self::Restaurant(p) => p.to_context(),
        }
    }
}

fn parse<T>(kind: ProfileKind, json: &str) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    serde_json::from_str(json).map_err(|e| {
        Error::from(e).with_context(format!("profile={kind}"))
    })
}

impl ContextProvider for Profile {
    fn context(&self) -> String {
        self.to_context()
    }
}

macro_rules! impl_context_provider {
    ($($profile:ty),+ $(,)?) => {
        $(
            impl ContextProvider for $profile {
                fn context(&self) -> String {
                    self.to_context()
                }
            }
        )+
    };
}

impl_context_provider!(
    CompanyProfile,
    HealthcareProfile,
    RealEstateProfile,
    RestaurantProfile,
);
