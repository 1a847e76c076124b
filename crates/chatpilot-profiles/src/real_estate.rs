//! Real estate agency profile.

use std::fmt::{self, Write as _};

use serde::{Deserialize, Serialize};

use crate::business::{BusinessInfo, HeaderLabels, WeeklyHours, bullets, joined, line, title};

const LABELS: HeaderLabels = HeaderLabels {
    name: "Agency",
    category: "Type",
    since: "Established",
};

/// Shown in place of a missing or zero count.
const NOT_AVAILABLE: &str = "N/A";

/// A real estate agency with listings, agents and market figures.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RealEstateProfile {
    #[serde(rename = "agency")]
    pub info: BusinessInfo,
    pub services: AgencyServices,
    pub featured_properties: Vec<Property>,
    pub agents: Vec<Agent>,
    pub market: MarketReport,
    pub hours: WeeklyHours,
    pub financing: Financing,
    pub awards: Vec<String>,
    pub community: Community,
    pub technology: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AgencyServices {
    pub residential: Vec<String>,
    pub commercial: Vec<String>,
    pub additional: Vec<String>,
}

/// A listed property. Commercial listings usually carry no bed or bath count.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Property {
    #[serde(rename = "type")]
    pub kind: String,
    pub address: String,
    pub price: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub beds: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baths: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sqft: Option<u32>,
    pub features: Vec<String>,
    pub status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Agent {
    pub name: String,
    pub title: String,
    pub experience: String,
    pub specialties: Vec<String>,
    pub phone: String,
    pub email: String,
    pub languages: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MarketReport {
    pub current_trends: Vec<String>,
    pub market_stats: MarketStats,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MarketStats {
    pub average_days_on_market: String,
    pub average_sale_price: String,
    pub inventory_level: String,
    pub price_appreciation: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Financing {
    pub partners: Vec<String>,
    pub services: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Community {
    pub sponsorships: Vec<String>,
    pub expertise: Vec<String>,
}

/// Displays a count, or `N/A` when it is missing or zero.
struct Count<T>(Option<T>);

impl<T> fmt::Display for Count<T>
where
    T: fmt::Display + Default + PartialEq,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(value) if *value != T::default() => fmt::Display::fmt(value, f),
            _ => f.write_str(NOT_AVAILABLE),
        }
    }
}

impl Property {
    fn write_line(&self, out: &mut String) {
        let _ = writeln!(
            out,
            "- {}: {} - {} ({} beds, {} baths, {} sqft)",
            self.kind,
            self.address,
            self.price,
            Count(self.beds),
            Count(self.baths),
            Count(self.sqft),
        );
    }
}

impl RealEstateProfile {
    /// Formats the profile as prompt context.
    ///
    /// Agent entries are separated by a blank line; every other list is
    /// one line per item.
    pub fn to_context(&self) -> String {
        let mut out = String::new();
        self.info.write_header(&mut out, LABELS);
        out.push('\n');

        title(&mut out, "Services");
        title(&mut out, "Residential Services");
        bullets(&mut out, &self.services.residential);
        out.push('\n');
        title(&mut out, "Commercial Services");
        bullets(&mut out, &self.services.commercial);
        out.push('\n');

        title(&mut out, "Featured Properties");
        for property in &self.featured_properties {
            property.write_line(&mut out);
        }
        out.push('\n');

        title(&mut out, "Real Estate Agents");
        for (index, agent) in self.agents.iter().enumerate() {
            if index > 0 {
                out.push('\n');
            }
            let _ = writeln!(
                out,
                "- {}, {} ({})\n   Specialties: {}\n   Contact: {} | {}",
                agent.name,
                agent.title,
                agent.experience,
                joined(&agent.specialties),
                agent.phone,
                agent.email,
            );
        }
        out.push('\n');

        let market = &self.market;
        title(&mut out, "Market Information");
        title(&mut out, "Current Trends");
        bullets(&mut out, &market.current_trends);
        out.push('\n');

        let stats = &market.market_stats;
        title(&mut out, "Market Statistics");
        line(&mut out, "- Average Days on Market", &stats.average_days_on_market);
        line(&mut out, "- Average Sale Price", &stats.average_sale_price);
        line(&mut out, "- Inventory Level", &stats.inventory_level);
        line(&mut out, "- Price Appreciation", &stats.price_appreciation);
        out.push('\n');

        title(&mut out, "Operating Hours");
        self.hours.write_lines(&mut out);
        out.push('\n');

        title(&mut out, "Financing Partners");
        let _ = writeln!(out, "{}\n", joined(&self.financing.partners));
        title(&mut out, "Financing Services");
        bullets(&mut out, &self.financing.services);
        out.push('\n');

        title(&mut out, "Technology & Tools");
        bullets(&mut out, &self.technology);
        out.push('\n');

        line(&mut out, "Awards", joined(&self.awards));
        out.push('\n');

        title(&mut out, "Community Involvement");
        bullets(&mut out, &self.community.sponsorships);

        out.trim().to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RealEstateProfile {
        serde_json::from_str(include_str!("../data/real-estate.json")).unwrap()
    }

    #[test]
    fn sample_matches_template_output() {
        assert_eq!(
            sample().to_context(),
            include_str!("../fixtures/real-estate.txt")
        );
    }

    #[test]
    fn missing_and_zero_counts_show_not_available() {
        let property = Property {
            kind: "Lot".into(),
            address: "1 Field".into(),
            price: "$10".into(),
            beds: Some(0),
            baths: None,
            sqft: None,
            ..Default::default()
        };

        let mut out = String::new();
        property.write_line(&mut out);
        assert_eq!(out, "- Lot: 1 Field - $10 (N/A beds, N/A baths, N/A sqft)\n");
    }

    #[test]
    fn fractional_baths() {
        let property = Property {
            kind: "Townhouse".into(),
            address: "2 Row".into(),
            price: "$1".into(),
            beds: Some(3),
            baths: Some(2.5),
            sqft: Some(1500),
            ..Default::default()
        };

        let mut out = String::new();
        property.write_line(&mut out);
        assert_eq!(
            out,
            "- Townhouse: 2 Row - $1 (3 beds, 2.5 baths, 1500 sqft)\n"
        );
    }

    #[test]
    fn single_agent_has_no_separator() {
        let mut profile = sample();
        profile.agents.truncate(1);

        let context = profile.to_context();
        assert!(context.contains(
            "Contact: +1 (555) 321-0987 ext 101 | jennifer@premierrealestate.com\n\nMarket Information:"
        ));
    }
}
