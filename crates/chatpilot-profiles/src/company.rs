//! Retail or product company profile.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::business::{BusinessInfo, HeaderLabels, WeeklyHours, joined, line, title};

const LABELS: HeaderLabels = HeaderLabels {
    name: "Company",
    category: "Industry",
    since: "Founded",
};

/// A company selling products, with shipping and support details.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompanyProfile {
    #[serde(rename = "company")]
    pub info: BusinessInfo,
    pub products: Vec<Product>,
    pub shipping: ShippingPolicy,
    pub support: SupportDesk,
    pub mission: String,
    pub values: Vec<String>,
    pub awards: Vec<String>,
    pub hours: WeeklyHours,
}

/// A product line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Product {
    pub name: String,
    pub description: String,
    pub price_range: String,
    pub features: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShippingPolicy {
    pub standard: String,
    pub express: String,
    pub international: String,
    pub free_shipping_threshold: String,
    pub return_policy: String,
    pub warranty: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SupportDesk {
    pub hours: String,
    pub email: String,
    pub phone: String,
    pub live_chat: String,
    pub response_time: String,
}

impl CompanyProfile {
    /// Formats the profile as prompt context.
    pub fn to_context(&self) -> String {
        let mut out = String::new();
        self.info.write_header(&mut out, LABELS);
        out.push('\n');

        title(&mut out, "Products & Services");
        for product in &self.products {
            let _ = writeln!(
                out,
                "- {}: {} ({})\n   Features: {}",
                product.name,
                product.description,
                product.price_range,
                joined(&product.features),
            );
        }
        out.push('\n');

        let shipping = &self.shipping;
        title(&mut out, "Shipping Information");
        line(&mut out, "- Standard", &shipping.standard);
        line(&mut out, "- Express", &shipping.express);
        line(&mut out, "- International", &shipping.international);
        let _ = writeln!(
            out,
            "- Free shipping on orders over {}",
            shipping.free_shipping_threshold
        );
        line(&mut out, "- Return Policy", &shipping.return_policy);
        line(&mut out, "- Warranty", &shipping.warranty);
        out.push('\n');

        let support = &self.support;
        title(&mut out, "Customer Support");
        line(&mut out, "- Hours", &support.hours);
        line(&mut out, "- Email", &support.email);
        line(&mut out, "- Phone", &support.phone);
        line(&mut out, "- Response Time", &support.response_time);
        out.push('\n');

        line(&mut out, "Mission", &self.mission);
        out.push('\n');
        line(&mut out, "Company Values", joined(&self.values));
        out.push('\n');

        title(&mut out, "Business Hours");
        self.hours.write_lines(&mut out);

        out.trim().to_owned()
    }
}
