//! Restaurant profile.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::business::{
    BusinessInfo, HeaderLabels, NamedEntry, WeeklyHours, entries, joined, line, title,
};

const LABELS: HeaderLabels = HeaderLabels {
    name: "Restaurant",
    category: "Cuisine",
    since: "Established",
};

/// A restaurant with its menu, reservations and services.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RestaurantProfile {
    #[serde(rename = "restaurant")]
    pub info: BusinessInfo,
    pub menu: Menu,
    pub hours: WeeklyHours,
    pub reservations: Reservations,
    pub services: DiningServices,
    pub dietary: Dietary,
    pub awards: Vec<String>,
    /// Promotions keyed by a short name, kept in document order.
    #[serde(with = "entries")]
    pub events: Vec<NamedEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Menu {
    pub appetizers: Vec<MenuItem>,
    pub main_courses: Vec<MenuItem>,
    pub desserts: Vec<MenuItem>,
    pub beverages: Vec<MenuItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MenuItem {
    pub name: String,
    pub description: String,
    pub price: String,
    pub allergens: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Reservations {
    pub required: String,
    pub phone: String,
    pub online: String,
    pub group_size: String,
    pub advance_notice: String,
    pub cancellation: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DiningServices {
    pub delivery: String,
    pub takeout: String,
    pub catering: String,
    pub private_events: String,
    pub wine_pairing: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Dietary {
    pub vegetarian: String,
    pub vegan: String,
    pub gluten_free: String,
    pub dairy_free: String,
    pub nut_free: String,
}

fn write_menu_section(out: &mut String, heading: &str, items: &[MenuItem]) {
    title(out, heading);
    for item in items {
        let _ = writeln!(out, "- {}: {} ({})", item.name, item.description, item.price);
    }
}

impl RestaurantProfile {
    /// Formats the profile as prompt context.
    ///
    /// Beverages are not listed; the allergy line is fixed text.
    pub fn to_context(&self) -> String {
        let mut out = String::new();
        self.info.write_header(&mut out, LABELS);
        out.push('\n');

        title(&mut out, "Menu Highlights");
        write_menu_section(&mut out, "Appetizers", &self.menu.appetizers);
        out.push('\n');
        write_menu_section(&mut out, "Main Courses", &self.menu.main_courses);
        out.push('\n');
        write_menu_section(&mut out, "Desserts", &self.menu.desserts);
        out.push('\n');

        title(&mut out, "Operating Hours");
        self.hours.write_lines(&mut out);
        out.push('\n');

        let reservations = &self.reservations;
        title(&mut out, "Reservations");
        line(&mut out, "- Required", &reservations.required);
        line(&mut out, "- Phone", &reservations.phone);
        line(&mut out, "- Online", &reservations.online);
        line(&mut out, "- Group Size", &reservations.group_size);
        out.push('\n');

        let services = &self.services;
        title(&mut out, "Services");
        line(&mut out, "- Delivery", &services.delivery);
        line(&mut out, "- Takeout", &services.takeout);
        line(&mut out, "- Catering", &services.catering);
        line(&mut out, "- Private Events", &services.private_events);
        out.push('\n');

        title(&mut out, "Dietary Accommodations");
        line(&mut out, "- Vegetarian", &self.dietary.vegetarian);
        line(&mut out, "- Gluten-Free", &self.dietary.gluten_free);
        out.push_str("- Allergies: Kitchen can accommodate various allergies\n");
        out.push('\n');

        title(&mut out, "Special Events");
        for event in &self.events {
            line(&mut out, &format!("- {}", event.key), &event.description);
        }
        out.push('\n');

        line(&mut out, "Awards", joined(&self.awards));

        out.trim().to_owned()
    }
}
