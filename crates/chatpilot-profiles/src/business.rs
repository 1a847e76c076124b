//! Building blocks shared by every profile: the business identity header,
//! weekly opening hours and the small text helpers used by the formatters.

use std::fmt::{self, Write as _};

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Identity block at the top of every profile.
///
/// The JSON key for `category` differs per profile (`industry`, `type`,
/// `cuisine`), as does the key for `since` (`founded`, `established`); all of
/// them are accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Builder)]
#[builder(
    name = "BusinessInfoBuilder",
    pattern = "owned",
    setter(into, prefix = "with"),
    build_fn(validate = "Self::validate_info")
)]
#[serde(default)]
pub struct BusinessInfo {
    /// Business name.
    pub name: String,
    /// Industry, practice type or cuisine.
    #[builder(default)]
    #[serde(alias = "industry", alias = "type", alias = "cuisine")]
    pub category: String,
    /// Founding year.
    #[builder(default)]
    #[serde(alias = "founded", alias = "established")]
    pub since: String,
    /// Public website.
    #[builder(default)]
    pub website: String,
    /// Contact email.
    #[builder(default)]
    pub email: String,
    /// Contact phone.
    #[builder(default)]
    pub phone: String,
    /// Street address.
    #[builder(default)]
    pub address: String,
    /// One-paragraph description.
    #[builder(default)]
    pub description: String,
}

impl BusinessInfo {
    /// Creates a new builder.
    pub fn builder() -> BusinessInfoBuilder {
        BusinessInfoBuilder::default()
    }

    /// Writes the labelled header block followed by the description.
    ///
    /// `labels` names the name, category and founding lines, e.g.
    /// `("Company", "Industry", "Founded")`.
    pub(crate) fn write_header(&self, out: &mut String, labels: HeaderLabels) {
        let HeaderLabels {
            name,
            category,
            since,
        } = labels;

        line(out, name, &self.name);
        line(out, category, &self.category);
        line(out, since, &self.since);
        line(out, "Website", &self.website);
        line(out, "Email", &self.email);
        line(out, "Phone", &self.phone);
        line(out, "Address", &self.address);
        out.push('\n');
        line(out, "Description", &self.description);
    }
}

impl BusinessInfoBuilder {
    fn validate_info(&self) -> Result<(), String> {
        match &self.name {
            Some(name) if !name.trim().is_empty() => Ok(()),
            _ => Err("Business name must not be empty".to_string()),
        }
    }
}

/// Labels for the first three header lines.
#[derive(Debug, Clone, Copy)]
pub(crate) struct HeaderLabels {
    pub name: &'static str,
    pub category: &'static str,
    pub since: &'static str,
}

/// Opening hours per weekday. Missing days are left out of the output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeeklyHours {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monday: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tuesday: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wednesday: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thursday: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub friday: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saturday: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sunday: Option<String>,
}

impl WeeklyHours {
    /// Uniform hours for Monday to Friday, with the weekend left as given.
    pub fn weekdays(
        hours: impl Into<String>,
        saturday: Option<String>,
        sunday: Option<String>,
    ) -> Self {
        let hours = hours.into();
        Self {
            monday: Some(hours.clone()),
            tuesday: Some(hours.clone()),
            wednesday: Some(hours.clone()),
            thursday: Some(hours.clone()),
            friday: Some(hours),
            saturday,
            sunday,
        }
    }

    /// Iterates `(day, hours)` pairs from Monday to Sunday, skipping unset days.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("Monday", &self.monday),
            ("Tuesday", &self.tuesday),
            ("Wednesday", &self.wednesday),
            ("Thursday", &self.thursday),
            ("Friday", &self.friday),
            ("Saturday", &self.saturday),
            ("Sunday", &self.sunday),
        ]
        .into_iter()
        .filter_map(|(day, hours)| hours.as_deref().map(|hours| (day, hours)))
    }

    /// Writes one `Day: hours` line per set day.
    pub(crate) fn write_lines(&self, out: &mut String) {
        for (day, hours) in self.iter() {
            line(out, day, hours);
        }
    }
}

/// A key/description pair read from a JSON object, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedEntry {
    pub key: String,
    pub description: String,
}

/// Serde adapter storing `Vec<NamedEntry>` as a JSON object, keeping the
/// order in which keys appear.
pub(crate) mod entries {
    use std::fmt;

    use serde::de::{MapAccess, Visitor};
    use serde::ser::SerializeMap;
    use serde::{Deserializer, Serializer};

    use super::NamedEntry;

    pub fn serialize<S>(entries: &[NamedEntry], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for entry in entries {
            map.serialize_entry(&entry.key, &entry.description)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<NamedEntry>, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = Vec<NamedEntry>;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("an object of string values")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or_default());
                while let Some((key, description)) = map.next_entry::<String, String>()? {
                    entries.push(NamedEntry { key, description });
                }
                Ok(entries)
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

/// Writes `label: value` and a newline.
pub(crate) fn line(out: &mut String, label: &str, value: impl fmt::Display) {
    let _ = writeln!(out, "{label}: {value}");
}

/// Writes a section title line, e.g. `Services:`.
pub(crate) fn title(out: &mut String, title: &str) {
    out.push_str(title);
    out.push_str(":\n");
}

/// Writes one `- item` line per item.
pub(crate) fn bullets<S: AsRef<str>>(out: &mut String, items: &[S]) {
    for item in items {
        out.push_str("- ");
        out.push_str(item.as_ref());
        out.push('\n');
    }
}

/// Joins items with `", "`.
pub(crate) fn joined<S: AsRef<str>>(items: &[S]) -> String {
    items
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(", ")
}
