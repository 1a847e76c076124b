//! Medical practice profile.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::business::{BusinessInfo, HeaderLabels, WeeklyHours, bullets, joined, line, title};

const LABELS: HeaderLabels = HeaderLabels {
    name: "Practice",
    category: "Type",
    since: "Established",
};

/// A healthcare practice with services, staff, insurance and safety details.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HealthcareProfile {
    #[serde(rename = "practice")]
    pub info: BusinessInfo,
    pub services: MedicalServices,
    pub insurance: Insurance,
    pub appointments: Appointments,
    pub staff: Vec<Physician>,
    #[serde(rename = "covid19")]
    pub safety: SafetyMeasures,
    pub resources: HealthResources,
    pub certifications: Vec<String>,
    pub programs: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MedicalServices {
    pub primary_care: Vec<String>,
    pub specialty_services: Vec<String>,
    pub diagnostic_services: Vec<String>,
    pub procedures: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Insurance {
    pub accepted: Vec<String>,
    pub payment: PaymentOptions,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaymentOptions {
    pub copay: String,
    pub self_pay: String,
    pub payment_plans: String,
    pub methods: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Appointments {
    pub scheduling: Scheduling,
    pub hours: WeeklyHours,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Scheduling {
    pub phone: String,
    pub online: String,
    pub same_day: String,
    pub advance_booking: String,
}

/// A member of the medical staff.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Physician {
    pub name: String,
    pub specialty: String,
    pub education: String,
    pub experience: String,
    pub languages: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SafetyMeasures {
    pub protocols: Vec<String>,
    pub testing: String,
    pub vaccination: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HealthResources {
    pub patient_portal: String,
    pub emergency_contacts: EmergencyContacts,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmergencyContacts {
    pub emergency: String,
    pub poison_control: String,
    pub mental_health: String,
}

impl HealthcareProfile {
    /// Formats the profile as prompt context.
    ///
    /// Procedures and new-patient details stay out of the text; only the
    /// primary, specialty and diagnostic service lists are listed.
    pub fn to_context(&self) -> String {
        let mut out = String::new();
        self.info.write_header(&mut out, LABELS);
        out.push('\n');

        title(&mut out, "Services");
        title(&mut out, "Primary Care");
        bullets(&mut out, &self.services.primary_care);
        out.push('\n');
        title(&mut out, "Specialty Services");
        bullets(&mut out, &self.services.specialty_services);
        out.push('\n');
        title(&mut out, "Diagnostic Services");
        bullets(&mut out, &self.services.diagnostic_services);
        out.push('\n');

        title(&mut out, "Medical Staff");
        for doctor in &self.staff {
            let _ = writeln!(
                out,
                "- {}, {} ({})",
                doctor.name, doctor.specialty, doctor.experience
            );
        }
        out.push('\n');

        title(&mut out, "Operating Hours");
        self.appointments.hours.write_lines(&mut out);
        out.push('\n');

        let scheduling = &self.appointments.scheduling;
        title(&mut out, "Appointments");
        line(&mut out, "- Phone", &scheduling.phone);
        line(&mut out, "- Online", &scheduling.online);
        line(&mut out, "- Same-day", &scheduling.same_day);
        out.push('\n');

        title(&mut out, "Insurance Accepted");
        let _ = writeln!(out, "{}\n", joined(&self.insurance.accepted));
        title(&mut out, "Payment Methods");
        let _ = writeln!(out, "{}\n", joined(&self.insurance.payment.methods));

        title(&mut out, "COVID-19 Protocols");
        bullets(&mut out, &self.safety.protocols);
        out.push('\n');

        line(&mut out, "Patient Portal", &self.resources.patient_portal);
        out.push('\n');

        let contacts = &self.resources.emergency_contacts;
        title(&mut out, "Emergency Contacts");
        line(&mut out, "- Emergency", &contacts.emergency);
        line(&mut out, "- Poison Control", &contacts.poison_control);
        line(&mut out, "- Mental Health", &contacts.mental_health);
        out.push('\n');

        title(&mut out, "Special Programs");
        bullets(&mut out, &self.programs);
        out.push('\n');

        line(&mut out, "Certifications", joined(&self.certifications));

        out.trim().to_owned()
    }
}
