//! Resource assignments read off appointments.

use serde::Serialize;

use crate::appointment::RawAppointment;

/// The ids an appointment is assigned to for one resource field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceAssignment {
    pub field: String,
    pub values: Vec<String>,
}

impl ResourceAssignment {
    pub fn new(field: &str, values: &[&str]) -> Self {
        ResourceAssignment {
            field: field.to_string(),
            values: values.iter().map(|v| v.to_string()).collect(),
        }
    }

    pub fn contains(&self, field: &str, id: &str) -> bool {
        self.field == field && self.values.iter().any(|v| v == id)
    }
}

pub trait ResourceManager {
    /// Ordered resource assignments for an appointment.
    fn resources_from_item(&self, raw: &RawAppointment) -> Vec<ResourceAssignment>;
}

/// Reads the configured resource fields straight off the appointment.
///
/// With no fields configured every field on the appointment is used.
#[derive(Debug, Clone, Default)]
pub struct FieldResourceManager {
    fields: Vec<String>,
}

impl FieldResourceManager {
    pub fn new(fields: Vec<String>) -> Self {
        FieldResourceManager { fields }
    }
}

impl ResourceManager for FieldResourceManager {
    fn resources_from_item(&self, raw: &RawAppointment) -> Vec<ResourceAssignment> {
        let assignment = |field: &String, values: &Vec<String>| ResourceAssignment {
            field: field.clone(),
            values: values.clone(),
        };

        if self.fields.is_empty() {
            return raw
                .resources
                .iter()
                .filter(|(_, values)| !values.is_empty())
                .map(|(field, values)| assignment(field, values))
                .collect();
        }

        self.fields
            .iter()
            .filter_map(|field| {
                raw.resources
                    .get(field)
                    .filter(|values| !values.is_empty())
                    .map(|values| assignment(field, values))
            })
            .collect()
    }
}
