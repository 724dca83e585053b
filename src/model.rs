use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::store::Entity;

/// Keys the dashboard owns on every form record; source columns with the
/// same names are shadowed.
pub const FORM_RESERVED_KEYS: [&str; 3] = ["id", "called", "status"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub contact: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ProjectStatus {
    #[default]
    #[serde(rename = "Planificado")]
    Planned,
    #[serde(rename = "En progreso")]
    InProgress,
    #[serde(rename = "Completado")]
    Completed,
    #[serde(rename = "Cancelado")]
    Cancelled,
}

impl ProjectStatus {
    pub fn label(self) -> &'static str {
        match self {
            ProjectStatus::Planned => "Planificado",
            ProjectStatus::InProgress => "En progreso",
            ProjectStatus::Completed => "Completado",
            ProjectStatus::Cancelled => "Cancelado",
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub name: String,
    pub url: String,
}

/// A provider booked on a project. The cost belongs to the booking, not to
/// the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignedProvider {
    #[serde(rename = "id", alias = "providerId")]
    pub provider_id: String,
    #[serde(default)]
    pub cost: f64,
}

impl AssignedProvider {
    pub fn new(provider_id: impl Into<String>, cost: f64) -> Self {
        Self {
            provider_id: provider_id.into(),
            cost,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GanttTask {
    pub name: String,
    pub days: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub client_id: String,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default)]
    pub budget: f64,
    #[serde(default)]
    pub documentation: Vec<Document>,
    #[serde(default)]
    pub plan: Option<Document>,
    #[serde(default)]
    pub photos: Vec<String>,
    #[serde(default)]
    pub gantt_data: Vec<GanttTask>,
    #[serde(default)]
    pub assigned_providers: Vec<AssignedProvider>,
}

impl Project {
    /// Empty project as the "new project" form starts it.
    pub fn new(name: impl Into<String>, client_id: impl Into<String>, budget: f64) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            client_id: client_id.into(),
            status: ProjectStatus::Planned,
            budget,
            documentation: Vec::new(),
            plan: None,
            photos: Vec::new(),
            gantt_data: Vec::new(),
            assigned_providers: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provider {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub contact: String,
    pub phone: String,
    pub discount: String,
    pub specialization: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMember {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub role: String,
    #[serde(rename = "avatar", default)]
    pub avatar_url: String,
    #[serde(default)]
    pub hint: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LeadStatus {
    #[default]
    #[serde(rename = "Pendiente")]
    Pending,
    #[serde(rename = "Contactado")]
    Contacted,
    #[serde(rename = "En proceso")]
    InProcess,
    #[serde(rename = "Firmado")]
    Signed,
}

impl LeadStatus {
    pub fn label(self) -> &'static str {
        match self {
            LeadStatus::Pending => "Pendiente",
            LeadStatus::Contacted => "Contactado",
            LeadStatus::InProcess => "En proceso",
            LeadStatus::Signed => "Firmado",
        }
    }
}

impl fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One uploaded form submission: tracking fields plus whatever columns the
/// source row carried, in source order. Serialized flat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormRecord {
    pub id: String,
    #[serde(default)]
    pub called: bool,
    #[serde(default)]
    pub status: LeadStatus,
    #[serde(flatten)]
    pub fields: IndexMap<String, String>,
}

impl FormRecord {
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }
}

macro_rules! impl_entity {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Entity for $ty {
                fn id(&self) -> &str {
                    &self.id
                }

                fn set_id(&mut self, id: String) {
                    self.id = id;
                }
            }
        )*
    };
}

impl_entity!(Client, Project, Provider, TeamMember, FormRecord);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn project_uses_ui_keys() {
        let project: Project = serde_json::from_value(json!({
            "id": "pro-1",
            "name": "Residencial Los Robles",
            "clientId": "cli-1",
            "status": "En progreso",
            "budget": 500000,
            "assignedProviders": [{ "id": "prov-1", "cost": 150000 }],
        }))
        .unwrap();

        assert_eq!(project.status, ProjectStatus::InProgress);
        assert_eq!(project.assigned_providers[0].provider_id, "prov-1");
        assert!(project.gantt_data.is_empty());

        let value = serde_json::to_value(&project).unwrap();
        assert_eq!(value["clientId"], "cli-1");
        assert_eq!(value["ganttData"], json!([]));
    }

    #[test]
    fn plan_without_name_deserializes() {
        let project: Project = serde_json::from_value(json!({
            "name": "Edificio de Oficinas Metrópolis",
            "clientId": "cli-2",
            "plan": { "url": "#" },
        }))
        .unwrap();
        let plan = project.plan.unwrap();
        assert_eq!(plan.url, "#");
        assert!(plan.name.is_empty());
    }

    #[test]
    fn assigned_cost_defaults_to_zero() {
        let assigned: AssignedProvider = serde_json::from_value(json!({ "id": "prov-2" })).unwrap();
        assert_eq!(assigned.cost, 0.0);
    }

    #[test]
    fn form_record_serializes_flat() {
        let mut fields = IndexMap::new();
        fields.insert("Nombre".to_string(), "Ana".to_string());
        fields.insert("Teléfono".to_string(), "555".to_string());
        let record = FormRecord {
            id: "form-1-0".to_string(),
            called: true,
            status: LeadStatus::InProcess,
            fields,
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["status"], "En proceso");
        assert_eq!(value["Nombre"], "Ana");

        let back: FormRecord = serde_json::from_value(value).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn team_member_avatar_key() {
        let member: TeamMember = serde_json::from_value(json!({
            "name": "Elena García",
            "role": "Jefa de Proyecto",
            "avatar": "https://placehold.co/40x40.png",
        }))
        .unwrap();
        assert_eq!(member.avatar_url, "https://placehold.co/40x40.png");
        assert!(member.id.is_empty());
    }
}
