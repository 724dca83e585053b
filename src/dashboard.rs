//! The session controller. Owns every collection and routes UI actions
//! through the reducers, the CSV loader and the project calculators.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::DashboardConfig;
use crate::error::{CrmError, Result};
use crate::finance::{self, Financials, ProviderCost};
use crate::forms;
use crate::gantt::{self, ScheduledTask};
use crate::ids::{EntityKind, IdAllocator};
use crate::media;
use crate::model::{
    Client, FormRecord, GanttTask, LeadStatus, Project, ProjectStatus, Provider, TeamMember,
};
use crate::seed;
use crate::settings::{Tab, TabVisibility};
use crate::store::{self, Entity};
use crate::validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeVariant {
    Default,
    Destructive,
}

/// Toast shown to the user after an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub title: String,
    pub description: String,
    pub variant: NoticeVariant,
}

impl Notice {
    fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant: NoticeVariant::Default,
        }
    }

    fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            variant: NoticeVariant::Destructive,
            ..Self::new(title, description)
        }
    }

    fn created(kind: EntityKind) -> Self {
        Self::new(
            format!("{} añadido", kind.label()),
            format!(
                "El {} ha sido creado con éxito.",
                kind.label().to_lowercase()
            ),
        )
    }

    fn updated(kind: EntityKind) -> Self {
        Self::new(
            format!("{} actualizado", kind.label()),
            format!("El {} ha sido actualizado.", kind.label().to_lowercase()),
        )
    }

    fn deleted(kind: EntityKind) -> Self {
        Self::destructive(
            format!("{} eliminado", kind.label()),
            format!("El {} ha sido eliminado.", kind.label().to_lowercase()),
        )
    }

    fn missing(kind: EntityKind) -> Self {
        Self::destructive(
            format!("{} no encontrado", kind.label()),
            "No existe ningún registro con ese identificador.",
        )
    }

    pub fn is_error(&self) -> bool {
        self.variant == NoticeVariant::Destructive
    }
}

/// Headline counters shown above the tabs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub projects_in_progress: usize,
    pub projects_completed: usize,
    pub contacts_called: usize,
    pub contacts_in_process: usize,
    pub contacts_signed: usize,
}

/// What the project dialog submits: picked providers plus the cost typed
/// for each. An `id` means "edit that project".
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectForm {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub client_id: String,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default)]
    pub budget: f64,
    #[serde(default)]
    pub provider_ids: Vec<String>,
    #[serde(default)]
    pub costs: HashMap<String, f64>,
}

impl ProjectForm {
    /// Applies the form over `base`, or over an empty project when adding.
    fn into_project(self, base: Option<&Project>) -> Project {
        let assigned = finance::assign_providers(&self.provider_ids, &self.costs);
        let mut project = base
            .cloned()
            .unwrap_or_else(|| Project::new(String::new(), String::new(), 0.0));
        project.name = self.name.trim().to_string();
        project.client_id = self.client_id;
        project.status = self.status;
        project.budget = self.budget;
        project.assigned_providers = assigned;
        project
    }
}

/// Everything the UI renders, in one value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub clients: Vec<Client>,
    pub projects: Vec<Project>,
    pub providers: Vec<Provider>,
    pub team: Vec<TeamMember>,
    pub forms: Vec<FormRecord>,
    pub form_columns: Vec<String>,
    pub visible_tabs: TabVisibility,
    pub overview: Overview,
}

fn create_in<T: Entity>(
    items: &mut Vec<T>,
    mut item: T,
    kind: EntityKind,
    ids: &mut IdAllocator,
) -> Notice {
    if items.iter().any(|existing| existing.id() == item.id()) {
        item.set_id(String::new());
    }
    let reduced = store::create(items, item, || ids.allocate(kind));
    *items = reduced.items;
    Notice::created(kind)
}

fn update_in<T: Entity>(items: &mut Vec<T>, item: T, kind: EntityKind) -> Notice {
    let reduced = store::update(items, item);
    let applied = reduced.applied();
    *items = reduced.items;
    if applied {
        Notice::updated(kind)
    } else {
        Notice::missing(kind)
    }
}

fn delete_in<T: Entity>(items: &mut Vec<T>, id: &str, kind: EntityKind) -> Notice {
    let reduced = store::delete(items, id);
    let applied = reduced.applied();
    *items = reduced.items;
    if applied {
        Notice::deleted(kind)
    } else {
        Notice::missing(kind)
    }
}

#[derive(Debug)]
pub struct Dashboard {
    clients: Vec<Client>,
    projects: Vec<Project>,
    providers: Vec<Provider>,
    team: Vec<TeamMember>,
    forms: Vec<FormRecord>,
    tabs: TabVisibility,
    config: DashboardConfig,
    ids: IdAllocator,
}

impl Dashboard {
    /// Fresh session over the seed records.
    pub fn new(config: DashboardConfig, ids: IdAllocator) -> Self {
        Self {
            clients: seed::clients(),
            projects: seed::projects(),
            providers: seed::providers(),
            team: seed::team(),
            forms: Vec::new(),
            tabs: config.tabs,
            config,
            ids,
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn clients(&self) -> &[Client] {
        &self.clients
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn providers(&self) -> &[Provider] {
        &self.providers
    }

    pub fn team(&self) -> &[TeamMember] {
        &self.team
    }

    pub fn forms(&self) -> &[FormRecord] {
        &self.forms
    }

    pub fn add_client(&mut self, client: Client) -> Result<Notice> {
        validate::client(&client)?;
        Ok(create_in(
            &mut self.clients,
            client,
            EntityKind::Client,
            &mut self.ids,
        ))
    }

    pub fn update_client(&mut self, client: Client) -> Result<Notice> {
        validate::client(&client)?;
        Ok(update_in(&mut self.clients, client, EntityKind::Client))
    }

    pub fn delete_client(&mut self, id: &str) -> Notice {
        delete_in(&mut self.clients, id, EntityKind::Client)
    }

    /// `mailto:` link for the client's contact address.
    pub fn client_mailto(&self, id: &str) -> Result<String> {
        let client = self
            .clients
            .iter()
            .find(|client| client.id == id)
            .ok_or_else(|| CrmError::ClientNotFound(id.to_string()))?;
        Ok(format!("mailto:{}", client.email.trim()))
    }

    pub fn add_project(&mut self, project: Project) -> Result<Notice> {
        let mut project = project;
        project.documentation.clear();
        project.plan = None;
        project.photos.clear();
        project.gantt_data.clear();
        validate::project(&project)?;
        if !self.clients.iter().any(|client| client.id == project.client_id) {
            warn!(client_id = %project.client_id, "project references an unknown client");
        }
        Ok(create_in(
            &mut self.projects,
            project,
            EntityKind::Project,
            &mut self.ids,
        ))
    }

    pub fn update_project(&mut self, project: Project) -> Result<Notice> {
        validate::project(&project)?;
        Ok(update_in(&mut self.projects, project, EntityKind::Project))
    }

    pub fn delete_project(&mut self, id: &str) -> Notice {
        delete_in(&mut self.projects, id, EntityKind::Project)
    }

    /// Adds or edits a project from the project dialog. Editing keeps the
    /// project's documents, photos and plan; editing an unknown id changes
    /// nothing.
    pub fn submit_project_form(&mut self, form: ProjectForm) -> Result<Notice> {
        let Some(id) = form.id.clone().filter(|id| !id.trim().is_empty()) else {
            let project = form.into_project(None);
            return self.add_project(project);
        };
        let existing = self.project(&id).cloned();
        let mut project = form.into_project(existing.as_ref());
        project.id = id;
        self.update_project(project)
    }

    pub fn add_provider(&mut self, provider: Provider) -> Result<Notice> {
        validate::provider(&provider)?;
        Ok(create_in(
            &mut self.providers,
            provider,
            EntityKind::Provider,
            &mut self.ids,
        ))
    }

    pub fn update_provider(&mut self, provider: Provider) -> Result<Notice> {
        validate::provider(&provider)?;
        Ok(update_in(&mut self.providers, provider, EntityKind::Provider))
    }

    /// Removes the provider. Projects keep their bookings; the breakdown
    /// falls back to the raw id for them.
    pub fn delete_provider(&mut self, id: &str) -> Notice {
        delete_in(&mut self.providers, id, EntityKind::Provider)
    }

    fn with_team_defaults(&self, mut member: TeamMember) -> TeamMember {
        if member.avatar_url.trim().is_empty() {
            member.avatar_url = self.config.default_avatar_url.clone();
        }
        member.hint = self.config.default_avatar_hint.clone();
        member
    }

    pub fn add_team_member(&mut self, member: TeamMember) -> Result<Notice> {
        validate::team_member(&member)?;
        let member = self.with_team_defaults(member);
        Ok(create_in(
            &mut self.team,
            member,
            EntityKind::TeamMember,
            &mut self.ids,
        ))
    }

    pub fn update_team_member(&mut self, member: TeamMember) -> Result<Notice> {
        validate::team_member(&member)?;
        let member = self.with_team_defaults(member);
        Ok(update_in(&mut self.team, member, EntityKind::TeamMember))
    }

    pub fn delete_team_member(&mut self, id: &str) -> Notice {
        delete_in(&mut self.team, id, EntityKind::TeamMember)
    }

    /// Replaces all form records with the rows of `text`. On any failure the
    /// current records stay and the notice explains why.
    pub fn load_forms_csv(&mut self, text: &str) -> Notice {
        match forms::load_csv(text, &mut self.ids) {
            Ok(table) => {
                info!(
                    replaced = self.forms.len(),
                    loaded = table.records.len(),
                    "form submissions replaced"
                );
                self.forms = table.records;
                Notice::new(
                    "Datos cargados",
                    "El archivo CSV ha sido procesado correctamente.",
                )
            }
            Err(CrmError::CsvParse(errors)) => {
                warn!(?errors, "rejected CSV upload");
                Notice::destructive("Error al leer el CSV", errors.join(", "))
            }
            Err(CrmError::CsvEmpty) => Notice::destructive(
                "Archivo vacío o inválido",
                CrmError::CsvEmpty.to_string(),
            ),
            Err(err) => Notice::destructive("Error al leer el archivo", err.to_string()),
        }
    }

    /// Reads `path` and loads it like [`Dashboard::load_forms_csv`].
    pub fn load_forms_csv_file(&mut self, path: &Path) -> Result<Notice> {
        let text = fs::read_to_string(path)?;
        Ok(self.load_forms_csv(&text))
    }

    /// Saves the tracking fields (or any field) of one submission. Returns
    /// false when the id is unknown.
    pub fn update_form(&mut self, record: FormRecord) -> bool {
        let reduced = store::update(&self.forms, record);
        let applied = reduced.applied();
        self.forms = reduced.items;
        applied
    }

    pub fn set_form_called(&mut self, id: &str, called: bool) -> bool {
        let Some(mut record) = self.forms.iter().find(|r| r.id == id).cloned() else {
            return false;
        };
        record.called = called;
        self.update_form(record)
    }

    pub fn set_form_status(&mut self, id: &str, status: LeadStatus) -> bool {
        let Some(mut record) = self.forms.iter().find(|r| r.id == id).cloned() else {
            return false;
        };
        record.status = status;
        self.update_form(record)
    }

    pub fn delete_form(&mut self, id: &str) -> Notice {
        delete_in(&mut self.forms, id, EntityKind::Form)
    }

    pub fn form_columns(&self) -> Vec<String> {
        forms::display_columns(&self.forms)
    }

    pub fn export_forms_csv(&self) -> String {
        forms::export_csv(&self.forms, self.config.export_row_limit)
    }

    pub fn project(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|project| project.id == id)
    }

    fn require_project(&self, id: &str) -> Result<&Project> {
        self.project(id)
            .ok_or_else(|| CrmError::ProjectNotFound(id.to_string()))
    }

    pub fn project_financials(&self, id: &str) -> Result<Financials> {
        Ok(finance::aggregate(self.require_project(id)?))
    }

    pub fn project_breakdown(&self, id: &str) -> Result<Vec<ProviderCost>> {
        Ok(finance::provider_breakdown(
            self.require_project(id)?,
            &self.providers,
        ))
    }

    pub fn project_schedule(&self, id: &str) -> Result<Vec<ScheduledTask>> {
        Ok(gantt::sequence(&self.require_project(id)?.gantt_data))
    }

    pub fn save_project_plan(&mut self, id: &str, tasks: Vec<GanttTask>) -> Result<Notice> {
        let mut project = self.require_project(id)?.clone();
        project.gantt_data = tasks;
        self.update_project(project)
    }

    pub fn add_project_photo(&mut self, id: &str, file_name: &str, bytes: &[u8]) -> Result<Notice> {
        let photo = media::photo_data_url(file_name, bytes, self.config.max_photo_bytes)?;
        let project = media::attach_photo(self.require_project(id)?, photo);
        self.update_project(project)
    }

    pub fn add_project_photo_file(&mut self, id: &str, path: &Path) -> Result<Notice> {
        let bytes = fs::read(path)?;
        let name = path
            .file_name()
            .map(|value| value.to_string_lossy().to_string())
            .unwrap_or_default();
        self.add_project_photo(id, &name, &bytes)
    }

    pub fn remove_project_photo(&mut self, id: &str, index: usize) -> Result<Notice> {
        let project = media::remove_photo(self.require_project(id)?, index);
        self.update_project(project)
    }

    pub fn add_project_document(&mut self, id: &str, name: &str) -> Result<Notice> {
        let project = media::attach_document(self.require_project(id)?, name)?;
        self.update_project(project)?;
        Ok(Notice::new(
            "Documento subido",
            format!("El archivo {} ha sido añadido.", name.trim()),
        ))
    }

    pub fn overview(&self) -> Overview {
        let leads = forms::lead_counts(&self.forms);
        Overview {
            projects_in_progress: self
                .projects
                .iter()
                .filter(|p| p.status == ProjectStatus::InProgress)
                .count(),
            projects_completed: self
                .projects
                .iter()
                .filter(|p| p.status == ProjectStatus::Completed)
                .count(),
            contacts_called: leads.called,
            contacts_in_process: leads.in_process,
            contacts_signed: leads.signed,
        }
    }

    pub fn tabs(&self) -> TabVisibility {
        self.tabs
    }

    pub fn toggle_tab(&mut self, tab: Tab) -> TabVisibility {
        self.tabs = self.tabs.toggled(tab);
        self.tabs
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            clients: self.clients.clone(),
            projects: self.projects.clone(),
            providers: self.providers.clone(),
            team: self.team.clone(),
            forms: self.forms.clone(),
            form_columns: self.form_columns(),
            visible_tabs: self.tabs,
            overview: self.overview(),
        }
    }
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new(DashboardConfig::default(), IdAllocator::system())
    }
}
