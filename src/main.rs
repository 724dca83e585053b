#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};
use tauri::{AppHandle, State};
use tauri_plugin_opener::OpenerExt;
use tracing::{info, warn};

use winnbuilders_crm::finance::{Financials, ProviderCost};
use winnbuilders_crm::gantt::ScheduledTask;
use winnbuilders_crm::model::{Client, FormRecord, GanttTask, Provider, TeamMember};
use winnbuilders_crm::settings::{Tab, TabVisibility};
use winnbuilders_crm::{
    init_tracing, Dashboard, DashboardConfig, IdAllocator, Notice, Overview, ProjectForm,
    Snapshot,
};

const DEFAULT_EXPORT_NAME: &str = "formularios.csv";

type DashboardState<'a> = State<'a, Mutex<Dashboard>>;

#[derive(Deserialize)]
struct IdRequest {
    id: String,
}

#[derive(Deserialize)]
struct TextRequest {
    text: String,
}

#[derive(Deserialize)]
struct PlanSaveRequest {
    id: String,
    tasks: Vec<GanttTask>,
}

#[derive(Deserialize)]
struct PhotoRemoveRequest {
    id: String,
    index: usize,
}

#[derive(Deserialize)]
struct TabRequest {
    tab: Tab,
}

#[derive(Deserialize)]
struct ExportCsvRequest {
    #[serde(default)]
    filename: String,
}

#[derive(Serialize)]
struct PickResult {
    ok: bool,
    canceled: bool,
    name: Option<String>,
    notice: Option<Notice>,
}

impl PickResult {
    fn canceled() -> Self {
        Self {
            ok: false,
            canceled: true,
            name: None,
            notice: None,
        }
    }

    fn done(name: String, notice: Notice) -> Self {
        Self {
            ok: !notice.is_error(),
            canceled: false,
            name: Some(name),
            notice: Some(notice),
        }
    }
}

#[derive(Serialize)]
struct SaveCsvResult {
    ok: bool,
    canceled: bool,
    filename: String,
    path: Option<String>,
}

fn lock(dashboard: &Mutex<Dashboard>) -> Result<MutexGuard<'_, Dashboard>, String> {
    dashboard
        .lock()
        .map_err(|_| "dashboard state is unavailable".to_string())
}

fn file_name_of(path: &std::path::Path, fallback: &str) -> String {
    path.file_name()
        .map(|value| value.to_string_lossy().to_string())
        .unwrap_or_else(|| fallback.to_string())
}

#[tauri::command]
fn app_version(app: AppHandle) -> String {
    app.package_info().version.to_string()
}

#[tauri::command]
fn crm_snapshot(state: DashboardState<'_>) -> Result<Snapshot, String> {
    Ok(lock(&state)?.snapshot())
}

#[tauri::command]
fn crm_overview(state: DashboardState<'_>) -> Result<Overview, String> {
    Ok(lock(&state)?.overview())
}

#[tauri::command]
fn client_add(state: DashboardState<'_>, payload: Client) -> Result<Notice, String> {
    lock(&state)?
        .add_client(payload)
        .map_err(|err| err.to_string())
}

#[tauri::command]
fn client_update(state: DashboardState<'_>, payload: Client) -> Result<Notice, String> {
    lock(&state)?
        .update_client(payload)
        .map_err(|err| err.to_string())
}

#[tauri::command]
fn client_delete(state: DashboardState<'_>, payload: IdRequest) -> Result<Notice, String> {
    Ok(lock(&state)?.delete_client(&payload.id))
}

#[tauri::command]
fn project_save(state: DashboardState<'_>, payload: ProjectForm) -> Result<Notice, String> {
    lock(&state)?
        .submit_project_form(payload)
        .map_err(|err| err.to_string())
}

#[tauri::command]
fn project_delete(state: DashboardState<'_>, payload: IdRequest) -> Result<Notice, String> {
    Ok(lock(&state)?.delete_project(&payload.id))
}

#[tauri::command]
fn project_plan_save(
    state: DashboardState<'_>,
    payload: PlanSaveRequest,
) -> Result<Notice, String> {
    lock(&state)?
        .save_project_plan(&payload.id, payload.tasks)
        .map_err(|err| err.to_string())
}

#[tauri::command]
fn provider_add(state: DashboardState<'_>, payload: Provider) -> Result<Notice, String> {
    lock(&state)?
        .add_provider(payload)
        .map_err(|err| err.to_string())
}

#[tauri::command]
fn provider_update(state: DashboardState<'_>, payload: Provider) -> Result<Notice, String> {
    lock(&state)?
        .update_provider(payload)
        .map_err(|err| err.to_string())
}

#[tauri::command]
fn provider_delete(state: DashboardState<'_>, payload: IdRequest) -> Result<Notice, String> {
    Ok(lock(&state)?.delete_provider(&payload.id))
}

#[tauri::command]
fn team_add(state: DashboardState<'_>, payload: TeamMember) -> Result<Notice, String> {
    lock(&state)?
        .add_team_member(payload)
        .map_err(|err| err.to_string())
}

#[tauri::command]
fn team_update(state: DashboardState<'_>, payload: TeamMember) -> Result<Notice, String> {
    lock(&state)?
        .update_team_member(payload)
        .map_err(|err| err.to_string())
}

#[tauri::command]
fn team_delete(state: DashboardState<'_>, payload: IdRequest) -> Result<Notice, String> {
    Ok(lock(&state)?.delete_team_member(&payload.id))
}

#[tauri::command]
fn forms_load_text(state: DashboardState<'_>, payload: TextRequest) -> Result<Notice, String> {
    Ok(lock(&state)?.load_forms_csv(&payload.text))
}

#[tauri::command]
fn forms_pick_csv(state: DashboardState<'_>) -> Result<PickResult, String> {
    let path = rfd::FileDialog::new()
        .add_filter("CSV", &["csv"])
        .pick_file();
    let Some(path) = path else {
        return Ok(PickResult::canceled());
    };

    let name = file_name_of(&path, "formulario.csv");
    let notice = lock(&state)?
        .load_forms_csv_file(&path)
        .map_err(|err| err.to_string())?;
    Ok(PickResult::done(name, notice))
}

#[tauri::command]
fn forms_update(state: DashboardState<'_>, payload: FormRecord) -> Result<bool, String> {
    Ok(lock(&state)?.update_form(payload))
}

#[tauri::command]
fn forms_delete(state: DashboardState<'_>, payload: IdRequest) -> Result<Notice, String> {
    Ok(lock(&state)?.delete_form(&payload.id))
}

#[tauri::command]
fn forms_export_csv(
    state: DashboardState<'_>,
    payload: ExportCsvRequest,
) -> Result<SaveCsvResult, String> {
    let content = lock(&state)?.export_forms_csv();
    let filename = sanitize_export_filename(payload.filename.as_str());
    let path = rfd::FileDialog::new()
        .add_filter("CSV", &["csv"])
        .set_file_name(filename.as_str())
        .save_file();

    let Some(path) = path else {
        return Ok(SaveCsvResult {
            ok: false,
            canceled: true,
            filename,
            path: None,
        });
    };

    write_text_file(path.clone(), content.as_str())?;
    info!(path = %path.display(), "form submissions exported");
    Ok(SaveCsvResult {
        ok: true,
        canceled: false,
        filename,
        path: Some(path.to_string_lossy().to_string()),
    })
}

#[tauri::command]
fn project_financials(
    state: DashboardState<'_>,
    payload: IdRequest,
) -> Result<Financials, String> {
    lock(&state)?
        .project_financials(&payload.id)
        .map_err(|err| err.to_string())
}

#[tauri::command]
fn project_breakdown(
    state: DashboardState<'_>,
    payload: IdRequest,
) -> Result<Vec<ProviderCost>, String> {
    lock(&state)?
        .project_breakdown(&payload.id)
        .map_err(|err| err.to_string())
}

#[tauri::command]
fn project_schedule(
    state: DashboardState<'_>,
    payload: IdRequest,
) -> Result<Vec<ScheduledTask>, String> {
    lock(&state)?
        .project_schedule(&payload.id)
        .map_err(|err| err.to_string())
}

#[tauri::command]
fn project_pick_photo(
    state: DashboardState<'_>,
    payload: IdRequest,
) -> Result<PickResult, String> {
    let path = rfd::FileDialog::new()
        .add_filter("Imagen", &["png", "jpg", "jpeg", "gif", "webp", "bmp", "svg"])
        .pick_file();
    let Some(path) = path else {
        return Ok(PickResult::canceled());
    };

    let name = file_name_of(&path, "foto");
    let notice = lock(&state)?
        .add_project_photo_file(&payload.id, &path)
        .map_err(|err| err.to_string())?;
    Ok(PickResult::done(name, notice))
}

#[tauri::command]
fn project_remove_photo(
    state: DashboardState<'_>,
    payload: PhotoRemoveRequest,
) -> Result<Notice, String> {
    lock(&state)?
        .remove_project_photo(&payload.id, payload.index)
        .map_err(|err| err.to_string())
}

#[tauri::command]
fn project_pick_document(
    state: DashboardState<'_>,
    payload: IdRequest,
) -> Result<PickResult, String> {
    let Some(path) = rfd::FileDialog::new().pick_file() else {
        return Ok(PickResult::canceled());
    };

    let name = file_name_of(&path, "documento");
    let notice = lock(&state)?
        .add_project_document(&payload.id, name.as_str())
        .map_err(|err| err.to_string())?;
    Ok(PickResult::done(name, notice))
}

#[tauri::command]
fn tabs_get(state: DashboardState<'_>) -> Result<TabVisibility, String> {
    Ok(lock(&state)?.tabs())
}

#[tauri::command]
fn tabs_toggle(state: DashboardState<'_>, payload: TabRequest) -> Result<TabVisibility, String> {
    Ok(lock(&state)?.toggle_tab(payload.tab))
}

#[tauri::command]
fn open_form_url(app: AppHandle, state: DashboardState<'_>) -> Result<bool, String> {
    let url = lock(&state)?.config().form_url.clone();
    app.opener()
        .open_url(url, Option::<String>::None)
        .map_err(|err: tauri_plugin_opener::Error| err.to_string())?;
    Ok(true)
}

#[tauri::command]
fn open_email_draft(
    app: AppHandle,
    state: DashboardState<'_>,
    payload: IdRequest,
) -> Result<bool, String> {
    let mailto = lock(&state)?
        .client_mailto(&payload.id)
        .map_err(|err| err.to_string())?;
    app.opener()
        .open_url(mailto, Option::<String>::None)
        .map_err(|err: tauri_plugin_opener::Error| {
            warn!(error = %err, "could not open mail client");
            err.to_string()
        })?;
    Ok(true)
}

fn write_text_file(path: PathBuf, content: &str) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|err| err.to_string())?;
    }
    fs::write(path, content).map_err(|err| err.to_string())?;
    Ok(())
}

fn sanitize_filename(value: &str) -> String {
    let mut out = String::new();
    for ch in value.trim().chars().filter(|ch| !ch.is_control()).take(255) {
        if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' || ch == '.' {
            out.push(ch);
        } else {
            out.push('_');
        }
    }
    let trimmed = out.trim_matches('_');
    if trimmed.is_empty() {
        DEFAULT_EXPORT_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}

fn sanitize_export_filename(value: &str) -> String {
    let safe = sanitize_filename(value);
    if safe.to_lowercase().ends_with(".csv") {
        safe
    } else {
        format!("{safe}.csv")
    }
}

fn main() {
    init_tracing();
    let config = DashboardConfig::from_env();
    info!(form_url = %config.form_url, "starting WinnBuilders CRM");

    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .manage(Mutex::new(Dashboard::new(config, IdAllocator::system())))
        .invoke_handler(tauri::generate_handler![
            app_version,
            crm_snapshot,
            crm_overview,
            client_add,
            client_update,
            client_delete,
            project_save,
            project_delete,
            project_plan_save,
            provider_add,
            provider_update,
            provider_delete,
            team_add,
            team_update,
            team_delete,
            forms_load_text,
            forms_pick_csv,
            forms_update,
            forms_delete,
            forms_export_csv,
            project_financials,
            project_breakdown,
            project_schedule,
            project_pick_photo,
            project_remove_photo,
            project_pick_document,
            tabs_get,
            tabs_toggle,
            open_form_url,
            open_email_draft
        ])
        .run(tauri::generate_context!())
        .expect("failed to run WinnBuilders CRM");
}
