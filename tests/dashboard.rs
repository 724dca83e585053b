use std::collections::HashMap;

use winnbuilders_crm::ids::FixedClock;
use winnbuilders_crm::model::{LeadStatus, Provider, TeamMember};
use winnbuilders_crm::settings::Tab;
use winnbuilders_crm::{Dashboard, DashboardConfig, IdAllocator, NoticeVariant, ProjectForm};

const LEADS: &str = "\u{feff}Nombre,Email,Mensaje\r\n\
Lucía Prieto,lucia@correo.es,\"Reforma, cocina\"\r\n\
Tomás Gil,tomas@correo.es,Ampliación\r\n\
\r\n\
Nuria Sanz,nuria@correo.es,\"Presupuesto \"\"urgente\"\"\"\r\n";

fn dashboard() -> Dashboard {
    Dashboard::new(
        DashboardConfig::default(),
        IdAllocator::new(FixedClock(1_700_000_000_000)),
    )
}

#[test]
fn seeded_projects_compute_financials_and_schedule() {
    let d = dashboard();

    let robles = d.project_financials("pro-1").unwrap();
    assert_eq!(robles.total_cost, 150_000.0);
    assert_eq!(robles.margin, 350_000.0);
    assert_eq!(robles.utilization, 30.0);

    let metropolis = d.project_financials("pro-2").unwrap();
    assert_eq!(metropolis.total_cost, 750_000.0);
    assert_eq!(metropolis.margin, 450_000.0);
    assert_eq!(metropolis.utilization, 62.5);

    let ends: Vec<u64> = d
        .project_schedule("pro-2")
        .unwrap()
        .iter()
        .map(|task| task.end)
        .collect();
    assert_eq!(ends, vec![15, 45, 70]);
    assert!(d.project_schedule("pro-1").unwrap().is_empty());
}

#[test]
fn crud_round_trip_across_kinds() {
    let mut d = dashboard();

    let notice = d
        .add_provider(Provider {
            id: String::new(),
            name: "Maderas Olmo".to_string(),
            contact: "Iván Olmo".to_string(),
            phone: "555-9999".to_string(),
            discount: "5%".to_string(),
            specialization: "Carpintería".to_string(),
        })
        .unwrap();
    assert_eq!(notice.title, "Proveedor añadido");
    assert_eq!(notice.variant, NoticeVariant::Default);
    let provider_id = d.providers()[2].id.clone();
    assert_eq!(provider_id, "prov-1700000000000");

    d.add_team_member(TeamMember {
        id: String::new(),
        name: "Lola Díaz".to_string(),
        role: "Delineante".to_string(),
        avatar_url: String::new(),
        hint: String::new(),
    })
    .unwrap();
    assert_eq!(d.team()[3].id, "team-1700000000001");

    let mut updated = d.providers()[2].clone();
    updated.discount = "8%".to_string();
    let notice = d.update_provider(updated).unwrap();
    assert_eq!(notice.title, "Proveedor actualizado");
    assert_eq!(d.providers()[2].discount, "8%");
    assert_eq!(d.providers().len(), 3);

    let notice = d.delete_provider(&provider_id);
    assert_eq!(notice.variant, NoticeVariant::Destructive);
    assert_eq!(notice.title, "Proveedor eliminado");
    assert_eq!(d.providers(), winnbuilders_crm::seed::providers().as_slice());
}

#[test]
fn deleting_a_provider_keeps_project_bookings() {
    let mut d = dashboard();
    d.delete_provider("prov-2");

    let breakdown = d.project_breakdown("pro-2").unwrap();
    assert_eq!(breakdown[1].name, "prov-2");
    assert_eq!(d.project_financials("pro-2").unwrap().total_cost, 750_000.0);
}

#[test]
fn over_budget_projects_report_negative_margin() {
    let mut d = dashboard();
    d.submit_project_form(ProjectForm {
        id: None,
        name: "Ático Centro".to_string(),
        client_id: "cli-1".to_string(),
        status: Default::default(),
        budget: 100.0,
        provider_ids: vec!["prov-1".to_string(), "prov-2".to_string()],
        costs: HashMap::from([("prov-1".to_string(), 80.0), ("prov-2".to_string(), 40.0)]),
    })
    .unwrap();

    let id = d.projects()[2].id.clone();
    let financials = d.project_financials(&id).unwrap();
    assert_eq!(financials.margin, -20.0);
    assert!(financials.margin_is_negative());
    assert_eq!(financials.utilization, 120.0);
}

#[test]
fn csv_upload_tracks_leads_and_exports() {
    let mut d = dashboard();
    let notice = d.load_forms_csv(LEADS);
    assert_eq!(notice.title, "Datos cargados");
    assert_eq!(d.forms().len(), 3);
    assert_eq!(d.form_columns(), vec!["Nombre", "Email", "Mensaje"]);
    assert_eq!(d.forms()[0].id, "form-1700000000000-0");
    assert_eq!(d.forms()[2].id, "form-1700000000000-2");
    assert_eq!(d.forms()[0].field("Mensaje"), Some("Reforma, cocina"));
    assert_eq!(
        d.forms()[2].field("Mensaje"),
        Some("Presupuesto \"urgente\"")
    );
    assert!(d
        .forms()
        .iter()
        .all(|r| !r.called && r.status == LeadStatus::Pending));

    let first = d.forms()[0].id.clone();
    assert!(d.set_form_called(&first, true));
    assert!(d.set_form_status(&first, LeadStatus::InProcess));
    let overview = d.overview();
    assert_eq!(overview.contacts_called, 1);
    assert_eq!(overview.contacts_in_process, 1);
    assert_eq!(overview.contacts_signed, 0);

    let exported = d.export_forms_csv();
    let mut lines = exported.lines();
    assert_eq!(lines.next(), Some("Llamado,Estado,Nombre,Email,Mensaje"));
    assert_eq!(
        lines.next(),
        Some("Sí,En proceso,Lucía Prieto,lucia@correo.es,\"Reforma, cocina\"")
    );
}

#[test]
fn broken_upload_leaves_previous_leads_in_place() {
    let mut d = dashboard();
    d.load_forms_csv(LEADS);
    let before = d.forms().to_vec();

    let notice = d.load_forms_csv("Nombre,Email\n\"sin cerrar,x@y.es\n");
    assert_eq!(notice.variant, NoticeVariant::Destructive);
    assert_eq!(d.forms(), before.as_slice());

    let notice = d.load_forms_csv("");
    assert_eq!(notice.title, "Archivo vacío o inválido");
    assert_eq!(d.forms(), before.as_slice());
}

#[test]
fn second_upload_replaces_all_records_with_fresh_ids() {
    let mut d = dashboard();
    d.load_forms_csv(LEADS);
    d.load_forms_csv("Teléfono\n600111222\n");

    assert_eq!(d.forms().len(), 1);
    assert_eq!(d.forms()[0].id, "form-1700000000001-0");
    assert_eq!(d.form_columns(), vec!["Teléfono"]);
}

#[test]
fn snapshot_reflects_hidden_tabs() {
    let mut d = dashboard();
    d.toggle_tab(Tab::Forms);
    d.toggle_tab(Tab::Settings);

    let value = serde_json::to_value(d.snapshot()).unwrap();
    assert_eq!(value["visibleTabs"]["forms"], false);
    assert_eq!(value["projects"][1]["status"], "Completado");
    assert_eq!(value["projects"][0]["assignedProviders"][0]["id"], "prov-1");
    assert_eq!(value["team"][0]["avatar"], "https://placehold.co/40x40.png");
    assert_eq!(d.tabs().visible_tabs().len(), 5);
}
