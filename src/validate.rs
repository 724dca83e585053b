//! Shape checks applied before a record enters a collection.

use crate::error::{CrmError, Result};
use crate::model::{Client, Project, Provider, TeamMember};

fn required(field: &'static str, value: &str, reason: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(CrmError::invalid(field, reason));
    }
    Ok(())
}

/// `local@domain.tld` with no whitespace; nothing stricter.
pub fn looks_like_email(value: &str) -> bool {
    let value = value.trim();
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

fn looks_like_url(value: &str) -> bool {
    let value = value.trim();
    ["http://", "https://"]
        .iter()
        .any(|scheme| value.len() > scheme.len() && value.starts_with(scheme))
}

pub fn client(client: &Client) -> Result<()> {
    required("name", &client.name, "El nombre es requerido.")?;
    required("contact", &client.contact, "El nombre de contacto es requerido.")?;
    if !looks_like_email(&client.email) {
        return Err(CrmError::invalid("email", "Email inválido."));
    }
    required("phone", &client.phone, "El teléfono es requerido.")
}

pub fn provider(provider: &Provider) -> Result<()> {
    required("name", &provider.name, "El nombre es requerido.")?;
    required("contact", &provider.contact, "El contacto es requerido.")?;
    required("phone", &provider.phone, "El teléfono es requerido.")?;
    required("discount", &provider.discount, "El descuento es requerido.")?;
    required(
        "specialization",
        &provider.specialization,
        "La especialidad es requerida.",
    )
}

pub fn team_member(member: &TeamMember) -> Result<()> {
    required("name", &member.name, "El nombre es requerido.")?;
    required("role", &member.role, "El rol es requerido.")?;
    if !member.avatar_url.trim().is_empty() && !looks_like_url(&member.avatar_url) {
        return Err(CrmError::invalid("avatar", "URL de avatar inválida"));
    }
    Ok(())
}

pub fn project(project: &Project) -> Result<()> {
    required("name", &project.name, "El nombre es requerido.")?;
    required("clientId", &project.client_id, "El cliente es requerido.")?;
    if !project.budget.is_finite() || project.budget < 0.0 {
        return Err(CrmError::invalid(
            "budget",
            "El presupuesto debe ser un número positivo.",
        ));
    }
    for assigned in &project.assigned_providers {
        if !assigned.cost.is_finite() || assigned.cost < 0.0 {
            return Err(CrmError::invalid("costs", "El coste debe ser positivo"));
        }
    }
    for task in &project.gantt_data {
        required("ganttData", &task.name, "Nombre de tarea requerido")?;
        if task.days < 1 {
            return Err(CrmError::invalid(
                "ganttData",
                "Duración debe ser al menos 1 día",
            ));
        }
    }
    Ok(())
}
