//! Records every session starts from.

use crate::model::{
    AssignedProvider, Client, Document, GanttTask, Project, ProjectStatus, Provider, TeamMember,
};

const PLACEHOLDER_PHOTO: &str = "https://placehold.co/600x400.png";
const PLACEHOLDER_AVATAR: &str = "https://placehold.co/40x40.png";

fn client(id: &str, name: &str, contact: &str, email: &str, phone: &str) -> Client {
    Client {
        id: id.to_string(),
        name: name.to_string(),
        contact: contact.to_string(),
        email: email.to_string(),
        phone: phone.to_string(),
    }
}

pub fn clients() -> Vec<Client> {
    vec![
        client(
            "cli-1",
            "Constructora Central",
            "Juan Pérez",
            "juan.perez@constructora.com",
            "555-1234",
        ),
        client(
            "cli-2",
            "Inmobiliaria Futuro",
            "Ana Gómez",
            "ana.gomez@infuturo.es",
            "555-5678",
        ),
    ]
}

pub fn projects() -> Vec<Project> {
    let mut robles = Project::new("Residencial Los Robles", "cli-1", 500_000.0);
    robles.id = "pro-1".to_string();
    robles.status = ProjectStatus::InProgress;
    robles.assigned_providers = vec![AssignedProvider::new("prov-1", 150_000.0)];

    let mut metropolis = Project::new("Edificio de Oficinas Metrópolis", "cli-2", 1_200_000.0);
    metropolis.id = "pro-2".to_string();
    metropolis.status = ProjectStatus::Completed;
    metropolis.documentation = vec![Document {
        name: "Planos Finales.pdf".to_string(),
        url: "#".to_string(),
    }];
    metropolis.plan = Some(Document {
        name: String::new(),
        url: "#".to_string(),
    });
    metropolis.photos = vec![PLACEHOLDER_PHOTO.to_string()];
    metropolis.gantt_data = [("Cimentación", 15), ("Estructura", 30), ("Acabados", 25)]
        .into_iter()
        .map(|(name, days)| GanttTask {
            name: name.to_string(),
            days,
        })
        .collect();
    metropolis.assigned_providers = vec![
        AssignedProvider::new("prov-1", 300_000.0),
        AssignedProvider::new("prov-2", 450_000.0),
    ];

    vec![robles, metropolis]
}

pub fn providers() -> Vec<Provider> {
    vec![
        Provider {
            id: "prov-1".to_string(),
            name: "Cementos Fortaleza".to_string(),
            contact: "Carlos Ruiz".to_string(),
            phone: "555-8765".to_string(),
            discount: "10%".to_string(),
            specialization: "Materiales de obra".to_string(),
        },
        Provider {
            id: "prov-2".to_string(),
            name: "Aceros del Norte".to_string(),
            contact: "Luisa Fernández".to_string(),
            phone: "555-4321".to_string(),
            discount: "15%".to_string(),
            specialization: "Estructuras metálicas".to_string(),
        },
    ]
}

pub fn team() -> Vec<TeamMember> {
    [
        ("team-1", "Elena García", "Jefa de Proyecto", "woman portrait"),
        ("team-2", "Miguel Torres", "Arquitecto Principal", "man portrait"),
        ("team-3", "Sofía Romero", "Administración", "person glasses"),
    ]
    .into_iter()
    .map(|(id, name, role, hint)| TeamMember {
        id: id.to_string(),
        name: name.to_string(),
        role: role.to_string(),
        avatar_url: PLACEHOLDER_AVATAR.to_string(),
        hint: hint.to_string(),
    })
    .collect()
}
