use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tab {
    Projects,
    Clients,
    Providers,
    Team,
    Forms,
    Settings,
}

impl Tab {
    pub const ALL: [Tab; 6] = [
        Tab::Projects,
        Tab::Clients,
        Tab::Providers,
        Tab::Team,
        Tab::Forms,
        Tab::Settings,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Tab::Projects => "Proyectos",
            Tab::Clients => "Clientes",
            Tab::Providers => "Proveedores",
            Tab::Team => "Equipo",
            Tab::Forms => "Formularios",
            Tab::Settings => "Configuración",
        }
    }
}

/// Which dashboard tabs are shown. Settings cannot be hidden.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TabVisibility {
    pub projects: bool,
    pub clients: bool,
    pub providers: bool,
    pub team: bool,
    pub forms: bool,
}

impl Default for TabVisibility {
    fn default() -> Self {
        Self {
            projects: true,
            clients: true,
            providers: true,
            team: true,
            forms: true,
        }
    }
}

impl TabVisibility {
    pub fn is_visible(&self, tab: Tab) -> bool {
        match tab {
            Tab::Projects => self.projects,
            Tab::Clients => self.clients,
            Tab::Providers => self.providers,
            Tab::Team => self.team,
            Tab::Forms => self.forms,
            Tab::Settings => true,
        }
    }

    pub fn toggled(mut self, tab: Tab) -> Self {
        match tab {
            Tab::Projects => self.projects = !self.projects,
            Tab::Clients => self.clients = !self.clients,
            Tab::Providers => self.providers = !self.providers,
            Tab::Team => self.team = !self.team,
            Tab::Forms => self.forms = !self.forms,
            Tab::Settings => {}
        }
        self
    }

    pub fn visible_tabs(&self) -> Vec<Tab> {
        Tab::ALL
            .into_iter()
            .filter(|tab| self.is_visible(*tab))
            .collect()
    }
}
