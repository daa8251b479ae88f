use serde::{Deserialize, Serialize};

/// Platform service that hands out the current user's JWT.
pub const EXTENDED_USER_INFO_SERVICE: &str = "extended-user-info";

/// Suffix appended to the app identifier to name the app's controller service.
pub const CONTROLLER_SERVICE_SUFFIX: &str = ":controller";

fn default_dependencies() -> Vec<String> {
    vec![EXTENDED_USER_INFO_SERVICE.to_string()]
}

/// Application settings supplied once at the start of a handshake.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Identifier the application was registered under on the platform.
    #[serde(default)]
    pub app_id: String,

    /// Platform services the application consumes.
    #[serde(default = "default_dependencies")]
    pub dependencies: Vec<String>,

    /// Additional services the application exposes besides its controller.
    #[serde(default)]
    pub exported_services: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_id: String::new(),
            dependencies: default_dependencies(),
            exported_services: Vec::new(),
        }
    }
}

impl AppConfig {
    pub fn new(app_id: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            ..Self::default()
        }
    }

    /// Name of the app-scoped controller service, e.g. `app1:controller`.
    pub fn controller_service(&self) -> String {
        format!("{}{}", self.app_id, CONTROLLER_SERVICE_SUFFIX)
    }

    /// Services announced at registration: the controller first, then any
    /// configured extras that are not already listed.
    pub fn exported(&self) -> Vec<String> {
        let mut exported = vec![self.controller_service()];
        for service in &self.exported_services {
            if !exported.contains(service) {
                exported.push(service.clone());
            }
        }
        exported
    }
}
