use std::fmt;

/// Screens of the portal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Dashboard,
    Patients,
    Claims,
    Claim(u64),
    Documents,
    Analytics,
}

impl Route {
    /// Sidebar entries, in display order.
    pub const NAV: &'static [Route] = &[
        Route::Dashboard,
        Route::Patients,
        Route::Claims,
        Route::Documents,
        Route::Analytics,
    ];

    pub fn path(&self) -> String {
        match self {
            Route::Login => "/".to_string(),
            Route::Dashboard => "/dashboard".to_string(),
            Route::Patients => "/patients".to_string(),
            Route::Claims => "/claims".to_string(),
            Route::Claim(id) => format!("/claims/{id}"),
            Route::Documents => "/documents".to_string(),
            Route::Analytics => "/analytics".to_string(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Route::Login => "Sign in",
            Route::Dashboard => "Dashboard",
            Route::Patients => "Patients",
            Route::Claims => "Claims",
            Route::Claim(_) => "Claim",
            Route::Documents => "Documents",
            Route::Analytics => "Analytics",
        }
    }

    /// Every route except the login screen requires a token.
    pub fn is_protected(&self) -> bool {
        !matches!(self, Route::Login)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Where the portal sends the user. Implemented by the front end.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}
