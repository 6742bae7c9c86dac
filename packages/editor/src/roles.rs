//! # Roles and capabilities
//!
//! A [`Session`] is created at sign-in (or "continue as guest") and carries the
//! role and identity of whoever is at the keyboard. Everything the UI may show
//! is derived from it through [`Capabilities::resolve`]:
//!
//! | Role | Edits | Templates | Text styles | Toolbar | Framed page |
//! |------|-------|-----------|-------------|---------|-------------|
//! | editor | own documents | - | - | full | yes |
//! | designer | templates | yes | yes | compact | no |
//! | admin | documents and templates | yes | yes | full | yes |
//! | none / unknown | nothing | - | - | hidden | yes |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UnknownRole;
use crate::sync::SurfaceMode;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Editor,
    Designer,
    Admin,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Editor, Role::Designer, Role::Admin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Editor => "editor",
            Role::Designer => "designer",
            Role::Admin => "admin",
        }
    }

    /// Parse a role name, treating anything unrecognised as no role.
    pub fn parse_lenient(name: &str) -> Option<Role> {
        name.parse().ok()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "editor" => Ok(Role::Editor),
            "designer" => Ok(Role::Designer),
            "admin" => Ok(Role::Admin),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Identity {
    User(String),
    Guest,
}

/// Who is using the app. Immutable for its lifetime; a new one is built on
/// every sign-in and dropped at logout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub role: Option<Role>,
    pub identity: Identity,
}

impl Session {
    pub fn guest(role: Option<Role>) -> Self {
        Self {
            role,
            identity: Identity::Guest,
        }
    }

    pub fn user(id: impl Into<String>, role: Option<Role>) -> Self {
        Self {
            role,
            identity: Identity::User(id.into()),
        }
    }

    pub fn is_guest(&self) -> bool {
        self.identity == Identity::Guest
    }

    pub fn capabilities(&self) -> Capabilities {
        Capabilities::resolve(self.role)
    }

    /// Key prefix for this session's documents: the user id, or the guest
    /// local-storage key for the role.
    pub fn storage_namespace(&self) -> String {
        match &self.identity {
            Identity::User(id) => id.clone(),
            Identity::Guest => store::guest::documents_key(self.role.map(|r| r.as_str()).unwrap_or("guest")),
        }
    }

    pub fn owner(&self) -> store::OwnerContext {
        match &self.identity {
            Identity::User(id) => store::OwnerContext::User(id.clone()),
            Identity::Guest => store::OwnerContext::Guest,
        }
    }
}

/// What the editing session is pointed at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EditTarget {
    Nothing,
    OwnDocuments,
    Templates,
    DocumentsAndTemplates,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ToolbarVariant {
    Full,
    Compact,
    Hidden,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Capabilities {
    pub can_edit: bool,
    pub edit_target: EditTarget,
    pub can_manage_templates: bool,
    pub can_manage_styles: bool,
    pub toolbar: ToolbarVariant,
    /// Show the page inside a bordered frame.
    pub framed_page: bool,
}

impl Capabilities {
    pub const NONE: Capabilities = Capabilities {
        can_edit: false,
        edit_target: EditTarget::Nothing,
        can_manage_templates: false,
        can_manage_styles: false,
        toolbar: ToolbarVariant::Hidden,
        framed_page: true,
    };

    pub fn resolve(role: Option<Role>) -> Self {
        match role {
            Some(Role::Editor) => Capabilities {
                can_edit: true,
                edit_target: EditTarget::OwnDocuments,
                can_manage_templates: false,
                can_manage_styles: false,
                toolbar: ToolbarVariant::Full,
                framed_page: true,
            },
            Some(Role::Designer) => Capabilities {
                can_edit: true,
                edit_target: EditTarget::Templates,
                can_manage_templates: true,
                can_manage_styles: true,
                toolbar: ToolbarVariant::Compact,
                framed_page: false,
            },
            Some(Role::Admin) => Capabilities {
                can_edit: true,
                edit_target: EditTarget::DocumentsAndTemplates,
                can_manage_templates: true,
                can_manage_styles: true,
                toolbar: ToolbarVariant::Full,
                framed_page: true,
            },
            None => Self::NONE,
        }
    }

    /// Resolve from a raw role name. Unknown names get no capabilities.
    pub fn resolve_name(name: &str) -> Self {
        Self::resolve(Role::parse_lenient(name))
    }

    pub fn surface_mode(&self) -> SurfaceMode {
        if self.can_edit {
            SurfaceMode::Editable
        } else {
            SurfaceMode::Static
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parsing() {
        assert_eq!("Designer".parse::<Role>(), Ok(Role::Designer));
        assert_eq!(" admin ".parse::<Role>(), Ok(Role::Admin));
        assert_eq!("owner".parse::<Role>(), Err(UnknownRole("owner".to_string())));
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>(), Ok(role));
        }
    }

    #[test]
    fn test_capability_table() {
        let editor = Capabilities::resolve(Some(Role::Editor));
        assert!(editor.can_edit && !editor.can_manage_templates);
        assert_eq!(editor.toolbar, ToolbarVariant::Full);

        let designer = Capabilities::resolve(Some(Role::Designer));
        assert_eq!(designer.edit_target, EditTarget::Templates);
        assert_eq!(designer.toolbar, ToolbarVariant::Compact);
        assert!(!designer.framed_page);

        let admin = Capabilities::resolve(Some(Role::Admin));
        assert!(admin.can_manage_templates && admin.can_manage_styles);
        assert_eq!(admin.edit_target, EditTarget::DocumentsAndTemplates);
    }

    #[test]
    fn test_unknown_role_gets_nothing() {
        let caps = Capabilities::resolve_name("superuser");
        assert_eq!(caps, Capabilities::NONE);
        assert!(!caps.can_edit && !caps.can_manage_templates && !caps.can_manage_styles);
        assert_eq!(caps.surface_mode(), SurfaceMode::Static);
    }

    #[test]
    fn test_storage_namespace() {
        assert_eq!(Session::guest(Some(Role::Designer)).storage_namespace(), "designerDocuments");
        assert_eq!(Session::user("u-1", Some(Role::Editor)).storage_namespace(), "u-1");
        assert_eq!(Session::guest(Some(Role::Editor)).owner(), store::OwnerContext::Guest);
    }
}
