//! Compiler settings: namespace tables, request bindings and the EAV schema.

use crate::{error::SettingsError, settings::validator::SettingsValidator};
use planner::sql::{QualifiedName, SqlSchema, dialect::DialectKind};
use serde::{Deserialize, Serialize};
use std::{
    collections::{BTreeMap, HashMap},
    path::Path,
};
use tracing::info;
use validated::ValidatedSettings;

pub mod validated;
pub mod validator;

pub const EBRIM_V25: &str = "urn:oasis:names:tc:ebxml-regrep:rim:xsd:2.5";
pub const EBRIM_V30: &str = "urn:oasis:names:tc:ebxml-regrep:xsd:rim:3.0";
pub const WRS_V10: &str = "http://www.opengis.net/cat/wrs/1.0";
pub const ISO_19115: &str = "http://www.isotc211.org/2005/gmd";
pub const DUBLIN_CORE: &str = "http://purl.org/dc/elements/1.1/";

/// Which renderer the compiler targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Index,
    Sql,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompilerSettings {
    pub backend: Backend,
    pub dialect: DialectKind,
    /// prefix -> namespace URI
    pub prefixes: BTreeMap<String, String>,
    /// variable name -> qualified element
    pub variables: BTreeMap<String, QualifiedName>,
    /// namespace URI -> standard name used in EAV paths
    pub standard_names: BTreeMap<String, String>,
    pub schema: SqlSchema,
}

impl Default for CompilerSettings {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            dialect: DialectKind::default(),
            prefixes: BTreeMap::new(),
            variables: BTreeMap::new(),
            standard_names: default_standard_names(),
            schema: SqlSchema::default(),
        }
    }
}

impl CompilerSettings {
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load_from_file(path: &Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json(&json)?;
        info!(
            "Loaded settings from {} ({} prefixes, {} variables)",
            path.display(),
            settings.prefixes.len(),
            settings.variables.len()
        );
        Ok(settings)
    }

    pub fn validate(&self) -> Result<ValidatedSettings, SettingsError> {
        SettingsValidator::new(self).validate()
    }
}

/// Prefix and variable declarations that come with one request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RequestBindings {
    pub prefixes: HashMap<String, String>,
    pub variables: HashMap<String, QualifiedName>,
}

impl RequestBindings {
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load_from_file(path: &Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let bindings = Self::from_json(&json)?;
        info!(
            "Loaded request bindings from {} ({} prefixes, {} variables)",
            path.display(),
            bindings.prefixes.len(),
            bindings.variables.len()
        );
        Ok(bindings)
    }
}

pub fn default_standard_names() -> BTreeMap<String, String> {
    [
        (EBRIM_V25, "Ebrim v2.5"),
        (EBRIM_V30, "Ebrim v3.0"),
        (WRS_V10, "Web Registry Service v1.0"),
        (ISO_19115, "ISO 19115:2003"),
        (DUBLIN_CORE, "DublinCore"),
    ]
    .into_iter()
    .map(|(namespace, name)| (namespace.to_string(), name.to_string()))
    .collect()
}
