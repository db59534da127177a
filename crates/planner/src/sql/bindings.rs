//! Resolution of ebRIM-style property names into EAV standard paths.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualifiedName {
    pub namespace: String,
    pub local_name: String,
}

impl QualifiedName {
    pub fn new(namespace: impl Into<String>, local_name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            local_name: local_name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindingError {
    #[error("prefix '{0}' is not bound to a namespace")]
    UnboundPrefix(String),

    #[error("variable '${0}' is not bound")]
    UnboundVariable(String),

    #[error("namespace '{0}' has no standard name")]
    UnknownNamespace(String),
}

/// Prefix, variable and standard-name tables of one request.
#[derive(Debug, Clone, Default)]
pub struct NamespaceBindings {
    prefixes: HashMap<String, String>,
    variables: HashMap<String, QualifiedName>,
    standard_names: HashMap<String, String>,
}

impl NamespaceBindings {
    pub fn new(
        prefixes: HashMap<String, String>,
        variables: HashMap<String, QualifiedName>,
        standard_names: HashMap<String, String>,
    ) -> Self {
        Self {
            prefixes,
            variables,
            standard_names,
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>, namespace: impl Into<String>) -> Self {
        self.prefixes.insert(prefix.into(), namespace.into());
        self
    }

    pub fn with_variable(mut self, name: impl Into<String>, target: QualifiedName) -> Self {
        self.variables.insert(name.into(), target);
        self
    }

    pub fn with_standard_name(
        mut self,
        namespace: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        self.standard_names.insert(namespace.into(), name.into());
        self
    }

    /// Merges request-scoped bindings over these ones.
    pub fn extend(
        &mut self,
        prefixes: impl IntoIterator<Item = (String, String)>,
        variables: impl IntoIterator<Item = (String, QualifiedName)>,
    ) {
        self.prefixes.extend(prefixes);
        self.variables.extend(variables);
    }

    /// Turns `prefix:Element/@attr` or `$variable/@attr` into
    /// `Standard Name:Element:attr`.
    ///
    /// Names without prefix or variable pass through with only the `/@` rewrite.
    pub fn standard_path(&self, property: &str) -> Result<String, BindingError> {
        let (head, rest) = match property.split_once('/') {
            Some((head, rest)) => (head, Some(rest)),
            None => (property, None),
        };

        let mut path = if let Some(variable) = head.strip_prefix('$') {
            let target = self
                .variables
                .get(variable)
                .ok_or_else(|| BindingError::UnboundVariable(variable.to_string()))?;
            format!("{}:{}", self.standard_name(&target.namespace)?, target.local_name)
        } else if let Some((prefix, element)) = head.split_once(':') {
            let namespace = self
                .prefixes
                .get(prefix)
                .ok_or_else(|| BindingError::UnboundPrefix(prefix.to_string()))?;
            format!("{}:{element}", self.standard_name(namespace)?)
        } else {
            head.to_string()
        };

        if let Some(rest) = rest {
            for step in rest.split('/') {
                path.push('/');
                path.push_str(&unprefixed_step(step));
            }
        }

        let path = path.replace("/@", ":");
        debug!("Resolved '{property}' to standard path '{path}'");
        Ok(path)
    }

    fn standard_name(&self, namespace: &str) -> Result<&str, BindingError> {
        self.standard_names
            .get(namespace)
            .map(String::as_str)
            .ok_or_else(|| BindingError::UnknownNamespace(namespace.to_string()))
    }
}

/// `rim:Name` -> `Name`, `@rim:id` -> `@id`.
fn unprefixed_step(step: &str) -> String {
    let (marker, name) = match step.strip_prefix('@') {
        Some(name) => ("@", name),
        None => ("", step),
    };
    let name = name.split_once(':').map_or(name, |(_, local)| local);
    format!("{marker}{name}")
}
