use crate::{
    error::SettingsError,
    settings::{CompilerSettings, validated::ValidatedSettings},
};
use tracing::{debug, warn};

/// Checks settings for consistency before compilers are built from them.
pub struct SettingsValidator<'a> {
    settings: &'a CompilerSettings,
}

impl<'a> SettingsValidator<'a> {
    pub fn new(settings: &'a CompilerSettings) -> Self {
        Self { settings }
    }

    pub fn validate(&self) -> Result<ValidatedSettings, SettingsError> {
        let mut errors: Vec<String> = Vec::new();

        self.validate_prefixes(&mut errors);
        self.validate_variables(&mut errors);
        self.validate_schema(&mut errors);

        if !errors.is_empty() {
            return Err(SettingsError::Invalid(errors));
        }

        debug!("Settings validation completed successfully");
        Ok(ValidatedSettings::from_settings(self.settings))
    }

    fn validate_prefixes(&self, errors: &mut Vec<String>) {
        for (prefix, namespace) in &self.settings.prefixes {
            if prefix.is_empty() || prefix.contains([':', '/', '$']) {
                errors.push(format!("prefix '{prefix}' is not a valid name"));
            }
            if !self.settings.standard_names.contains_key(namespace) {
                errors.push(format!(
                    "prefix '{prefix}' is bound to '{namespace}', which has no standard name"
                ));
            }
        }
    }

    fn validate_variables(&self, errors: &mut Vec<String>) {
        for (name, target) in &self.settings.variables {
            if !self.settings.standard_names.contains_key(&target.namespace) {
                errors.push(format!(
                    "variable '${name}' is bound to '{}', which has no standard name",
                    target.namespace
                ));
            }
            if target.local_name.trim().is_empty() {
                errors.push(format!("variable '${name}' has an empty local name"));
            }
        }
    }

    fn validate_schema(&self, errors: &mut Vec<String>) {
        let schema = &self.settings.schema;
        for (key, value) in [
            ("records_table", &schema.records_table),
            ("values_table", &schema.values_table),
            ("identifier_column", &schema.identifier_column),
        ] {
            if value.trim().is_empty() {
                errors.push(format!("schema.{key} must not be empty"));
            }
        }
        if schema.records_table == schema.values_table {
            warn!(
                "Records and values share table '{}'; aliases will collide with the record scan",
                schema.records_table
            );
        }
    }
}
