use crate::settings::{Backend, CompilerSettings, RequestBindings};
use model::{error::FilterError, filter::PredicateTree, query::CompositeQuery};
use planner::{
    index::IndexCompiler,
    sql::{NamespaceBindings, SqlCompiler, SqlQueryRenderer, SqlSchema, dialect::DialectKind},
};
use std::collections::{BTreeMap, HashMap};

/// Settings that passed validation, ready to build compilers from.
#[derive(Debug, Clone)]
pub struct ValidatedSettings {
    pub backend: Backend,
    pub dialect: DialectKind,
    pub schema: SqlSchema,
    bindings: NamespaceBindings,
}

impl ValidatedSettings {
    pub(crate) fn from_settings(settings: &CompilerSettings) -> Self {
        let bindings = NamespaceBindings::new(
            clone_map(&settings.prefixes),
            clone_map(&settings.variables),
            clone_map(&settings.standard_names),
        );

        Self {
            backend: settings.backend,
            dialect: settings.dialect,
            schema: settings.schema.clone(),
            bindings,
        }
    }

    pub fn bindings(&self) -> &NamespaceBindings {
        &self.bindings
    }

    /// Bindings of one request, layered over the configured ones.
    pub fn with_request_bindings(&self, request: RequestBindings) -> NamespaceBindings {
        let mut bindings = self.bindings.clone();
        bindings.extend(request.prefixes, request.variables);
        bindings
    }

    pub fn index_compiler(&self) -> IndexCompiler {
        IndexCompiler::index()
    }

    pub fn sql_compiler(&self, bindings: NamespaceBindings) -> SqlCompiler {
        SqlCompiler::new(
            SqlQueryRenderer::new(bindings)
                .with_schema(self.schema.clone())
                .with_dialect(self.dialect),
        )
    }

    /// Compiles a tree for `backend` with the configured bindings.
    pub fn compile(
        &self,
        backend: Backend,
        tree: &PredicateTree,
    ) -> Result<CompositeQuery, FilterError> {
        self.compile_with_bindings(backend, tree, RequestBindings::default())
    }

    /// Compiles a tree with the request's own prefixes and variables in scope.
    ///
    /// The index backend does not resolve names, so it ignores them.
    pub fn compile_with_bindings(
        &self,
        backend: Backend,
        tree: &PredicateTree,
        request: RequestBindings,
    ) -> Result<CompositeQuery, FilterError> {
        match backend {
            Backend::Index => self.index_compiler().compile(tree),
            Backend::Sql => self
                .sql_compiler(self.with_request_bindings(request))
                .compile(tree),
        }
    }
}

fn clone_map<V: Clone>(map: &BTreeMap<String, V>) -> HashMap<String, V> {
    map.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::EBRIM_V30;
    use model::filter::{Comparison, Logical};
    use planner::sql::QualifiedName;

    fn validated() -> ValidatedSettings {
        let mut settings = CompilerSettings::default();
        settings
            .prefixes
            .insert("rim".to_string(), EBRIM_V30.to_string());
        settings.validate().unwrap()
    }

    #[test]
    fn test_compile_with_each_backend() {
        let tree: PredicateTree = Logical::and()
            .comparison(Comparison::equal("Title", "VM"))
            .into();
        let settings = validated();

        let index = settings.compile(Backend::Index, &tree).unwrap();
        assert_eq!(index.text, "(Title:\"VM\")");

        let sql = settings.compile(Backend::Sql, &tree).unwrap();
        assert!(sql.text.contains("v1.path = 'Title' AND v1.value = 'VM'"));
    }

    #[test]
    fn test_request_bindings_override() {
        let settings = validated();
        let bindings = settings.with_request_bindings(RequestBindings {
            prefixes: HashMap::from([("r".to_string(), EBRIM_V30.to_string())]),
            variables: HashMap::from([(
                "p".to_string(),
                QualifiedName::new(EBRIM_V30, "RegistryPackage"),
            )]),
        });

        assert_eq!(bindings.standard_path("$p/@id").unwrap(), "Ebrim v3.0:RegistryPackage:id");
        assert_eq!(
            bindings.standard_path("r:Service/@id").unwrap(),
            "Ebrim v3.0:Service:id"
        );
    }

    #[test]
    fn test_compile_with_request_variable() {
        let tree: PredicateTree = Comparison::equal("$p/@id", "urn:x").into();
        let settings = validated();
        assert!(settings.compile(Backend::Sql, &tree).is_err());

        let request = RequestBindings {
            variables: HashMap::from([(
                "p".to_string(),
                QualifiedName::new(EBRIM_V30, "RegistryPackage"),
            )]),
            ..RequestBindings::default()
        };
        let sql = settings
            .compile_with_bindings(Backend::Sql, &tree, request)
            .unwrap();
        assert!(sql.text.contains("v1.path = 'Ebrim v3.0:RegistryPackage:id'"));
    }
}
