//! In-memory template library with built-in templates.

use std::{
    collections::HashMap,
    path::Path,
    sync::{Arc, RwLock},
};

use s2e_project_core::{application::ApplicationError, error::ProjectResult};
use tracing::{debug, info, instrument, warn};

use crate::{builtin_templates, renderer, template_loader::OverrideLoader};

/// Thread-safe map from template name to template source.
///
/// Sources are compiled as Jinja on insertion, so anything in the library
/// parses.
#[derive(Clone, Default)]
pub struct TemplateLibrary {
    inner: Arc<RwLock<HashMap<String, String>>>,
}

impl TemplateLibrary {
    /// Create a new empty library.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a library with the built-in templates loaded.
    pub fn with_builtin() -> ProjectResult<Self> {
        let library = Self::new();
        library.load_builtin()?;
        Ok(library)
    }

    /// Load the built-in templates.
    pub fn load_builtin(&self) -> ProjectResult<usize> {
        for (name, source) in builtin_templates::all_templates() {
            self.insert(*name, *source)?;
        }
        Ok(builtin_templates::all_templates().len())
    }

    /// Load every template under `dir`, shadowing templates of the same
    /// name. Malformed templates are skipped with a warning.
    #[instrument(skip(self), fields(dir = %dir.display()))]
    pub fn load_overrides(&self, dir: &Path) -> ProjectResult<usize> {
        let mut loaded = 0;

        for (name, source) in OverrideLoader::new(dir).load_all()? {
            let shadows = self.contains(&name);
            match self.insert(name.clone(), source) {
                Ok(()) => {
                    debug!(template = %name, shadows, "Loaded override template");
                    loaded += 1;
                }
                Err(e) => warn!(template = %name, error = %e, "Skipping invalid template"),
            }
        }

        info!(count = loaded, "Loaded override templates");
        Ok(loaded)
    }

    /// Add or replace a template.
    pub fn insert(&self, name: impl Into<String>, source: impl Into<String>) -> ProjectResult<()> {
        let name = name.into();
        let source = source.into();
        renderer::check_syntax(&name, &source)?;

        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;
        inner.insert(name, source);
        Ok(())
    }

    /// Get a template's source.
    pub fn get(&self, name: &str) -> ProjectResult<String> {
        self.lookup(name)?.ok_or_else(|| {
            ApplicationError::TemplateNotFound {
                name: name.to_string(),
            }
            .into()
        })
    }

    /// Template source, or `None` if no template has this name.
    pub fn lookup(&self, name: &str) -> ProjectResult<Option<String>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;
        Ok(inner.get(name).cloned())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner
            .read()
            .map(|inner| inner.contains_key(name))
            .unwrap_or(false)
    }

    /// Template names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .inner
            .read()
            .map(|inner| inner.keys().cloned().collect())
            .unwrap_or_default();
        names.sort();
        names
    }

    /// Get the number of templates.
    pub fn len(&self) -> usize {
        self.inner.read().map(|inner| inner.len()).unwrap_or(0)
    }

    /// Check if the library is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;

    use s2e_project_core::{domain::DomainError, error::ProjectError};
    use tempfile::TempDir;

    #[test]
    fn builtin_templates_are_loaded() {
        let library = TemplateLibrary::with_builtin().unwrap();
        assert_eq!(library.len(), builtin_templates::all_templates().len());
        assert!(library.contains("bootstrap.cgc.sh"));
        assert!(library.get("s2e-config.lua").unwrap().contains("{% include"));
    }

    #[test]
    fn insert_rejects_malformed_templates() {
        let library = TemplateLibrary::new();
        let err = library.insert("bad", "{% if x %}").unwrap_err();
        assert!(matches!(
            err,
            ProjectError::Domain(DomainError::TemplateSyntax { .. })
        ));
        assert!(library.is_empty());
    }

    #[test]
    fn accepts_whitespace_control_filters_and_loops() {
        let library = TemplateLibrary::new();
        library.insert("ws", "{%- if use_seeds -%}\nseeds\n{%- endif -%}").unwrap();
        library.insert("filter", "{{ target | upper }}").unwrap();
        library.insert("loop", "{% for f in fs %}{{ f }}{% endfor %}").unwrap();
        assert_eq!(library.names(), vec!["filter", "loop", "ws"]);
    }

    #[test]
    fn get_unknown_template() {
        assert!(matches!(
            TemplateLibrary::new().get("x"),
            Err(ProjectError::Application(
                ApplicationError::TemplateNotFound { .. }
            ))
        ));
    }

    #[test]
    fn overrides_shadow_builtins_and_skip_invalid() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("models.lua"), "-- custom models\n").unwrap();
        fs::write(dir.path().join("extra.lua"), "-- {{ target }}\n").unwrap();
        fs::write(dir.path().join("broken.lua"), "{% endif %}").unwrap();

        let library = TemplateLibrary::with_builtin().unwrap();
        let builtin = library.len();
        let loaded = library.load_overrides(dir.path()).unwrap();

        assert_eq!(loaded, 2);
        assert_eq!(library.get("models.lua").unwrap(), "-- custom models\n");
        assert_eq!(library.len(), builtin + 1);
        assert!(!library.contains("broken.lua"));
    }

    #[test]
    fn names_are_sorted() {
        let library = TemplateLibrary::new();
        library.insert("b", "").unwrap();
        library.insert("a", "").unwrap();
        assert_eq!(library.names(), vec!["a", "b"]);
    }
}
