use anyhow::Context;
use dossier_types::ModuleDefinition;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

mod default;


/// Ordered set of wizard modules.
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleCatalog {
    modules: Vec<ModuleDefinition>,
}

#[derive(Deserialize)]
struct CatalogFile {
    modules: Vec<ModuleDefinition>,
}

impl ModuleCatalog {
    /// Module ids must be unique, and so must question ids across the whole
    /// catalog since conditions read the project-wide answer map.
    pub fn new(modules: Vec<ModuleDefinition>) -> anyhow::Result<Self> {
        let mut module_ids = HashSet::new();
        let mut question_ids = HashSet::new();

        for module in &modules {
            if !module_ids.insert(module.id.as_str()) {
                anyhow::bail!("Duplicate module id '{}'", module.id);
            }
            for question_id in module.all_question_ids() {
                if !question_ids.insert(question_id) {
                    anyhow::bail!(
                        "Duplicate question id '{}' (module '{}')",
                        question_id,
                        module.id
                    );
                }
            }
        }

        Ok(Self { modules })
    }

    /// The built-in demand dossier modules.
    pub fn builtin() -> Self {
        Self {
            modules: default::modules(),
        }
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let file: CatalogFile = toml::from_str(content).context("Invalid module catalog")?;
        Self::new(file.modules)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read module catalog {}", path.display()))?;
        Self::from_toml_str(&content)
    }

    pub fn modules(&self) -> &[ModuleDefinition] {
        &self.modules
    }

    pub fn get(&self, module_id: &str) -> Option<&ModuleDefinition> {
        self.modules.iter().find(|m| m.id == module_id)
    }

    pub fn index_of(&self, module_id: &str) -> Option<usize> {
        self.modules.iter().position(|m| m.id == module_id)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl Default for ModuleCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
