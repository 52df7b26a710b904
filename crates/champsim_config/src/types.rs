//! The resolved simulator configuration handed to the file writer.
//!
//! These types carry an already parsed and validated ChampSim configuration.
//! The writer treats most of it as opaque data: it hashes the whole record,
//! hands element tables and module lists to the content generators, and reads
//! only module names and function maps itself.

use champsim_common::{BuildId, HashError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// A fully resolved build configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedConfig {
    /// Name of the simulator executable, relative to the binary directory.
    pub executable: String,
    /// Element tables (cores, caches, page-table walkers, memories).
    #[serde(default)]
    pub elements: Elements,
    /// Names of the modules to be compiled into this executable.
    #[serde(default)]
    pub modules_to_compile: Vec<String>,
    /// All known modules, grouped by kind.
    #[serde(default)]
    pub module_info: ModuleRegistry,
    /// The raw configuration data the constants header is derived from.
    #[serde(default)]
    pub config_file: Value,
    /// Environment settings forwarded to the makefile fragment.
    #[serde(default)]
    pub env: BTreeMap<String, String>,
}

/// The instantiated simulator elements.
///
/// Individual records are kept as JSON values; only the content generators
/// interpret them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Elements {
    /// Out-of-order core records.
    #[serde(default)]
    pub cores: Vec<Value>,
    /// Cache records.
    #[serde(default)]
    pub caches: Vec<Value>,
    /// Page-table walker records.
    #[serde(default)]
    pub ptws: Vec<Value>,
    /// Physical memory record.
    #[serde(default)]
    pub pmem: Value,
    /// Virtual memory record.
    #[serde(default)]
    pub vmem: Value,
}

/// The kinds of pluggable simulator modules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ModuleKind {
    /// Branch direction predictors.
    Branch,
    /// Branch target buffers.
    Btb,
    /// Indirect branch predictors.
    IndirectBranch,
    /// Cache prefetchers.
    Prefetcher,
    /// Cache replacement policies.
    Replacement,
}

impl ModuleKind {
    /// All kinds, in the order their registries are searched when joined.
    pub const ALL: [ModuleKind; 5] = [
        ModuleKind::Branch,
        ModuleKind::Btb,
        ModuleKind::IndirectBranch,
        ModuleKind::Prefetcher,
        ModuleKind::Replacement,
    ];

    /// The key this kind is stored under in the module registry.
    pub fn as_str(self) -> &'static str {
        match self {
            ModuleKind::Branch => "branch",
            ModuleKind::Btb => "btb",
            ModuleKind::IndirectBranch => "indirect_branch",
            ModuleKind::Prefetcher => "pref",
            ModuleKind::Replacement => "repl",
        }
    }
}

/// Known modules of each kind, keyed by module name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModuleRegistry {
    /// Branch direction predictors.
    #[serde(default)]
    pub branch: BTreeMap<String, ModuleInfo>,
    /// Branch target buffers.
    #[serde(default)]
    pub btb: BTreeMap<String, ModuleInfo>,
    /// Indirect branch predictors.
    #[serde(default)]
    pub indirect_branch: BTreeMap<String, ModuleInfo>,
    /// Cache prefetchers.
    #[serde(default)]
    pub pref: BTreeMap<String, ModuleInfo>,
    /// Cache replacement policies.
    #[serde(default)]
    pub repl: BTreeMap<String, ModuleInfo>,
}

impl ModuleRegistry {
    /// Returns the modules registered under `kind`.
    pub fn of_kind(&self, kind: ModuleKind) -> &BTreeMap<String, ModuleInfo> {
        match kind {
            ModuleKind::Branch => &self.branch,
            ModuleKind::Btb => &self.btb,
            ModuleKind::IndirectBranch => &self.indirect_branch,
            ModuleKind::Prefetcher => &self.pref,
            ModuleKind::Replacement => &self.repl,
        }
    }

    /// Merges all kinds into one name-keyed map and keeps only `selected` names.
    ///
    /// When two kinds register the same name, the kind that comes first in
    /// [`ModuleKind::ALL`] wins. Selected names with no registered module are
    /// ignored.
    pub fn joined(&self, selected: &[String]) -> BTreeMap<String, ModuleInfo> {
        let mut joined = BTreeMap::new();
        for name in selected {
            let found = ModuleKind::ALL
                .iter()
                .find_map(|kind| self.of_kind(*kind).get(name));
            if let Some(info) = found {
                joined.insert(name.clone(), info.clone());
            }
        }
        joined
    }
}

/// A single pluggable module.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModuleInfo {
    /// The module's unique name.
    pub name: String,
    /// Directory holding the module's sources.
    #[serde(default)]
    pub path: PathBuf,
    /// Whether the module uses the legacy function-name interface.
    #[serde(default)]
    pub legacy: bool,
    /// Mapping from generic hook names to this module's mangled names.
    #[serde(default)]
    pub func_map: BTreeMap<String, String>,
    /// Older hook names kept for modules that still use them.
    #[serde(default)]
    pub deprecated_func_map: BTreeMap<String, String>,
}

impl ModuleInfo {
    /// Returns the function map with deprecated aliases folded in.
    ///
    /// Entries from `func_map` take precedence over deprecated entries with
    /// the same key.
    pub fn function_map(&self) -> BTreeMap<&str, &str> {
        let mut map: BTreeMap<&str, &str> = self
            .deprecated_func_map
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        map.extend(self.func_map.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        map
    }
}

impl ParsedConfig {
    /// Computes the build identifier that namespaces this configuration's
    /// generated files.
    ///
    /// The configuration is hashed as the six-element sequence
    /// `[executable, elements, modules_to_compile, module_info, config_file, env]`.
    pub fn build_id(&self) -> Result<BuildId, HashError> {
        BuildId::of(&(
            &self.executable,
            &self.elements,
            &self.modules_to_compile,
            &self.module_info,
            &self.config_file,
            &self.env,
        ))
    }

    /// Returns the modules selected for compilation, with all kinds merged.
    pub fn compiled_modules(&self) -> BTreeMap<String, ModuleInfo> {
        self.module_info.joined(&self.modules_to_compile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn module(name: &str, funcs: &[(&str, &str)]) -> ModuleInfo {
        ModuleInfo {
            name: name.to_string(),
            path: PathBuf::from(format!("prefetcher/{name}")),
            legacy: false,
            func_map: funcs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            deprecated_func_map: BTreeMap::new(),
        }
    }

    #[test]
    fn joined_filters_to_selected_modules() {
        let mut registry = ModuleRegistry::default();
        registry
            .pref
            .insert("next_line".to_string(), module("next_line", &[]));
        registry.pref.insert("ip_stride".to_string(), module("ip_stride", &[]));
        registry.repl.insert("lru".to_string(), module("lru", &[]));

        let joined = registry.joined(&["next_line".to_string(), "lru".to_string()]);
        assert_eq!(joined.keys().collect::<Vec<_>>(), vec!["lru", "next_line"]);
    }

    #[test]
    fn joined_ignores_unknown_names() {
        let registry = ModuleRegistry::default();
        assert!(registry.joined(&["missing".to_string()]).is_empty());
    }

    #[test]
    fn joined_prefers_earlier_kind() {
        let mut registry = ModuleRegistry::default();
        let mut branch = module("shared", &[]);
        branch.path = PathBuf::from("branch/shared");
        registry.branch.insert("shared".to_string(), branch);
        registry.repl.insert("shared".to_string(), module("shared", &[]));

        let joined = registry.joined(&["shared".to_string()]);
        assert_eq!(joined["shared"].path, PathBuf::from("branch/shared"));
    }

    #[test]
    fn function_map_merges_deprecated_aliases() {
        let mut info = module("lru", &[("repl_init", "lru_initialize")]);
        info.deprecated_func_map
            .insert("initialize_replacement".to_string(), "lru_initialize".to_string());
        info.deprecated_func_map
            .insert("repl_init".to_string(), "stale".to_string());

        let map = info.function_map();
        assert_eq!(map.len(), 2);
        assert_eq!(map["repl_init"], "lru_initialize");
        assert_eq!(map["initialize_replacement"], "lru_initialize");
    }

    #[test]
    fn build_id_is_stable() {
        let config = ParsedConfig {
            executable: "champsim".to_string(),
            modules_to_compile: vec!["lru".to_string()],
            ..Default::default()
        };
        assert_eq!(config.build_id().unwrap(), config.clone().build_id().unwrap());
    }

    #[test]
    fn build_id_tracks_every_field() {
        let base = ParsedConfig {
            executable: "champsim".to_string(),
            ..Default::default()
        };
        let mut with_env = base.clone();
        with_env
            .env
            .insert("CXX".to_string(), "clang++".to_string());
        let mut with_pmem = base.clone();
        with_pmem.elements.pmem = json!({"name": "DRAM", "channels": 2});

        let id = base.build_id().unwrap();
        assert_ne!(id, with_env.build_id().unwrap());
        assert_ne!(id, with_pmem.build_id().unwrap());
    }

    #[test]
    fn build_id_ignores_json_key_order() {
        let a: ParsedConfig = serde_json::from_str(
            r#"{"executable": "champsim", "config_file": {"rob_size": 352, "block_size": 64}}"#,
        )
        .unwrap();
        let b: ParsedConfig = serde_json::from_str(
            r#"{"config_file": {"block_size": 64, "rob_size": 352}, "executable": "champsim"}"#,
        )
        .unwrap();
        assert_eq!(a.build_id().unwrap(), b.build_id().unwrap());
    }

    #[test]
    fn deserialize_with_defaults() {
        let config: ParsedConfig = serde_json::from_str(r#"{"executable": "champsim"}"#).unwrap();
        assert!(config.modules_to_compile.is_empty());
        assert!(config.elements.cores.is_empty());
        assert_eq!(config.elements.pmem, Value::Null);
    }

    #[test]
    fn module_kind_keys() {
        let keys: Vec<_> = ModuleKind::ALL.iter().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["branch", "btb", "indirect_branch", "pref", "repl"]);
    }
}
