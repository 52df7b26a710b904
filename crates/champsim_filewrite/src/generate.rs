//! Planning the generated files for one configuration.
//!
//! [`FileWriter::write_files`] derives the build identifier, resolves the output
//! directories and asks the content generators for every fixed and per-module
//! file. It returns the resulting fragments rather than storing them, so the
//! caller decides how fragments from several configurations are combined
//! before the final [`FileWriter::flush`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use champsim_common::BuildId;
use champsim_config::{
    resolve_dirs, DirOverrides, Elements, ModuleInfo, ParsedConfig, WriterOptions,
};
use serde_json::Value;
use tracing::debug;

use crate::banner::BannerTable;
use crate::error::{FileWriteError, GenerateError};
use crate::fragment::FragmentSet;
use crate::writer::{flush, FlushReport};

/// Instantiation file name inside the include directory.
pub const INSTANTIATION_FILE_NAME: &str = "core_inst.inc";
/// Constants header name inside the include directory.
pub const CONSTANTS_FILE_NAME: &str = "champsim_constants.h";
/// Core module declarations file name.
pub const CORE_MODULE_DECLARATION_FILE_NAME: &str = "ooo_cpu_module_decl.inc";
/// Core module definitions file name.
pub const CORE_MODULE_DEFINITION_FILE_NAME: &str = "ooo_cpu_module_def.inc";
/// Cache module declarations file name.
pub const CACHE_MODULE_DECLARATION_FILE_NAME: &str = "cache_module_decl.inc";
/// Cache module definitions file name.
pub const CACHE_MODULE_DEFINITION_FILE_NAME: &str = "cache_module_def.inc";
/// Makefile fragment name inside the repository root.
pub const MAKEFILE_FILE_NAME: &str = "_configuration.mk";

/// Include directory below `{objdir}/{build_id}`.
const INC_SUBDIR: &str = "inc";

/// Extension of per-module function map files.
const MODULE_MAP_EXT: &str = "inc";

/// Declaration and definition lines for one module category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleLines {
    /// Lines for the declarations file.
    pub declarations: Vec<String>,
    /// Lines for the definitions file.
    pub definitions: Vec<String>,
}

/// Everything the makefile generator is given.
#[derive(Debug, Clone, Copy)]
pub struct MakefileInputs<'a> {
    /// Object directory as configured (not made absolute).
    pub objdir: &'a Path,
    /// The configuration's build identifier.
    pub build_id: BuildId,
    /// Normalized path of the executable in the binary directory.
    pub executable: &'a Path,
    /// Source directories, core sources last.
    pub source_dirs: &'a [PathBuf],
    /// Modules compiled into the executable.
    pub modules: &'a BTreeMap<String, ModuleInfo>,
    /// Environment settings from the configuration.
    pub env: &'a BTreeMap<String, String>,
}

/// The content generators a [`FileWriter`] draws lines from.
///
/// Each method returns complete lines without terminators.
pub trait FragmentSources {
    /// Lines of the core/cache instantiation file.
    fn instantiation_lines(&self, elements: &Elements) -> Result<Vec<String>, GenerateError>;

    /// Lines of the constants header.
    fn constants_lines(&self, config_file: &Value, pmem: &Value)
        -> Result<Vec<String>, GenerateError>;

    /// Core module declarations and definitions.
    fn core_module_lines(
        &self,
        indirect_branch: &BTreeMap<String, ModuleInfo>,
        branch: &BTreeMap<String, ModuleInfo>,
        btb: &BTreeMap<String, ModuleInfo>,
    ) -> Result<ModuleLines, GenerateError>;

    /// Cache module declarations and definitions.
    fn cache_module_lines(
        &self,
        pref: &BTreeMap<String, ModuleInfo>,
        repl: &BTreeMap<String, ModuleInfo>,
    ) -> Result<ModuleLines, GenerateError>;

    /// Lines of the makefile fragment.
    fn makefile_lines(&self, inputs: &MakefileInputs<'_>) -> Result<Vec<String>, GenerateError>;
}

/// One `#define` line per function map entry, deprecated aliases included.
pub fn function_map_lines(module: &ModuleInfo) -> Vec<String> {
    module
        .function_map()
        .into_iter()
        .map(|(name, value)| format!("#define {name} {value}"))
        .collect()
}

fn stage<T>(name: &'static str, result: Result<T, GenerateError>) -> Result<T, FileWriteError> {
    result.map_err(|source| FileWriteError::Generator {
        stage: name,
        source,
    })
}

/// Plans generated files and writes them with change detection.
#[derive(Debug, Clone)]
pub struct FileWriter {
    options: WriterOptions,
    banners: BannerTable,
}

impl FileWriter {
    /// Creates a writer with the given default directories and banner overrides.
    pub fn new(options: WriterOptions) -> Self {
        let banners = BannerTable::with_overrides(&options.banners);
        Self { options, banners }
    }

    /// Returns the writer's settings.
    pub fn options(&self) -> &WriterOptions {
        &self.options
    }

    /// Returns the banner table used when flushing.
    pub fn banners(&self) -> &BannerTable {
        &self.banners
    }

    /// Path of the makefile fragment, outside any build-id directory.
    pub fn makefile_path(&self) -> PathBuf {
        self.options.repo_root.join(MAKEFILE_FILE_NAME)
    }

    /// Produces the fragments for one configuration.
    ///
    /// Generated headers go to `{objdir}/{build_id}/inc/`, with `objdir` made
    /// absolute. The makefile fragment goes to the repository root. Nothing is
    /// written to disk here.
    pub fn write_files(
        &self,
        config: &ParsedConfig,
        overrides: &DirOverrides,
        sources: &dyn FragmentSources,
    ) -> Result<FragmentSet, FileWriteError> {
        let build_id = config.build_id()?;
        let dirs = resolve_dirs(&self.options, overrides)?;
        let inc_dir = dirs.objdir_abs.join(build_id.to_string()).join(INC_SUBDIR);
        debug!(%build_id, inc_dir = ?inc_dir, executable = %config.executable, "planning generated files");

        let mut fragments = FragmentSet::new();

        fragments.submit(
            inc_dir.join(INSTANTIATION_FILE_NAME),
            stage("instantiation", sources.instantiation_lines(&config.elements))?,
        );
        fragments.submit(
            inc_dir.join(CONSTANTS_FILE_NAME),
            stage(
                "constants",
                sources.constants_lines(&config.config_file, &config.elements.pmem),
            )?,
        );

        let registry = &config.module_info;
        let core = stage(
            "core module",
            sources.core_module_lines(&registry.indirect_branch, &registry.branch, &registry.btb),
        )?;
        fragments.submit(inc_dir.join(CORE_MODULE_DECLARATION_FILE_NAME), core.declarations);
        fragments.submit(inc_dir.join(CORE_MODULE_DEFINITION_FILE_NAME), core.definitions);

        let cache = stage(
            "cache module",
            sources.cache_module_lines(&registry.pref, &registry.repl),
        )?;
        fragments.submit(inc_dir.join(CACHE_MODULE_DECLARATION_FILE_NAME), cache.declarations);
        fragments.submit(inc_dir.join(CACHE_MODULE_DEFINITION_FILE_NAME), cache.definitions);

        let modules = config.compiled_modules();
        for module in modules.values() {
            let file_name = format!("{}.{MODULE_MAP_EXT}", module.name);
            fragments.submit(inc_dir.join(file_name), function_map_lines(module));
        }

        let executable = dirs.executable_path(&config.executable);
        let inputs = MakefileInputs {
            objdir: &dirs.objdir,
            build_id,
            executable: &executable,
            source_dirs: &dirs.srcdirs,
            modules: &modules,
            env: &config.env,
        };
        fragments.submit(
            self.makefile_path(),
            stage("makefile", sources.makefile_lines(&inputs))?,
        );

        Ok(fragments)
    }

    /// Writes all fragments, skipping files whose content is unchanged.
    pub fn flush(&self, fragments: FragmentSet) -> Result<FlushReport, FileWriteError> {
        flush(fragments, &self.banners)
    }
}
