//! Module identifier from `go.mod`, and the path normalization built on it.
//!
//! Coverage profiles name files by import path (`<module>/pkg/foo.go`), diffs
//! by repository path (`pkg/foo.go`). Both are reduced to the module-relative
//! form so the three inputs can be joined on the same key.

use std::path::Path;

use crate::error::ManifestError;

/// The project's root namespace, as declared by `module <id>` in `go.mod`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    name: String,
    prefix: String,
}

impl Module {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let prefix = format!("{}/", name.trim_end_matches('/'));
        Self { name, prefix }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Turn a module-relative path into an import path.
    #[must_use]
    pub fn qualify(&self, relative: &str) -> String {
        let relative = normalize_separators(relative);
        format!("{}{}", self.prefix, relative.trim_start_matches('/'))
    }

    /// Strip the module prefix from an import path.
    ///
    /// Returns `None` for paths outside the module (vendored or generated
    /// code), which are deliberately left out of every measurement.
    #[must_use]
    pub fn relative(&self, path: &str) -> Option<String> {
        normalize_separators(path)
            .strip_prefix(&self.prefix)
            .map(str::to_owned)
    }
}

/// Convert `\` separators to `/`.
pub fn normalize_separators(path: &str) -> String {
    path.replace('\\', "/")
}

/// Extract the module identifier from `go.mod` content.
pub fn resolve_module(content: &str) -> Option<Module> {
    content.lines().find_map(|line| {
        let mut tokens = line.split_whitespace();
        if tokens.next()? != "module" {
            return None;
        }
        let name = tokens.next()?.trim_matches('"');
        (!name.is_empty()).then(|| Module::new(name))
    })
}

/// Read `go.mod` at `path` and extract its module identifier.
pub fn read_module(path: &Path) -> Result<Module, ManifestError> {
    let content = std::fs::read_to_string(path).map_err(|source| ManifestError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let module = resolve_module(&content).ok_or_else(|| ManifestError::MissingModule {
        path: path.to_path_buf(),
    })?;
    log::debug!("module {} from {}", module.name(), path.display());
    Ok(module)
}
