//! Module resolution: turns a `use` module-path string into a parsed,
//! cached [`AST`], detecting cyclic imports across the whole import graph
//! rather than just one module's direct dependencies.
//!
//! A [`ModuleCache`] is not a global — the driver that links modules owns
//! one and threads it through every `use` it resolves, so two independent
//! compilations (e.g. successive calls in a test) never share state.

use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use rustc_hash::FxHashMap;
use vesper_ast::ast::AST;
use vesper_ast::nodes::{AnyNode, NodeID};
use vesper_source::types::Span;

use crate::error::{ResolveError, ResolveResult};
use crate::parser::Parser;

/// The canonical source file extension. A module path that doesn't already
/// end in it gets it appended before any file lookup, so `use "utils/math"`
/// and `use "utils/math.vsp"` name the same file.
pub const SOURCE_EXTENSION: &str = "vsp";

/// One module's parse result, kept alive for as long as the cache holds it
/// so every importer can share the same `AST` rather than re-parsing.
#[derive(Debug)]
pub struct ResolvedModule {
    /// Canonical absolute path this module was loaded from.
    pub path: PathBuf,
    /// The module's full source text, kept for diagnostic text lookups.
    pub source: String,
    pub ast: AST,
    /// Top-level statement ids, in source order.
    pub top_level: Vec<NodeID>,
}

/// A process-wide (per-compilation) cache of resolved modules, keyed by
/// canonical absolute path, plus the stack of paths currently being parsed.
///
/// The stack is what makes cycle detection whole-graph rather than
/// per-module: `a.vsp` importing `b.vsp` importing `a.vsp` fails even though
/// neither file directly imports itself.
#[derive(Debug, Default)]
pub struct ModuleCache {
    modules: FxHashMap<PathBuf, Rc<ResolvedModule>>,
    stack: Vec<PathBuf>,
    stdlib_dir: Option<PathBuf>,
}

impl ModuleCache {
    /// Creates an empty cache. `stdlib_dir` is consulted when a module path
    /// can't be found relative to its referencing file.
    #[must_use]
    pub fn new(stdlib_dir: Option<PathBuf>) -> Self {
        Self { modules: FxHashMap::default(), stack: Vec::new(), stdlib_dir }
    }

    /// Resolves and parses the entry-point file. There is no referencing
    /// module to resolve it relative to, so `path` is used as given.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] if the file can't be read or parsed.
    pub fn resolve_root(&mut self, path: &Path) -> ResolveResult<Rc<ResolvedModule>> {
        let canonical = canonicalize(path)?;
        self.load(canonical, &path.display().to_string(), Span::new(0, 0))
    }

    /// Resolves a `use` module-path string referenced from `referencing_file`,
    /// at `span` (the `use` statement's span, for error reporting).
    ///
    /// Resolution order: (1) relative to `referencing_file`'s directory, (2)
    /// relative to the stdlib directory, if any.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::ModuleNotFound`] if neither location has the
    /// file, [`ResolveError::CyclicImport`] if it is already on the parse
    /// stack, or a parse/IO error from loading it for the first time.
    pub fn resolve(
        &mut self,
        module_path: &str,
        referencing_file: &Path,
        span: Span,
    ) -> ResolveResult<Rc<ResolvedModule>> {
        let located = self.locate(module_path, referencing_file).ok_or_else(|| {
            ResolveError::ModuleNotFound {
                module_path: module_path.to_string(),
                referencing: referencing_file.display().to_string(),
                span,
            }
        })?;
        let canonical = canonicalize(&located)?;
        self.load(canonical, module_path, span)
    }

    /// Appends the canonical extension if missing, then tries the
    /// referencing file's directory followed by the stdlib directory.
    fn locate(&self, module_path: &str, referencing_file: &Path) -> Option<PathBuf> {
        let suffix = format!(".{SOURCE_EXTENSION}");
        let file_name =
            if module_path.ends_with(&suffix) { module_path.to_string() } else { format!("{module_path}{suffix}") };

        if let Some(parent) = referencing_file.parent() {
            let candidate = parent.join(&file_name);
            if candidate.is_file() {
                return Some(candidate);
            }
        }

        if let Some(stdlib) = &self.stdlib_dir {
            let candidate = stdlib.join(&file_name);
            if candidate.is_file() {
                return Some(candidate);
            }
        }

        None
    }

    /// Checks the parse stack and cache, then parses on a cold path. The
    /// path stays on the parse stack while this module's own `use`
    /// statements are resolved, so a cycle anywhere in the import graph —
    /// not just a module importing itself directly — is caught.
    fn load(
        &mut self,
        canonical: PathBuf,
        module_path: &str,
        span: Span,
    ) -> ResolveResult<Rc<ResolvedModule>> {
        if self.stack.contains(&canonical) {
            return Err(ResolveError::CyclicImport { module_path: module_path.to_string(), span });
        }
        if let Some(cached) = self.modules.get(&canonical) {
            return Ok(Rc::clone(cached));
        }

        self.stack.push(canonical.clone());
        let result = self.parse_and_resolve_imports(&canonical);
        self.stack.pop();

        let module = Rc::new(result?);
        self.modules.insert(canonical, Rc::clone(&module));
        Ok(module)
    }

    /// Parses one file, then eagerly resolves every `use` it contains
    /// (including one wrapped in `export`), purely for the caching and
    /// cycle-detection side effect — the resolved targets are looked up
    /// again from the cache by whoever links the modules together.
    fn parse_and_resolve_imports(&mut self, path: &Path) -> ResolveResult<ResolvedModule> {
        let source = fs::read_to_string(path)
            .map_err(|e| ResolveError::Io { path: path.display().to_string(), message: e.to_string() })?;
        let (ast, top_level) = Parser::parse_program(&source)?;
        if top_level.is_empty() {
            return Err(ResolveError::EmptyModule { path: path.display().to_string() });
        }

        for &stmt_id in &top_level {
            if let Some((use_module_path, use_span)) = use_statement_of(&ast, stmt_id) {
                self.resolve(&use_module_path, path, use_span)?;
            }
        }

        Ok(ResolvedModule { path: path.to_path_buf(), source, ast, top_level })
    }
}

/// Returns the module path and span of a `use` statement, unwrapping one
/// level of `export` if present; `None` for any other statement kind.
fn use_statement_of(ast: &AST, stmt_id: NodeID) -> Option<(String, Span)> {
    let node = ast.get_node(stmt_id)?;
    match &node.data {
        AnyNode::Use(use_stmt) => Some((use_stmt.module_path.clone(), use_stmt.span)),
        AnyNode::Export(export) => {
            let inner = ast.get_node(export.inner)?;
            match &inner.data {
                AnyNode::Use(use_stmt) => Some((use_stmt.module_path.clone(), use_stmt.span)),
                _ => None,
            }
        }
        _ => None,
    }
}

fn canonicalize(path: &Path) -> ResolveResult<PathBuf> {
    path.canonicalize()
        .map_err(|e| ResolveError::Io { path: path.display().to_string(), message: e.to_string() })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::tempdir;

    use super::*;

    fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn resolve_root_parses_entry_file() {
        let dir = tempdir().unwrap();
        let entry = write_file(dir.path(), "main.vsp", "fun main(args: [string]) {\n}\n");

        let mut cache = ModuleCache::new(None);
        let module = cache.resolve_root(&entry).unwrap();
        assert_eq!(module.top_level.len(), 1);
    }

    #[test]
    fn resolve_appends_missing_extension() {
        let dir = tempdir().unwrap();
        write_file(dir.path(), "helper.vsp", "fun helper() {\n}\n");
        let entry = write_file(dir.path(), "main.vsp", "use helper from \"helper\"\n");

        let mut cache = ModuleCache::new(None);
        let imported = cache.resolve("helper", &entry, Span::new(0, 0)).unwrap();
        assert_eq!(imported.path.file_name().unwrap(), "helper.vsp");
    }

    #[test]
    fn resolve_caches_shared_module() {
        let dir = tempdir().unwrap();
        write_file(dir.path(), "shared.vsp", "fun helper() {\n}\n");
        let entry = write_file(dir.path(), "main.vsp", "use helper from \"shared\"\n");

        let mut cache = ModuleCache::new(None);
        let first = cache.resolve("shared", &entry, Span::new(0, 0)).unwrap();
        let second = cache.resolve("./shared", &entry, Span::new(0, 0)).unwrap();
        assert!(Rc::ptr_eq(&first, &second));
    }

    #[test]
    fn resolve_detects_cyclic_import() {
        let dir = tempdir().unwrap();
        let a = write_file(dir.path(), "a.vsp", "use b from \"b\"\n");
        write_file(dir.path(), "b.vsp", "use a from \"a\"\n");

        let mut cache = ModuleCache::new(None);
        let err = cache.resolve_root(&a).unwrap_err();
        assert!(matches!(err, ResolveError::CyclicImport { .. }));
    }

    #[test]
    fn resolve_reports_missing_module() {
        let dir = tempdir().unwrap();
        let entry = write_file(dir.path(), "main.vsp", "use x from \"missing\"\n");

        let mut cache = ModuleCache::new(None);
        let err = cache.resolve("missing", &entry, Span::new(0, 0)).unwrap_err();
        assert!(matches!(err, ResolveError::ModuleNotFound { .. }));
    }

    #[test]
    fn resolve_falls_back_to_stdlib_dir() {
        let project = tempdir().unwrap();
        let stdlib = tempdir().unwrap();
        write_file(stdlib.path(), "io.vsp", "fun read() {\n}\n");
        let entry = write_file(project.path(), "main.vsp", "use read from \"io\"\n");

        let mut cache = ModuleCache::new(Some(stdlib.path().to_path_buf()));
        let module = cache.resolve("io", &entry, Span::new(0, 0)).unwrap();
        assert_eq!(module.path, stdlib.path().join("io.vsp").canonicalize().unwrap());
    }
}
