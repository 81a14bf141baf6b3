//! Interface resolution.
//!
//! Resolves a named interface into its flattened method set, following
//! embeddings and aliases across package boundaries. Resolution is
//! synchronous and recursive; the only I/O happens when a foreign package
//! is loaded through the [`SourceCache`].

pub mod aliases;
pub mod errors;
pub mod scan;
pub mod translate;

pub use aliases::AliasTable;
pub use errors::ResolveError;
pub use scan::{scan, Declaration, Predeclared};

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::core::{Import, Interface, Method, Type};
use crate::sources::{SourceCache, SourcePackage};
use crate::syntax::{InterfaceElem, SourceFile, TypeExprKind};
use crate::util::Cancellation;

use translate::{translate_method, Scope};

/// A resolved interface and the packages its signatures reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub interface: Interface,
    pub imports: Vec<Import>,
}

/// Add an import unless its path is already present.
pub(crate) fn merge_import(imports: &mut Vec<Import>, import: Import) {
    if !imports.iter().any(|i| i.path == import.path) {
        imports.push(import);
    }
}

fn merge_imports(imports: &mut Vec<Import>, more: impl IntoIterator<Item = Import>) {
    for import in more {
        merge_import(imports, import);
    }
}

/// State shared by every step of one resolution call.
pub struct ResolveContext<'a> {
    cache: &'a mut SourceCache,
    cancel: &'a Cancellation,

    /// Canonical path of the package interfaces are requested from
    root: String,

    /// Qualifier for the root package's exported names, when output is
    /// rendered outside it
    source_alias: Option<String>,

    /// (package path, file name) -> alias table
    aliases: HashMap<(String, String), Arc<AliasTable>>,

    /// (package path, name) frames currently being resolved
    stack: Vec<(String, String)>,
}

impl<'a> ResolveContext<'a> {
    pub fn new(
        cache: &'a mut SourceCache,
        cancel: &'a Cancellation,
        root: impl Into<String>,
        source_alias: Option<String>,
    ) -> Self {
        ResolveContext {
            cache,
            cancel,
            root: root.into(),
            source_alias: source_alias.filter(|a| !a.is_empty()),
            aliases: HashMap::new(),
            stack: Vec::new(),
        }
    }

    /// Check if `path` is the root package.
    pub fn is_root(&self, path: &str) -> bool {
        self.root == path
    }

    /// How the output refers to `pkg`, if it needs a qualifier at all.
    ///
    /// The root package is qualified only under a source alias; any other
    /// package always by its declared name.
    pub fn package_import(&self, pkg: &SourcePackage) -> Option<Import> {
        if self.is_root(&pkg.path) {
            self.source_alias
                .as_ref()
                .map(|alias| Import::new(alias, &pkg.path))
        } else {
            Some(Import::new(&pkg.name, &pkg.path))
        }
    }

    /// The type of exported identifier `name` declared in `pkg`, as seen
    /// from the output. Registers the package's import when qualified.
    pub fn qualify(&self, pkg: &SourcePackage, name: &str, imports: &mut Vec<Import>) -> Type {
        match self.package_import(pkg) {
            Some(import) => {
                let ty = Type::exported(&import.package, name);
                merge_import(imports, import);
                ty
            }
            None => Type::builtin(name),
        }
    }

    /// Source type of a declaration, without registering imports.
    fn declared_type(&self, pkg: &SourcePackage, name: &str) -> Type {
        match self.package_import(pkg) {
            Some(import) => Type::exported(import.package, name),
            None => Type::builtin(name),
        }
    }

    /// The alias table of a file, built once per call.
    pub fn alias_table(&mut self, pkg: &SourcePackage, file: &SourceFile) -> Arc<AliasTable> {
        let key = (pkg.path.clone(), file.name.clone());
        Arc::clone(
            self.aliases
                .entry(key)
                .or_insert_with(|| Arc::new(AliasTable::build(file, &pkg.imports))),
        )
    }

    /// Load a package through the cache.
    pub fn load(
        &mut self,
        path: &str,
        from: Option<&str>,
    ) -> Result<Arc<SourcePackage>, ResolveError> {
        self.cache
            .load(self.cancel, path, from)
            .map_err(|source| ResolveError::Loader {
                package: path.to_string(),
                source,
            })
    }

    /// Resolve `name` in `pkg` into a flattened interface.
    pub fn resolve(&mut self, pkg: &SourcePackage, name: &str) -> Result<Resolved, ResolveError> {
        let frame = (pkg.path.clone(), name.to_string());
        if let Some(start) = self.stack.iter().position(|f| *f == frame) {
            let chain = self.stack[start..]
                .iter()
                .chain(std::iter::once(&frame))
                .map(|(path, name)| format!("{}.{}", path, name))
                .collect();
            return Err(ResolveError::CycleDetected { chain });
        }

        trace!("resolving {}.{}", pkg.path, name);
        self.stack.push(frame);
        let result = self.resolve_declaration(pkg, name);
        self.stack.pop();
        result
    }

    fn resolve_declaration(
        &mut self,
        pkg: &SourcePackage,
        name: &str,
    ) -> Result<Resolved, ResolveError> {
        match scan(pkg, name)? {
            Declaration::Interface { file, elems } => {
                self.resolve_interface(pkg, file, name, elems)
            }

            Declaration::Local { target, .. } => {
                debug!("{}.{} extends local {}", pkg.path, name, target);
                let resolved = self
                    .resolve(pkg, target)
                    .map_err(|e| e.resolving(name, &pkg.path))?;
                Ok(Resolved {
                    interface: resolved
                        .interface
                        .renamed(name, self.declared_type(pkg, name)),
                    imports: resolved.imports,
                })
            }

            Declaration::Remote {
                file,
                alias,
                target,
            } => {
                debug!("{}.{} extends {}.{}", pkg.path, name, alias, target);
                let resolved = self
                    .resolve_remote(pkg, file, alias, target)
                    .map_err(|e| e.resolving(name, &pkg.path))?;
                Ok(Resolved {
                    interface: resolved
                        .interface
                        .renamed(name, self.declared_type(pkg, name)),
                    imports: resolved.imports,
                })
            }

            Declaration::Predeclared(predeclared) => {
                let mut interface = Interface::new(name, Type::builtin(name));
                interface.methods = predeclared.methods();
                Ok(Resolved {
                    interface,
                    imports: Vec::new(),
                })
            }
        }
    }

    fn resolve_interface(
        &mut self,
        pkg: &SourcePackage,
        file: &SourceFile,
        name: &str,
        elems: &[InterfaceElem],
    ) -> Result<Resolved, ResolveError> {
        let scope = Scope {
            package: pkg,
            file,
            owner: name,
        };
        let mut interface = Interface::new(name, self.declared_type(pkg, name));
        let mut imports = Vec::new();

        for elem in elems {
            match elem {
                InterfaceElem::Method { name: method, sig, .. } => {
                    let method = translate_method(self, &scope, method, sig, &mut imports)?;
                    push_method(&scope, &mut interface.methods, method)?;
                }

                InterfaceElem::Embedded(ty) => {
                    let resolved = match &ty.unparen().kind {
                        TypeExprKind::Named(embedded) => self.resolve(pkg, embedded),
                        TypeExprKind::Qualified {
                            package: alias,
                            name: embedded,
                        } => self.resolve_remote(pkg, file, alias, embedded),
                        other => {
                            return Err(ResolveError::UnsupportedExpression {
                                name: name.to_string(),
                                package: pkg.path.clone(),
                                detail: format!("embedded {}", other.shape()),
                            })
                        }
                    }
                    .map_err(|e| e.resolving(name, &pkg.path))?;

                    for method in resolved.interface.methods {
                        push_method(&scope, &mut interface.methods, method)?;
                    }
                    merge_imports(&mut imports, resolved.imports);
                }

                InterfaceElem::Union(_) => {
                    return Err(ResolveError::UnsupportedExpression {
                        name: name.to_string(),
                        package: pkg.path.clone(),
                        detail: "type-set union".to_string(),
                    });
                }
            }
        }

        Ok(Resolved { interface, imports })
    }

    /// Resolve `alias.target` as seen from `file`, recording the foreign
    /// package as an import.
    fn resolve_remote(
        &mut self,
        pkg: &SourcePackage,
        file: &SourceFile,
        alias: &str,
        target: &str,
    ) -> Result<Resolved, ResolveError> {
        let table = self.alias_table(pkg, file);
        let imported = table
            .get(alias)
            .ok_or_else(|| ResolveError::UnknownPackageAlias {
                alias: alias.to_string(),
                package: pkg.path.clone(),
            })?;

        let foreign = self.load(&imported.path, Some(&pkg.path))?;
        let mut resolved = self
            .resolve(&foreign, target)
            .map_err(|e| e.resolving(target, &foreign.path))?;
        if let Some(import) = self.package_import(&foreign) {
            merge_import(&mut resolved.imports, import);
        }
        Ok(resolved)
    }
}

/// Add a method to a method set. A name seen before is listed once, and
/// only when both signatures are identical.
fn push_method(
    scope: &Scope<'_>,
    methods: &mut Vec<Method>,
    method: Method,
) -> Result<(), ResolveError> {
    match methods.iter().find(|m| m.name == method.name) {
        None => {
            methods.push(method);
            Ok(())
        }
        Some(existing) if existing.same_signature(&method) => Ok(()),
        Some(existing) => Err(scope.unsupported(format!(
            "duplicate method `{}` with conflicting signatures `{}` and `{}`",
            method.name,
            existing.signature(),
            method.signature()
        ))),
    }
}
