//! Interface loading operations.
//!
//! Resolves a list of interface names against one source package and
//! assembles the [`Package`] handed to renderers.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::core::{dedup_imports, Import, Interface, Package, SOURCE_ALIAS};
use crate::resolver::{ResolveContext, ResolveError};
use crate::sources::{PathSource, SourceCache, SourcePackage};
use crate::util::{Cancellation, LoaderConfig};

/// Everything resolved for one request, before packaging.
struct Resolution {
    root: Arc<SourcePackage>,
    imports: Vec<Import>,
    interfaces: Vec<Interface>,
}

fn resolve_all<S: AsRef<str>>(
    cancel: &Cancellation,
    cache: &mut SourceCache,
    path: &str,
    source_alias: Option<&str>,
    names: &[S],
) -> Result<Resolution, ResolveError> {
    let root = cache
        .load(cancel, path, None)
        .map_err(|source| ResolveError::Loader {
            package: path.to_string(),
            source,
        })?;
    debug!(
        "resolving {} interfaces in {} ({})",
        names.len(),
        root.path,
        root.name
    );

    let mut ctx = ResolveContext::new(
        cache,
        cancel,
        root.path.clone(),
        source_alias.map(str::to_string),
    );
    let mut imports = Vec::new();
    let mut interfaces = Vec::with_capacity(names.len());
    for name in names {
        let resolved = ctx.resolve(&root, name.as_ref())?;
        imports.extend(resolved.imports);
        interfaces.push(resolved.interface);
    }

    Ok(Resolution {
        root,
        imports: dedup_imports(imports),
        interfaces,
    })
}

/// Resolve `names` in the package at `path`.
///
/// Returns the packages referenced by the interfaces (deduplicated by path,
/// first seen first) and the interfaces in request order. When
/// `source_alias` is given, exported names of the source package are
/// qualified by it. The first failure aborts the whole request.
pub fn load_interfaces<S: AsRef<str>>(
    cancel: &Cancellation,
    cache: &mut SourceCache,
    path: &str,
    source_alias: Option<&str>,
    names: &[S],
) -> Result<(Vec<Import>, Vec<Interface>), ResolveError> {
    let resolution = resolve_all(cancel, cache, path, source_alias, names)?;
    Ok((resolution.imports, resolution.interfaces))
}

/// Resolve `names` in the package at `path` and assemble the output
/// package.
///
/// With an empty `destination`, output is rendered into the source package
/// itself: the package keeps its declared name and no source import is
/// added. Otherwise the output package is named after the last non-empty
/// segment of `destination` (the declared name when there is none), and the
/// source package is imported as `srcPkgAlias` in both import lists.
pub fn load_package<S: AsRef<str>>(
    cancel: &Cancellation,
    cache: &mut SourceCache,
    path: &str,
    destination: &str,
    names: &[S],
) -> Result<Package, ResolveError> {
    if destination.is_empty() {
        let resolution = resolve_all(cancel, cache, path, None, names)?;
        info!(
            "loaded {} interfaces from {}",
            resolution.interfaces.len(),
            resolution.root.path
        );
        return Ok(Package {
            name: resolution.root.name.clone(),
            source: None,
            interfaces: resolution.interfaces,
            imports: resolution.imports.clone(),
            imports_with_source: resolution.imports,
        });
    }

    let resolution = resolve_all(cancel, cache, path, Some(SOURCE_ALIAS), names)?;
    let source = Import::new(SOURCE_ALIAS, &resolution.root.path);
    let imports = dedup_imports(resolution.imports.into_iter().chain([source.clone()]));
    let name = destination
        .rsplit('/')
        .find(|s| !s.is_empty())
        .unwrap_or(resolution.root.name.as_str())
        .to_string();
    info!(
        "loaded {} interfaces from {} into package {}",
        resolution.interfaces.len(),
        resolution.root.path,
        name
    );

    Ok(Package {
        name,
        source: Some(source),
        interfaces: resolution.interfaces,
        imports: imports.clone(),
        imports_with_source: imports,
    })
}

/// [`load_package`] against the filesystem, located per `config`.
pub fn load_package_with_config<S: AsRef<str>>(
    config: &LoaderConfig,
    cancel: &Cancellation,
    path: &str,
    destination: &str,
    names: &[S],
) -> Result<Package, ResolveError> {
    let mut cache = SourceCache::new(PathSource::new(config.clone()));
    load_package(cancel, &mut cache, path, destination, names)
}

/// [`load_package`] with loader settings read from a TOML file.
pub fn load_package_from_config(
    config_path: &Path,
    cancel: &Cancellation,
    path: &str,
    destination: &str,
    names: &[String],
) -> Result<Package> {
    let config = LoaderConfig::load(config_path)?;
    load_package_with_config(&config, cancel, path, destination, names)
        .with_context(|| format!("failed to load interfaces from `{}`", path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::MemorySource;
    use crate::test_support::{fixture_cache, init_logging, HAPPY, PFLAG, SUB_HAPPY};

    fn cache() -> SourceCache {
        SourceCache::new(
            MemorySource::new()
                .with_package(
                    "example.com/p",
                    &[(
                        "p.go",
                        r#"package p

import "io"

type A interface {
	F(x int) (string, error)
}

type B interface {
	A
	G()
}

type Reader interface {
	io.Reader
}

type Local interface {
	Get() Thing
}

type Thing struct{}
"#,
                    )],
                )
                .with_package(
                    "io",
                    &[("io.go", "package io\n\ntype Reader interface {\n\tRead(p []byte) (n int, err error)\n}\n")],
                ),
        )
    }

    #[test]
    fn test_scenario_embedding() {
        let mut cache = cache();
        let cancel = Cancellation::new();
        let (imports, interfaces) =
            load_interfaces(&cancel, &mut cache, "example.com/p", None, &["B", "A"]).unwrap();

        assert!(imports.is_empty());
        assert_eq!(interfaces[0].method_names(), vec!["F", "G"]);
        assert_eq!(interfaces[1].method_names(), vec!["F"]);
        let g = interfaces[0].method("G").unwrap();
        assert!(g.inputs.is_empty() && g.outputs.is_empty());
    }

    #[test]
    fn test_imports_dedup_across_names() {
        let mut cache = cache();
        let (imports, _) = load_interfaces(
            &Cancellation::new(),
            &mut cache,
            "example.com/p",
            None,
            &["Reader", "Reader", "B"],
        )
        .unwrap();
        assert_eq!(imports, vec![Import::new("io", "io")]);
    }

    #[test]
    fn test_load_package_without_destination() {
        let mut cache = cache();
        let pkg = load_package(
            &Cancellation::new(),
            &mut cache,
            "example.com/p",
            "",
            &["Local"],
        )
        .unwrap();

        assert_eq!(pkg.name, "p");
        assert!(pkg.source.is_none());
        assert!(pkg.imports.is_empty());
        assert_eq!(pkg.imports, pkg.imports_with_source);
        let get = pkg.interface("Local").unwrap().method("Get").unwrap();
        assert_eq!(get.outputs[0].ty.to_string(), "Thing");
    }

    #[test]
    fn test_load_package_with_destination() {
        let mut cache = cache();
        let pkg = load_package(
            &Cancellation::new(),
            &mut cache,
            "example.com/p",
            "example.com/out/wrappers",
            &["Local", "Reader"],
        )
        .unwrap();

        assert_eq!(pkg.name, "wrappers");
        let source = Import::new(SOURCE_ALIAS, "example.com/p");
        assert_eq!(pkg.source.as_ref(), Some(&source));
        assert_eq!(
            pkg.imports.iter().filter(|i| i.path == "example.com/p").count(),
            1
        );
        assert_eq!(pkg.imports, pkg.imports_with_source);
        assert!(pkg.imports.contains(&Import::new("io", "io")));

        let local = pkg.interface("Local").unwrap();
        assert_eq!(local.src_type.to_string(), "srcPkgAlias.Local");
        assert_eq!(
            local.method("Get").unwrap().outputs[0].ty.to_string(),
            "srcPkgAlias.Thing"
        );
    }

    #[test]
    fn test_destination_without_segments_keeps_declared_name() {
        let mut cache = cache();
        let pkg = load_package(&Cancellation::new(), &mut cache, "example.com/p", "/", &["A"])
            .unwrap();

        assert_eq!(pkg.name, "p");
        assert_eq!(pkg.source, Some(Import::new(SOURCE_ALIAS, "example.com/p")));
    }

    #[test]
    fn test_unknown_name_aborts() {
        let mut cache = cache();
        let err = load_package(
            &Cancellation::new(),
            &mut cache,
            "example.com/p",
            "",
            &["A", "Missing"],
        )
        .unwrap_err();
        assert!(matches!(
            err.root(),
            ResolveError::DeclarationNotFound { name, .. } if name == "Missing"
        ));
    }

    #[test]
    fn test_happy_exported_interface() {
        init_logging();
        let mut cache = fixture_cache();
        let pkg = load_package(
            &Cancellation::new(),
            &mut cache,
            HAPPY,
            "",
            &["ExportedInterface"],
        )
        .unwrap();

        assert_eq!(pkg.name, "happy");
        assert_eq!(
            pkg.imports,
            vec![
                Import::new("os", "os"),
                Import::new("http", "net/http"),
                Import::new("pflag", PFLAG),
                Import::new("time", "time"),
            ]
        );

        let iface = pkg.interface("ExportedInterface").unwrap();
        assert_eq!(iface.src_type.to_string(), "ExportedInterface");
        assert_eq!(
            iface.method_names(),
            vec!["A", "B", "C", "D", "E", "F", "G", "H", "I"]
        );

        let signature = |name: &str| iface.method(name).unwrap().signature();
        assert_eq!(
            signature("A"),
            "A(file *os.File, info os.FileInfo) (result0 http.Handler, result1 error)"
        );
        assert_eq!(
            signature("B"),
            "B(flags *pflag.FlagSet, value ExportedStruct, hidden unexportedStruct)"
        );
        assert_eq!(
            signature("C"),
            "C(fn func(int, string) (bool, error)) (result0 func() (ExportedStruct, error))"
        );
        assert_eq!(
            signature("D"),
            "D(in <-chan int, out chan<- string, both chan []byte)"
        );
        assert_eq!(signature("E"), "E(names [100]string, rest ...string)");
        assert_eq!(
            signature("F"),
            "F(lookup map[string]*ExportedStruct, anything interface{}, nothing struct{})"
        );
        assert_eq!(
            signature("G"),
            "G(a int, b int, param2 string) (x float64, y float64)"
        );
        assert_eq!(signature("H"), "H(param0 int, param1 string) (result0 bool)");
        assert!(iface.method("E").unwrap().is_variadic());
    }

    #[test]
    fn test_happy_every_interface_resolves() {
        let names = [
            "ExportedInterface",
            "ExportedInterfaceWithEmbedded",
            "WithRemoteEmbedded",
            "WithThirdPartyEmbedded",
            "InterfaceExtension",
            "InterfaceAlias",
            "RemoteInterfaceExtension",
            "RemoteInterfaceAlias",
            "ThirdPartyInterfaceExtension",
            "ThirdPartyInterfaceAlias",
            "IndirectThirdPartyInterfaceExtension",
            "IndirectThirdPartyInterfaceAlias",
        ];
        let mut cache = fixture_cache();
        let pkg = load_package(
            &Cancellation::new(),
            &mut cache,
            HAPPY,
            "example.com/out/wrappers",
            &names,
        )
        .unwrap();

        assert_eq!(pkg.interfaces.len(), names.len());
        for (iface, name) in pkg.interfaces.iter().zip(names) {
            assert_eq!(iface.name, name);
            assert_eq!(iface.src_type.to_string(), format!("srcPkgAlias.{}", name));
        }

        let embedded = pkg.interface("ExportedInterfaceWithEmbedded").unwrap();
        assert_eq!(embedded.methods.len(), 11);
        assert_eq!(&embedded.method_names()[9..], &["Hidden", "Extra"]);
        assert_eq!(
            embedded.method("B").unwrap().inputs[1].ty.to_string(),
            "srcPkgAlias.ExportedStruct"
        );

        let remote = pkg.interface("RemoteInterfaceAlias").unwrap();
        assert_eq!(remote.method_names(), vec!["Read", "Write"]);

        let indirect = pkg.interface("IndirectThirdPartyInterfaceAlias").unwrap();
        assert_eq!(indirect.method_names(), vec!["String", "Set", "Type"]);
        assert_eq!(
            indirect.method("Set").unwrap().signature(),
            "Set(param0 string) (result0 error)"
        );

        let source = Import::new(SOURCE_ALIAS, HAPPY);
        assert_eq!(pkg.imports.iter().filter(|i| **i == source).count(), 1);
        assert_eq!(pkg.imports, pkg.imports_with_source);
        for path in ["os", "net/http", PFLAG, "time", "io"] {
            assert!(pkg.imports.iter().any(|i| i.path == path), "missing {path}");
        }
    }

    #[test]
    fn test_happy_non_interfaces_rejected() {
        for name in ["NonInterfaceExtension", "NonInterfaceAlias", "ExportedStruct"] {
            let mut cache = fixture_cache();
            let err = load_package(&Cancellation::new(), &mut cache, HAPPY, "", &[name])
                .unwrap_err();
            assert!(
                matches!(err.root(), ResolveError::UnsupportedExpression { .. }),
                "{name}: {err}"
            );
        }
    }

    #[test]
    fn test_sub_package_references_parent() {
        let mut cache = fixture_cache();
        let pkg = load_package(
            &Cancellation::new(),
            &mut cache,
            SUB_HAPPY,
            "example.com/out/wrappers",
            &["Demo"],
        )
        .unwrap();

        assert_eq!(
            pkg.imports,
            vec![
                Import::new("happy", HAPPY),
                Import::new(SOURCE_ALIAS, SUB_HAPPY),
            ]
        );
        assert_eq!(
            pkg.interface("Demo").unwrap().method("Make").unwrap().signature(),
            "Make(param happy.ExportedStruct, second srcPkgAlias.DemoType) \
             (result0 happy.NonInterfaceAlias)"
        );
    }

    #[test]
    fn test_cancelled_before_load() {
        let mut cache = cache();
        let cancel = Cancellation::new();
        cancel.cancel();
        let err = load_interfaces(&cancel, &mut cache, "example.com/p", None, &["A"]).unwrap_err();
        assert!(matches!(
            err,
            ResolveError::Loader {
                source: crate::sources::LoadError::Cancelled,
                ..
            }
        ));
    }
}
