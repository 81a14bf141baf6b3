//! Per-file import alias tables.

use std::collections::BTreeMap;

use crate::sources::ImportedPackage;
use crate::syntax::{ImportName, SourceFile};

/// In-file package alias -> imported package.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasTable {
    entries: BTreeMap<String, ImportedPackage>,
}

impl AliasTable {
    /// Build the table for one file.
    ///
    /// An explicit alias wins; otherwise the imported package's declared
    /// name is used. Blank and dot imports bind no alias, and imports
    /// missing from the graph (the cgo pseudo-package) are skipped.
    pub fn build(file: &SourceFile, graph: &BTreeMap<String, ImportedPackage>) -> Self {
        let mut entries = BTreeMap::new();
        for spec in &file.imports {
            let Some(imported) = graph.get(&spec.path) else {
                continue;
            };
            let alias = match &spec.name {
                ImportName::Alias(alias) => alias.clone(),
                ImportName::Default => imported.name.clone(),
                ImportName::Blank | ImportName::Dot => continue,
            };
            entries.insert(alias, imported.clone());
        }
        AliasTable { entries }
    }

    /// Look up the package bound to `alias`.
    pub fn get(&self, alias: &str) -> Option<&ImportedPackage> {
        self.entries.get(alias)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::parse_file;

    fn imported(path: &str, name: &str) -> ImportedPackage {
        ImportedPackage {
            path: path.to_string(),
            name: name.to_string(),
        }
    }

    #[test]
    fn test_alias_table() {
        let file = parse_file(
            "a.go",
            r#"package a

import (
	"io"
	nethttp "net/http"
	"gopkg.in/yaml.v3"
	_ "embed"
	. "strings"
	"C"
)
"#,
        )
        .unwrap();

        let graph: BTreeMap<_, _> = [
            ("io", imported("io", "io")),
            ("net/http", imported("net/http", "http")),
            ("gopkg.in/yaml.v3", imported("gopkg.in/yaml.v3", "yaml")),
            ("embed", imported("embed", "embed")),
            ("strings", imported("strings", "strings")),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        let table = AliasTable::build(&file, &graph);
        assert_eq!(table.len(), 3);
        assert_eq!(table.get("io").unwrap().path, "io");
        assert_eq!(table.get("nethttp").unwrap().path, "net/http");
        assert!(table.get("http").is_none());
        // Declared name, not the last path segment.
        assert_eq!(table.get("yaml").unwrap().path, "gopkg.in/yaml.v3");
        assert!(table.get("embed").is_none());
        assert!(table.get("strings").is_none());
    }
}
