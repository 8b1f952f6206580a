//! Class catalogs: qualified names from the JDK and the classpath.
//!
//! The sets are populated by an external indexer at startup; the engine
//! only reads them. A small built-in JDK list keeps tests independent of
//! a system JDK.

use std::collections::BTreeSet;

use javelin_core::{last_name, most_name};

/// Enumerations of fully qualified class names visible to the project.
#[derive(Debug, Clone, Default)]
pub struct ClassCatalog {
    jdk: BTreeSet<String>,
    classpath: BTreeSet<String>,
}

impl ClassCatalog {
    pub fn new(
        jdk: impl IntoIterator<Item = String>,
        classpath: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            jdk: jdk.into_iter().collect(),
            classpath: classpath.into_iter().collect(),
        }
    }

    /// A small built-in JDK list (no disk IO, no system JDK required).
    pub fn builtin() -> Self {
        let jdk = [
            "java.io.IOException",
            "java.io.InputStream",
            "java.io.PrintStream",
            "java.lang.Boolean",
            "java.lang.Character",
            "java.lang.Deprecated",
            "java.lang.Double",
            "java.lang.Integer",
            "java.lang.Long",
            "java.lang.Math",
            "java.lang.Object",
            "java.lang.Override",
            "java.lang.String",
            "java.lang.StringBuilder",
            "java.lang.SuppressWarnings",
            "java.lang.System",
            "java.lang.Void",
            "java.nio.file.AccessMode",
            "java.nio.file.Files",
            "java.nio.file.Path",
            "java.util.ArrayList",
            "java.util.Collections",
            "java.util.HashMap",
            "java.util.HashSet",
            "java.util.List",
            "java.util.Map",
            "java.util.Optional",
            "java.util.Set",
            "java.util.concurrent.ConcurrentHashMap",
            "java.util.function.Function",
        ];
        Self::new(jdk.into_iter().map(String::from), [])
    }

    pub fn set_classpath(&mut self, classes: impl IntoIterator<Item = String>) {
        self.classpath = classes.into_iter().collect();
    }

    pub fn jdk_classes(&self) -> impl Iterator<Item = &str> {
        self.jdk.iter().map(String::as_str)
    }

    pub fn classpath_classes(&self) -> impl Iterator<Item = &str> {
        self.classpath.iter().map(String::as_str)
    }

    pub fn contains(&self, qualified: &str) -> bool {
        self.jdk.contains(qualified) || self.classpath.contains(qualified)
    }

    /// Classes directly in `package_name` (not in sub-packages).
    pub fn classes_in_package(&self, package_name: &str) -> Vec<&str> {
        self.jdk_classes()
            .chain(self.classpath_classes())
            .filter(|qualified| most_name(qualified) == package_name)
            .collect()
    }

    /// Direct sub-package names of `parent`, as qualified prefixes.
    ///
    /// `sub_packages("java.util")` yields `java.util.concurrent`, inferred
    /// from the class lists; there is no package index of its own.
    pub fn sub_packages(&self, parent: &str) -> BTreeSet<String> {
        let mut result = BTreeSet::new();
        for qualified in self.jdk_classes().chain(self.classpath_classes()) {
            let package_name = most_name(qualified);
            let tail = if parent.is_empty() {
                package_name
            } else {
                match package_name.strip_prefix(parent) {
                    Some(rest) if rest.starts_with('.') => &rest[1..],
                    _ => continue,
                }
            };
            if tail.is_empty() {
                continue;
            }
            let next = tail.split('.').next().unwrap_or(tail);
            if parent.is_empty() {
                result.insert(next.to_string());
            } else {
                result.insert(format!("{parent}.{next}"));
            }
        }
        result
    }

    /// Whether any catalog class lives in `package_name` or beneath it.
    pub fn has_package(&self, package_name: &str) -> bool {
        if package_name.is_empty() {
            return !self.jdk.is_empty() || !self.classpath.is_empty();
        }
        self.jdk_classes()
            .chain(self.classpath_classes())
            .any(|qualified| {
                let package = most_name(qualified);
                package == package_name
                    || package
                        .strip_prefix(package_name)
                        .is_some_and(|rest| rest.starts_with('.'))
            })
    }

    /// Catalog classes whose simple name is `simple`.
    pub fn with_simple_name<'a>(&'a self, simple: &'a str) -> impl Iterator<Item = &'a str> {
        self.jdk_classes()
            .chain(self.classpath_classes())
            .filter(move |qualified| last_name(qualified) == simple)
    }
}
