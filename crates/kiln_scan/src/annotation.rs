//! Import-annotation parsing and translation-unit classification.
//!
//! The compiler writes one annotation file per source: each line is a
//! detected import directive, and the final line, when the unit declares a
//! module, is a marker of the form `module,<export>,<name>`. Everything
//! downstream switches on the [`TranslationUnitKind`] derived here rather
//! than re-probing the raw text.

use crate::error::ScanError;
use std::path::Path;

/// Prefix marking a module-declaration line in an annotation file.
const MODULE_MARKER: &str = "module,";

/// How a translation unit participates in the module system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranslationUnitKind {
    /// No module declaration; compiled as an ordinary source.
    Plain,
    /// Declares a module interface or a named partition; produces a
    /// module-link artifact consumed by importers.
    ModuleInterfaceOrPartition,
    /// Belongs to a module but exports nothing; compiled like a plain
    /// source with an implicit import of its own primary interface.
    ModuleImplementation,
}

/// The parsed annotation for one translation unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleDescriptor {
    /// The declared module name, if the unit declared one.
    pub module_name: Option<String>,
    /// Whether the unit exports (interface or partition).
    pub is_export_unit: bool,
    /// Every import directive, partition references already expanded and
    /// any implicit primary-interface import included.
    pub imports: Vec<String>,
}

impl ModuleDescriptor {
    /// Classifies the unit. All downstream logic matches on the result.
    pub fn kind(&self) -> TranslationUnitKind {
        match (&self.module_name, self.is_export_unit) {
            (None, _) => TranslationUnitKind::Plain,
            (Some(_), true) => TranslationUnitKind::ModuleInterfaceOrPartition,
            (Some(_), false) => TranslationUnitKind::ModuleImplementation,
        }
    }
}

/// Reads and parses an annotation file.
pub fn read_imports(path: &Path) -> Result<ModuleDescriptor, ScanError> {
    let text = std::fs::read_to_string(path).map_err(|e| ScanError::io(path, e))?;
    parse_imports(&text)
}

/// Parses an import annotation.
///
/// If the final line carries the module marker, it declares the unit's own
/// module: `module,<export>,<name>`, where a non-empty export field or a
/// partition separator in the name marks an interface/partition unit. A
/// declared module without either is an implementation unit: it is treated
/// as non-modular but gains an implicit import of its primary interface.
///
/// Remaining lines are import directives. A leading `:` denotes a
/// partition of the current module and is prefixed with the bare module
/// name (the part before any partition separator).
pub fn parse_imports(text: &str) -> Result<ModuleDescriptor, ScanError> {
    let mut lines: Vec<&str> = text.lines().map(str::trim).filter(|l| !l.is_empty()).collect();

    let marker = match lines.last() {
        Some(last) if last.starts_with(MODULE_MARKER) => lines.pop(),
        _ => None,
    };

    let Some(marker) = marker else {
        return Ok(ModuleDescriptor {
            module_name: None,
            is_export_unit: false,
            imports: lines.iter().map(|l| l.to_string()).collect(),
        });
    };

    let mut fields = marker.splitn(3, ',');
    let _tag = fields.next();
    let (Some(export_field), Some(name)) = (fields.next(), fields.next()) else {
        return Err(ScanError::AnnotationFormat {
            line: marker.to_string(),
        });
    };
    let name = name.trim().to_string();
    if name.is_empty() {
        return Err(ScanError::AnnotationFormat {
            line: marker.to_string(),
        });
    }

    let is_export_unit = !export_field.is_empty() || name.contains(':');
    let bare_name = name
        .split_once(':')
        .map_or(name.as_str(), |(bare, _)| bare)
        .to_string();

    let mut imports = Vec::new();
    if !is_export_unit {
        // Implementation units implicitly see their own primary interface.
        imports.push(bare_name.clone());
    }
    for line in &lines {
        if let Some(partition) = line.strip_prefix(':') {
            imports.push(format!("{bare_name}:{partition}"));
        } else {
            imports.push(line.to_string());
        }
    }

    Ok(ModuleDescriptor {
        module_name: Some(name),
        is_export_unit,
        imports,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_marker_is_plain() {
        let d = parse_imports("bar\nbaz\n").unwrap();
        assert_eq!(d.kind(), TranslationUnitKind::Plain);
        assert_eq!(d.module_name, None);
        assert_eq!(d.imports, vec!["bar", "baz"]);
    }

    #[test]
    fn empty_annotation_is_plain() {
        let d = parse_imports("").unwrap();
        assert_eq!(d.kind(), TranslationUnitKind::Plain);
        assert!(d.imports.is_empty());
    }

    #[test]
    fn export_module_is_interface() {
        let d = parse_imports("bar\nmodule,export,foo\n").unwrap();
        assert_eq!(d.kind(), TranslationUnitKind::ModuleInterfaceOrPartition);
        assert_eq!(d.module_name.as_deref(), Some("foo"));
        assert_eq!(d.imports, vec!["bar"]);
    }

    #[test]
    fn partition_name_is_interface_without_export_flag() {
        let d = parse_imports("module,,foo:part\n").unwrap();
        assert_eq!(d.kind(), TranslationUnitKind::ModuleInterfaceOrPartition);
        assert_eq!(d.module_name.as_deref(), Some("foo:part"));
    }

    #[test]
    fn implementation_unit_gains_implicit_import() {
        let d = parse_imports("bar\nmodule,,foo\n").unwrap();
        assert_eq!(d.kind(), TranslationUnitKind::ModuleImplementation);
        // Implicit import of the primary interface comes first.
        assert_eq!(d.imports, vec!["foo", "bar"]);
    }

    #[test]
    fn partition_import_expands_with_bare_name() {
        let d = parse_imports(":part1\nmodule,export,foo\n").unwrap();
        assert_eq!(d.imports, vec!["foo:part1"]);
    }

    #[test]
    fn partition_import_inside_partition_uses_bare_name() {
        let d = parse_imports(":sibling\nmodule,,foo:me\n").unwrap();
        assert_eq!(d.imports, vec!["foo:sibling"]);
    }

    #[test]
    fn malformed_marker_fails() {
        assert!(matches!(
            parse_imports("module,noname\n"),
            Err(ScanError::AnnotationFormat { .. })
        ));
        assert!(matches!(
            parse_imports("module,export,\n"),
            Err(ScanError::AnnotationFormat { .. })
        ));
    }

    #[test]
    fn marker_only_on_last_line_counts() {
        // A marker-shaped line that is not last is an import directive.
        let d = parse_imports("module,export,foo\nbar\n").unwrap();
        assert_eq!(d.kind(), TranslationUnitKind::Plain);
        assert_eq!(d.imports, vec!["module,export,foo", "bar"]);
    }
}
