//! Catalog consistency validation.
//!
//! Every language is checked against the default language's catalog: keys
//! must exist in all languages and templates must use the same placeholders.

use crate::config::CatalogSet;
use crate::i18n::{Catalog, Interpolator, Language};
use std::collections::{BTreeSet, HashSet};

/// Validation report containing errors and warnings about the catalogs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    /// Keys present in the default language but missing elsewhere
    pub errors: Vec<String>,

    /// Extra keys and placeholder mismatches
    pub warnings: Vec<String>,
}

impl ValidationReport {
    /// Create a new empty validation report
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Check if the report has any errors
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Check if the report has any warnings
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Check if the report is clean (no errors or warnings)
    pub fn is_clean(&self) -> bool {
        !self.has_errors() && !self.has_warnings()
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Validator comparing catalogs against a reference language.
pub struct CatalogValidator<'a> {
    interpolator: &'a Interpolator,
}

impl<'a> CatalogValidator<'a> {
    /// Placeholders are detected with `interpolator`'s delimiters.
    pub fn new(interpolator: &'a Interpolator) -> Self {
        Self { interpolator }
    }

    /// Validate every catalog in `catalogs` against the one for `reference`.
    ///
    /// Languages are visited in code order so reports are stable.
    pub fn validate(&self, reference: &Language, catalogs: &CatalogSet) -> ValidationReport {
        let mut report = ValidationReport::new();

        let Some(reference_catalog) = catalogs.get(reference) else {
            report
                .errors
                .push(format!("Default language '{}' has no catalog", reference));
            return report;
        };

        let mut languages: Vec<&Language> = catalogs.keys().filter(|l| *l != reference).collect();
        languages.sort();

        for language in languages {
            self.compare(reference_catalog, language, &catalogs[language], &mut report);
        }

        report
    }

    fn compare(
        &self,
        reference: &Catalog,
        language: &Language,
        catalog: &Catalog,
        report: &mut ValidationReport,
    ) {
        let reference_paths = reference.leaf_paths();
        let known: HashSet<&str> = reference_paths.iter().map(String::as_str).collect();

        for path in &reference_paths {
            let Some(translated) = catalog.lookup(path) else {
                report
                    .errors
                    .push(format!("Missing key '{}' in language '{}'", path, language));
                continue;
            };

            // Both lookups succeed for any path produced by leaf_paths
            let original = reference.lookup(path).unwrap_or_default();
            let expected = self.placeholder_set(&original);
            let found = self.placeholder_set(&translated);
            if expected != found {
                report.warnings.push(format!(
                    "Placeholder mismatch for '{}' in language '{}': expected {:?}, found {:?}",
                    path, language, expected, found
                ));
            }
        }

        for path in catalog.leaf_paths() {
            if !known.contains(path.as_str()) {
                report
                    .warnings
                    .push(format!("Extra key '{}' in language '{}'", path, language));
            }
        }
    }

    fn placeholder_set(&self, template: &str) -> BTreeSet<String> {
        self.interpolator.placeholders(template).into_iter().collect()
    }
}
