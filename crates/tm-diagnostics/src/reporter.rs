//! `Reporter`: the mutable surface the Validator writes into (spec §4.2,
//! Design Notes §9 — "package them behind a single Reporter object ... the
//! byte stream is borrowed by the Reporter for line-number resolution for
//! the lifetime of the document").

use tm_json::Offset;

use crate::condition::{Condition, Level};
use crate::line_index::LineIndex;
use crate::record::{ErrorLog, ErrorRecord};
use crate::registrations::{topic_label, ReferenceSite, RegistrationTables, Site, TopicSite};

/// Owns one document's `ErrorLog`, its line index, and the cross-file
/// registration tables described in spec §4.2. A driver validating several
/// documents in parallel gives each its own `Reporter` and merges their
/// registration tables in a single-threaded phase afterward (spec §5); this
/// crate does not implement that merge itself since it presumes a single
/// document per `Reporter`, but `check_for_duplicates_in_things` /
/// `check_for_duplicates_in_schemas` run the same logic a merged driver
/// would, just scoped to one `Reporter`'s tables. (Spec §6 lists these two
/// checks under `ErrorLog`; here they live on `Reporter` because they need
/// the registration tables `ErrorLog` itself doesn't carry — a deliberate
/// split along Rust ownership lines rather than a literal method-for-method
/// port.)
pub struct Reporter {
    file: String,
    default_folder: String,
    line_index: LineIndex,
    log: ErrorLog,
    tables: RegistrationTables,
}

impl Reporter {
    pub fn new(file: impl Into<String>, source: &str, default_folder: impl Into<String>) -> Self {
        Reporter {
            file: file.into(),
            default_folder: default_folder.into(),
            line_index: LineIndex::new(source),
            log: ErrorLog::new(),
            tables: RegistrationTables::default(),
        }
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn default_folder(&self) -> &str {
        &self.default_folder
    }

    pub fn line_of(&self, offset: Offset) -> u32 {
        self.line_index.line_of(offset)
    }

    pub fn log(&self) -> &ErrorLog {
        &self.log
    }

    pub fn into_log(self) -> ErrorLog {
        self.log
    }

    pub fn add_warning(&mut self, condition: Condition, message: impl Into<String>, offset: Offset) {
        let line = self.line_index.line_of(offset);
        self.log.push(ErrorRecord::new(condition, Level::Warning, message, self.file.clone(), line));
    }

    pub fn add_error(&mut self, condition: Condition, message: impl Into<String>, offset: Offset) {
        let line = self.line_index.line_of(offset);
        self.log.push(ErrorRecord::new(condition, Level::Error, message, self.file.clone(), line));
    }

    pub fn add_fatal(&mut self, condition: Condition, message: impl Into<String>, offset: Offset) {
        let line = self.line_index.line_of(offset);
        self.log.push(ErrorRecord::new(condition, Level::Fatal, message, self.file.clone(), line));
    }

    /// Like [`Self::add_error`], but cites a conflicting prior site.
    pub fn add_error_with_cross_reference(
        &mut self,
        condition: Condition,
        message: impl Into<String>,
        offset: Offset,
        cross_reference_offset: Offset,
        cross_reference_key: impl Into<String>,
    ) {
        let line = self.line_index.line_of(offset);
        let cross_line = self.line_index.line_of(cross_reference_offset);
        self.log.push(
            ErrorRecord::new(condition, Level::Error, message, self.file.clone(), line)
                .with_cross_reference(cross_line, cross_reference_key),
        );
    }

    pub fn register_reference_from_thing(
        &mut self,
        canonical_path: impl Into<String>,
        file: impl Into<String>,
        line: u32,
        raw_ref_value: impl Into<String>,
    ) {
        self.tables
            .references
            .entry(canonical_path.into())
            .or_default()
            .push(ReferenceSite { file: file.into(), line, raw_ref: raw_ref_value.into() });
    }

    pub fn register_typed_reference_from_thing(
        &mut self,
        canonical_path: impl Into<String>,
        expected_type: impl Into<String>,
        file: impl Into<String>,
        line: u32,
        raw_ref_value: impl Into<String>,
    ) {
        self.tables
            .typed_references
            .entry((canonical_path.into(), expected_type.into()))
            .or_default()
            .push(ReferenceSite { file: file.into(), line, raw_ref: raw_ref_value.into() });
    }

    pub fn register_name_in_thing(&mut self, generated_name: impl Into<String>, file: impl Into<String>, line: u32) {
        self.tables
            .thing_names
            .entry(generated_name.into())
            .or_default()
            .push(Site { file: file.into(), line });
    }

    pub fn register_schema_name(
        &mut self,
        name: impl Into<String>,
        file: impl Into<String>,
        folder: impl Into<String>,
        line: u32,
    ) {
        let name = name.into();
        let file = file.into();
        let folder = folder.into();
        self.tables
            .schema_names_by_folder
            .entry(folder.clone())
            .or_default()
            .entry(name.clone())
            .or_default()
            .push(Site { file: file.clone(), line });
        if folder == self.default_folder {
            self.tables.thing_names.entry(name).or_default().push(Site { file, line });
        }
    }

    pub fn register_topic_in_thing(&mut self, resolved_topic: impl Into<String>, file: impl Into<String>, line: u32, raw_topic: impl Into<String>) {
        self.tables
            .topics
            .entry(resolved_topic.into())
            .or_default()
            .push(TopicSite { file: file.into(), line, raw_topic: raw_topic.into() });
    }

    /// A reference never registered anywhere resolves to nothing: report
    /// `ItemNotFound` at the citing site.
    pub fn add_reference_error(&mut self, canonical_path: &str, offset: Offset) {
        self.add_error(
            Condition::ItemNotFound,
            format!("reference to '{canonical_path}' does not resolve to a known file"),
            offset,
        );
    }

    /// A reference resolved, but not to the expected kind of entity.
    pub fn add_reference_type_error(&mut self, canonical_path: &str, expected_type: &str, offset: Offset) {
        self.add_error(
            Condition::TypeMismatch,
            format!("reference to '{canonical_path}' does not resolve to a {expected_type}"),
            offset,
        );
    }

    /// Fire a `Duplication` error at every site of any generated name
    /// (Thing-level or default-folder schema name) registered more than
    /// once, and at every site of any resolved topic registered more than
    /// once (spec §4.2 post-pass checks).
    pub fn check_for_duplicates_in_things(&mut self) {
        tracing::debug!(count = self.tables.thing_names.len(), "checking for duplicate generated names");
        for (name, sites) in &self.tables.thing_names {
            if sites.len() <= 1 {
                continue;
            }
            for (i, site) in sites.iter().enumerate() {
                let cross = sites.iter().enumerate().find(|(j, _)| *j != i).map(|(_, s)| s);
                let mut record = ErrorRecord::new(
                    Condition::Duplication,
                    Level::Error,
                    format!("generated name '{name}' is used more than once"),
                    site.file.clone(),
                    site.line,
                );
                if let Some(cross) = cross {
                    record = record.with_cross_reference(cross.line, name.clone());
                }
                self.log.push(record);
            }
        }

        for (resolved, sites) in &self.tables.topics {
            if sites.len() <= 1 {
                continue;
            }
            for (i, site) in sites.iter().enumerate() {
                let label = topic_label(resolved, &site.raw_topic);
                let cross = sites.iter().enumerate().find(|(j, _)| *j != i).map(|(_, s)| s);
                let mut record = ErrorRecord::new(
                    Condition::Duplication,
                    Level::Error,
                    format!("{label} '{resolved}' is used more than once"),
                    site.file.clone(),
                    site.line,
                );
                if let Some(cross) = cross {
                    record = record.with_cross_reference(cross.line, resolved.clone());
                }
                self.log.push(record);
            }
        }
    }

    /// Fire a `Duplication` error at every site of a schema name registered
    /// more than once within the same folder (spec §4.2).
    pub fn check_for_duplicates_in_schemas(&mut self) {
        for names in self.tables.schema_names_by_folder.values() {
            for (name, sites) in names {
                if sites.len() <= 1 {
                    continue;
                }
                for (i, site) in sites.iter().enumerate() {
                    let cross = sites.iter().enumerate().find(|(j, _)| *j != i).map(|(_, s)| s);
                    let mut record = ErrorRecord::new(
                        Condition::Duplication,
                        Level::Error,
                        format!("generated schema name '{name}' is used more than once"),
                        site.file.clone(),
                        site.line,
                    );
                    if let Some(cross) = cross {
                        record = record.with_cross_reference(cross.line, name.clone());
                    }
                    self.log.push(record);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_names_produce_one_record_per_site() {
        let mut r = Reporter::new("thing.json", "{}", "default");
        r.register_name_in_thing("Lamp", "a.json", 1);
        r.register_name_in_thing("Lamp", "b.json", 5);
        r.check_for_duplicates_in_things();
        assert_eq!(r.log().errors().len(), 2);
        assert!(r.log().errors().iter().all(|e| e.condition == Condition::Duplication));
    }

    #[test]
    fn unique_names_produce_no_records() {
        let mut r = Reporter::new("thing.json", "{}", "default");
        r.register_name_in_thing("Lamp", "a.json", 1);
        r.register_name_in_thing("Switch", "b.json", 5);
        r.check_for_duplicates_in_things();
        assert!(r.log().errors().is_empty());
    }

    #[test]
    fn schema_name_in_default_folder_merges_into_thing_namespace() {
        let mut r = Reporter::new("thing.json", "{}", "default");
        r.register_name_in_thing("Lamp", "a.json", 1);
        r.register_schema_name("Lamp", "schemas.json", "default", 9);
        r.check_for_duplicates_in_things();
        assert_eq!(r.log().errors().len(), 2);
    }

    #[test]
    fn schema_name_outside_default_folder_does_not_merge() {
        let mut r = Reporter::new("thing.json", "{}", "default");
        r.register_name_in_thing("Lamp", "a.json", 1);
        r.register_schema_name("Lamp", "schemas.json", "other", 9);
        r.check_for_duplicates_in_things();
        assert!(r.log().errors().is_empty());
    }

    #[test]
    fn partially_resolved_topic_is_labeled() {
        assert_eq!(topic_label("dev/{executorId}/x", "dev/{executorId}/x"), "Partially resolved topic");
        assert_eq!(topic_label("dev/read/x", "dev/{action}/x"), "Resolved topic");
        assert_eq!(topic_label("dev/x", "dev/x"), "Topic");
    }
}
