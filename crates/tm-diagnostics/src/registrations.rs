//! Cross-file registration tables consulted by the post-pass duplicate
//! checks (spec §4.2): generated names, schema names, topics, and external
//! references seen while validating one or more Things.

use std::collections::HashMap;

#[derive(Debug, Clone)]
pub(crate) struct Site {
    pub file: String,
    pub line: u32,
}

#[derive(Debug, Clone)]
pub(crate) struct ReferenceSite {
    pub file: String,
    pub line: u32,
    pub raw_ref: String,
}

#[derive(Debug, Clone)]
pub(crate) struct TopicSite {
    pub file: String,
    pub line: u32,
    pub raw_topic: String,
}

#[derive(Debug, Default)]
pub(crate) struct RegistrationTables {
    pub references: HashMap<String, Vec<ReferenceSite>>,
    pub typed_references: HashMap<(String, String), Vec<ReferenceSite>>,
    /// Generated names registered directly on Things, plus any schema name
    /// registered under the default folder (spec: "merges with the Thing
    /// name set when folder equals the default folder").
    pub thing_names: HashMap<String, Vec<Site>>,
    /// Every schema-name registration, kept per folder so
    /// `check_for_duplicates_in_schemas` can find collisions within a
    /// folder's own generated-code namespace.
    pub schema_names_by_folder: HashMap<String, HashMap<String, Vec<Site>>>,
    pub topics: HashMap<String, Vec<TopicSite>>,
}

/// Classify how a resolved topic relates to its raw source form, for the
/// duplicate-topic diagnostic message (spec §4.2).
pub(crate) fn topic_label(resolved: &str, raw: &str) -> &'static str {
    if resolved != raw {
        "Resolved topic"
    } else if raw.contains('{') {
        "Partially resolved topic"
    } else {
        "Topic"
    }
}
