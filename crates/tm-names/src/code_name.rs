//! `CodeName`: an identifier pre-computed in four casings (spec §4.4).

/// An identifier decomposed into lowercase words and rendered in the four
/// casings the downstream generator needs. Computed once at construction —
/// callers read `.lower()`/`.pascal()`/`.camel()`/`.snake()` rather than
/// recomputing per use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeName {
    words: Vec<String>,
    had_underscores: bool,
    lower: String,
    pascal: String,
    camel: String,
    snake: String,
}

impl CodeName {
    pub fn new(identifier: &str) -> Self {
        Self::from_words(decompose(identifier), identifier.contains('_'))
    }

    fn from_words(words: Vec<String>, had_underscores: bool) -> Self {
        let lower = words.concat();
        let pascal = words.iter().map(|w| capitalize(w)).collect();
        let camel = words
            .iter()
            .enumerate()
            .map(|(i, w)| if i == 0 { w.clone() } else { capitalize(w) })
            .collect();
        let snake = words.join("_");
        CodeName { words, had_underscores, lower, pascal, camel, snake }
    }

    pub fn lower(&self) -> &str {
        &self.lower
    }

    pub fn pascal(&self) -> &str {
        &self.pascal
    }

    pub fn camel(&self) -> &str {
        &self.camel
    }

    pub fn snake(&self) -> &str {
        &self.snake
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Extend this name with an optional prefix and up to four suffixes,
    /// returning a fresh `CodeName` covering the combined word sequence. If
    /// any component involved (this name, the prefix, or a suffix) used
    /// underscores, the extension keeps tracking that so later extensions
    /// still favor `snake()` the way the original identifier did (spec
    /// §4.4: "if the original had underscores, extension preserves snake
    /// style").
    pub fn extend(&self, prefix: Option<&str>, suffixes: &[&str]) -> CodeName {
        assert!(suffixes.len() <= 4, "at most four suffixes are supported");

        let mut had_underscores = self.had_underscores;
        let mut words = Vec::new();
        if let Some(p) = prefix {
            had_underscores |= p.contains('_');
            words.extend(decompose(p));
        }
        words.extend(self.words.iter().cloned());
        for s in suffixes {
            had_underscores |= s.contains('_');
            words.extend(decompose(s));
        }

        CodeName::from_words(words, had_underscores)
    }

    /// Whether this name (or something it was extended from) used
    /// underscores in its original source spelling.
    pub fn prefers_snake_style(&self) -> bool {
        self.had_underscores
    }
}

/// Split `identifier` into lowercase words: on `_`/`-`, and at each
/// lower→upper boundary (spec §4.4).
fn decompose(identifier: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;

    for c in identifier.chars() {
        if c == '_' || c == '-' {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current).to_lowercase());
            }
            prev_lower = false;
            continue;
        }
        if c.is_uppercase() && prev_lower {
            words.push(std::mem::take(&mut current).to_lowercase());
        }
        current.push(c);
        prev_lower = c.is_lowercase() || c.is_numeric();
    }
    if !current.is_empty() {
        words.push(current.to_lowercase());
    }
    words
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}
