use std::collections::HashMap;
use std::sync::Arc;

use ccg_category::Category;
use ccg_protocol::{MarkedupArchive, MarkedupEntry};
use rkyv::ser::{serializers::AllocSerializer, Serializer};
use rkyv::AlignedVec;
use tracing::{debug, warn};

use crate::error::LexiconError;
use crate::markup::MarkedCategory;

/// How strictly entries are checked while loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadOptions {
    /// Skip entries whose spine ids are not threaded through an argument,
    /// instead of only logging them.
    pub strict: bool,
}

/// An entry that was left out of the lexicon, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    /// First line of the entry in the source text, from 1. Zero for
    /// entries read from an archive.
    pub line: usize,
    pub category: String,
    pub reason: String,
}

/// Category-keyed coindexation templates.
#[derive(Debug, Clone, Default)]
pub struct Markedup {
    entries: HashMap<Arc<Category>, MarkedCategory>,
    /// Featureless category to the first entry of that shape.
    shapes: HashMap<Arc<Category>, Arc<Category>>,
}

impl Markedup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Adds `template` for `category`, replacing any earlier entry.
    pub fn insert(&mut self, category: Arc<Category>, template: MarkedCategory) {
        self.shapes
            .entry(category.without_features())
            .or_insert_with(|| category.clone());
        self.entries.insert(category, template);
    }

    /// The template for `category`, falling back to an entry that differs
    /// only in features.
    pub fn lookup(&self, category: &Category) -> Option<&MarkedCategory> {
        if let Some(template) = self.entries.get(category) {
            return Some(template);
        }
        let key = self.shapes.get(&category.without_features())?;
        self.entries.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Arc<Category>, &MarkedCategory)> {
        self.entries.iter()
    }

    pub fn parse(text: &str) -> (Markedup, Vec<SkippedEntry>) {
        Self::parse_with(text, LoadOptions::default())
    }

    /// Reads the text format: a category on an unindented line, then an
    /// indented `<arity> <markup>` line. Later indented lines, `#` comments
    /// and blank lines are ignored. Bad entries are skipped and reported.
    pub fn parse_with(text: &str, options: LoadOptions) -> (Markedup, Vec<SkippedEntry>) {
        let mut loader = Loader::new(options);
        let mut current: Option<Pending> = None;

        for (index, line) in text.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.starts_with('#') {
                continue;
            }
            if trimmed.is_empty() {
                if let Some(entry) = current.take() {
                    loader.finish(entry);
                }
                continue;
            }

            if line.starts_with(char::is_whitespace) {
                match current.as_mut() {
                    Some(entry) if entry.markup.is_none() => entry.markup = Some(trimmed.to_string()),
                    Some(_) => {}
                    None => debug!(line = index + 1, "indented line outside an entry"),
                }
            } else {
                if let Some(entry) = current.take() {
                    loader.finish(entry);
                }
                current = Some(Pending {
                    line: index + 1,
                    category: trimmed.to_string(),
                    markup: None,
                });
            }
        }
        if let Some(entry) = current.take() {
            loader.finish(entry);
        }
        loader.done()
    }

    /// Snapshot sorted by category text, for a stable archive.
    pub fn to_archive(&self) -> MarkedupArchive {
        let mut entries: Vec<MarkedupEntry> = self
            .entries
            .iter()
            .map(|(category, template)| MarkedupEntry {
                category: category.to_string(),
                arity: category.number_of_arguments() as u32,
                markup: template.source().to_string(),
            })
            .collect();
        entries.sort_by(|a, b| a.category.cmp(&b.category));
        MarkedupArchive::new(entries)
    }

    pub fn from_archive(archive: &MarkedupArchive, options: LoadOptions) -> (Markedup, Vec<SkippedEntry>) {
        let mut loader = Loader::new(options);
        for entry in &archive.entries {
            loader.add(0, &entry.category, entry.arity as usize, &entry.markup);
        }
        loader.done()
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, LexiconError> {
        let archive = self.to_archive();
        let mut serializer = AllocSerializer::<1024>::default();
        serializer
            .serialize_value(&archive)
            .map_err(|e| LexiconError::Serialize(format!("{:?}", e)))?;
        Ok(serializer.into_serializer().into_inner().to_vec())
    }

    /// Validates and loads a compiled lexicon. The bytes need not be aligned.
    pub fn from_bytes(bytes: &[u8], options: LoadOptions) -> Result<(Markedup, Vec<SkippedEntry>), LexiconError> {
        let mut aligned = AlignedVec::with_capacity(bytes.len());
        aligned.extend_from_slice(bytes);
        let archive: MarkedupArchive =
            rkyv::from_bytes(&aligned).map_err(|e| LexiconError::Archive(format!("{:?}", e)))?;
        if archive.version != MarkedupArchive::VERSION {
            return Err(LexiconError::Version(archive.version));
        }
        Ok(Self::from_archive(&archive, options))
    }
}

struct Pending {
    line: usize,
    category: String,
    markup: Option<String>,
}

struct Loader {
    options: LoadOptions,
    markedup: Markedup,
    skipped: Vec<SkippedEntry>,
}

impl Loader {
    fn new(options: LoadOptions) -> Self {
        Self {
            options,
            markedup: Markedup::new(),
            skipped: Vec::new(),
        }
    }

    fn finish(&mut self, entry: Pending) {
        let Some(markup_line) = entry.markup else {
            self.skip(entry.line, &entry.category, "missing markup line".to_string());
            return;
        };
        let (arity, markup) = match markup_line.split_once(char::is_whitespace) {
            Some((arity, markup)) => (arity, markup.trim()),
            None => {
                self.skip(entry.line, &entry.category, format!("expected '<arity> <markup>', got '{}'", markup_line));
                return;
            }
        };
        match arity.parse::<usize>() {
            Ok(arity) => self.add(entry.line, &entry.category, arity, markup),
            Err(_) => self.skip(entry.line, &entry.category, format!("invalid arity '{}'", arity)),
        }
    }

    fn add(&mut self, line: usize, category_text: &str, arity: usize, markup: &str) {
        let category = match Category::parse(category_text) {
            Ok(category) => category,
            Err(e) => return self.skip(line, category_text, e.to_string()),
        };
        let template = match MarkedCategory::parse(markup) {
            Ok(template) => template,
            Err(e) => return self.skip(line, category_text, e.to_string()),
        };

        if !template.category().matches(&category) {
            let reason = format!("markup is for {}, not {}", template.category(), category);
            return self.skip(line, category_text, reason);
        }
        if arity != category.number_of_arguments() {
            let reason = format!("arity {} but the category has {} arguments", arity, category.number_of_arguments());
            return self.skip(line, category_text, reason);
        }

        if let Err(e) = template.instantiate(None).validate() {
            if self.options.strict {
                return self.skip(line, category_text, e.to_string());
            }
            debug!(line, category = category_text, error = %e, "markedup entry fails validation");
        }
        self.markedup.insert(category, template);
    }

    fn skip(&mut self, line: usize, category: &str, reason: String) {
        warn!(line, category, reason = %reason, "skipping markedup entry");
        self.skipped.push(SkippedEntry {
            line,
            category: category.to_string(),
            reason,
        });
    }

    fn done(self) -> (Markedup, Vec<SkippedEntry>) {
        (self.markedup, self.skipped)
    }
}
