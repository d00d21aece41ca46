//! Splitting fixed-length records into named fields.
//!
//! A [`FixedLengthFieldParser`] is given a [`Layout`] (a sequence of
//! `(field_name, field_length)` pairs, or one such sequence per record type)
//! and validates each record while slicing it: the field separator must be
//! present between fields when one is configured, and otherwise every value
//! must be justified the way its field expects.

use crate::core::encoding::Encoding;
use crate::domain::model::{FieldSpec, Record};
use crate::domain::ports::{JustificationOverride, RecordTypeResolver};
use crate::utils::error::{ParseError, ParseResult};
use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Field layout of the records in a file.
pub enum Layout {
    /// Every record has the same fields.
    Uniform(Vec<FieldSpec>),
    /// Records carry a type indicator; each type has its own fields.
    Typed {
        resolver: Box<dyn RecordTypeResolver>,
        types: HashMap<String, Vec<FieldSpec>>,
    },
}

impl Layout {
    pub fn uniform<I, F>(fields: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<FieldSpec>,
    {
        Layout::Uniform(fields.into_iter().map(Into::into).collect())
    }

    pub fn typed<R>(resolver: R, types: HashMap<String, Vec<FieldSpec>>) -> Self
    where
        R: RecordTypeResolver + 'static,
    {
        Layout::Typed {
            resolver: Box::new(resolver),
            types,
        }
    }
}

impl fmt::Debug for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Layout::Uniform(fields) => f.debug_tuple("Uniform").field(fields).finish(),
            Layout::Typed { types, .. } => f.debug_struct("Typed").field("types", types).finish_non_exhaustive(),
        }
    }
}

/// Resolves the record type from a fixed slice of the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OffsetRecordType {
    pub position: usize,
    pub length: usize,
}

impl OffsetRecordType {
    pub fn new(position: usize, length: usize) -> Self {
        Self { position, length }
    }
}

impl RecordTypeResolver for OffsetRecordType {
    fn record_type(&self, line: &str) -> String {
        CharLine::new(line).slice(self.position, self.length).to_string()
    }
}

#[derive(Debug, Clone)]
pub struct ParserOptions {
    /// Separator expected between consecutive fields. Disables the
    /// justification check when set.
    pub field_separator: Option<String>,
    pub right_justified: HashSet<String>,
    pub skip_justified: HashSet<String>,
    pub skip_unknown_types: bool,
    pub strip: bool,
    pub encoding: Encoding,
    pub skip_blank_lines: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            field_separator: None,
            right_justified: HashSet::new(),
            skip_justified: HashSet::new(),
            skip_unknown_types: true,
            strip: true,
            encoding: Encoding::default(),
            skip_blank_lines: false,
        }
    }
}

pub struct FixedLengthFieldParser {
    layout: Layout,
    options: ParserOptions,
    justification_override: Option<Box<dyn JustificationOverride>>,
}

impl fmt::Debug for FixedLengthFieldParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FixedLengthFieldParser")
            .field("layout", &self.layout)
            .field("options", &self.options)
            .field("justification_override", &self.justification_override.is_some())
            .finish()
    }
}

impl FixedLengthFieldParser {
    pub fn new(layout: Layout, options: ParserOptions) -> Self {
        Self {
            layout,
            options,
            justification_override: None,
        }
    }

    pub fn with_justification_override<H>(mut self, hook: H) -> Self
    where
        H: JustificationOverride + 'static,
    {
        self.justification_override = Some(Box::new(hook));
        self
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut ParserOptions {
        &mut self.options
    }

    pub fn is_typed(&self) -> bool {
        matches!(self.layout, Layout::Typed { .. })
    }

    /// Field sequence for a record type; `None` selects the uniform layout.
    pub fn fields_for(&self, record_type: Option<&str>) -> Option<&[FieldSpec]> {
        match (&self.layout, record_type) {
            (Layout::Uniform(fields), None) => Some(fields),
            (Layout::Typed { types, .. }, Some(key)) => types.get(key).map(Vec::as_slice),
            _ => None,
        }
    }

    /// Known record types, sorted.
    pub fn record_types(&self) -> Vec<&str> {
        match &self.layout {
            Layout::Uniform(_) => Vec::new(),
            Layout::Typed { types, .. } => {
                let mut keys: Vec<&str> = types.keys().map(String::as_str).collect();
                keys.sort_unstable();
                keys
            }
        }
    }

    /// Unique field names of a record type, in first-occurrence order.
    pub fn header_for(&self, record_type: Option<&str>) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.fields_for(record_type)
            .unwrap_or_default()
            .iter()
            .map(|spec| spec.name.as_str())
            .filter(|name| seen.insert(*name))
            .collect()
    }

    /// Splits one line (without its terminator) into a record.
    ///
    /// Returns `Ok(None)` for records of an unknown type when
    /// `skip_unknown_types` is set.
    pub fn parse_record(&self, line: &str) -> ParseResult<Option<Record>> {
        let (record_type, fields) = match &self.layout {
            Layout::Uniform(fields) => (None, fields.as_slice()),
            Layout::Typed { resolver, types } => {
                let record_type = resolver.record_type(line);
                match types.get(&record_type) {
                    Some(fields) => (Some(record_type), fields.as_slice()),
                    None if self.options.skip_unknown_types => {
                        tracing::trace!("Skipping record of unknown type {:?}", record_type);
                        return Ok(None);
                    }
                    None => return Err(ParseError::UnknownRecordType { record_type }),
                }
            }
        };

        let line = CharLine::new(line);
        let separator = self
            .options
            .field_separator
            .as_deref()
            .filter(|sep| !sep.is_empty());
        let separator_len = separator.map_or(0, |sep| sep.chars().count());

        let mut record = Record::new(record_type);
        let mut pointer = 0;

        for (index, spec) in fields.iter().enumerate() {
            if let Some(sep) = separator {
                if index > 0 {
                    if line.slice(pointer, separator_len) != sep {
                        return Err(ParseError::MissingSeparator {
                            field: spec.name.clone(),
                            pointer,
                        });
                    }
                    pointer += separator_len;
                }
            }

            let raw = line.slice(pointer, spec.length);
            let mut value = Cow::Borrowed(raw);

            if separator.is_none() && self.is_misjustified(&spec.name, raw) {
                let replacement = self
                    .justification_override
                    .as_ref()
                    .and_then(|hook| hook.override_value(&spec.name, raw));
                match replacement {
                    Some(replacement) => {
                        tracing::debug!("Justification of {:?} overridden: {:?} -> {:?}", spec.name, raw, replacement);
                        value = Cow::Owned(replacement);
                    }
                    None => {
                        return Err(ParseError::Justification {
                            field: spec.name.clone(),
                            value: raw.to_string(),
                        })
                    }
                }
            }

            let value = if self.options.strip {
                value.trim().to_string()
            } else {
                value.into_owned()
            };
            record.insert(&spec.name, value);
            pointer += spec.length;
        }

        Ok(Some(record))
    }

    /// True when padding sits on the content side of the value.
    pub fn is_misjustified(&self, field: &str, value: &str) -> bool {
        if self.options.skip_justified.contains(field) {
            return false;
        }
        if self.options.right_justified.contains(field) {
            value.trim_start().chars().next_back().is_some_and(char::is_whitespace)
        } else {
            value.trim_end().chars().next().is_some_and(char::is_whitespace)
        }
    }
}

/// Character-indexed view of a line. Slices clamp to the end of the line.
struct CharLine<'a> {
    text: &'a str,
    // Byte offset of every char boundary, including the end; empty for ASCII.
    boundaries: Vec<usize>,
}

impl<'a> CharLine<'a> {
    fn new(text: &'a str) -> Self {
        let boundaries = if text.is_ascii() {
            Vec::new()
        } else {
            text.char_indices()
                .map(|(i, _)| i)
                .chain(std::iter::once(text.len()))
                .collect()
        };
        Self { text, boundaries }
    }

    fn slice(&self, start: usize, length: usize) -> &'a str {
        let end = start.saturating_add(length);
        if self.boundaries.is_empty() {
            let len = self.text.len();
            &self.text[start.min(len)..end.min(len)]
        } else {
            let chars = self.boundaries.len() - 1;
            &self.text[self.boundaries[start.min(chars)]..self.boundaries[end.min(chars)]]
        }
    }
}
