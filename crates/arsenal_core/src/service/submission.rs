//! Write submission model and the form-field marker codec.
//!
//! # Responsibility
//! - Decode transport form fields into a transport-neutral `Submission`.
//! - Encode/decode presence markers `{kind}|{category}|{name}`.
//!
//! # Invariants
//! - Presence of a marker means "checked"; its value is ignored.
//! - A submission is either a reconciliation or a bulk import, never both.
//! - A marker is matched by its full text, so categories and names may both
//!   contain `|`.

use crate::model::item::ItemKey;
use std::collections::HashSet;

/// Form field carrying the submission discriminator.
pub const ACTION_FIELD: &str = "_action";
/// Discriminator value selecting bulk import.
pub const BULK_IMPORT_ACTION: &str = "bulk_import";
/// Form field carrying the uploaded name list.
pub const IMPORT_FILE_FIELD: &str = "items_file";

const MARKER_SEPARATOR: char = '|';

/// Which flag a presence marker toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlagKind {
    Blueprint,
    Mastered,
}

impl FlagKind {
    pub fn marker_prefix(self) -> &'static str {
        match self {
            Self::Blueprint => "bp",
            Self::Mastered => "ma",
        }
    }

    fn from_marker_prefix(value: &str) -> Option<Self> {
        match value {
            "bp" => Some(Self::Blueprint),
            "ma" => Some(Self::Mastered),
            _ => None,
        }
    }
}

/// Encodes the form field name for one item flag.
pub fn marker_key(kind: FlagKind, key: &ItemKey) -> String {
    format!(
        "{}{MARKER_SEPARATOR}{}{MARKER_SEPARATOR}{}",
        kind.marker_prefix(),
        key.category,
        key.name
    )
}

/// Decodes a form field name; returns `None` for anything that is not a
/// well-formed marker.
///
/// Splits at the first two `|`, so a category containing `|` decodes
/// ambiguously. Reconciliation matches whole markers and never relies on
/// this split.
pub fn parse_marker(field: &str) -> Option<(FlagKind, ItemKey)> {
    let mut parts = field.splitn(3, MARKER_SEPARATOR);
    let kind = FlagKind::from_marker_prefix(parts.next()?)?;
    let category = parts.next()?;
    let name = parts.next()?;
    Some((kind, ItemKey::new(category, name)))
}

/// Sparse set of checked flags in one reconciliation submission.
///
/// Markers are kept as received and looked up by the encoding of each
/// catalog key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagMarks {
    markers: HashSet<String>,
}

impl FlagMarks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects markers from form field names, ignoring unrelated fields.
    pub fn from_field_names<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let markers = fields
            .into_iter()
            .map(|field| field.as_ref().to_string())
            .filter(|field| parse_marker(field).is_some())
            .collect();
        Self { markers }
    }

    pub fn mark(&mut self, kind: FlagKind, key: ItemKey) {
        self.markers.insert(marker_key(kind, &key));
    }

    pub fn is_marked(&self, kind: FlagKind, key: &ItemKey) -> bool {
        self.markers.contains(&marker_key(kind, key))
    }

    /// Every distinct marker, as received.
    pub fn markers(&self) -> impl Iterator<Item = &str> {
        self.markers.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}

/// One state-changing request, decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Full replacement of every item's flags.
    Reconcile(FlagMarks),
    /// Force both flags on for the names in the uploaded text.
    /// `None` when no file was attached.
    BulkImport(Option<Vec<u8>>),
}

impl Submission {
    /// Builds a submission from decoded text fields and an optional upload.
    ///
    /// The upload is only consulted in bulk-import mode.
    pub fn from_form<I>(fields: I, upload: Option<Vec<u8>>) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut action: Option<String> = None;
        let mut field_names = Vec::new();
        for (name, value) in fields {
            if name == ACTION_FIELD {
                // First occurrence wins.
                action.get_or_insert(value);
                continue;
            }
            field_names.push(name);
        }

        if action.as_deref() == Some(BULK_IMPORT_ACTION) {
            Self::BulkImport(upload)
        } else {
            Self::Reconcile(FlagMarks::from_field_names(field_names))
        }
    }
}
