//! Declarative field validation for post payloads.
//!
//! A [`RuleSet`] maps field names to rules. Validation returns every failing
//! rule per field; a missing field only reports `required`.

use bytes::Bytes;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::blob_name;

/// Image formats accepted on create.
pub const IMAGE_FORMATS: &[&str] = &["jpeg", "png", "jpg", "gif", "svg"];

/// An `image` part from a request. A part sent without a filename is a plain
/// form value, not a file.
#[derive(Debug, Clone, Default)]
pub struct UploadedImage {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Bytes,
}

impl UploadedImage {
    pub fn is_file(&self) -> bool {
        self.file_name.is_some()
    }

    /// An empty file input (no bytes, no filename) or a blank plain value
    /// counts as not supplied.
    pub fn is_present(&self) -> bool {
        if self.is_file() {
            !self.data.is_empty() || self.file_name.as_deref().is_some_and(|n| !n.is_empty())
        } else {
            !self.data.trim_ascii().is_empty()
        }
    }

    /// Declared content type, falling back to a guess from the filename.
    pub fn mime_type(&self) -> String {
        let declared = self
            .content_type
            .as_deref()
            .map(blob_name::essence)
            .filter(|m| !m.is_empty() && m != "application/octet-stream");
        if let Some(mime) = declared {
            return mime;
        }
        self.file_name
            .as_deref()
            .and_then(|name| mime_guess::from_path(name).first_raw())
            .unwrap_or("application/octet-stream")
            .to_string()
    }

    pub fn size_kb(&self) -> f64 {
        self.data.len() as f64 / 1024.0
    }
}

/// Raw create/update payload as received.
#[derive(Debug, Clone, Default)]
pub struct PostInput {
    pub title: Option<String>,
    pub content: Option<String>,
    pub image: Option<UploadedImage>,
}

impl PostInput {
    pub fn title(&self) -> Option<&str> {
        non_blank(self.title.as_deref())
    }

    pub fn content(&self) -> Option<&str> {
        non_blank(self.content.as_deref())
    }

    /// The uploaded image file, if one was actually supplied.
    pub fn image(&self) -> Option<&UploadedImage> {
        self.image
            .as_ref()
            .filter(|img| img.is_file() && img.is_present())
    }

    /// True when `image` was sent as a non-blank plain value instead of a file.
    fn image_is_value(&self) -> bool {
        self.image
            .as_ref()
            .is_some_and(|img| !img.is_file() && img.is_present())
    }

    fn field(&self, name: &str) -> FieldValue<'_> {
        match name {
            "title" => self.title().map_or(FieldValue::Missing, FieldValue::Text),
            "content" => self.content().map_or(FieldValue::Missing, FieldValue::Text),
            "image" => match self.image() {
                Some(file) => FieldValue::File(file),
                None if self.image_is_value() => FieldValue::NotFile,
                None => FieldValue::Missing,
            },
            _ => FieldValue::Missing,
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

enum FieldValue<'a> {
    Missing,
    Text(&'a str),
    File(&'a UploadedImage),
    /// Present, but not a file upload.
    NotFile,
}

#[derive(Debug, Clone)]
pub enum Rule {
    Required,
    /// Value must be a file with an `image/*` type.
    Image,
    /// Value must be a file whose type maps to one of these extensions.
    Mimes(&'static [&'static str]),
    /// Kilobytes for files, characters for text.
    Max(u64),
}

impl Rule {
    fn check(&self, field: &str, value: &FieldValue<'_>) -> Option<String> {
        match (self, value) {
            (Rule::Required, FieldValue::Missing) => {
                Some(format!("The {field} field is required."))
            }
            (Rule::Required, _) => None,
            (Rule::Image, FieldValue::File(file)) if file.mime_type().starts_with("image/") => None,
            (Rule::Image, _) => Some(format!("The {field} field must be an image.")),
            (Rule::Mimes(formats), FieldValue::File(file)) if matches_format(file, formats) => None,
            (Rule::Mimes(formats), _) => Some(format!(
                "The {field} field must be a file of type: {}.",
                formats.join(", ")
            )),
            (Rule::Max(kb), FieldValue::File(file)) if file.size_kb() > *kb as f64 => Some(format!(
                "The {field} field must not be greater than {kb} kilobytes."
            )),
            (Rule::Max(max), FieldValue::Text(text)) if text.chars().count() as u64 > *max => {
                Some(format!(
                    "The {field} field must not be greater than {max} characters."
                ))
            }
            (Rule::Max(_), _) => None,
        }
    }
}

fn matches_format(file: &UploadedImage, formats: &[&str]) -> bool {
    let mime = file.mime_type();
    if formats.contains(&blob_name::extension_for(&mime)) {
        return true;
    }
    mime_guess::get_mime_extensions_str(&mime)
        .is_some_and(|exts| exts.iter().any(|ext| formats.contains(ext)))
}

/// Image constraints applied when a file is validated.
#[derive(Debug, Clone)]
pub struct ImageRules {
    pub max_kb: u64,
    pub formats: &'static [&'static str],
}

impl ImageRules {
    pub fn new(max_kb: u64) -> Self {
        Self {
            max_kb,
            formats: IMAGE_FORMATS,
        }
    }
}

impl Default for ImageRules {
    fn default() -> Self {
        Self::new(2048)
    }
}

/// Ordered rule table: field name -> rules.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    fields: Vec<(&'static str, Vec<Rule>)>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: &'static str, rules: Vec<Rule>) -> Self {
        self.fields.push((name, rules));
        self
    }

    /// Rules for creating a post: image, title and content all required.
    pub fn create(image: &ImageRules) -> Self {
        Self::new()
            .field(
                "image",
                vec![
                    Rule::Required,
                    Rule::Image,
                    Rule::Mimes(image.formats),
                    Rule::Max(image.max_kb),
                ],
            )
            .field("title", vec![Rule::Required])
            .field("content", vec![Rule::Required])
    }

    /// Rules for updating a post. The image is optional; its type and size
    /// are only checked when `image` rules are given.
    pub fn update(image: Option<&ImageRules>) -> Self {
        let rules = Self::new()
            .field("title", vec![Rule::Required])
            .field("content", vec![Rule::Required]);
        match image {
            Some(image) => rules.field(
                "image",
                vec![
                    Rule::Image,
                    Rule::Mimes(image.formats),
                    Rule::Max(image.max_kb),
                ],
            ),
            None => rules,
        }
    }

    pub fn validate(&self, input: &PostInput) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        for (name, rules) in &self.fields {
            let value = input.field(name);
            let is_required = rules.iter().any(|r| matches!(r, Rule::Required));
            if let FieldValue::Missing = value {
                if is_required {
                    errors.add(name, Rule::Required.check(name, &value).unwrap_or_default());
                }
                continue;
            }
            for rule in rules {
                if let Some(message) = rule.check(name, &value) {
                    errors.add(name, message);
                }
            }
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Field -> messages, in rule table order. Serializes as a JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: Vec<(String, Vec<String>)>,
}

impl ValidationErrors {
    pub fn add(&mut self, field: &str, message: String) {
        match self.fields.iter_mut().find(|(name, _)| name == field) {
            Some((_, messages)) => messages.push(message),
            None => self.fields.push((field.to_string(), vec![message])),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, messages)| messages.as_slice())
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }
}

impl Serialize for ValidationErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, messages) in &self.fields {
            map.serialize_entry(name, messages)?;
        }
        map.end()
    }
}
