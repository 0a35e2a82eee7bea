use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::error::RestyleError;

/// A single entry of the style catalog.
///
/// The instruction text is opaque to this crate; it is forwarded verbatim to
/// the transform capability.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleDirective {
    pub id: String,
    pub label: String,
    pub instruction: String,
}

impl StyleDirective {
    pub fn new(id: impl Into<String>, label: impl Into<String>, instruction: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            instruction: instruction.into(),
        }
    }
}

/// Static, ordered list of style directives loaded at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StyleCatalog {
    entries: Vec<StyleDirective>,
}

/// (id, label, description of the look)
const BUILTIN_STYLES: &[(&str, &str, &str)] = &[
    ("buzz", "Buzz / Crew Cut", "a short buzz cut, tapered into a crew cut at the top"),
    ("pixie", "Pixie Cut", "a textured pixie cut with short sides and soft wispy bangs"),
    ("bob", "Classic Bob", "a chin-length classic bob with a clean blunt edge"),
    ("long-waves", "Long Waves", "long, loose beach waves falling past the shoulders"),
    ("curtain-bangs", "Curtain Bangs", "shoulder-length layers with face-framing curtain bangs"),
    ("undercut", "Undercut", "a disconnected undercut with longer hair swept back on top"),
    ("curly-afro", "Curly Afro", "a full, rounded natural afro with defined curls"),
    ("box-braids", "Box Braids", "medium-length box braids worn down"),
    ("slicked-back", "Slicked Back", "hair slicked straight back with a glossy finish"),
    ("mullet", "Modern Mullet", "a modern textured mullet, short in front and longer at the back"),
];

fn builtin_instruction(look: &str) -> String {
    format!(
        "Edit this photo so the person has {look}. Keep their face, identity, expression, \
         skin tone, clothing, lighting and background exactly the same. \
         Return a single photorealistic image."
    )
}

impl StyleCatalog {
    /// Build a catalog, rejecting empty lists, duplicate identifiers and
    /// entries without instruction text.
    pub fn new(entries: Vec<StyleDirective>) -> Result<Self, RestyleError> {
        if entries.is_empty() {
            return Err(RestyleError::Configuration("style catalog is empty".into()));
        }
        let mut seen = HashSet::new();
        for entry in &entries {
            if entry.id.trim().is_empty() {
                return Err(RestyleError::Configuration("style identifier is empty".into()));
            }
            if !seen.insert(entry.id.as_str()) {
                return Err(RestyleError::Configuration(format!(
                    "duplicate style identifier: {}",
                    entry.id
                )));
            }
            if entry.instruction.trim().is_empty() {
                return Err(RestyleError::Configuration(format!(
                    "style {} has no instruction",
                    entry.id
                )));
            }
        }
        Ok(Self { entries })
    }

    /// The hairstyle catalog shipped with the application.
    pub fn builtin() -> Self {
        let entries = BUILTIN_STYLES
            .iter()
            .map(|(id, label, look)| StyleDirective::new(*id, *label, builtin_instruction(look)))
            .collect();
        Self { entries }
    }

    /// Load a catalog from a JSON array of `{ id, label, instruction }`.
    pub fn from_json(json: &str) -> Result<Self, RestyleError> {
        let entries: Vec<StyleDirective> = serde_json::from_str(json)
            .map_err(|e| RestyleError::Configuration(format!("failed to parse style catalog: {}", e)))?;
        Self::new(entries)
    }

    pub fn find(&self, id: &str) -> Option<&StyleDirective> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn entries(&self) -> &[StyleDirective] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for StyleCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
