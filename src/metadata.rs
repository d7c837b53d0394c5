//! Mining of the `metadata: {...}` blob embedded in a message body.
//!
//! Upstream double-escapes the JSON before logging it, so pairs look like
//! `""name"":""Joe""`. The blob is never parsed as JSON; each field is
//! searched for on its own inside the captured span.

use once_cell::sync::Lazy;
use regex::Regex;

/// From `metadata:` to the last `}` on the line. Greedy, not brace-balanced.
static METADATA_SPAN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"metadata:\s*(\{.*\})").unwrap());

/// Blob keys, paired with the column each one fills
pub const METADATA_KEYS: [(&str, &str); 7] = [
    ("serviceType", "metadata_service_type"),
    ("type", "metadata_type"),
    ("status", "metadata_status"),
    ("name", "metadata_name"),
    ("personType", "metadata_person_type"),
    ("msisdn", "metadata_msisdn"),
    ("cpf", "metadata_cpf"),
];

static FIELD_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    METADATA_KEYS
        .iter()
        .map(|(key, _)| Regex::new(&format!(r#""{}"":""([^"]+)"""#, regex::escape(key))).unwrap())
        .collect()
});

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataFields {
    pub service_type: String,
    pub kind: String,
    pub status: String,
    pub name: String,
    pub person_type: String,
    pub msisdn: String,
    pub cpf: String,
}

impl MetadataFields {
    /// Column name and value pairs, in `METADATA_KEYS` order
    pub fn columns(&self) -> [(&'static str, &str); 7] {
        [
            (METADATA_KEYS[0].1, self.service_type.as_str()),
            (METADATA_KEYS[1].1, self.kind.as_str()),
            (METADATA_KEYS[2].1, self.status.as_str()),
            (METADATA_KEYS[3].1, self.name.as_str()),
            (METADATA_KEYS[4].1, self.person_type.as_str()),
            (METADATA_KEYS[5].1, self.msisdn.as_str()),
            (METADATA_KEYS[6].1, self.cpf.as_str()),
        ]
    }

    fn set(&mut self, idx: usize, value: String) {
        let slot = match idx {
            0 => &mut self.service_type,
            1 => &mut self.kind,
            2 => &mut self.status,
            3 => &mut self.name,
            4 => &mut self.person_type,
            5 => &mut self.msisdn,
            _ => &mut self.cpf,
        };
        *slot = value;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataOutcome {
    /// No `metadata: {...}` span in the content
    Absent,
    /// Span found; fields not present in it are empty
    Found(MetadataFields),
}

impl MetadataOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, MetadataOutcome::Found(_))
    }

    pub fn into_fields(self) -> MetadataFields {
        match self {
            MetadataOutcome::Absent => MetadataFields::default(),
            MetadataOutcome::Found(fields) => fields,
        }
    }
}

/// The greedy `{...}` span following `metadata:`, if any
pub fn find_metadata_span(content: &str) -> Option<&str> {
    METADATA_SPAN_RE
        .captures(content)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

pub fn extract_metadata(content: &str) -> MetadataOutcome {
    let Some(span) = find_metadata_span(content) else {
        return MetadataOutcome::Absent;
    };

    let mut fields = MetadataFields::default();
    for (idx, pattern) in FIELD_PATTERNS.iter().enumerate() {
        if let Some(value) = pattern.captures(span).and_then(|c| c.get(1)) {
            fields.set(idx, value.as_str().to_string());
        }
    }

    tracing::debug!(fields = ?fields.columns(), "metadata fields extracted");

    MetadataOutcome::Found(fields)
}
