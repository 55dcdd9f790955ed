//! JSON output formats.

use apk_manifest_core::{Attributes, Span};
use serde::Serialize;

#[derive(Serialize)]
pub struct InspectJson<'a> {
    pub status: &'a str,
    pub command: &'a str,
    pub input: String,
    pub entry: &'a str,
    pub size: usize,
    pub main_end: usize,
    pub main_attributes: &'a Attributes,
    pub entries: Vec<EntryJson<'a>>,
}

#[derive(Serialize)]
pub struct EntryJson<'a> {
    pub name: &'a str,
    pub attributes: &'a Attributes,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
    pub digests: Vec<DigestJson<'a>>,
}

#[derive(Serialize)]
pub struct DigestJson<'a> {
    pub algorithm: &'static str,
    pub declared: &'a str,
    /// Digest of the entry's raw chunk, when chunks were captured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub computed: Option<String>,
}

#[derive(Serialize)]
pub struct ErrorJson<'a> {
    pub status: &'a str,
    pub error: String,
    pub causes: Vec<String>,
}
