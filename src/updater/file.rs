//! Decoded handle for a file fetched through the contents API.
use base64::{Engine, prelude::BASE64_STANDARD};
use serde_json::Value;

use crate::{error::PropagatorError, forge::types::ContentFile, result::Result};

/// Transport encoding the contents API used for a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentEncoding {
    Base64,
    Utf8,
}

impl ContentEncoding {
    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "base64" => Ok(Self::Base64),
            "utf-8" | "utf8" => Ok(Self::Utf8),
            other => {
                Err(PropagatorError::UnsupportedEncoding(other.to_string())
                    .into())
            }
        }
    }

    pub fn decode(&self, content: &str) -> Result<String> {
        match self {
            Self::Base64 => {
                // the API wraps base64 payloads across lines
                let compact: String =
                    content.chars().filter(|c| !c.is_whitespace()).collect();
                let bytes = BASE64_STANDARD
                    .decode(compact)
                    .map_err(PropagatorError::from)?;
                Ok(String::from_utf8(bytes).map_err(PropagatorError::from)?)
            }
            Self::Utf8 => Ok(content.to_string()),
        }
    }

    pub fn encode(&self, content: &str) -> String {
        match self {
            Self::Base64 => BASE64_STANDARD.encode(content),
            Self::Utf8 => content.to_string(),
        }
    }
}

/// JSON document stored in a repository, with everything needed to write it
/// back: path, revision token and transport encoding.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteFile {
    pub path: String,
    /// Revision token the API requires to overwrite this content.
    pub sha: String,
    pub encoding: ContentEncoding,
    /// Encoded content, as sent to / received from the API.
    pub content: String,
    pub document: Value,
}

impl RemoteFile {
    /// Decode a contents API response. Entries without content or encoding
    /// (directories, submodules) are treated as absent.
    pub fn from_content(file: ContentFile) -> Result<Option<Self>> {
        let (Some(encoding), Some(content)) = (file.encoding, file.content)
        else {
            return Ok(None);
        };

        let encoding = ContentEncoding::parse(&encoding)?;
        let text = encoding.decode(&content)?;
        let document: Value =
            serde_json::from_str(&text).map_err(PropagatorError::from)?;

        Ok(Some(Self {
            path: file.path,
            sha: file.sha,
            encoding,
            content,
            document,
        }))
    }

    /// Replace the document, re-serializing and re-encoding the content.
    pub fn set_document(&mut self, document: Value) -> Result<()> {
        let mut text = serde_json::to_string_pretty(&document)
            .map_err(PropagatorError::from)?;
        text.push('\n');
        self.content = self.encoding.encode(&text);
        self.document = document;
        Ok(())
    }

    /// Decode the current encoded content.
    pub fn decoded(&self) -> Result<String> {
        self.encoding.decode(&self.content)
    }
}
