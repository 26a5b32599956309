use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::Blob;

/// A `data:` URI carrying base64-encoded binary content inline as text.
///
/// This is the representation used for user-attached images and for images
/// returned by the image-generation backend. The canonical form is
/// `data:<media-type>;base64,<data>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataUri(String);

impl DataUri {
    /// Parses and validates a data-URI string.
    ///
    /// The URI must use base64 encoding and carry a media type; the payload
    /// is checked to be valid base64.
    pub fn parse(uri: impl Into<String>) -> Result<Self> {
        let uri = uri.into();
        let (mime_type, data) = split_data_uri(&uri)?;
        if mime_type.is_empty() {
            return Err(Error::validation(
                "data URI is missing a media type",
                Some("uri".to_string()),
            ));
        }
        base64::engine::general_purpose::STANDARD.decode(data)?;
        Ok(Self(uri))
    }

    /// Builds a data URI from an inline blob.
    pub fn from_blob(blob: &Blob) -> Self {
        Self(format!("data:{};base64,{}", blob.mime_type, blob.data))
    }

    /// Reads a file and encodes it as an image data URI.
    ///
    /// The media type is determined from the file extension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let mime_type = match path.extension().and_then(|ext| ext.to_str()) {
            Some("jpg") | Some("jpeg") => "image/jpeg",
            Some("png") => "image/png",
            Some("gif") => "image/gif",
            Some("webp") => "image/webp",
            _ => {
                return Err(Error::validation(
                    "unsupported file extension, must be jpeg, png, gif, or webp",
                    Some("path".to_string()),
                ));
            }
        };

        let mut file = File::open(path)
            .map_err(|err| Error::io(format!("failed to open {}", path.display()), err))?;
        let mut buffer = Vec::new();
        file.read_to_end(&mut buffer)
            .map_err(|err| Error::io(format!("failed to read {}", path.display()), err))?;

        let data = base64::engine::general_purpose::STANDARD.encode(&buffer);
        Ok(Self(format!("data:{mime_type};base64,{data}")))
    }

    /// The media type declared by this URI.
    pub fn mime_type(&self) -> &str {
        split_data_uri(&self.0)
            .map(|(mime, _)| mime)
            .unwrap_or("")
    }

    /// Converts this URI into an inline blob for the wire.
    pub fn to_blob(&self) -> Blob {
        let (mime_type, data) = split_data_uri(&self.0).unwrap_or(("", ""));
        Blob::new(mime_type, data)
    }

    /// The full URI string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DataUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Splits `data:<media-type>;base64,<data>` into its media type and payload.
fn split_data_uri(uri: &str) -> Result<(&str, &str)> {
    let rest = uri.strip_prefix("data:").ok_or_else(|| {
        Error::validation("not a data URI", Some("uri".to_string()))
    })?;
    let (header, data) = rest.split_once(',').ok_or_else(|| {
        Error::validation("data URI has no payload", Some("uri".to_string()))
    })?;
    let mime_type = header.strip_suffix(";base64").ok_or_else(|| {
        Error::validation(
            "data URI must use base64 encoding",
            Some("uri".to_string()),
        )
    })?;
    Ok((mime_type, data))
}
