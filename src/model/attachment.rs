use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use bytes::Bytes;

/// Image formats accepted by the attachment picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Svg,
    Gif,
    Webp,
}

const ALL_FORMATS: [ImageFormat; 5] = [
    ImageFormat::Png,
    ImageFormat::Jpeg,
    ImageFormat::Svg,
    ImageFormat::Gif,
    ImageFormat::Webp,
];

impl ImageFormat {
    /// Returns every supported format.
    pub fn all() -> &'static [ImageFormat] {
        &ALL_FORMATS
    }

    /// Looks up a format by file extension (case-insensitive, `jpg` and `jpeg` both map to JPEG).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "svg" => Some(Self::Svg),
            "gif" => Some(Self::Gif),
            "webp" => Some(Self::Webp),
            _ => None,
        }
    }

    /// Canonical file extension used when storing the image.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Svg => "svg",
            Self::Gif => "gif",
            Self::Webp => "webp",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// A binary image selected by the user for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// Original file name, including extension.
    pub name: String,
    /// Raw file contents.
    pub data: Bytes,
}

impl Attachment {
    pub fn new(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }

    /// Reads an attachment from disk. The file name becomes the attachment name.
    pub fn from_path(path: &Path) -> Result<Self, io::Error> {
        let data = fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::new(name, data))
    }

    /// Returns the image format implied by the file name, if supported.
    pub fn format(&self) -> Option<ImageFormat> {
        Path::new(&self.name)
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(ImageFormat::from_extension)
    }

    /// Size of the attachment in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the attachment has no content.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
