use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// One image part of a multipart upload.
///
/// Owned by the request that carried it and dropped when the request ends.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Client-supplied file name (empty when the part had none)
    pub filename: String,

    /// MIME type declared on the multipart part
    pub content_type: String,

    /// Raw file content
    pub data: Bytes,
}

impl UploadedFile {
    pub fn new(filename: impl Into<String>, content_type: impl Into<String>, data: Bytes) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.into(),
            data,
        }
    }

    /// Size of the content in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// Pixel-space bounding rectangle of a detected face.
///
/// Serialized as `[top, right, bottom, left]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "[u32; 4]", from = "[u32; 4]")]
pub struct FaceBox {
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub left: u32,
}

impl FaceBox {
    pub fn new(top: u32, right: u32, bottom: u32, left: u32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Builds a box from an `x, y, width, height` rectangle, clamped to the image bounds.
    ///
    /// Returns `None` when nothing of the rectangle lies inside the image.
    pub fn from_rect_clamped(
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        image_width: u32,
        image_height: u32,
    ) -> Option<Self> {
        let left = x.max(0) as i64;
        let top = y.max(0) as i64;
        let right = (x as i64 + width as i64).min(image_width as i64);
        let bottom = (y as i64 + height as i64).min(image_height as i64);

        if right <= left || bottom <= top {
            return None;
        }

        Some(Self::new(top as u32, right as u32, bottom as u32, left as u32))
    }

    pub fn width(&self) -> u32 {
        self.right.saturating_sub(self.left)
    }

    pub fn height(&self) -> u32 {
        self.bottom.saturating_sub(self.top)
    }
}

impl From<FaceBox> for [u32; 4] {
    fn from(b: FaceBox) -> Self {
        [b.top, b.right, b.bottom, b.left]
    }
}

impl From<[u32; 4]> for FaceBox {
    fn from([top, right, bottom, left]: [u32; 4]) -> Self {
        Self::new(top, right, bottom, left)
    }
}

/// Fixed-length numeric descriptor of one face.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FaceEncoding(pub Vec<f32>);

impl FaceEncoding {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }
}

/// Boxes found in one successfully processed file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionRecord {
    pub filename: String,
    pub boxes: Vec<FaceBox>,
}
