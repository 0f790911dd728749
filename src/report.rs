//! Summaries of frames read by the command-line tool.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::frame::{PixelArray, PixelStats, PixelType};

/// What was read, from where, and what it looks like.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameReport {
    pub spec: String,
    pub path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame: Option<usize>,
    pub dtype: PixelType,
    pub shape: Vec<usize>,
    /// Size of the pixel data in bytes
    pub nbytes: usize,
    /// `None` when the frame has no finite values
    pub stats: Option<PixelStats>,
}

impl FrameReport {
    pub fn new(spec: &str, path: &Path, frame: Option<usize>, pixels: &PixelArray) -> Self {
        Self {
            spec: spec.to_string(),
            path: path.to_path_buf(),
            frame,
            dtype: pixels.pixel_type(),
            shape: pixels.shape().to_vec(),
            nbytes: pixels.len() * pixels.pixel_type().size(),
            stats: pixels.stats(),
        }
    }

    /// Multi-line, human-readable form.
    pub fn to_text(&self) -> String {
        let shape = self
            .shape
            .iter()
            .map(|d| d.to_string())
            .collect::<Vec<_>>()
            .join(" x ");

        let mut lines = vec![
            format!("spec:  {}", self.spec),
            format!("path:  {}", self.path.display()),
        ];
        if let Some(frame) = self.frame {
            lines.push(format!("frame: {frame}"));
        }
        lines.push(format!("dtype: {}", self.dtype.name()));
        lines.push(format!("shape: {shape}"));
        lines.push(format!("size:  {} bytes", self.nbytes));
        match &self.stats {
            Some(s) => lines.push(format!(
                "range: {} .. {} (mean {:.3})",
                s.min, s.max, s.mean
            )),
            None => lines.push("range: no finite values".to_string()),
        }
        lines.join("\n")
    }
}
