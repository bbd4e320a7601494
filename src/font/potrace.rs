use std::path::PathBuf;
use std::process::Command;

use image::{GrayImage, ImageFormat};

use super::{Outline, Tracer};
use crate::error::{HandfontError, HandfontResult};

/// Traces bitmaps with the `potrace` command-line tool (SVG backend).
#[derive(Debug, Clone)]
pub struct PotraceTracer {
    pub program: PathBuf,
}

impl PotraceTracer {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for PotraceTracer {
    fn default() -> Self {
        Self::new("potrace")
    }
}

impl Tracer for PotraceTracer {
    fn trace(&self, bitmap: &GrayImage, codepoint: char) -> HandfontResult<Outline> {
        let work = tempfile::TempDir::new()
            .map_err(|e| HandfontError::io("creating potrace work directory", std::env::temp_dir(), e))?;
        let stem = format!("U{:04X}", codepoint as u32);
        let bmp_path = work.path().join(format!("{stem}.bmp"));
        let svg_path = work.path().join(format!("{stem}.svg"));

        bitmap
            .save_with_format(&bmp_path, ImageFormat::Bmp)
            .map_err(|source| HandfontError::Encode {
                path: bmp_path.clone(),
                source,
            })?;

        let output = Command::new(&self.program)
            .arg(&bmp_path)
            .arg("-s")
            .arg("-o")
            .arg(&svg_path)
            .output()
            .map_err(|e| HandfontError::tool("potrace", format!("{}: {e}", self.program.display())))?;
        if !output.status.success() {
            return Err(HandfontError::tool(
                "potrace",
                format!(
                    "{} exited with {}: {}",
                    self.program.display(),
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            ));
        }

        let svg = std::fs::read_to_string(&svg_path)
            .map_err(|e| HandfontError::io("reading potrace output", &svg_path, e))?;
        Ok(Outline::new(svg))
    }

    fn name(&self) -> &str {
        "potrace"
    }
}
