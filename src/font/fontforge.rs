use std::path::{Path, PathBuf};
use std::process::Command;

use log::debug;

use super::{FontCompiler, Glyph};
use crate::config::FontMetrics;
use crate::error::{HandfontError, HandfontResult};

/// Compiles glyphs into a TrueType font by driving `fontforge` with a
/// generated native script.
#[derive(Debug, Clone)]
pub struct FontForgeCompiler {
    pub program: PathBuf,
}

impl FontForgeCompiler {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for FontForgeCompiler {
    fn default() -> Self {
        Self::new("fontforge")
    }
}

/// Quote a string for the FontForge scripting language.
fn quote(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Script importing each `(glyph, svg path)` pair and generating `output`.
///
/// Each glyph's advance is its outline width plus the advance padding, with
/// equal side bearings.
pub fn render_script(glyphs: &[(&Glyph, PathBuf)], metrics: &FontMetrics, output: &Path) -> String {
    let mut lines = vec![
        "New()".to_string(),
        "Reencode(\"UnicodeFull\")".to_string(),
        format!(
            "SetFontNames({}, {}, {})",
            quote(&metrics.font_name),
            quote(&metrics.family_name),
            quote(&metrics.full_name)
        ),
        format!("ScaleToEm({}, {})", metrics.ascent, metrics.descent),
    ];

    for (glyph, svg_path) in glyphs {
        lines.extend([
            format!("Select(0u{:04X})", glyph.codepoint as u32),
            format!("SetGlyphName({})", quote(&glyph.name)),
            format!("Import({})", quote(&svg_path.to_string_lossy())),
            "bb = GlyphInfo(\"BBox\")".to_string(),
            format!("SetWidth(Int(bb[2] - bb[0]) + {})", metrics.advance_padding),
            format!("SetLBearing({})", metrics.side_bearing),
            format!("SetRBearing({})", metrics.side_bearing),
        ]);
    }

    lines.push(format!("Generate({})", quote(&output.to_string_lossy())));
    let mut script = lines.join("\n");
    script.push('\n');
    script
}

impl FontCompiler for FontForgeCompiler {
    fn compile(&self, glyphs: &[Glyph], metrics: &FontMetrics) -> HandfontResult<Vec<u8>> {
        let work = tempfile::TempDir::new().map_err(|e| {
            HandfontError::io("creating fontforge work directory", std::env::temp_dir(), e)
        })?;

        let mut placed = Vec::with_capacity(glyphs.len());
        for (i, glyph) in glyphs.iter().enumerate() {
            let path = work.path().join(format!("{:02}_{}.svg", i, glyph.name));
            std::fs::write(&path, &glyph.outline.svg)
                .map_err(|e| HandfontError::io("writing outline", &path, e))?;
            placed.push((glyph, path));
        }

        let font_path = work.path().join("font.ttf");
        let script_path = work.path().join("build.pe");
        let script = render_script(&placed, metrics, &font_path);
        std::fs::write(&script_path, &script)
            .map_err(|e| HandfontError::io("writing fontforge script", &script_path, e))?;
        debug!("fontforge script:\n{script}");

        let output = Command::new(&self.program)
            .arg("-lang=ff")
            .arg("-script")
            .arg(&script_path)
            .output()
            .map_err(|e| {
                HandfontError::tool("fontforge", format!("{}: {e}", self.program.display()))
            })?;
        if !output.status.success() {
            return Err(HandfontError::tool(
                "fontforge",
                format!(
                    "{} exited with {}: {}",
                    self.program.display(),
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            ));
        }

        std::fs::read(&font_path).map_err(|e| HandfontError::io("reading generated font", &font_path, e))
    }

    fn name(&self) -> &str {
        "fontforge"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::Outline;

    fn glyph(name: &str, codepoint: char) -> Glyph {
        Glyph {
            name: name.into(),
            codepoint,
            outline: Outline::new("<svg><path d=\"M0 0\"/></svg>"),
        }
    }

    #[test]
    fn script_sets_metrics_and_imports_each_glyph() {
        let alef = glyph("alef", '\u{05D0}');
        let final_kaf = glyph("final_kaf", '\u{05DA}');
        let placed = vec![
            (&alef, PathBuf::from("/w/00_alef.svg")),
            (&final_kaf, PathBuf::from("/w/01_final_kaf.svg")),
        ];
        let script = render_script(&placed, &FontMetrics::default(), Path::new("/w/font.ttf"));

        assert!(script.starts_with("New()\n"));
        assert!(script.contains("SetFontNames(\"HebrewFont\", \"Hebrew Font\", \"Hebrew Font\")"));
        assert!(script.contains("ScaleToEm(800, 200)"));
        assert!(script.contains("Select(0u05D0)\nSetGlyphName(\"alef\")\nImport(\"/w/00_alef.svg\")"));
        assert!(script.contains("Select(0u05DA)"));
        assert!(script.contains("SetWidth(Int(bb[2] - bb[0]) + 80)"));
        assert_eq!(script.matches("SetLBearing(27)").count(), 2);
        assert!(script.trim_end().ends_with("Generate(\"/w/font.ttf\")"));
    }

    #[test]
    fn script_has_one_command_per_line() {
        let alef = glyph("alef", '\u{05D0}');
        let bet = glyph("bet", '\u{05D1}');
        let placed = vec![(&alef, PathBuf::from("a.svg")), (&bet, PathBuf::from("b.svg"))];
        let script = render_script(&placed, &FontMetrics::default(), Path::new("f.ttf"));

        assert!(script.ends_with("Generate(\"f.ttf\")\n"));
        // 4 header lines, 7 per glyph, 1 generate
        assert_eq!(script.lines().count(), 4 + 7 * 2 + 1);
        assert_eq!(script.matches("Import(").count(), 2);
    }

    #[test]
    fn quotes_are_escaped() {
        assert_eq!(quote(r#"a"b\c"#), r#""a\"b\\c""#);
    }
}
