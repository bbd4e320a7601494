//! Turning letter crops into a font.
//!
//! Tracing and font compilation are delegated to external tools behind the
//! [`Tracer`] and [`FontCompiler`] traits; [`FontBuilder`] wires them together.

pub mod fontforge;
pub mod potrace;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::GrayImage;
use log::{debug, info, warn};

use crate::alphabet::{Letter, LetterAlphabet};
use crate::config::FontMetrics;
use crate::error::{HandfontError, HandfontResult};
use crate::segmentation::binarize;

pub use fontforge::FontForgeCompiler;
pub use potrace::PotraceTracer;

/// A vector outline as an SVG document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outline {
    pub svg: String,
}

impl Outline {
    pub fn new(svg: impl Into<String>) -> Self {
        Self { svg: svg.into() }
    }

    /// True when the document holds no drawable path.
    pub fn is_empty(&self) -> bool {
        !self.svg.contains("<path")
    }
}

/// Bitmap-to-vector tracer. Receives black ink on a white background.
pub trait Tracer: Send + Sync {
    fn trace(&self, bitmap: &GrayImage, codepoint: char) -> HandfontResult<Outline>;

    fn name(&self) -> &str;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Glyph {
    pub name: String,
    pub codepoint: char,
    pub outline: Outline,
}

/// Compiles named, Unicode-tagged outlines into a font binary.
pub trait FontCompiler: Send + Sync {
    fn compile(&self, glyphs: &[Glyph], metrics: &FontMetrics) -> HandfontResult<Vec<u8>>;

    fn name(&self) -> &str;
}

/// A letter crop found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LetterFile {
    pub index: usize,
    pub letter: Letter,
    pub path: PathBuf,
}

impl LetterFile {
    pub fn stem(&self) -> String {
        format!("{:02}_{}", self.index, self.letter.name)
    }
}

/// Scan `dir` for `NN_<name>.<ext>` crops whose name is in the alphabet, sorted
/// by index. Anything else is skipped with a warning.
pub fn discover_letters(dir: &Path, alphabet: &LetterAlphabet) -> HandfontResult<Vec<LetterFile>> {
    let entries =
        std::fs::read_dir(dir).map_err(|e| HandfontError::io("listing letter directory", dir, e))?;

    let mut found = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| HandfontError::io("listing letter directory", dir, e))?;
        let path = entry.path();
        if !path.is_file() || image::ImageFormat::from_path(&path).is_err() {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let Some((index, name)) = stem.split_once('_') else {
            warn!("skipping {}: name is not NN_letter", path.display());
            continue;
        };
        let Ok(index) = index.parse::<usize>() else {
            warn!("skipping {}: name is not NN_letter", path.display());
            continue;
        };
        let Some(letter) = alphabet.by_name(name) else {
            warn!("skipping {}: {name:?} is not in the alphabet", path.display());
            continue;
        };
        found.push(LetterFile {
            index,
            letter: letter.clone(),
            path,
        });
    }

    found.sort_by(|a, b| a.index.cmp(&b.index).then_with(|| a.path.cmp(&b.path)));
    Ok(found)
}

/// Result of a font build.
#[derive(Debug, Clone)]
pub struct FontBuild {
    pub bytes: Vec<u8>,
    pub glyph_count: usize,
    /// Letters whose outline came back empty.
    pub skipped: Vec<String>,
}

impl FontBuild {
    pub fn write_to(&self, path: &Path) -> HandfontResult<()> {
        std::fs::write(path, &self.bytes).map_err(|e| HandfontError::io("writing font", path, e))
    }
}

pub struct FontBuilder {
    tracer: Arc<dyn Tracer>,
    compiler: Arc<dyn FontCompiler>,
    alphabet: LetterAlphabet,
    metrics: FontMetrics,
}

impl FontBuilder {
    pub fn new(tracer: Arc<dyn Tracer>, compiler: Arc<dyn FontCompiler>) -> Self {
        Self {
            tracer,
            compiler,
            alphabet: LetterAlphabet::hebrew(),
            metrics: FontMetrics::default(),
        }
    }

    /// potrace + FontForge from `PATH`.
    pub fn with_system_tools() -> Self {
        Self::new(
            Arc::new(PotraceTracer::default()),
            Arc::new(FontForgeCompiler::default()),
        )
    }

    pub fn with_alphabet(mut self, alphabet: LetterAlphabet) -> Self {
        self.alphabet = alphabet;
        self
    }

    pub fn with_metrics(mut self, metrics: FontMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    /// Trace every letter crop in `letters_dir` and compile them into one font.
    ///
    /// Outlines are also written to `svg_dir` as `<stem>.svg` when given. Tool
    /// failures abort the build; empty outlines are skipped.
    pub fn build(&self, letters_dir: &Path, svg_dir: Option<&Path>) -> HandfontResult<FontBuild> {
        let letters = discover_letters(letters_dir, &self.alphabet)?;
        self.build_letters(&letters, svg_dir)
    }

    /// Same as [`FontBuilder::build`] for an explicit list of crops, such as
    /// the letters written by one segmentation run.
    pub fn build_letters(
        &self,
        letters: &[LetterFile],
        svg_dir: Option<&Path>,
    ) -> HandfontResult<FontBuild> {
        if let Some(svg_dir) = svg_dir {
            std::fs::create_dir_all(svg_dir)
                .map_err(|e| HandfontError::io("creating svg directory", svg_dir, e))?;
        }

        let mut glyphs = Vec::with_capacity(letters.len());
        let mut skipped = Vec::new();
        for file in letters {
            let crop = image::open(&file.path)
                .map_err(|source| HandfontError::Decode {
                    path: file.path.clone(),
                    source,
                })?
                .to_luma8();
            let bitmap = binarize::ink_on_white(&crop);
            let outline = self.tracer.trace(&bitmap, file.letter.codepoint)?;

            if let Some(svg_dir) = svg_dir {
                let svg_path = svg_dir.join(format!("{}.svg", file.stem()));
                std::fs::write(&svg_path, &outline.svg)
                    .map_err(|e| HandfontError::io("writing outline", &svg_path, e))?;
            }

            if outline.is_empty() {
                warn!("empty outline for {}, skipping", file.stem());
                skipped.push(file.letter.name.clone());
                continue;
            }
            debug!("traced {} with {}", file.stem(), self.tracer.name());
            glyphs.push(Glyph {
                name: file.letter.name.clone(),
                codepoint: file.letter.codepoint,
                outline,
            });
        }

        if glyphs.is_empty() {
            return Err(HandfontError::invalid_input(format!(
                "no usable glyphs among {} letter crops",
                letters.len()
            )));
        }

        let bytes = self.compiler.compile(&glyphs, &self.metrics)?;
        info!(
            "compiled {} glyphs with {} ({} bytes)",
            glyphs.len(),
            self.compiler.name(),
            bytes.len()
        );

        Ok(FontBuild {
            bytes,
            glyph_count: glyphs.len(),
            skipped,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;
    use std::sync::Mutex;

    const SQUARE: &str = r#"<svg xmlns="http://www.w3.org/2000/svg"><path d="M0 0h10v10h-10z"/></svg>"#;
    const BLANK: &str = r#"<svg xmlns="http://www.w3.org/2000/svg"></svg>"#;

    /// Returns a square for every letter except the listed code points.
    struct FakeTracer {
        blank: Vec<char>,
        calls: Mutex<Vec<char>>,
    }

    impl Tracer for FakeTracer {
        fn trace(&self, bitmap: &GrayImage, codepoint: char) -> HandfontResult<Outline> {
            assert!(bitmap.pixels().any(|p| p[0] == 255), "bitmap should have white paper");
            self.calls.lock().unwrap().push(codepoint);
            if self.blank.contains(&codepoint) {
                Ok(Outline::new(BLANK))
            } else {
                Ok(Outline::new(SQUARE))
            }
        }

        fn name(&self) -> &str {
            "fake tracer"
        }
    }

    struct FakeCompiler;

    impl FontCompiler for FakeCompiler {
        fn compile(&self, glyphs: &[Glyph], metrics: &FontMetrics) -> HandfontResult<Vec<u8>> {
            let names: Vec<&str> = glyphs.iter().map(|g| g.name.as_str()).collect();
            Ok(format!("{}:{}", metrics.font_name, names.join(",")).into_bytes())
        }

        fn name(&self) -> &str {
            "fake compiler"
        }
    }

    fn write_crop(dir: &Path, name: &str) {
        let mut img = GrayImage::from_pixel(30, 30, Luma([255]));
        for y in 10..20 {
            for x in 10..20 {
                img.put_pixel(x, y, Luma([0]));
            }
        }
        img.save(dir.join(name)).unwrap();
    }

    fn builder(blank: Vec<char>) -> (FontBuilder, Arc<FakeTracer>) {
        let tracer = Arc::new(FakeTracer {
            blank,
            calls: Mutex::new(Vec::new()),
        });
        (FontBuilder::new(tracer.clone(), Arc::new(FakeCompiler)), tracer)
    }

    #[test]
    fn discovers_letters_in_index_order() {
        let dir = tempfile::TempDir::new().unwrap();
        write_crop(dir.path(), "01_bet.png");
        write_crop(dir.path(), "00_alef.png");
        write_crop(dir.path(), "22_final_kaf.png");
        write_crop(dir.path(), "05_notaletter.png");
        write_crop(dir.path(), "stray.png");
        std::fs::write(dir.path().join("notes.txt"), "x").unwrap();

        let found = discover_letters(dir.path(), &LetterAlphabet::hebrew()).unwrap();
        let stems: Vec<String> = found.iter().map(LetterFile::stem).collect();
        assert_eq!(stems, vec!["00_alef", "01_bet", "22_final_kaf"]);
        assert_eq!(found[2].letter.codepoint, '\u{05DA}');
    }

    #[test]
    fn build_traces_each_letter_once_and_compiles_once() {
        let dir = tempfile::TempDir::new().unwrap();
        write_crop(dir.path(), "00_alef.png");
        write_crop(dir.path(), "01_bet.png");
        let svg_dir = dir.path().join("svg");

        let (builder, tracer) = builder(Vec::new());
        let font = builder.build(dir.path(), Some(svg_dir.as_path())).unwrap();

        assert_eq!(font.glyph_count, 2);
        assert_eq!(font.bytes, b"HebrewFont:alef,bet".to_vec());
        assert_eq!(*tracer.calls.lock().unwrap(), vec!['\u{05D0}', '\u{05D1}']);
        assert!(svg_dir.join("00_alef.svg").exists());
        assert!(svg_dir.join("01_bet.svg").exists());
    }

    #[test]
    fn explicit_letters_ignore_other_files_in_the_directory() {
        let dir = tempfile::TempDir::new().unwrap();
        write_crop(dir.path(), "00_alef.png");
        write_crop(dir.path(), "01_bet.png");
        let abc = LetterAlphabet::hebrew();
        let only_alef = [LetterFile {
            index: 0,
            letter: abc.get(0).unwrap().clone(),
            path: dir.path().join("00_alef.png"),
        }];

        let (builder, tracer) = builder(Vec::new());
        let font = builder.build_letters(&only_alef, None).unwrap();
        assert_eq!(font.glyph_count, 1);
        assert_eq!(*tracer.calls.lock().unwrap(), vec!['\u{05D0}']);
    }

    #[test]
    fn empty_outlines_are_skipped() {
        let dir = tempfile::TempDir::new().unwrap();
        write_crop(dir.path(), "00_alef.png");
        write_crop(dir.path(), "01_bet.png");

        let (builder, _) = builder(vec!['\u{05D0}']);
        let font = builder.build(dir.path(), None).unwrap();
        assert_eq!(font.glyph_count, 1);
        assert_eq!(font.skipped, vec!["alef".to_string()]);
    }

    #[test]
    fn no_usable_glyphs_is_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        write_crop(dir.path(), "00_alef.png");

        let (builder, _) = builder(vec!['\u{05D0}']);
        let err = builder.build(dir.path(), None).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::InvalidInput);
    }

    #[test]
    fn outline_without_paths_is_empty() {
        assert!(Outline::new(BLANK).is_empty());
        assert!(!Outline::new(SQUARE).is_empty());
    }
}
