use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Mutex;
use ttf_parser::Face;

static TEXT_MEASURER: Lazy<Mutex<TextMeasurer>> = Lazy::new(|| Mutex::new(TextMeasurer::new()));

/// Label width estimation. Exactly one estimator instance feeds a layout
/// pass; mixing exact and heuristic widths within one pass would make the
/// packing decisions inconsistent with each other.
pub trait TextMeasure {
    fn text_width(&self, text: &str, font_size: f32) -> f32;
}

/// Deterministic character-count estimate for environments without a usable
/// font database (tests, headless servers).
#[derive(Debug, Clone, Copy)]
pub struct HeuristicTextMeasure {
    pub char_width_ratio: f32,
    pub padding: f32,
}

impl Default for HeuristicTextMeasure {
    fn default() -> Self {
        HeuristicTextMeasure {
            char_width_ratio: 0.58,
            padding: 2.0,
        }
    }
}

impl TextMeasure for HeuristicTextMeasure {
    fn text_width(&self, text: &str, font_size: f32) -> f32 {
        if text.is_empty() {
            return 0.0;
        }
        text.chars().count() as f32 * font_size * self.char_width_ratio + self.padding
    }
}

/// Exact measurement through the process-wide font database.
pub struct SystemTextMeasure {
    family: String,
}

impl SystemTextMeasure {
    /// Returns `None` when no face resolves for the family; callers fall
    /// back to [`HeuristicTextMeasure`] for the whole pass.
    pub fn new(family: &str) -> Option<SystemTextMeasure> {
        measure_text_width("x", 12.0, family)?;
        Some(SystemTextMeasure {
            family: family.to_string(),
        })
    }
}

impl TextMeasure for SystemTextMeasure {
    fn text_width(&self, text: &str, font_size: f32) -> f32 {
        match measure_text_width(text, font_size, &self.family) {
            Some(width) => width,
            // The face was probed at construction; losing it mid-pass means a
            // poisoned lock. Degrade to the same per-glyph fallback the face
            // path uses for unknown glyphs.
            None => text.chars().count() as f32 * font_size * 0.56,
        }
    }
}

pub fn measure_text_width(text: &str, font_size: f32, font_family: &str) -> Option<f32> {
    if text.is_empty() || font_size <= 0.0 {
        return Some(0.0);
    }
    let mut guard = TEXT_MEASURER.lock().ok()?;
    guard.measure(text, font_size, font_family)
}

struct TextMeasurer {
    db: Database,
    loaded_system_fonts: bool,
    cache: HashMap<String, Option<FontFace>>,
}

impl TextMeasurer {
    fn new() -> Self {
        Self {
            db: Database::new(),
            loaded_system_fonts: false,
            cache: HashMap::new(),
        }
    }

    fn measure(&mut self, text: &str, font_size: f32, font_family: &str) -> Option<f32> {
        let family_key = normalize_family_key(font_family);
        if !self.cache.contains_key(&family_key) {
            let face = self.load_face(font_family);
            self.cache.insert(family_key.clone(), face);
        }
        let face = self.cache.get(&family_key)?.as_ref()?;
        let normalized = text.replace('\t', "    ");
        Some(face.measure_width(&normalized, font_size))
    }

    fn load_face(&mut self, font_family: &str) -> Option<FontFace> {
        let mut names: Vec<String> = Vec::new();
        let mut generic: Vec<Family<'static>> = Vec::new();
        for part in font_family.split(',') {
            let raw = part.trim().trim_matches('"').trim_matches('\'');
            if raw.is_empty() {
                continue;
            }
            match raw.to_ascii_lowercase().as_str() {
                "serif" => generic.push(Family::Serif),
                "sans-serif" | "system-ui" | "-apple-system" | "ui-sans-serif" => {
                    generic.push(Family::SansSerif)
                }
                "monospace" | "ui-monospace" => generic.push(Family::Monospace),
                "cursive" => generic.push(Family::Cursive),
                "fantasy" => generic.push(Family::Fantasy),
                _ => names.push(raw.to_string()),
            }
        }

        let mut families: Vec<Family<'_>> = Vec::with_capacity(names.len() + generic.len() + 1);
        families.extend(names.iter().map(|name| Family::Name(name.as_str())));
        families.extend(generic);
        if families.is_empty() {
            families.push(Family::SansSerif);
        }

        if !self.loaded_system_fonts {
            self.db.load_system_fonts();
            self.loaded_system_fonts = true;
        }

        let query = Query {
            families: &families,
            weight: Weight::NORMAL,
            stretch: Stretch::Normal,
            style: Style::Normal,
        };
        let id = self.db.query(&query)?;
        self.db
            .with_face_data(id, |data, index| FontFace::new(data.to_vec(), index))
            .flatten()
    }
}

struct FontFace {
    data: Vec<u8>,
    index: u32,
    units_per_em: u16,
    ascii_advances: [u16; 128],
}

impl FontFace {
    fn new(data: Vec<u8>, index: u32) -> Option<Self> {
        let face = Face::parse(&data, index).ok()?;
        let units_per_em = face.units_per_em().max(1);
        let mut ascii_advances = [0u16; 128];
        for byte in 0u8..=127 {
            if let Some(glyph) = face.glyph_index(byte as char) {
                ascii_advances[byte as usize] = face.glyph_hor_advance(glyph).unwrap_or(0);
            }
        }
        Some(Self {
            data,
            index,
            units_per_em,
            ascii_advances,
        })
    }

    fn measure_width(&self, text: &str, font_size: f32) -> f32 {
        let scale = font_size / self.units_per_em as f32;
        let fallback = font_size * 0.56;

        if text.is_ascii() {
            let mut width = 0.0f32;
            for byte in text.as_bytes() {
                if *byte == b'\n' {
                    continue;
                }
                let advance = self.ascii_advances[*byte as usize];
                if advance == 0 {
                    width += fallback;
                } else {
                    width += advance as f32 * scale;
                }
            }
            return width.max(0.0);
        }

        // Non-ASCII labels (emoji, accents) are rare enough that re-parsing
        // the face per call beats holding a self-referential Face alive.
        let Ok(face) = Face::parse(&self.data, self.index) else {
            return text.chars().count() as f32 * fallback;
        };
        let mut width = 0.0f32;
        for ch in text.chars() {
            if ch == '\n' {
                continue;
            }
            match face.glyph_index(ch) {
                Some(glyph) => {
                    let advance = face.glyph_hor_advance(glyph).unwrap_or(0);
                    if advance == 0 {
                        width += fallback;
                    } else {
                        width += advance as f32 * scale;
                    }
                }
                None => width += fallback,
            }
        }
        width.max(0.0)
    }
}

fn normalize_family_key(font_family: &str) -> String {
    let trimmed = font_family.trim();
    if trimmed.is_empty() {
        "sans-serif".to_string()
    } else {
        trimmed.to_string()
    }
}
