use fontdue::Font;
use tracing::{debug, info};

const FONT_VAR: &str = "ASTROLENS_FONT";

const FONT_CANDIDATES: [&str; 5] = [
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
];

/// Label font: `ASTROLENS_FONT` first, then common system locations.
/// Without one, labels are simply not drawn.
pub fn load_font() -> Option<Font> {
    let configured = std::env::var(FONT_VAR).ok();
    let candidates = configured
        .iter()
        .map(String::as_str)
        .chain(FONT_CANDIDATES.iter().copied());

    for path in candidates {
        if let Some(font) = load_font_from_path(path) {
            info!(path, "loaded label font");
            return Some(font);
        }
    }
    debug!("no label font found");
    None
}

fn load_font_from_path(path: &str) -> Option<Font> {
    match std::fs::read(path) {
        Ok(bytes) => Font::from_bytes(bytes, fontdue::FontSettings::default()).ok(),
        Err(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unreadable_path_is_none() {
        assert!(load_font_from_path("/nonexistent/astrolens.ttf").is_none());
    }

    #[test]
    fn test_garbage_bytes_are_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, b"not a font").unwrap();
        assert!(load_font_from_path(file.path().to_str().unwrap()).is_none());
    }
}
