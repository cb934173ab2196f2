use std::io::{self, Write};
use std::path::{Path, PathBuf};

use fontdue::Font;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::UiConfig;
use crate::explain::model::PLACEHOLDER;
use crate::ui::view::{ExplainerView, ImageSlot, Panel, LABEL_IDLE, NO_IMAGE};
use crate::viz::{self, RenderError, VizKind};

/// Terminal rendition of the explainer page: text regions are kept in memory
/// and printed by [`TerminalView::render`], alerts go straight to stderr,
/// and the canvas is written to a PNG file.
pub struct TerminalView {
    trigger_enabled: bool,
    trigger_label: String,
    panels: [String; 4],
    image: ImageSlot,
    notices: Vec<String>,
    alerts: Vec<String>,
    canvas_width: u32,
    canvas_height: u32,
    output: PathBuf,
    font: Option<Font>,
    star_seed: u64,
    drawn: Option<VizKind>,
}

impl TerminalView {
    pub fn new(config: &UiConfig, font: Option<Font>) -> Self {
        Self {
            trigger_enabled: true,
            trigger_label: LABEL_IDLE.to_string(),
            panels: std::array::from_fn(|_| PLACEHOLDER.to_string()),
            image: ImageSlot::Placeholder(NO_IMAGE),
            notices: Vec::new(),
            alerts: Vec::new(),
            canvas_width: config.canvas_width,
            canvas_height: config.canvas_height,
            output: config.output.clone(),
            font,
            star_seed: rand::random(),
            drawn: None,
        }
    }

    /// Fixes the starfield so repeated draws are identical.
    pub fn with_star_seed(mut self, seed: u64) -> Self {
        self.star_seed = seed;
        self
    }

    pub fn star_seed(&self) -> u64 {
        self.star_seed
    }

    pub fn font(&self) -> Option<&Font> {
        self.font.as_ref()
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    pub fn drawn(&self) -> Option<VizKind> {
        self.drawn
    }

    pub fn trigger(&self) -> (bool, &str) {
        (self.trigger_enabled, &self.trigger_label)
    }

    pub fn panel(&self, panel: Panel) -> &str {
        &self.panels[panel_index(panel)]
    }

    pub fn alerts(&self) -> &[String] {
        &self.alerts
    }

    pub fn render<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for notice in &self.notices {
            writeln!(out, "[{notice}]")?;
        }
        for panel in Panel::ALL {
            writeln!(out, "== {} ==", panel.title())?;
            writeln!(out, "{}", self.panel(panel))?;
            writeln!(out)?;
        }
        writeln!(out, "== Image ==")?;
        match &self.image {
            ImageSlot::Url(url) => writeln!(out, "{url}")?,
            ImageSlot::Placeholder(text) => writeln!(out, "{text}")?,
        }
        if let Some(kind) = self.drawn {
            writeln!(out)?;
            writeln!(out, "== Visualization ==")?;
            writeln!(out, "{kind} -> {}", self.output.display())?;
        }
        Ok(())
    }
}

impl ExplainerView for TerminalView {
    fn set_trigger(&mut self, enabled: bool, label: &str) {
        self.trigger_enabled = enabled;
        self.trigger_label = label.to_string();
        if !enabled {
            eprintln!("{label}");
        }
    }

    fn set_panel(&mut self, panel: Panel, text: &str) {
        self.panels[panel_index(panel)] = text.to_string();
    }

    fn set_image(&mut self, image: ImageSlot) {
        self.image = image;
    }

    fn clear_canvas(&mut self) {
        self.drawn = None;
    }

    fn draw_visualization(&mut self, kind: VizKind, _concept: &str) -> Result<(), RenderError> {
        let mut rng = StdRng::seed_from_u64(self.star_seed);
        let scene = viz::draw_visualization(
            kind,
            viz::wall_clock_secs(),
            self.canvas_width,
            self.canvas_height,
            &mut rng,
        );
        let canvas = viz::rasterize(&scene, self.font.as_ref())?;
        canvas.save_png(&self.output)?;
        self.drawn = Some(kind);
        Ok(())
    }

    fn alert(&mut self, message: &str) {
        eprintln!("alert: {message}");
        self.alerts.push(message.to_string());
    }

    fn notice(&mut self, message: &str) {
        self.notices.push(message.to_string());
    }
}

fn panel_index(panel: Panel) -> usize {
    match panel {
        Panel::Beginner => 0,
        Panel::Intermediate => 1,
        Panel::Advanced => 2,
        Panel::Applications => 3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::view::{LABEL_BUSY, NO_IMAGE_AVAILABLE};

    fn view_in(dir: &Path) -> TerminalView {
        let config = UiConfig {
            canvas_width: 64,
            canvas_height: 48,
            output: dir.join("viz.png"),
            ..UiConfig::default()
        };
        TerminalView::new(&config, None).with_star_seed(42)
    }

    #[test]
    fn test_starts_idle_with_placeholders() {
        let dir = tempfile::tempdir().unwrap();
        let view = view_in(dir.path());
        assert_eq!(view.trigger(), (true, LABEL_IDLE));
        assert_eq!(view.panel(Panel::Advanced), PLACEHOLDER);
        assert_eq!(view.drawn(), None);
    }

    #[test]
    fn test_trigger_state_is_tracked() {
        let dir = tempfile::tempdir().unwrap();
        let mut view = view_in(dir.path());
        view.set_trigger(false, LABEL_BUSY);
        assert_eq!(view.trigger(), (false, LABEL_BUSY));
    }

    #[test]
    fn test_draw_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let mut view = view_in(dir.path());
        view.draw_visualization(VizKind::Wave, "gravitational waves").unwrap();
        assert_eq!(view.drawn(), Some(VizKind::Wave));
        let bytes = std::fs::read(view.output()).unwrap();
        assert_eq!(&bytes[..4], b"\x89PNG");

        view.clear_canvas();
        assert_eq!(view.drawn(), None);
    }

    #[test]
    fn test_draw_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut view = view_in(&dir.path().join("missing"));
        let err = view.draw_visualization(VizKind::Orbit, "orbit").unwrap_err();
        assert!(matches!(err, RenderError::Io { .. }));
    }

    #[test]
    fn test_render_lists_regions() {
        let dir = tempfile::tempdir().unwrap();
        let mut view = view_in(dir.path());
        view.set_panel(Panel::Beginner, "Stars are born in clouds.");
        view.set_image(ImageSlot::Placeholder(NO_IMAGE_AVAILABLE));
        view.notice("heads up");

        let mut out = Vec::new();
        view.render(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("[heads up]\n== Beginner ==\nStars are born in clouds.\n"));
        assert!(text.contains("== Applications ==\n—\n"));
        assert!(text.contains("== Image ==\nNo image available\n"));
        assert!(!text.contains("Visualization"));
    }
}
