use thiserror::Error;
use tracing::{info, warn};

use crate::explain::model::PLACEHOLDER;
use crate::explain::{ExplainRequest, ExplainResponse};
use crate::ui::client::{ClientError, ExplainClient};
use crate::ui::view::{ExplainerView, ImageSlot, LoadingGuard, Panel, NO_IMAGE, NO_IMAGE_AVAILABLE};
use crate::viz::{RenderError, VizKind};

pub const EMPTY_CONCEPT_ALERT: &str = "Type a concept first.";
pub const DEGRADED_NOTICE: &str = "Explanation unavailable: showing the model's raw reply.";

#[derive(Debug, Error)]
pub enum UiError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExplainOutcome {
    /// Blank input; nothing was sent.
    Rejected,
    Rendered { kind: VizKind, degraded: bool },
    Failed(String),
}

/// Page controller: one explain round trip per trigger.
pub struct ExplainerController<V, C> {
    view: V,
    client: C,
    image_source: Option<String>,
}

impl<V: ExplainerView, C: ExplainClient> ExplainerController<V, C> {
    pub fn new(view: V, client: C) -> Self {
        Self {
            view,
            client,
            image_source: None,
        }
    }

    pub fn with_image_source(mut self, image_source: Option<String>) -> Self {
        self.image_source = image_source;
        self
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn into_view(self) -> V {
        self.view
    }

    pub fn on_explain(&mut self, input: &str) -> ExplainOutcome {
        let concept = input.trim();
        if concept.is_empty() {
            self.view.alert(EMPTY_CONCEPT_ALERT);
            return ExplainOutcome::Rejected;
        }

        let mut page = LoadingGuard::enter(&mut self.view);
        clear_outputs(&mut *page);

        let request = ExplainRequest::new(concept, self.image_source.clone());
        match fetch_and_render(&mut *page, &self.client, &request, concept) {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(error = %err, "explain failed");
                page.alert(&format!("Error: {err}"));
                ExplainOutcome::Failed(err.to_string())
            }
        }
    }
}

fn clear_outputs<V: ExplainerView + ?Sized>(view: &mut V) {
    for panel in Panel::ALL {
        view.set_panel(panel, PLACEHOLDER);
    }
    view.set_image(ImageSlot::Placeholder(NO_IMAGE));
    view.clear_canvas();
}

fn fetch_and_render<V, C>(
    view: &mut V,
    client: &C,
    request: &ExplainRequest,
    concept: &str,
) -> Result<ExplainOutcome, UiError>
where
    V: ExplainerView + ?Sized,
    C: ExplainClient + ?Sized,
{
    let response = client.explain(request)?;
    populate_panels(view, &response);

    let image = match response.image_url.as_deref().map(str::trim) {
        Some(url) if !url.is_empty() => ImageSlot::Url(url.to_string()),
        _ => ImageSlot::Placeholder(NO_IMAGE_AVAILABLE),
    };
    view.set_image(image);

    if response.degraded {
        view.notice(DEGRADED_NOTICE);
    }

    let kind = VizKind::resolve(Some(&response.visualization.viz_type), concept);
    view.draw_visualization(kind, concept)?;
    info!(%kind, degraded = response.degraded, "explanation rendered");

    Ok(ExplainOutcome::Rendered {
        kind,
        degraded: response.degraded,
    })
}

fn populate_panels<V: ExplainerView + ?Sized>(view: &mut V, response: &ExplainResponse) {
    let texts = [
        (Panel::Beginner, &response.beginner),
        (Panel::Intermediate, &response.intermediate),
        (Panel::Advanced, &response.advanced),
        (Panel::Applications, &response.applications),
    ];
    for (panel, text) in texts {
        let text = if text.trim().is_empty() { PLACEHOLDER } else { text.as_str() };
        view.set_panel(panel, text);
    }
}
