use std::fmt;

/// Drawing routine selected for an explanation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VizKind {
    Orbit,
    Wave,
    Lifecycle,
    Generic,
}

impl VizKind {
    /// Priority order used by [`VizKind::resolve`].
    const SPECIFIC: [VizKind; 3] = [VizKind::Orbit, VizKind::Wave, VizKind::Lifecycle];

    /// Exact tag match, ignoring case and surrounding whitespace.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let tag = tag.trim();
        [VizKind::Orbit, VizKind::Wave, VizKind::Lifecycle, VizKind::Generic]
            .into_iter()
            .find(|kind| kind.tag().eq_ignore_ascii_case(tag))
    }

    /// Secondary classifier: keywords in the concept text.
    pub fn concept_mentions(self, concept: &str) -> bool {
        let concept = concept.to_lowercase();
        self.keywords().iter().any(|keyword| concept.contains(keyword))
    }

    /// First specific kind whose tag or keywords match wins, so a concept
    /// mentioning "orbit" outranks a `wave` tag. Everything else is generic.
    pub fn resolve(tag: Option<&str>, concept: &str) -> Self {
        let tagged = tag.and_then(Self::from_tag);
        Self::SPECIFIC
            .into_iter()
            .find(|kind| tagged == Some(*kind) || kind.concept_mentions(concept))
            .unwrap_or(VizKind::Generic)
    }

    pub fn tag(self) -> &'static str {
        match self {
            VizKind::Orbit => "orbit",
            VizKind::Wave => "wave",
            VizKind::Lifecycle => "lifecycle",
            VizKind::Generic => "generic",
        }
    }

    fn keywords(self) -> &'static [&'static str] {
        match self {
            VizKind::Orbit => &["orbit"],
            VizKind::Wave => &["wave", "gravit"],
            VizKind::Lifecycle => &["star", "stellar"],
            VizKind::Generic => &[],
        }
    }
}

impl fmt::Display for VizKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}
