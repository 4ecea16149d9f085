//! Panel layout built once from the requested display options

/// A group of panels shown together
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Canvas {
    /// The 3-D point views
    Scene,
    Source,
    Target,
    Diff,
}

impl Canvas {
    pub fn entity_path(self) -> &'static str {
        match self {
            Canvas::Scene => "scene",
            Canvas::Source => "source",
            Canvas::Target => "target",
            Canvas::Diff => "diff",
        }
    }
}

/// What an image panel shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelKind {
    Label,
    Range,
    Remission,
}

impl PanelKind {
    pub fn name(self) -> &'static str {
        match self {
            PanelKind::Label => "label",
            PanelKind::Range => "range",
            PanelKind::Remission => "remission",
        }
    }
}

/// One 2-D image panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Panel {
    pub canvas: Canvas,
    pub kind: PanelKind,
}

impl Panel {
    pub fn new(canvas: Canvas, kind: PanelKind) -> Self {
        Self { canvas, kind }
    }

    pub fn entity_path(&self) -> String {
        format!("{}/{}", self.canvas.entity_path(), self.kind.name())
    }
}

/// One 3-D point view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneView {
    Source,
    Target,
}

impl SceneView {
    pub fn entity_path(self) -> &'static str {
        match self {
            SceneView::Source => "scene/source",
            SceneView::Target => "scene/target",
        }
    }
}

/// Which optional panels are enabled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelConfig {
    pub show_label: bool,
    pub show_range: bool,
    pub show_remissions: bool,
    pub show_target: bool,
    pub show_diff: bool,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            show_label: true,
            show_range: false,
            show_remissions: false,
            show_target: false,
            show_diff: false,
        }
    }
}

/// Enabled panels and views, in display order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelLayout {
    panels: Vec<Panel>,
    views: Vec<SceneView>,
}

impl PanelLayout {
    /// Build the layout.
    ///
    /// Source and target canvases carry the same image kinds. The diff canvas
    /// needs a target and always has a label panel; range and remission
    /// follow the same flags as the other canvases.
    pub fn from_config(config: &PanelConfig) -> Self {
        let mut kinds = Vec::with_capacity(3);
        if config.show_label {
            kinds.push(PanelKind::Label);
        }
        if config.show_range {
            kinds.push(PanelKind::Range);
        }
        if config.show_remissions {
            kinds.push(PanelKind::Remission);
        }

        let mut panels: Vec<Panel> = kinds
            .iter()
            .map(|&kind| Panel::new(Canvas::Source, kind))
            .collect();
        let mut views = vec![SceneView::Source];

        if config.show_target {
            panels.extend(kinds.iter().map(|&kind| Panel::new(Canvas::Target, kind)));
            views.push(SceneView::Target);

            if config.show_diff {
                panels.push(Panel::new(Canvas::Diff, PanelKind::Label));
                panels.extend(
                    kinds
                        .iter()
                        .filter(|&&kind| kind != PanelKind::Label)
                        .map(|&kind| Panel::new(Canvas::Diff, kind)),
                );
            }
        }

        Self { panels, views }
    }

    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    pub fn views(&self) -> &[SceneView] {
        &self.views
    }

    pub fn panels_on(&self, canvas: Canvas) -> impl Iterator<Item = Panel> + '_ {
        self.panels.iter().copied().filter(move |p| p.canvas == canvas)
    }

    pub fn has_canvas(&self, canvas: Canvas) -> bool {
        match canvas {
            Canvas::Scene => true,
            _ => self.panels.iter().any(|p| p.canvas == canvas),
        }
    }

    pub fn shows_view(&self, view: SceneView) -> bool {
        self.views.contains(&view)
    }
}
