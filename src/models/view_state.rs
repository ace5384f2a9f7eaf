use crate::models::{AttributeId, RequestCode};

/// Everything the front-end shows.
///
/// Lives on the UI side. The host-processing thread only reaches it through
/// the [`FrontEnd`](crate::ui::FrontEnd) callbacks implemented by
/// [`ViewManager`](crate::state::ViewManager), never directly.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewState {
    /// Primary list: catalog group titles (`"1. Text"`)
    pub group_titles: Vec<String>,

    /// Title currently chosen in the primary list
    pub selected_title: Option<String>,

    /// Secondary list: attributes of the selected group
    pub attributes: Vec<AttributeId>,

    /// False while a request is outstanding (exit stays available)
    pub controls_enabled: bool,

    /// Request the controls were disabled for, if any
    pub in_flight: Option<RequestCode>,

    /// Whether the window is kept above the host window
    pub shown_on_top: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            group_titles: Vec::new(),
            selected_title: None,
            attributes: Vec::new(),
            controls_enabled: true,
            in_flight: None,
            shown_on_top: true,
        }
    }
}

impl ViewState {
    /// 1-based position of the selected title in the primary list
    pub fn selected_index(&self) -> Option<usize> {
        let selected = self.selected_title.as_ref()?;
        self.group_titles
            .iter()
            .position(|t| t == selected)
            .map(|i| i + 1)
    }

    /// True while a request is outstanding
    pub fn is_busy(&self) -> bool {
        !self.controls_enabled
    }
}
