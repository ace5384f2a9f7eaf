use crate::models::AttributeId;

/// Callbacks the host-processing thread uses to talk to the front-end.
///
/// Implementations must be callable from the host thread; they hand the data
/// over to the UI side rather than touching widgets directly.
#[cfg_attr(test, mockall::automock)]
pub trait FrontEnd: Send + Sync {
    /// Title currently chosen in the primary list
    fn selected_title(&self) -> Option<String>;

    /// Replace the primary list (group titles)
    fn set_primary_list(&self, titles: Vec<String>);

    /// Replace the secondary list (attributes of the selected group)
    fn set_secondary_list(&self, attributes: Vec<AttributeId>);

    /// Re-enable the controls and bring the window back on top.
    ///
    /// Called exactly once at the end of every dispatch, whatever happened.
    fn rearm(&self);
}
