#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlobalAction {
    Quit,
    /// Quits from any mode, including while composing a query.
    ForceQuit,
    Refresh,
    ToggleView,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavAction {
    Up,
    Down,
    Home,
    End,
    Select,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchAction {
    Start,
    Submit,
    Cancel,
    ClearFilter,
}
