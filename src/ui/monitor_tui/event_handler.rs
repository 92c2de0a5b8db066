use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// What keystrokes currently mean
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    /// Typing into the query box
    Query,
    /// Waiting for `y` to confirm killing this PID
    ConfirmKill(u32),
}

/// Events that can occur in the monitor TUI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorEvent {
    /// Quit the application
    Quit,
    /// Toggle help overlay
    ToggleHelp,
    /// Toggle process sort mode
    ToggleSort,
    ToggleTheme,
    ToggleChart,
    /// Switch the query between name and PID matching
    ToggleQueryField,
    BeginQuery,
    QueryInput(char),
    QueryBackspace,
    QueryCommit,
    QueryCancel,
    RaiseCpuThreshold,
    LowerCpuThreshold,
    RaiseMemThreshold,
    LowerMemThreshold,
    /// Navigate process list up
    SelectUp,
    /// Navigate process list down
    SelectDown,
    RequestKill,
    ConfirmKill,
    CancelKill,
    NiceDown,
    NiceUp,
    ApplyNice,
    Suspend,
    Resume,
    /// No action
    None,
}

/// Translate a key press into an event for the given input mode
pub fn map_key(key: KeyEvent, mode: InputMode) -> MonitorEvent {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return MonitorEvent::Quit;
    }

    match mode {
        InputMode::Query => match key.code {
            KeyCode::Enter => MonitorEvent::QueryCommit,
            KeyCode::Esc => MonitorEvent::QueryCancel,
            KeyCode::Backspace => MonitorEvent::QueryBackspace,
            KeyCode::Char(c) => MonitorEvent::QueryInput(c),
            _ => MonitorEvent::None,
        },
        InputMode::ConfirmKill(_) => match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => MonitorEvent::ConfirmKill,
            _ => MonitorEvent::CancelKill,
        },
        InputMode::Normal => match key.code {
            KeyCode::Char('q') | KeyCode::Esc => MonitorEvent::Quit,
            KeyCode::Char('?') => MonitorEvent::ToggleHelp,
            KeyCode::Char('s') => MonitorEvent::ToggleSort,
            KeyCode::Char('d') => MonitorEvent::ToggleTheme,
            KeyCode::Char('g') => MonitorEvent::ToggleChart,
            KeyCode::Char('f') => MonitorEvent::ToggleQueryField,
            KeyCode::Char('/') => MonitorEvent::BeginQuery,
            KeyCode::Char('c') => MonitorEvent::RaiseCpuThreshold,
            KeyCode::Char('C') => MonitorEvent::LowerCpuThreshold,
            KeyCode::Char('m') => MonitorEvent::RaiseMemThreshold,
            KeyCode::Char('M') => MonitorEvent::LowerMemThreshold,
            KeyCode::Up | KeyCode::Char('k') => MonitorEvent::SelectUp,
            KeyCode::Down | KeyCode::Char('j') => MonitorEvent::SelectDown,
            KeyCode::Char('x') => MonitorEvent::RequestKill,
            KeyCode::Char('[') => MonitorEvent::NiceDown,
            KeyCode::Char(']') => MonitorEvent::NiceUp,
            KeyCode::Char('p') => MonitorEvent::ApplyNice,
            KeyCode::Char('z') => MonitorEvent::Suspend,
            KeyCode::Char('r') => MonitorEvent::Resume,
            _ => MonitorEvent::None,
        },
    }
}
