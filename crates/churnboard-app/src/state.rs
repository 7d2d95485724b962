// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::PresentationMode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub mode: PresentationMode,
    pub status_line: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_mode(PresentationMode::Dark)
    }
}

impl AppState {
    /// `mode` is decided once at startup (config or environment); after
    /// that the only way it changes is `AppCommand::ToggleMode`.
    pub fn with_mode(mode: PresentationMode) -> Self {
        Self {
            mode,
            status_line: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    ToggleMode,
    SetStatus(String),
    ClearStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    ModeChanged(PresentationMode),
    StatusUpdated(String),
    StatusCleared,
}

impl AppState {
    pub fn dispatch(&mut self, command: AppCommand) -> Vec<AppEvent> {
        match command {
            AppCommand::ToggleMode => {
                self.mode = self.mode.toggled();
                vec![
                    AppEvent::ModeChanged(self.mode),
                    self.set_status(self.mode.label()),
                ]
            }
            AppCommand::SetStatus(message) => {
                vec![self.set_status(&message)]
            }
            AppCommand::ClearStatus => {
                self.status_line = None;
                vec![AppEvent::StatusCleared]
            }
        }
    }

    fn set_status(&mut self, message: &str) -> AppEvent {
        self.status_line = Some(message.to_owned());
        AppEvent::StatusUpdated(message.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::{AppCommand, AppEvent, AppState};
    use crate::PresentationMode;

    #[test]
    fn toggle_mode_flips_and_announces() {
        let mut state = AppState::with_mode(PresentationMode::Light);

        let events = state.dispatch(AppCommand::ToggleMode);
        assert_eq!(state.mode, PresentationMode::Dark);
        assert_eq!(
            events,
            vec![
                AppEvent::ModeChanged(PresentationMode::Dark),
                AppEvent::StatusUpdated("dark".to_owned()),
            ],
        );

        state.dispatch(AppCommand::ToggleMode);
        assert_eq!(state.mode, PresentationMode::Light);
    }

    #[test]
    fn status_set_and_clear() {
        let mut state = AppState::default();

        state.dispatch(AppCommand::SetStatus("customers loaded".to_owned()));
        assert_eq!(state.status_line.as_deref(), Some("customers loaded"));

        let events = state.dispatch(AppCommand::ClearStatus);
        assert_eq!(state.status_line, None);
        assert_eq!(events, vec![AppEvent::StatusCleared]);
    }

    #[test]
    fn default_mode_is_dark() {
        assert_eq!(AppState::default().mode, PresentationMode::Dark);
    }
}
