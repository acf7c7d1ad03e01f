// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{AppMode, FormKind, Role, Section};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub mode: AppMode,
    pub role: Role,
    pub active_section: Section,
    pub show_archived: bool,
    pub status_line: Option<String>,
}

impl AppState {
    pub fn for_role(role: Role) -> Self {
        let active_section = role.sections().first().copied().unwrap_or(Section::Dashboard);
        Self {
            mode: AppMode::Nav,
            role,
            active_section,
            show_archived: false,
            status_line: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    NextSection,
    PrevSection,
    JumpToSection(Section),
    StartSearch,
    OpenForm(FormKind),
    ExitToNav,
    ToggleArchived,
    ClearStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    ModeChanged(AppMode),
    SectionChanged(Section),
    SectionDenied(Section),
    FormDenied(FormKind),
    ArchivedFilterChanged(bool),
    StatusUpdated(String),
    StatusCleared,
}

impl AppState {
    pub fn dispatch(&mut self, command: AppCommand) -> Vec<AppEvent> {
        match command {
            AppCommand::NextSection => self.rotate_section(1),
            AppCommand::PrevSection => self.rotate_section(-1),
            AppCommand::JumpToSection(section) => {
                if !self.role.allows(section) {
                    let label = section.label();
                    return vec![
                        AppEvent::SectionDenied(section),
                        self.set_status(&format!("{label} unavailable for {}", self.role.as_str())),
                    ];
                }
                self.active_section = section;
                vec![AppEvent::SectionChanged(section)]
            }
            AppCommand::StartSearch => {
                self.mode = AppMode::Search;
                vec![AppEvent::ModeChanged(self.mode)]
            }
            AppCommand::OpenForm(kind) => {
                if self.role == Role::Parent {
                    return vec![
                        AppEvent::FormDenied(kind),
                        self.set_status("forms unavailable for parents"),
                    ];
                }
                self.mode = AppMode::Form(kind);
                vec![AppEvent::ModeChanged(self.mode)]
            }
            AppCommand::ExitToNav => {
                self.mode = AppMode::Nav;
                vec![AppEvent::ModeChanged(self.mode), self.set_status("nav")]
            }
            AppCommand::ToggleArchived => {
                self.show_archived = !self.show_archived;
                let label = if self.show_archived {
                    "archived shown"
                } else {
                    "archived hidden"
                };
                vec![
                    AppEvent::ArchivedFilterChanged(self.show_archived),
                    self.set_status(label),
                ]
            }
            AppCommand::ClearStatus => {
                self.status_line = None;
                vec![AppEvent::StatusCleared]
            }
        }
    }

    fn rotate_section(&mut self, delta: isize) -> Vec<AppEvent> {
        let sections = self.role.sections();
        let current = sections
            .iter()
            .position(|section| *section == self.active_section)
            .unwrap_or(0) as isize;
        let len = sections.len() as isize;
        let next = (current + delta).rem_euclid(len) as usize;
        self.active_section = sections[next];
        vec![AppEvent::SectionChanged(self.active_section)]
    }

    fn set_status(&mut self, message: &str) -> AppEvent {
        self.status_line = Some(message.to_owned());
        AppEvent::StatusUpdated(message.to_owned())
    }
}
