use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent};
use habitual_core::habit::{CreateHabit, Difficulty, DEFAULT_GOAL_FREQUENCY, DEFAULT_ICON};
use habitual_core::{ApiMessage, HabitualError};
use habitual_service::HabitService;
use tracing::{info, warn};

use crate::toast::{ToastKind, ToastQueue};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Description,
    Category,
    Difficulty,
    GoalFrequency,
}

impl FormField {
    pub const ALL: &[FormField] = &[
        FormField::Name,
        FormField::Description,
        FormField::Category,
        FormField::Difficulty,
        FormField::GoalFrequency,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FormField::Name => "Name",
            FormField::Description => "Description",
            FormField::Category => "Category",
            FormField::Difficulty => "Difficulty",
            FormField::GoalFrequency => "Goal (times/week)",
        }
    }

    fn next(&self) -> Self {
        match self {
            FormField::Name => FormField::Description,
            FormField::Description => FormField::Category,
            FormField::Category => FormField::Difficulty,
            FormField::Difficulty => FormField::GoalFrequency,
            FormField::GoalFrequency => FormField::Name,
        }
    }

    fn prev(&self) -> Self {
        match self {
            FormField::Name => FormField::GoalFrequency,
            FormField::Description => FormField::Name,
            FormField::Category => FormField::Description,
            FormField::Difficulty => FormField::Category,
            FormField::GoalFrequency => FormField::Difficulty,
        }
    }

    fn is_text(&self) -> bool {
        matches!(
            self,
            FormField::Name | FormField::Description | FormField::GoalFrequency
        )
    }
}

/// Contents of the create-habit form.
#[derive(Debug, Clone, PartialEq)]
pub struct HabitForm {
    pub name: String,
    pub description: String,
    pub category_id: Option<i64>,
    pub difficulty: Difficulty,
    pub goal_frequency: String,
    pub focus: FormField,
}

impl Default for HabitForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            category_id: None,
            difficulty: Difficulty::Medium,
            goal_frequency: DEFAULT_GOAL_FREQUENCY.to_string(),
            focus: FormField::Name,
        }
    }
}

impl HabitForm {
    /// Build the creation payload. Blank optional fields become `None`.
    pub fn to_payload(&self) -> Result<CreateHabit, HabitualError> {
        let goal_frequency = self.goal_frequency.trim().parse::<i64>().map_err(|_| {
            HabitualError::InvalidInput(format!(
                "goal frequency must be a whole number, got {:?}",
                self.goal_frequency
            ))
        })?;
        let description = Some(self.description.trim())
            .filter(|d| !d.is_empty())
            .map(String::from);
        let payload = CreateHabit {
            name: self.name.trim().to_string(),
            description,
            category_id: self.category_id,
            difficulty: self.difficulty,
            goal_frequency,
            icon: DEFAULT_ICON.to_string(),
        };
        payload.validate()?;
        Ok(payload)
    }

    fn text_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            FormField::Name => Some(&mut self.name),
            FormField::Description => Some(&mut self.description),
            FormField::GoalFrequency => Some(&mut self.goal_frequency),
            _ => None,
        }
    }

    /// Step the category select through `None` and then each option id.
    fn cycle_category(&mut self, category_ids: &[i64], forward: bool) {
        let mut choices: Vec<Option<i64>> = vec![None];
        choices.extend(category_ids.iter().copied().map(Some));
        let pos = choices
            .iter()
            .position(|c| *c == self.category_id)
            .unwrap_or(0);
        let len = choices.len();
        let next = if forward {
            (pos + 1) % len
        } else {
            (pos + len - 1) % len
        };
        self.category_id = choices[next];
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ModalState {
    Closed,
    Open(HabitForm),
}

/// What the owner should do after a key went to the modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalAction {
    None,
    Submit,
    Close,
}

#[derive(Debug)]
pub enum SubmitOutcome {
    /// Submit pressed with no open modal.
    NotOpen,
    /// Form failed the required-field check; nothing was sent.
    Invalid,
    Created(ApiMessage),
    Failed,
}

/// Lifecycle of the single create-habit dialog: closed → open → closed.
#[derive(Debug)]
pub struct ModalController {
    state: ModalState,
}

impl Default for ModalController {
    fn default() -> Self {
        Self::new()
    }
}

impl ModalController {
    pub fn new() -> Self {
        Self {
            state: ModalState::Closed,
        }
    }

    pub fn state(&self) -> &ModalState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, ModalState::Open(_))
    }

    /// Opens with a fresh form. Reopening an open modal keeps its contents.
    pub fn open(&mut self) {
        if !self.is_open() {
            self.state = ModalState::Open(HabitForm::default());
        }
    }

    pub fn close(&mut self) {
        self.state = ModalState::Closed;
    }

    pub fn form(&self) -> Option<&HabitForm> {
        match &self.state {
            ModalState::Open(form) => Some(form),
            ModalState::Closed => None,
        }
    }

    pub fn form_mut(&mut self) -> Option<&mut HabitForm> {
        match &mut self.state {
            ModalState::Open(form) => Some(form),
            ModalState::Closed => None,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, category_ids: &[i64]) -> ModalAction {
        let Some(form) = self.form_mut() else {
            return ModalAction::None;
        };
        match key.code {
            KeyCode::Esc => return ModalAction::Close,
            KeyCode::Enter => return ModalAction::Submit,
            KeyCode::Tab | KeyCode::Down => form.focus = form.focus.next(),
            KeyCode::BackTab | KeyCode::Up => form.focus = form.focus.prev(),
            KeyCode::Left | KeyCode::Right => {
                let forward = key.code == KeyCode::Right;
                match form.focus {
                    FormField::Category => form.cycle_category(category_ids, forward),
                    FormField::Difficulty => {
                        form.difficulty = if forward {
                            form.difficulty.next()
                        } else {
                            form.difficulty.prev()
                        }
                    }
                    _ => {}
                }
            }
            KeyCode::Backspace => {
                if let Some(text) = form.text_mut() {
                    text.pop();
                }
            }
            KeyCode::Char(c) if form.focus.is_text() => {
                if form.focus == FormField::GoalFrequency && !c.is_ascii_digit() {
                    return ModalAction::None;
                }
                if let Some(text) = form.text_mut() {
                    text.push(c);
                }
            }
            _ => {}
        }
        ModalAction::None
    }

    /// Send the form to the backend. On success the modal closes; on any
    /// failure it stays open with the form untouched. The caller owns the
    /// follow-up habit reload.
    pub async fn submit(
        &mut self,
        service: &dyn HabitService,
        toasts: &mut ToastQueue,
    ) -> SubmitOutcome {
        let Some(form) = self.form() else {
            return SubmitOutcome::NotOpen;
        };
        let payload = match form.to_payload() {
            Ok(p) => p,
            Err(e) => {
                toasts.push(ToastKind::Warning, e.to_string(), Instant::now());
                return SubmitOutcome::Invalid;
            }
        };

        match service.create_habit(&payload).await {
            Ok(ack) => {
                info!("created habit {:?} ({:?})", payload.name, ack.id);
                self.close();
                toasts.push(
                    ToastKind::Success,
                    "Habit created successfully!",
                    Instant::now(),
                );
                SubmitOutcome::Created(ack)
            }
            Err(e) => {
                warn!("create habit failed: {e}");
                toasts.push(ToastKind::Error, "Failed to create habit", Instant::now());
                SubmitOutcome::Failed
            }
        }
    }
}
