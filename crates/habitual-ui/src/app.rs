use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use chrono::{DateTime, Utc};
use crossterm::event::{KeyCode, KeyEvent};
use habitual_core::category::Category;
use habitual_core::record::CreateRecord;
use habitual_core::stats::StatsOverview;
use habitual_core::{AppConfig, Filter, Habit};
use habitual_service::{HabitService, ServiceError};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::components::habit_form::{self, centered_rect};
use crate::components::habit_list::HabitList;
use crate::export::{write_export, ExportSnapshot};
use crate::filter::FilterController;
use crate::health::spawn_health_monitor;
use crate::modal::{ModalAction, ModalController, SubmitOutcome};
use crate::page::{ApiStatus, Page};
use crate::toast::{ToastKind, ToastQueue, ToastStage};
use crate::view::{HabitCard, Trend};

/// Completions of background work, applied by [`App::process_events`] in
/// arrival order. For concurrent reloads this means the last response to
/// resolve is the one left on screen.
#[derive(Debug)]
pub enum AppEvent {
    HabitsLoaded(Result<Vec<Habit>, ServiceError>),
    StatsLoaded(Result<StatsOverview, ServiceError>),
    Toast(ToastKind, String),
    Health(bool),
}

/// What the app is currently doing, besides the modal.
#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    /// Browsing habit cards
    Normal,
    /// Waiting for y/n on a delete
    ConfirmDelete { habit_id: i64, name: String },
}

pub struct App {
    service: Arc<dyn HabitService>,
    config: AppConfig,
    page: Page,
    modal: ModalController,
    filter: FilterController,
    mode: Mode,
    /// Index into the visible cards.
    selected: usize,
    habits: Vec<Habit>,
    categories: Vec<Category>,
    stats: Option<StatsOverview>,
    events_tx: mpsc::UnboundedSender<AppEvent>,
    events_rx: mpsc::UnboundedReceiver<AppEvent>,
    shutdown_tx: watch::Sender<bool>,
    health_task: Option<JoinHandle<()>>,
}

impl App {
    pub fn new(service: Arc<dyn HabitService>, config: AppConfig) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, _) = watch::channel(false);
        let page = Page::new(ToastQueue::from_config(&config));
        Self {
            service,
            config,
            page,
            modal: ModalController::new(),
            filter: FilterController::new(),
            mode: Mode::Normal,
            selected: 0,
            habits: Vec::new(),
            categories: Vec::new(),
            stats: None,
            events_tx,
            events_rx,
            shutdown_tx,
            health_task: None,
        }
    }

    // -- Accessors --

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn modal(&self) -> &ModalController {
        &self.modal
    }

    pub fn active_filter(&self) -> Filter {
        self.filter.active()
    }

    pub fn habits(&self) -> &[Habit] {
        &self.habits
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn stats(&self) -> Option<&StatsOverview> {
        self.stats.as_ref()
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn selected_card(&self) -> Option<&HabitCard> {
        self.page.visible_cards().nth(self.selected)
    }

    pub fn is_input_mode(&self) -> bool {
        self.modal.is_open() || matches!(self.mode, Mode::ConfirmDelete { .. })
    }

    // -- Lifecycle --

    /// Reset controllers, probe the backend and, when it answers, load
    /// everything. Returns whether the backend was reachable.
    pub async fn boot(&mut self) -> bool {
        self.modal.close();
        self.filter = FilterController::new();
        self.mode = Mode::Normal;
        self.page.status = ApiStatus::Checking;

        let online = self.service.check_health().await;
        if online {
            info!("backend reachable, loading data");
            self.page.status = ApiStatus::Online;
            self.load_all().await;
        } else {
            warn!("backend unreachable at boot, skipping data load");
            self.page.status = ApiStatus::Offline;
            self.page
                .toasts
                .push_persistent(ToastKind::Error, "API offline", Instant::now());
        }
        online
    }

    /// Start the periodic health re-check. Idempotent.
    pub fn start_health_monitor(&mut self) {
        if self.health_task.is_some() {
            return;
        }
        self.health_task = Some(spawn_health_monitor(
            Arc::clone(&self.service),
            self.config.health_interval(),
            self.events_tx.clone(),
            self.shutdown_tx.subscribe(),
        ));
    }

    /// Signal background tasks to stop. Returns the health task handle so the
    /// caller can await it.
    pub fn shutdown(&mut self) -> Option<JoinHandle<()>> {
        let _ = self.shutdown_tx.send(true);
        self.health_task.take()
    }

    /// Advance time-driven UI state (toast expiry).
    pub fn tick(&mut self, now: Instant) {
        self.page.toasts.tick(now);
    }

    // -- Data loading --

    /// Categories, habits and stats, concurrently. Each load fails on its own.
    pub async fn load_all(&mut self) {
        self.page.show_loading();
        let (categories, habits, stats) = tokio::join!(
            self.service.list_categories(),
            self.service.list_habits(),
            self.service.stats_overview(),
        );
        self.apply_categories(categories);
        self.apply_habits(habits);
        self.apply_stats(stats);
        self.page.hide_loading();
    }

    pub async fn load_habits(&mut self) {
        let result = self.service.list_habits().await;
        self.apply_habits(result);
    }

    pub async fn load_categories(&mut self) {
        let result = self.service.list_categories().await;
        self.apply_categories(result);
    }

    pub async fn load_stats(&mut self) {
        let result = self.service.stats_overview().await;
        self.apply_stats(result);
    }

    fn apply_habits(&mut self, result: Result<Vec<Habit>, ServiceError>) {
        match result {
            Ok(habits) => self.habits = habits,
            Err(e) => {
                warn!("failed to load habits: {e}");
                self.habits.clear();
                self.page
                    .toasts
                    .push(ToastKind::Error, "Failed to load habits", Instant::now());
            }
        }
        self.page.replace_cards(&self.habits);
        self.filter.apply(&mut self.page.cards);
        self.clamp_selection();
    }

    fn apply_categories(&mut self, result: Result<Vec<Category>, ServiceError>) {
        match result {
            Ok(categories) => {
                self.page.set_categories(&categories);
                self.categories = categories;
            }
            Err(e) => warn!("failed to load categories: {e}"),
        }
    }

    fn apply_stats(&mut self, result: Result<StatsOverview, ServiceError>) {
        match result {
            Ok(stats) => {
                self.page.set_stats(&stats);
                self.stats = Some(stats);
            }
            Err(e) => warn!("failed to load stats: {e}"),
        }
    }

    /// Drain finished background work into the page. Returns how many events
    /// were applied.
    pub fn process_events(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            self.apply_event(event);
            applied += 1;
        }
        applied
    }

    fn apply_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::HabitsLoaded(result) => self.apply_habits(result),
            AppEvent::StatsLoaded(result) => self.apply_stats(result),
            AppEvent::Toast(kind, message) => {
                self.page.toasts.push(kind, message, Instant::now());
            }
            AppEvent::Health(online) => {
                self.page.status = if online {
                    ApiStatus::Online
                } else {
                    ApiStatus::Offline
                };
            }
        }
    }

    // -- Actions --

    /// Record a completion (or un-completion) for today, then reload habits
    /// and stats no matter how the write went. Runs in the background; the
    /// results arrive through [`App::process_events`].
    pub fn toggle_habit(&self, habit_id: i64, completed: bool) -> JoinHandle<()> {
        let service = Arc::clone(&self.service);
        let events = self.events_tx.clone();
        tokio::spawn(async move {
            let record = CreateRecord::today(habit_id, completed);
            let toast = match service.create_record(&record).await {
                Ok(_) => {
                    let message = if completed {
                        "Habit completed! 🎉"
                    } else {
                        "Habit unmarked"
                    };
                    AppEvent::Toast(ToastKind::Success, message.into())
                }
                Err(e) => {
                    warn!("failed to record habit {habit_id}: {e}");
                    AppEvent::Toast(ToastKind::Error, "Failed to update habit".into())
                }
            };
            let _ = events.send(toast);

            let (habits, stats) = tokio::join!(service.list_habits(), service.stats_overview());
            let _ = events.send(AppEvent::HabitsLoaded(habits));
            let _ = events.send(AppEvent::StatsLoaded(stats));
        })
    }

    pub async fn submit_modal(&mut self) {
        let outcome = self
            .modal
            .submit(self.service.as_ref(), &mut self.page.toasts)
            .await;
        if let SubmitOutcome::Created(_) = outcome {
            self.load_habits().await;
        }
    }

    pub async fn delete_habit(&mut self, habit_id: i64) {
        match self.service.delete_habit(habit_id).await {
            Ok(_) => {
                info!("deleted habit {habit_id}");
                self.page
                    .toasts
                    .push(ToastKind::Success, "Habit deleted", Instant::now());
                let (habits, stats) = tokio::join!(
                    self.service.list_habits(),
                    self.service.stats_overview(),
                );
                self.apply_habits(habits);
                self.apply_stats(stats);
            }
            Err(e) => {
                warn!("failed to delete habit {habit_id}: {e}");
                self.page
                    .toasts
                    .push(ToastKind::Error, "Failed to delete habit", Instant::now());
            }
        }
    }

    pub fn set_filter(&mut self, filter: Filter) {
        self.filter.set_filter(filter, &mut self.page.cards);
        self.clamp_selection();
    }

    pub fn snapshot(&self, now: DateTime<Utc>) -> ExportSnapshot {
        ExportSnapshot::new(
            self.habits.clone(),
            self.categories.clone(),
            self.stats.clone(),
            now,
        )
    }

    /// Write the in-memory snapshot to the configured export directory.
    pub fn export(&mut self, now: DateTime<Utc>) -> Result<PathBuf> {
        let dir = self.config.export_dir.clone();
        self.export_to(&dir, now)
    }

    pub fn export_to(&mut self, dir: &Path, now: DateTime<Utc>) -> Result<PathBuf> {
        let path = write_export(dir, &self.snapshot(now), now)?;
        info!("exported snapshot to {}", path.display());
        self.page
            .toasts
            .push(ToastKind::Success, "Data exported successfully", Instant::now());
        Ok(path)
    }

    pub fn render_html(&self) -> String {
        self.page.to_html(self.filter.active())
    }

    // -- Input --

    pub async fn handle_key(&mut self, key: KeyEvent) {
        if self.modal.is_open() {
            let category_ids: Vec<i64> = self.page.category_options.iter().map(|o| o.id).collect();
            match self.modal.handle_key(key, &category_ids) {
                ModalAction::Submit => self.submit_modal().await,
                ModalAction::Close => self.modal.close(),
                ModalAction::None => {}
            }
            return;
        }

        match self.mode.clone() {
            Mode::ConfirmDelete { habit_id, .. } => match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => {
                    self.mode = Mode::Normal;
                    self.delete_habit(habit_id).await;
                }
                KeyCode::Char('n') | KeyCode::Esc => self.mode = Mode::Normal,
                _ => {}
            },
            Mode::Normal => self.handle_normal_key(key).await,
        }
    }

    async fn handle_normal_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                if self.selected + 1 < self.page.visible_cards().count() {
                    self.selected += 1;
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::Char('g') => self.selected = 0,
            KeyCode::Char('G') => {
                self.selected = self.page.visible_cards().count().saturating_sub(1);
            }
            KeyCode::Char(' ') | KeyCode::Enter => {
                if let Some(card) = self.selected_card() {
                    // Detached: completion shows up via process_events.
                    drop(self.toggle_habit(card.habit_id, card.toggle_target()));
                }
            }
            KeyCode::Char('n') => self.modal.open(),
            KeyCode::Char('a') => self.set_filter(Filter::All),
            KeyCode::Char('c') => self.set_filter(Filter::Completed),
            KeyCode::Char('p') => self.set_filter(Filter::Pending),
            KeyCode::Char('r') => self.load_all().await,
            KeyCode::Char('d') => {
                let target = self
                    .selected_card()
                    .map(|card| (card.habit_id, card.name.clone()));
                if let Some((habit_id, name)) = target {
                    self.mode = Mode::ConfirmDelete { habit_id, name };
                }
            }
            KeyCode::Char('e') => {
                if let Err(e) = self.export(Utc::now()) {
                    warn!("export failed: {e:#}");
                    self.page
                        .toasts
                        .push(ToastKind::Error, "Export failed", Instant::now());
                }
            }
            KeyCode::Char('x') => self.page.toasts.dismiss_all(Instant::now()),
            _ => {}
        }
    }

    fn clamp_selection(&mut self) {
        let visible = self.page.visible_cards().count();
        if self.selected >= visible {
            self.selected = visible.saturating_sub(1);
        }
    }

    // -- Rendering --

    pub fn render(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Min(3),
                Constraint::Length(1),
            ])
            .split(frame.area());

        self.render_header(frame, chunks[0]);
        self.render_stats(frame, chunks[1]);
        HabitList::new(
            self.page.visible_cards(),
            self.selected,
            self.page.empty_state_visible,
            self.page.loading,
        )
        .render(frame, chunks[2]);
        self.render_footer(frame, chunks[3]);

        if let Some(form) = self.modal.form() {
            habit_form::render(frame, form, &self.page.category_options);
        }
        if let Mode::ConfirmDelete { ref name, .. } = self.mode {
            self.render_confirm_delete(frame, name);
        }
        self.render_toasts(frame);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let status_color = match self.page.status {
            ApiStatus::Online => Color::Green,
            ApiStatus::Offline => Color::Red,
            ApiStatus::Checking => Color::Yellow,
        };
        let mut spans = vec![
            Span::styled(" Habit Tracker ", Style::default().bold()),
            Span::styled(
                format!("● {} ", self.page.status.label()),
                Style::default().fg(status_color),
            ),
            Span::raw(" "),
        ];
        for &filter in Filter::ALL {
            let style = if filter == self.filter.active() {
                Style::default().fg(Color::Black).bg(Color::Cyan)
            } else {
                Style::default().fg(Color::Gray)
            };
            spans.push(Span::styled(format!(" {} ", filter.display_name()), style));
            spans.push(Span::raw(" "));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_stats(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title(" Today ");
        let line = match self.page.stats {
            Some(ref stats) => {
                let trend_color = match stats.trend {
                    Trend::Positive => Color::Green,
                    Trend::Negative => Color::Red,
                };
                Line::from(vec![
                    Span::raw(format!("Habits {}  ", stats.total_habits)),
                    Span::raw(format!("Done {}  ", stats.completed_today)),
                    Span::styled(
                        format!("{}  ", stats.completion_rate),
                        Style::default().fg(trend_color).bold(),
                    ),
                    Span::raw(format!("Avg streak {}  ", stats.average_streak)),
                    Span::raw(format!("Completions {}", stats.total_completions)),
                ])
            }
            None => Line::styled("No stats yet", Style::default().fg(Color::DarkGray)),
        };
        frame.render_widget(Paragraph::new(line).block(block), area);
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect) {
        let help = "j/k move  space toggle  n new  a/c/p filter  d delete  r reload  e export  x dismiss  q quit";
        frame.render_widget(
            Paragraph::new(help).style(Style::default().fg(Color::DarkGray)),
            area,
        );
    }

    fn render_confirm_delete(&self, frame: &mut Frame, name: &str) {
        let area = centered_rect(50, 5, frame.area());
        frame.render_widget(Clear, area);
        let block = Block::default()
            .title(" Delete habit ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red));
        let text = format!("Delete \"{name}\"? (y/n)");
        frame.render_widget(
            Paragraph::new(text).block(block).wrap(Wrap { trim: true }),
            area,
        );
    }

    fn render_toasts(&self, frame: &mut Frame) {
        let area = frame.area();
        let width = 40.min(area.width);
        let mut y = area.height.saturating_sub(1);
        // Newest at the bottom, stacking upwards above the footer.
        for toast in self.page.toasts.iter().collect::<Vec<_>>().into_iter().rev() {
            if y < 3 {
                break;
            }
            y -= 3;
            let rect = Rect {
                x: area.width.saturating_sub(width),
                y,
                width,
                height: 3,
            };
            let color = match toast.kind {
                ToastKind::Success => Color::Green,
                ToastKind::Error => Color::Red,
                ToastKind::Warning => Color::Yellow,
                ToastKind::Info => Color::Blue,
            };
            let style = if matches!(toast.stage, ToastStage::Leaving { .. }) {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default().fg(color)
            };
            frame.render_widget(Clear, rect);
            frame.render_widget(
                Paragraph::new(format!("{} {}", toast.kind.icon(), toast.message))
                    .block(Block::default().borders(Borders::ALL).border_style(style)),
                rect,
            );
        }
    }
}
