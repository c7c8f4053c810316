//! Pure rendering from transport records to display nodes.
//!
//! Every string that originated with a user (habit name, description,
//! category name, icon) goes through [`escape_html`] before it lands in markup.

use std::fmt::Write;

use habitual_core::category::Category;
use habitual_core::habit::{Difficulty, Habit, Streak};
use habitual_core::stats::StatsOverview;
use habitual_core::Filter;

/// Completion rate (percent) at or above which the stats trend reads positive.
pub const TREND_THRESHOLD: f64 = 50.0;

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// A rendered habit card. `filter_tag` is fixed at render time; `hidden` is
/// owned by the filter controller.
#[derive(Debug, Clone, PartialEq)]
pub struct HabitCard {
    pub habit_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub icon: String,
    pub category: Option<String>,
    pub difficulty: Difficulty,
    pub goal_frequency: i64,
    pub streak: Streak,
    pub completion_rate: f64,
    pub completed: bool,
    pub filter_tag: Filter,
    pub hidden: bool,
}

impl HabitCard {
    /// The completion value a click on the card's check target submits.
    pub fn toggle_target(&self) -> bool {
        !self.completed
    }

    pub fn markup(&self) -> String {
        let mut html = String::new();
        let state_class = if self.completed { " completed" } else { "" };
        let style = if self.hidden {
            r#" style="display: none""#
        } else {
            ""
        };
        let _ = write!(
            html,
            r#"<div class="habit-card{state_class}" data-habit-id="{id}" data-filter="{tag}"{style}>"#,
            id = self.habit_id,
            tag = self.filter_tag.as_str(),
        );
        let _ = write!(
            html,
            r#"<div class="habit-header"><span class="habit-icon">{icon}</span><h3 class="habit-name">{name}</h3>"#,
            icon = escape_html(&self.icon),
            name = escape_html(&self.name),
        );
        let _ = write!(
            html,
            r#"<button class="habit-check{checked}" data-action="toggle" data-habit-id="{id}" data-completed="{target}">{mark}</button></div>"#,
            checked = if self.completed { " checked" } else { "" },
            id = self.habit_id,
            target = self.toggle_target(),
            mark = if self.completed { "✓" } else { "" },
        );
        if let Some(ref description) = self.description {
            let _ = write!(
                html,
                r#"<p class="habit-description">{}</p>"#,
                escape_html(description)
            );
        }
        let _ = write!(
            html,
            r#"<div class="habit-meta"><span class="badge difficulty-{}">{}</span>"#,
            self.difficulty.as_str(),
            self.difficulty.display_name(),
        );
        if let Some(ref category) = self.category {
            let _ = write!(
                html,
                r#"<span class="badge category">{}</span>"#,
                escape_html(category)
            );
        }
        let _ = write!(
            html,
            r#"<span class="badge goal">{}x/week</span></div>"#,
            self.goal_frequency
        );
        let _ = write!(
            html,
            concat!(
                r#"<div class="habit-stats">"#,
                r#"<span class="streak-current">🔥 {}</span>"#,
                r#"<span class="streak-best">🏆 {}</span>"#,
                r#"<span class="completion-rate">{:.1}%</span>"#,
                "</div></div>"
            ),
            self.streak.current, self.streak.best, self.completion_rate,
        );
        html
    }
}

pub fn render_habit_card(habit: &Habit) -> HabitCard {
    HabitCard {
        habit_id: habit.id,
        name: habit.name.clone(),
        description: habit
            .description
            .as_ref()
            .filter(|d| !d.trim().is_empty())
            .cloned(),
        icon: habit.icon.clone(),
        category: habit.category_name.clone(),
        difficulty: habit.difficulty,
        goal_frequency: habit.goal_frequency,
        streak: habit.streak,
        completion_rate: habit.completion_rate,
        completed: habit.completed_today,
        filter_tag: Filter::tag_for(habit.completed_today),
        hidden: false,
    }
}

pub fn render_habit_cards(habits: &[Habit]) -> Vec<HabitCard> {
    habits.iter().map(render_habit_card).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Positive,
    Negative,
}

impl Trend {
    pub fn as_class(&self) -> &'static str {
        match self {
            Trend::Positive => "positive",
            Trend::Negative => "negative",
        }
    }
}

/// Text for each stats tile, exactly as displayed.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsPanel {
    pub total_habits: String,
    pub completed_today: String,
    pub average_streak: String,
    pub total_completions: String,
    pub completion_rate: String,
    pub trend: Trend,
}

impl StatsPanel {
    pub fn markup(&self) -> String {
        format!(
            concat!(
                r#"<section class="stats">"#,
                r#"<div class="stat"><span class="stat-label">Total habits</span><span id="totalHabits">{}</span></div>"#,
                r#"<div class="stat"><span class="stat-label">Completed today</span><span id="completedToday">{}</span></div>"#,
                r#"<div class="stat"><span class="stat-label">Average streak</span><span id="avgStreak">{}</span></div>"#,
                r#"<div class="stat"><span class="stat-label">Total completions</span><span id="totalCompletions">{}</span></div>"#,
                r#"<div class="stat"><span class="stat-label">Today</span><span id="completionRate" class="trend {}">{}</span></div>"#,
                "</section>"
            ),
            self.total_habits,
            self.completed_today,
            self.average_streak,
            self.total_completions,
            self.trend.as_class(),
            self.completion_rate,
        )
    }
}

pub fn render_stats(stats: &StatsOverview) -> StatsPanel {
    let trend = if stats.completion_rate_today >= TREND_THRESHOLD {
        Trend::Positive
    } else {
        Trend::Negative
    };
    StatsPanel {
        total_habits: stats.total_habits.to_string(),
        completed_today: stats.completed_today.to_string(),
        average_streak: format!("{:.1}", stats.average_streak),
        total_completions: stats.total_completions.to_string(),
        completion_rate: format!("{:.1}%", stats.completion_rate_today),
        trend,
    }
}

/// One `<option>` of the category select.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryOption {
    pub id: i64,
    pub label: String,
}

pub fn render_category_options(categories: &[Category]) -> Vec<CategoryOption> {
    categories
        .iter()
        .map(|c| CategoryOption {
            id: c.id,
            label: format!("{} {}", c.icon, c.name),
        })
        .collect()
}

pub fn category_select_markup(options: &[CategoryOption]) -> String {
    let mut html = String::from(r#"<select id="habitCategory"><option value="">No category</option>"#);
    for opt in options {
        let _ = write!(
            html,
            r#"<option value="{}">{}</option>"#,
            opt.id,
            escape_html(&opt.label)
        );
    }
    html.push_str("</select>");
    html
}
