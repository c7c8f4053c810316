use std::fmt::Write;

use habitual_core::category::Category;
use habitual_core::stats::StatsOverview;
use habitual_core::{Filter, Habit};

use crate::toast::ToastQueue;
use crate::view::{
    category_select_markup, render_category_options, render_habit_cards, render_stats,
    CategoryOption, HabitCard, StatsPanel,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiStatus {
    Checking,
    Online,
    Offline,
}

impl ApiStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ApiStatus::Checking => "Checking…",
            ApiStatus::Online => "Online",
            ApiStatus::Offline => "Offline",
        }
    }

    fn class(&self) -> &'static str {
        match self {
            ApiStatus::Checking => "checking",
            ApiStatus::Online => "online",
            ApiStatus::Offline => "offline",
        }
    }
}

/// Retained state of everything on screen. Both the terminal dashboard and
/// the static HTML renderer draw from this.
#[derive(Debug)]
pub struct Page {
    pub cards: Vec<HabitCard>,
    pub grid_visible: bool,
    pub empty_state_visible: bool,
    pub stats: Option<StatsPanel>,
    pub category_options: Vec<CategoryOption>,
    pub status: ApiStatus,
    pub loading: bool,
    pub toasts: ToastQueue,
}

impl Page {
    pub fn new(toasts: ToastQueue) -> Self {
        Self {
            cards: Vec::new(),
            grid_visible: false,
            empty_state_visible: true,
            stats: None,
            category_options: Vec::new(),
            status: ApiStatus::Checking,
            loading: false,
            toasts,
        }
    }

    pub fn show_loading(&mut self) {
        self.loading = true;
    }

    pub fn hide_loading(&mut self) {
        self.loading = false;
    }

    /// Full re-render of the grid; previous cards are discarded.
    pub fn replace_cards(&mut self, habits: &[Habit]) {
        self.cards = render_habit_cards(habits);
        self.toggle_empty_state(!habits.is_empty());
    }

    pub fn toggle_empty_state(&mut self, has_habits: bool) {
        self.grid_visible = has_habits;
        self.empty_state_visible = !has_habits;
    }

    pub fn set_stats(&mut self, stats: &StatsOverview) {
        self.stats = Some(render_stats(stats));
    }

    pub fn set_categories(&mut self, categories: &[Category]) {
        self.category_options = render_category_options(categories);
    }

    pub fn visible_cards(&self) -> impl Iterator<Item = &HabitCard> {
        self.cards.iter().filter(|c| !c.hidden)
    }

    pub fn card(&self, habit_id: i64) -> Option<&HabitCard> {
        self.cards.iter().find(|c| c.habit_id == habit_id)
    }

    /// A standalone HTML document of the current page.
    pub fn to_html(&self, active_filter: Filter) -> String {
        let mut html = String::from(concat!(
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n",
            "<meta charset=\"utf-8\">\n<title>Habit Tracker</title>\n",
            "</head>\n<body>\n"
        ));

        let _ = writeln!(
            html,
            r#"<header><h1>Habit Tracker</h1><span id="apiStatus" class="status {}">{}</span></header>"#,
            self.status.class(),
            self.status.label(),
        );

        if let Some(ref stats) = self.stats {
            html.push_str(&stats.markup());
            html.push('\n');
        }

        html.push_str(r#"<nav class="filters">"#);
        for &filter in Filter::ALL {
            let active = if filter == active_filter { " active" } else { "" };
            let _ = write!(
                html,
                r#"<button class="filter-btn{active}" data-filter="{}">{}</button>"#,
                filter.as_str(),
                filter.display_name(),
            );
        }
        html.push_str("</nav>\n");

        if self.loading {
            html.push_str("<div class=\"loading\"><div class=\"spinner\"></div></div>\n");
        }

        let _ = writeln!(
            html,
            r#"<div id="emptyState" class="empty-state"{}><p>No habits yet. Create your first one!</p></div>"#,
            display(self.empty_state_visible),
        );
        let _ = write!(
            html,
            r#"<div id="habitsGrid" class="habits-grid"{}>"#,
            display(self.grid_visible),
        );
        for card in &self.cards {
            html.push_str(&card.markup());
        }
        html.push_str("</div>\n");

        let _ = writeln!(
            html,
            r#"<form id="habitForm" hidden>{}</form>"#,
            category_select_markup(&self.category_options)
        );

        html.push_str(r#"<div id="toastContainer">"#);
        for toast in self.toasts.iter() {
            html.push_str(&toast.markup());
        }
        html.push_str("</div>\n</body>\n</html>\n");
        html
    }
}

fn display(visible: bool) -> &'static str {
    if visible {
        ""
    } else {
        r#" style="display: none""#
    }
}
