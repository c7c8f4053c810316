pub mod habit_form;
pub mod habit_list;
