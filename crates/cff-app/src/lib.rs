// Page controllers for the College Fantasy Football client, their view
// models, and the orchestrator that drives them.

pub mod app;
pub mod pages;
pub mod protocol;
pub mod view;
