// Core library: configuration, client-side persistence, the session store
// shared by every page context, the REST API client, and per-widget request
// state.

pub mod api;
pub mod config;
pub mod db;
pub mod session;
pub mod widget;
