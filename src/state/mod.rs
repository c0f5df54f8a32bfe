//! State management module
//!
//! This module contains the host application state, the observable timer
//! state and saved work sessions.

pub mod app_state;
pub mod timer_state;
pub mod work_session;

// Re-export main types
pub use app_state::AppState;
pub use timer_state::TimerState;
pub use work_session::WorkSession;
