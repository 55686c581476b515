//! Pulse-input interrupts, the sampling-window timer, and task helpers.

pub mod edge_isr;
pub mod task_pin;
pub mod window_timer;
