//! Presentation seams: routes, notifications and terminal rendering.

pub mod notify;
pub mod render;
pub mod routes;

pub use notify::{Notifier, TerminalNotifier, Toast, ToastLevel, ToastLog};
pub use routes::{Navigator, Route, RouteHistory};
