mod reconciler;
mod state;

pub use reconciler::{FileSummary, Reconciler};
pub use state::{App, InputMode, View};
