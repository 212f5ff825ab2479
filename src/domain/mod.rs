pub mod task;
pub mod theme;

pub use task::Task;
pub use theme::Theme;
