pub mod feedback;
pub mod stdio;
pub mod tools;

pub use feedback::{FeedbackError, FeedbackLog};
pub use stdio::{Request, Response, serve};
pub use tools::{Tool, ToolContext, ToolManager};
