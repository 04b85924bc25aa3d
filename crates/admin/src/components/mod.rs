//! View-model types shared by page templates.

pub mod chrome;
pub mod format;
pub mod pager;

pub use chrome::{PageChrome, UserView};
pub use pager::{PageQuery, Pager};
