//! Interactive prompts shown to the user.
//!
//! The page used `prompt`/`confirm`/`alert`; components here take a
//! [`Prompter`] so tests (and any embedding shell) decide how to ask.

/// User-facing strings, in the user's language.
pub const EDIT_PROMPT: &str = "ویرایش پیام:";
pub const DELETE_CONFIRM: &str = "آیا مطمئن هستید که می‌خواهید این پیام را حذف کنید؟";
pub const EDIT_FAILED: &str = "خطا در ویرایش پیام";
pub const DELETE_FAILED: &str = "خطا در حذف پیام";

pub trait Prompter: Send + Sync {
    /// Ask for replacement text, pre-filled with the current content.
    /// `None` means the user cancelled.
    fn prompt_edit(&self, label: &str, current: &str) -> Option<String>;

    /// Yes/no confirmation.
    fn confirm(&self, question: &str) -> bool;

    /// Blocking error notice.
    fn alert(&self, message: &str);
}
