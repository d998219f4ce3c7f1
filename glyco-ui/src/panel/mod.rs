// Panels of the prediction window.

pub mod form;
pub mod result;

pub use form::{show_form, FormAction};
pub use result::{show_result, EguiClipboard};
