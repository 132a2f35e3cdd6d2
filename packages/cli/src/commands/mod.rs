pub mod export_html;
pub mod progress;
pub mod validate;

pub use export_html::ExportHtmlArgs;
pub use progress::ProgressArgs;
pub use validate::ValidateArgs;
