mod generate;
mod pdf;

pub use generate::run_generate;
pub use pdf::run_pdf;
