pub mod ocr_receipt;
pub mod quick_text;

pub use ocr_receipt::{guess_amount, guess_merchant};
pub use quick_text::parse_purchase_text;
