mod classifier_choice;
mod request;
mod schema;
mod ui_choice;

pub use classifier_choice::*;
pub use request::ClassificationRequest;
pub use schema::*;
pub use ui_choice::UIChoice;
