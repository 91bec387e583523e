pub mod analytics;
pub mod claim;
pub mod document;
pub mod enums;
pub mod filters;
pub mod pagination;
pub mod patient;
pub mod user;

pub use analytics::*;
pub use claim::*;
pub use document::*;
pub use enums::*;
pub use filters::*;
pub use pagination::*;
pub use patient::*;
pub use user::*;
