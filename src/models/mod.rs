pub mod common;
pub mod gacha;
pub mod history;
pub mod pagination;
pub mod template;
pub mod user;

pub use common::*;
pub use gacha::*;
pub use history::*;
pub use pagination::*;
pub use template::*;
pub use user::*;
