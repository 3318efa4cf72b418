pub mod auth_service;
pub mod gacha_service;
pub mod result_service;
pub mod template_service;

pub use auth_service::*;
pub use gacha_service::*;
pub use result_service::*;
pub use template_service::*;
