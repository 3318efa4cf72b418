pub mod gacha_results;
pub mod gacha_templates;
pub mod users;

pub use gacha_results as gacha_result_entity;
pub use gacha_templates as gacha_template_entity;
pub use users as user_entity;
