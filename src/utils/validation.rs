use crate::error::{AppError, AppResult};
use regex::Regex;
use std::sync::OnceLock;

fn template_id_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9_-]{1,64}$").expect("valid template id regex"))
}

fn username_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9_.]{3,32}$").expect("valid username regex"))
}

/// 模板 id 同时用作会话存储的文件名，必须在边界处校验
pub fn validate_template_id(id: &str) -> AppResult<()> {
    if template_id_regex().is_match(id) {
        Ok(())
    } else {
        Err(AppError::ValidationError(format!("Invalid template id: {id}")))
    }
}

pub fn validate_username(username: &str) -> AppResult<()> {
    if username_regex().is_match(username) {
        Ok(())
    } else {
        Err(AppError::ValidationError(
            "Username must be 3-32 characters of letters, digits, '_' or '.'".to_string(),
        ))
    }
}

pub fn validate_template_name(name: &str) -> AppResult<()> {
    let len = name.trim().chars().count();
    if len == 0 || len > 50 {
        return Err(AppError::ValidationError(
            "Template name must be between 1 and 50 characters".to_string(),
        ));
    }
    Ok(())
}
