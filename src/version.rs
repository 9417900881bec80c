//! 版本信息

/// 包版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 构建时注入的提交哈希
pub const COMMIT: Option<&str> = option_env!("PRW_COMMIT");

/// `prw version X`，提交已知时附加 ` (abcdef1)`
pub fn version_string(version: &str, commit: Option<&str>) -> String {
    match commit.map(str::trim) {
        Some(c) if !c.is_empty() && c != "unknown" => {
            let short: String = c.chars().take(7).collect();
            format!("prw version {} ({})", version, short)
        }
        _ => format!("prw version {}", version),
    }
}

/// 当前构建的版本字符串
pub fn version() -> String {
    version_string(VERSION, COMMIT)
}
