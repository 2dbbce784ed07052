/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 批次存储文件（对应 potato_batches 槽位）
    pub store_file: String,
    /// 待导入的 TOML 表单目录
    pub inbox_folder: String,
    /// 导入成功后是否保留表单文件
    pub keep_imported: bool,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_file: "potato_batches.json".to_string(),
            inbox_folder: "inbox_toml".to_string(),
            keep_imported: false,
            verbose_logging: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            store_file: std::env::var("POTATO_STORE_FILE").unwrap_or(default.store_file),
            inbox_folder: std::env::var("POTATO_INBOX_FOLDER").unwrap_or(default.inbox_folder),
            keep_imported: std::env::var("POTATO_KEEP_IMPORTED")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.keep_imported),
            verbose_logging: std::env::var("VERBOSE_LOGGING")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.verbose_logging),
        }
    }
}
