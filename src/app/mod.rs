// ==========================================
// 农产品收银系统 - 应用层
// ==========================================
// 职责: 组装仓储/引擎/API，供命令行或界面调用
// ==========================================

pub mod state;

// 重导出
pub use state::{get_default_db_path, AppState};
