// ==========================================
// 集成测试公共辅助模块
// ==========================================

#![allow(dead_code)]

#[path = "../test_helpers.rs"]
pub mod test_helpers;

pub mod mock_config;
pub mod notification_sinks;
pub mod test_data_builder;
pub mod test_env;
