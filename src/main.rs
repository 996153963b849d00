// ==========================================
// 农产品收银系统 - 鸡蛋收购命令行入口
// ==========================================
// 用法:
//   egg-collection daily-report [YYYY-MM-DD]
//   egg-collection export START END [ROUTE_ID]
//   egg-collection optimize-route ROUTE_ID
//
// 数据库路径: EGG_COLLECTION_DB_PATH 环境变量，否则为用户数据目录
// ==========================================

use anyhow::{anyhow, bail, Context, Result};
use chrono::Local;

use egg_collection::api::{date_range, parse_date};
use egg_collection::app::{get_default_db_path, AppState};
use egg_collection::logging;

const USAGE: &str = "用法:
  egg-collection daily-report [YYYY-MM-DD]
  egg-collection export START END [ROUTE_ID]
  egg-collection optimize-route ROUTE_ID";

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first() else {
        eprintln!("{}", USAGE);
        bail!("缺少命令");
    };

    tracing::info!("{} v{}", egg_collection::APP_NAME, egg_collection::VERSION);
    let db_path = get_default_db_path();
    let state = AppState::new(db_path).map_err(|e| anyhow!(e))?;

    match command.as_str() {
        "daily-report" => {
            let date = match args.get(1) {
                Some(raw) => parse_date(raw)?,
                None => Local::now().date_naive(),
            };
            let report = state.report_api.daily_report(date).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        "export" => {
            let (Some(start), Some(end)) = (args.get(1), args.get(2)) else {
                eprintln!("{}", USAGE);
                bail!("export 需要 START 与 END 日期");
            };
            let (start, end) = date_range(parse_date(start)?, parse_date(end)?)?;
            let route_id = args.get(3).map(String::as_str);
            let csv = state
                .report_api
                .export_csv(start, end, route_id)
                .context("导出失败")?;
            print!("{}", csv);
        }
        "optimize-route" => {
            let Some(route_id) = args.get(1) else {
                eprintln!("{}", USAGE);
                bail!("optimize-route 需要 ROUTE_ID");
            };
            let route = state.route_api.optimize_route(route_id)?;
            println!("{}", serde_json::to_string_pretty(&route)?);
        }
        other => {
            eprintln!("{}", USAGE);
            bail!("未知命令: {}", other);
        }
    }

    Ok(())
}
