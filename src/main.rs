use chrono::Local;
use sogou_harvest::{
    info_time,
    process::{process_site, CategoryRef, DictionaryRef, HarvestPlan},
    CommandConverter, Config, Result,
};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let start_time = Local::now();
    let config = Config::from_current_dir()?;
    let plan = HarvestPlan {
        dictionaries: vec![
            DictionaryRef::new("搜狗标准词库", 11640),
            DictionaryRef::new("计算机词汇大全", 15117),
        ],
        categories: vec![
            CategoryRef::new("城市信息", 360),
            CategoryRef::new("自然科学", 1),
            CategoryRef::new("社会科学", 76),
            CategoryRef::new("工程应用", 96),
            CategoryRef::new("农林渔畜", 127),
            CategoryRef::new("医学医药", 132),
            CategoryRef::new("电子游戏", 436),
            CategoryRef::new("艺术设计", 154),
            CategoryRef::new("生活百科", 389),
            CategoryRef::new("运动休闲", 367),
            CategoryRef::new("人文科学", 31),
            CategoryRef::new("娱乐休闲", 403),
        ],
        recommend_only: true,
    };

    let output = process_site(&config, &plan, &CommandConverter::default()).await?;
    info_time!(start_time, "Full program time, wrote {}", output.display());

    Ok(())
}
