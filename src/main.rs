use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use vocab_deck::utils::logging;
use vocab_deck::{App, CardModel, Config};

/// 从在线词典抓取单词并生成 Anki 卡组
#[derive(Parser, Debug)]
#[command(name = "vocab_deck", version, about)]
struct Cli {
    /// TOML 配置文件
    #[arg(short, long, global = true, env = "VOCAB_DECK_CONFIG")]
    config: Option<PathBuf>,

    /// 输出调试日志
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 抓取单词列表，生成卡片 CSV 和发音文件
    Scrape(ScrapeArgs),
    /// 把卡片 CSV 打包成 .apkg
    Deck(DeckArgs),
    /// 抓取后立即打包
    Run {
        #[command(flatten)]
        scrape: ScrapeArgs,
        #[command(flatten)]
        package: PackageArgs,
    },
}

#[derive(Args, Debug)]
struct ScrapeArgs {
    /// 单词列表 CSV
    #[arg(short, long)]
    input: Option<PathBuf>,
    /// 卡片 CSV 输出路径
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// 发音文件目录
    #[arg(long)]
    audio_dir: Option<PathBuf>,
    #[arg(long)]
    no_collocations: bool,
    #[arg(long)]
    no_synonyms: bool,
    /// 保留美式词典部分
    #[arg(long)]
    include_american: bool,
}

#[derive(Args, Debug)]
struct DeckArgs {
    /// 卡片 CSV
    #[arg(long)]
    csv: Option<PathBuf>,
    #[command(flatten)]
    package: PackageArgs,
}

#[derive(Args, Debug)]
struct PackageArgs {
    /// 输出的 .apkg 文件
    #[arg(long)]
    deck_file: Option<PathBuf>,
    #[arg(long)]
    deck_name: Option<String>,
    #[arg(long)]
    deck_id: Option<i64>,
    /// basic | basic_audio
    #[arg(long)]
    card_model: Option<CardModel>,
    /// 发音文件目录（打包时读取）
    #[arg(long = "media-dir")]
    media_dir: Option<PathBuf>,
}

impl ScrapeArgs {
    fn apply(&self, config: &mut Config) {
        if let Some(v) = &self.input {
            config.input_csv = v.clone();
        }
        if let Some(v) = &self.output {
            config.output_csv = v.clone();
        }
        if let Some(v) = &self.audio_dir {
            config.audio_dir = v.clone();
        }
        if self.no_collocations {
            config.with_collocations = false;
        }
        if self.no_synonyms {
            config.with_synonyms = false;
        }
        if self.include_american {
            config.skip_american = false;
        }
    }
}

impl DeckArgs {
    fn apply(&self, config: &mut Config) {
        if let Some(v) = &self.csv {
            config.output_csv = v.clone();
        }
        self.package.apply(config);
    }
}

impl PackageArgs {
    fn apply(&self, config: &mut Config) {
        if let Some(v) = &self.deck_file {
            config.deck_file = v.clone();
        }
        if let Some(v) = &self.deck_name {
            config.deck_name = v.clone();
        }
        if let Some(v) = self.deck_id {
            config.deck_id = Some(v);
        }
        if let Some(v) = self.card_model {
            config.card_model = v;
        }
        if let Some(v) = &self.media_dir {
            config.audio_dir = v.clone();
        }
    }
}

/// 配置优先级：命令行 > 环境变量 > 配置文件 > 默认值
fn load_config(cli: &Cli) -> Result<Config> {
    let base = match &cli.config {
        Some(path) => Config::from_toml_file(path)?,
        None => Config::default(),
    };
    let mut config = base.with_env_overrides()?;

    match &cli.command {
        Command::Scrape(args) => args.apply(&mut config),
        Command::Deck(args) => args.apply(&mut config),
        Command::Run { scrape, package } => {
            scrape.apply(&mut config);
            package.apply(&mut config);
        }
    }
    if cli.verbose {
        config.verbose_logging = true;
    }
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 加载配置
    let config = load_config(&cli)?;

    // 初始化日志
    logging::init(config.verbose_logging);

    let app = App::new(config);
    match cli.command {
        Command::Scrape(_) => {
            app.scrape().await?;
        }
        Command::Deck(_) => {
            app.deck().await?;
        }
        Command::Run { .. } => {
            app.run().await?;
        }
    }

    Ok(())
}
