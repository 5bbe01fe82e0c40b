use arenagen::tiles::dump::render_text_dump;
use arenagen::tiles::png::save_preview;
use arenagen::{GenerationParams, generate_level};
use clap::Parser;
use log::info;
use std::fs;
use std::path::PathBuf;

/// Генератор арен: комнаты, стены, двери и тени
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Путь к конфигурационному файлу (TOML или JSON)
    #[arg(short, long)]
    config: PathBuf,

    /// Каталог для выходных файлов
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Переопределить сид из конфигурации
    #[arg(short, long)]
    seed: Option<u64>,

    /// Отключить случайность: все розыгрыши берут середину диапазона
    #[arg(long)]
    no_random: bool,

    /// Не сохранять PNG-превью
    #[arg(long)]
    no_preview: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    info!("Загрузка конфигурации {}", cli.config.display());
    let mut params = GenerationParams::from_file(&cli.config)?;
    if let Some(seed) = cli.seed {
        params.seed = seed;
    }
    if cli.no_random {
        params.random_enabled = false;
    }

    let level = generate_level(&params)?;

    fs::create_dir_all(&cli.output_dir)?;
    let output = |ext: &str| cli.output_dir.join(format!("{}.{ext}", level.map_name));

    let report = output("json");
    fs::write(&report, serde_json::to_string_pretty(&level)?)?;
    info!("Отчёт сохранён в {}", report.display());

    let dump = output("txt");
    fs::write(&dump, render_text_dump(&level.grid))?;
    info!("Текстовый дамп сохранён в {}", dump.display());

    if !cli.no_preview {
        let preview = output("png");
        save_preview(&level.grid, &level.styles, &preview)?;
        info!("Превью сохранено в {}", preview.display());
    }

    info!(
        "Готово: карта {}×{}, {} декалей",
        level.grid.width,
        level.grid.height,
        level.decal_count()
    );
    Ok(())
}
