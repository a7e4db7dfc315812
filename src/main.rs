use clap::Parser;
use smartmatch::{
    bedrock, gemini,
    logger::{self, LogLevel, LoggerConfig},
    Config, GeneratedResult, GenerationPipeline, GenerationSession, GenerationStatus,
    ModelCatalog, ProviderKind, Style,
};
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser, Debug)]
#[command(
    name = "smartmatch",
    version,
    about = "Generate an image that matches a headline, slogan or piece of copy"
)]
struct Cli {
    /// Headline, slogan or copy to illustrate
    #[arg(required_unless_present_any = ["list_styles", "list_models"])]
    text: Option<String>,

    /// Visual style (auto, photographic, cinematic, anime, 3d-render, watercolor, minimalist, cyberpunk)
    #[arg(short, long, default_value = "auto")]
    style: Style,

    /// Back end to use; overrides SMARTMATCH_PROVIDER
    #[arg(short, long)]
    provider: Option<ProviderKind>,

    /// Directory the image is written to
    #[arg(short, long, default_value = ".")]
    out: PathBuf,

    /// Debug logging, including request payloads
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs and the final summary as JSON
    #[arg(long)]
    json: bool,

    #[arg(long)]
    list_styles: bool,

    #[arg(long)]
    list_models: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv_loaded = dotenv::dotenv().is_ok();
    let cli = Cli::parse();

    let logger_config = if cli.json {
        LoggerConfig::production()
    } else if cli.verbose {
        LoggerConfig::development()
    } else {
        LoggerConfig::default()
    };
    let logger_config = if cli.verbose {
        logger_config.with_level(LogLevel::Debug)
    } else {
        logger_config.with_level(LogLevel::Warn)
    };
    logger::init_with_config(logger_config)?;

    if dotenv_loaded {
        log::info!("✅ .env file loaded");
    } else {
        log::debug!("No .env file found, using system environment variables");
    }

    if cli.list_styles {
        for style in Style::ALL {
            println!(
                "{:<14} {:<18} {}",
                style.id(),
                style.label(),
                style.directive().unwrap_or("chosen by the prompt optimizer")
            );
        }
    }
    if cli.list_models {
        print_models();
    }
    let Some(text) = cli.text.as_deref() else {
        return Ok(());
    };

    let config = match cli.provider {
        Some(provider) => Config::for_provider_from_env(provider),
        None => Config::from_env()?,
    };
    logger::log_startup_info("smartmatch", env!("CARGO_PKG_VERSION"), &config);

    let pipeline = GenerationPipeline::from_config(&config).await?;
    let session = GenerationSession::new(pipeline);
    let mut status_rx = session.subscribe();

    let generation = session.generate(text, cli.style);
    tokio::pin!(generation);
    let outcome = loop {
        tokio::select! {
            outcome = &mut generation => break outcome,
            Ok(status) = status_rx.recv() => report_status(status, cli.json),
        }
    };
    while let Ok(status) = status_rx.try_recv() {
        report_status(status, cli.json);
    }

    let result = match outcome {
        Ok(result) => result,
        Err(e) => {
            let message = session
                .error()
                .map(|error| error.message)
                .unwrap_or_else(|| e.to_string());
            log::debug!("Generation failed: {}", e);
            eprintln!("❌ {}", message);
            process::exit(1);
        }
    };

    let path = result.save_to(&cli.out).await?;
    print_summary(&result, &path, cli.json)?;
    Ok(())
}

fn report_status(status: GenerationStatus, json: bool) {
    if json {
        return;
    }
    match status {
        GenerationStatus::Optimizing => eprintln!("🔍 Analyzing text and writing a visual prompt..."),
        GenerationStatus::Generating => eprintln!("🎨 Generating image..."),
        GenerationStatus::Success => eprintln!("✅ Done"),
        GenerationStatus::Idle | GenerationStatus::Error => {}
    }
}

fn print_summary(
    result: &GeneratedResult,
    path: &Path,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        let summary = serde_json::json!({
            "originalText": result.original_text,
            "optimizedPrompt": result.optimized_prompt,
            "style": result.style,
            "timestamp": result.timestamp,
            "file": path.display().to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("Text:   {}", result.original_text);
        println!("Style:  {}", result.style.label());
        println!("Prompt: {}", result.optimized_prompt);
        println!("Image:  {}", path.display());
    }
    Ok(())
}

fn print_models() {
    let groups = [
        ("Gemini text", gemini::TextClient::supported_models()),
        ("Gemini image", gemini::ImageClient::supported_models()),
        ("Bedrock text", bedrock::TextClient::supported_models()),
        ("Bedrock image", bedrock::ImageClient::supported_models()),
    ];
    for (title, models) in groups {
        println!("{}:", title);
        for model in models {
            println!(
                "  {:<45} {} ({})",
                model.id,
                model.name,
                model.provider.as_str()
            );
        }
    }
}
