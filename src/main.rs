use clap::Parser;
use fwffr::utils::error::FwfError;
use fwffr::utils::{logger, validation::Validate};
use fwffr::{CliConfig, ConversionEngine, FwfPipeline, LayoutConfig, LocalStorage};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliConfig::parse();

    // 初始化日誌
    if args.json_logs {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("🚀 Starting fwffr");
    tracing::info!("📁 Loading layout from: {}", args.layout);
    tracing::debug!("CLI config: {:?}", args);

    let layout = match LayoutConfig::from_file(&args.layout) {
        Ok(layout) => layout,
        Err(e) => {
            eprintln!("❌ Failed to load layout file '{}'", args.layout);
            exit_with(&e);
        }
    };

    // 驗證配置
    if let Err(e) = layout.validate() {
        tracing::error!("❌ Layout validation failed");
        exit_with(&e);
    }

    let settings = args.resolve(&layout);
    display_layout_summary(&layout, &args, &settings);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No conversion will occur");
        return Ok(());
    }

    let mut parser = match layout.build_parser() {
        Ok(parser) => parser,
        Err(e) => exit_with(&e),
    };
    if args.strict_types {
        parser.options_mut().skip_unknown_types = false;
    }

    let pipeline = FwfPipeline::new(LocalStorage::default(), settings, parser);
    let engine = ConversionEngine::new(pipeline);

    match engine.run().await {
        Ok(summary) => {
            tracing::info!(
                "✅ Converted {} records in {:?}",
                summary.records,
                summary.elapsed
            );
            println!("✅ Converted {} records", summary.records);
            for path in &summary.outputs {
                println!("📁 {}", path);
            }
        }
        Err(e) => exit_with(&e),
    }

    Ok(())
}

fn exit_with(e: &FwfError) -> ! {
    tracing::error!(
        "❌ Conversion failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    std::process::exit(e.severity().exit_code());
}

fn display_layout_summary(
    layout: &LayoutConfig,
    args: &CliConfig,
    settings: &fwffr::ConversionSettings,
) {
    tracing::info!("📋 Layout: {}", layout.layout.name);
    if let Some(description) = &layout.layout.description {
        tracing::info!("   {}", description);
    }

    for (record_type, length) in layout.record_lengths() {
        if record_type.is_empty() {
            tracing::info!("   Record length: {} characters", length);
        } else {
            tracing::info!("   Record type {:?}: {} characters", record_type, length);
        }
    }

    if let Some(separator) = &layout.parser.field_separator {
        tracing::info!("   Field separator: {:?}", separator);
    }
    tracing::info!(
        "   Encoding: {}",
        layout.parser.encoding.unwrap_or_default()
    );
    tracing::info!("   Input: {}", args.input);
    tracing::info!(
        "   Output: {} ({})",
        settings.output_path,
        settings
            .output_formats
            .iter()
            .map(|f| f.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    );
    if settings.compress {
        tracing::info!("   Outputs bundled into {}.zip", settings.basename);
    }
    if args.strict_types {
        tracing::info!("   Unknown record types are errors");
    }
}
