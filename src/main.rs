use clap::Parser;
use partners_etl::utils::error::{EtlError, ErrorSeverity};
use partners_etl::utils::{logger, validation::Validate};
use partners_etl::{
    CheckStatus, CliArgs, ConnectionProbe, EtlEngine, LocalStorage, PartnersClient,
    PartnersPipeline, StreamCatalog, TomlConfig,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    // 初始化日誌
    if args.json_logs {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("🚀 Starting partners-etl");
    tracing::info!("📁 Loading configuration from: {}", args.config);

    // 載入 TOML 配置
    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 應用命令列覆蓋設定
    if !args.streams.is_empty() {
        tracing::info!("🔧 Streams overridden to: {}", args.streams.join(", "));
        config.extract.streams = Some(args.streams.clone());
    }

    // 驗證配置；不寫檔的指令只需要 [connector]
    let validated = if args.list_streams || args.check {
        config.validate_connector()
    } else {
        config.validate()
    };
    if let Err(e) = validated {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!("✅ Configuration loaded and validated successfully");

    if args.list_streams {
        list_streams(&config);
        return Ok(());
    }

    if args.dry_run && !args.check {
        tracing::info!("🔍 DRY RUN MODE - No API calls will be made");
        perform_dry_run(&config);
        return Ok(());
    }

    let transport = PartnersClient::new(&config.connector);

    if args.check {
        let status = ConnectionProbe::check(&config.connector, &transport).await;
        println!("{}", serde_json::to_string(&status)?);
        if let CheckStatus::Failed { reason } = status {
            eprintln!("❌ {}", reason);
            std::process::exit(1);
        }
        println!("✅ Connection check succeeded");
        return Ok(());
    }

    // 創建存儲和管道
    let storage = LocalStorage::new(config.output_path());
    let pipeline = PartnersPipeline::new(storage, transport, config);
    let engine = EtlEngine::new(pipeline);

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ Sync completed successfully!");
            println!("✅ Sync completed successfully!");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => exit_with(e),
    }

    Ok(())
}

fn exit_with(e: EtlError) -> ! {
    // 記錄詳細錯誤信息
    tracing::error!(
        "❌ Sync failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 建議: {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::Low => 1,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}

fn list_streams(config: &TomlConfig) {
    println!("📋 Streams ({} layout):", format_layout(config));
    for stream in StreamCatalog::list_streams(&config.connector) {
        println!(
            "  {:<40} {:<45} {:<22} pk={}",
            stream.name,
            stream.target.to_string(),
            stream.shape.to_string(),
            stream.primary_key.unwrap_or("-")
        );
    }
}

fn perform_dry_run(config: &TomlConfig) {
    let connector = &config.connector;
    let streams = StreamCatalog::select(connector, config.selected_streams());

    println!("📋 Configuration Summary:");
    println!("  Endpoint: {}", connector.endpoint());
    println!("  App: {}", connector.app_gid());
    println!("  Page size: {}", connector.num_results_per_call);
    println!("  Layout: {}", format_layout(config));
    println!("  Output: {}", config.output_path());
    if let Some(archive) = config.archive_name() {
        println!("  Archive: {}", archive);
    }
    println!("  Streams ({}):", streams.len());
    for stream in &streams {
        println!("    - {} ({})", stream.name, stream.target);
    }
}

fn format_layout(config: &TomlConfig) -> &'static str {
    match config.connector.record_layout {
        partners_etl::RecordLayout::Flat => "flat",
        partners_etl::RecordLayout::Nested => "nested",
    }
}
