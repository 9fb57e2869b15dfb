use instance_ranker::cli::Cli;
use instance_ranker::config::loader::MAX_TIMEOUT_MS;
use instance_ranker::config::Config;
use instance_ranker::core::get_debug_logger;
use instance_ranker::core::io::{load_targets, write_snapshot, ConsoleReporter};
use instance_ranker::core::probe::{
    FleetRunner, InstanceEvaluator, InstanceProber, IsahcProbeClient,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    main_impl().await
}

async fn main_impl() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse_args();

    // Handle configuration commands
    if cli.init {
        let path = Config::init()?;
        println!("Wrote default configuration to {}", path.display());
        return Ok(());
    }

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    // CLI flags win over the config file
    if let Some(timeout_ms) = cli.timeout_ms {
        config.probe.timeout_ms = timeout_ms.min(MAX_TIMEOUT_MS);
    }
    if let Some(concurrency) = cli.concurrency {
        config.probe.max_concurrency = concurrency;
    }
    if let Some(targets) = cli.targets {
        config.paths.targets = targets;
    }
    if let Some(output) = cli.output {
        config.paths.output = output;
    }

    if cli.print {
        config.print()?;
        return Ok(());
    }

    config.check()?;
    if cli.check {
        println!("✓ Configuration valid");
        return Ok(());
    }

    // Missing or unreadable target list: no probing, no output
    let targets = match load_targets(&config.paths.targets).await {
        Ok(targets) => targets,
        Err(e) => {
            get_debug_logger().error("main", "targets_unavailable", &e.to_string());
            eprintln!("CRITICAL: {}", e);
            std::process::exit(1);
        }
    };

    let prober = InstanceProber::new(Box::new(IsahcProbeClient::new()?));
    let evaluator = InstanceEvaluator::new(prober)
        .with_selector(config.strategy_selector())
        .with_policy(config.scoring.clone())
        .with_timeout_ms(config.probe.timeout_ms);
    let runner = FleetRunner::new(evaluator).with_max_concurrency(config.probe.max_concurrency);

    let mut reporter = ConsoleReporter::new(targets.len(), cli.quiet);
    reporter.run_started(runner.max_concurrency(), config.probe.timeout_ms);

    let snapshot = runner
        .run_with_progress(&targets, |evaluation| reporter.target_evaluated(evaluation))
        .await;

    if let Err(e) = write_snapshot(&config.paths.output, &snapshot).await {
        runner
            .logger()
            .error("main", "snapshot_write_failed", &e.to_string());
        return Err(e.into());
    }
    reporter.run_finished(&snapshot, &config.paths.output);

    Ok(())
}
