use anyhow::Result;
use clap::Parser;
use metrics_exporter_prometheus::PrometheusHandle;
use spamscan_classifiers::PredictionService;
use spamscan_web::cli::{Cli, Commands};
use spamscan_web::config::AppConfig;
use spamscan_web::server::run_server;
use spamscan_web::shell::{CheckOutcome, Shell};
use spamscan_web::state::AppState;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = AppConfig::load(&cli.config, &cli)?;
    info!("Vectorizer: {:?}", config.classifiers.artifacts.vectorizer);
    info!("Classifier: {:?}", config.classifiers.artifacts.classifier);

    match cli.command {
        Commands::Serve { .. } => {
            let metrics_handle = init_metrics()?;
            let service = load_service(&config).await?;
            let state = AppState::new(service).with_metrics(metrics_handle);

            let addr = config.server.socket_addr()?;
            println!();
            println!("  SpamScan - email spam detection");
            println!();
            println!("  Open http://{} in your browser", addr);
            println!();

            run_server(state, addr).await?;
        }

        Commands::Check { text } => {
            let service = load_service(&config).await?;

            let shell = Shell::detecting(text);
            let outcome = tokio::task::spawn_blocking(move || shell.check(service.as_ref())).await?;

            for message in outcome.messages() {
                println!("{}", message);
            }
            if let CheckOutcome::Failed(_) = outcome {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

/// Bootstrap the tokenizer resource and load the artifacts.
///
/// Missing or corrupt artifacts abort startup.
async fn load_service(config: &AppConfig) -> Result<Arc<PredictionService>> {
    let classifiers = config.classifiers.clone();
    let service =
        tokio::task::spawn_blocking(move || PredictionService::from_config(&classifiers)).await??;
    info!("Prediction service ready");
    Ok(Arc::new(service))
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        "spamscan=debug,spamscan_web=debug,spamscan_classifiers=debug,tower_http=debug"
    } else {
        "spamscan=info,spamscan_web=info,spamscan_classifiers=info,tower_http=warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Install the Prometheus recorder and return handle for rendering
fn init_metrics() -> Result<PrometheusHandle> {
    use metrics_exporter_prometheus::PrometheusBuilder;

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics: {}", e))?;

    metrics::describe_counter!(
        "spamscan_predictions_total",
        "Total number of predictions by label"
    );
    metrics::describe_counter!(
        "spamscan_prediction_errors_total",
        "Total number of failed predictions by error kind"
    );
    metrics::describe_counter!(
        "spamscan_checks_total",
        "Total number of web checks by outcome"
    );

    info!("Metrics exporter initialized");
    Ok(handle)
}
