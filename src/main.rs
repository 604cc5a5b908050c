use award_finder::apis::nih::NihReporterApi;
use award_finder::apis::nsf::NsfAwardsApi;
use award_finder::cli::SearchArgs;
use award_finder::config::Config;
use award_finder::infra::http_client::ReqwestHttp;
use award_finder::logging;
use award_finder::pipeline::Pipeline;
use award_finder::report;
use award_finder::types::PageRequest;
use clap::Parser;
use tracing::info;

#[derive(Parser)]
#[command(name = "award_finder")]
#[command(
    about = "Search NIH RePORTER and NSF for projects with specified principal investigator and institution criteria."
)]
#[command(version)]
struct Cli {
    #[command(flatten)]
    search: SearchArgs,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load environment variables
    dotenv::dotenv().ok();

    logging::init_logging();

    // Validate before touching the network
    let criteria = cli.search.criteria()?;
    let config = Config::load(cli.search.config.as_deref())?;
    let http = ReqwestHttp::new(&config.http)?;

    let nih = NihReporterApi::new(config.nih.clone(), PageRequest::default());
    let nsf = NsfAwardsApi::new(config.nsf.clone());

    info!(
        first = %criteria.first_name,
        last = %criteria.last_name,
        institutions = criteria.institutions.len(),
        "Searching NIH RePORTER and NSF"
    );
    let result = Pipeline::run_combined(&nih, &nsf, &http, &criteria).await?;

    // The pipeline already logged these; make sure the user sees them regardless of RUST_LOG
    for omitted in &result.omitted {
        eprintln!("⚠️  Section omitted: {}", omitted);
    }

    print!("{}", report::render_report(&result.records()));
    Ok(())
}
