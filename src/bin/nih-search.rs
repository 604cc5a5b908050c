use award_finder::apis::nih::NihReporterApi;
use award_finder::cli::{PageArgs, SearchArgs};
use award_finder::config::Config;
use award_finder::infra::http_client::ReqwestHttp;
use award_finder::logging;
use award_finder::pipeline::Pipeline;
use award_finder::report;
use clap::Parser;
use tracing::info;

#[derive(Parser)]
#[command(name = "nih-search")]
#[command(
    about = "Search NIH RePORTER for projects with specified principal investigator and institution criteria."
)]
#[command(version)]
struct Cli {
    #[command(flatten)]
    search: SearchArgs,

    #[command(flatten)]
    page: PageArgs,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    dotenv::dotenv().ok();
    logging::init_logging();

    let criteria = cli.search.criteria()?;
    let config = Config::load(cli.search.config.as_deref())?;
    let http = ReqwestHttp::new(&config.http)?;
    let api = NihReporterApi::new(config.nih.clone(), cli.page.into());

    info!(
        offset = cli.page.offset,
        limit = cli.page.limit,
        "Searching NIH RePORTER"
    );
    let result = Pipeline::run_nih(&api, &http, &criteria).await?;

    print!("{}", report::render_report(&result.records));
    Ok(())
}
