use clap::{Parser, Subcommand};
use mcq_quiz::services::ai_service::{AIService, GeminiSettings};
use mcq_quiz::services::generation_service::GenerationJob;
use mcq_quiz::services::question_service::QuestionService;
use mcq_quiz::{
    config::init_config,
    database::pool::{create_pool, run_migrations},
    router, AppState,
};
use reqwest::Client;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(version, about = "Generate multiple-choice questions from documents and quiz yourself on them")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate questions from one or more documents and save them to the database.
    Generate {
        /// Documents to read (pdf, pptx, csv, txt, md, html, json, xml, py, js, ts, rs).
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Number of questions to generate.
        #[arg(short = 'n', long = "num-questions", default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..))]
        num_questions: u32,
    },
    /// Serve the quiz over HTTP.
    Serve {
        /// Address to bind to. Overrides SERVER_ADDRESS.
        #[arg(short, long)]
        address: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("mcq_quiz=info,tower_http=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    let config = init_config()?;

    match cli.command {
        Command::Generate {
            files,
            num_questions,
        } => {
            // Fail on a missing credential before touching any file.
            let settings = GeminiSettings::from_config(config)?;

            let file_word = if files.len() == 1 { "file" } else { "files" };
            println!(
                "Generating {} MCQs from {} {}:",
                num_questions,
                files.len(),
                file_word
            );
            for file in &files {
                println!("  - {}", file.display());
            }

            let pool = create_pool(&config.database_url).await?;
            run_migrations(&pool).await?;

            let http_client = Client::builder()
                .timeout(settings.timeout)
                .build()?;
            let job = GenerationJob::new(
                AIService::new(settings, http_client),
                QuestionService::new(pool.clone()),
            );
            let report = job.run(&files, num_questions as usize).await?;

            println!(
                "Successfully generated {} questions!",
                report.question_ids.len()
            );
            println!("Questions saved to {}", config.database_url);
            pool.close().await;
        }
        Command::Serve { address } => {
            let pool = create_pool(&config.database_url).await?;
            run_migrations(&pool).await?;

            let state = AppState::new(pool, Duration::from_secs(config.session_ttl_secs));
            let app = router(state);

            let address = address.unwrap_or_else(|| config.server_address.clone());
            let addr: SocketAddr = address.parse()?;
            info!("Server listening on {}", addr);
            let listener = TcpListener::bind(addr).await?;
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}
