use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use traintrack::config::Config;
use traintrack::db::{self, DbPool};
use traintrack::handlers::{auth, exercises, sessions};
use traintrack::repositories::{
    AuthTokenRepository, ExerciseRepository, SessionRepository, UserRepository,
};
use traintrack::{import, migrations, routes};

#[derive(Parser, Debug)]
#[command(name = "traintrack")]
#[command(about = "Workout tracking server and legacy data import")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (the default when no subcommand is given)
    Serve,
    /// Import a legacy CSV session export for a user
    Import {
        /// Username owning the imported sessions
        #[arg(long)]
        user: String,
        /// Path to the session export CSV
        #[arg(long)]
        sessions: PathBuf,
        /// Path to the exercise reference CSV
        #[arg(long)]
        exercises: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "traintrack=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    tracing::info!("Connecting to database: {}", config.database_url);
    let pool = db::create_pool(&config.database_url)?;

    migrations::run_migrations(&pool)?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config, pool).await,
        Command::Import {
            user,
            sessions,
            exercises,
        } => {
            import::run(&pool, &user, &sessions, &exercises).await?;
            Ok(())
        }
    }
}

async fn serve(config: Config, pool: DbPool) -> anyhow::Result<()> {
    let user_repo = UserRepository::new(pool.clone());
    let token_repo = AuthTokenRepository::new(pool.clone());
    let exercise_repo = ExerciseRepository::new(pool.clone());
    let session_repo = SessionRepository::new(pool.clone());

    let auth_state = auth::AuthState {
        user_repo,
        token_repo: token_repo.clone(),
    };
    let exercises_state = exercises::ExercisesState {
        exercise_repo: exercise_repo.clone(),
    };
    let sessions_state = sessions::SessionsState {
        session_repo,
        exercise_repo,
    };

    let app = routes::create_router(auth_state, exercises_state, sessions_state, token_repo);

    let addr = config.server_addr();
    tracing::info!("Starting server at http://{}", addr);

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
