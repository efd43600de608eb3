use cinema_client::domain::auth::LoginRequest;
use cinema_client::infrastructure::config::{Config, LogFormat};
use cinema_client::infrastructure::navigation::Navigator;
use cinema_client::ClientApp;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const USAGE: &str = "usage: cinema-client <navigate PATH | get API_PATH | login EMAIL PASSWORD | logout>";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(api = %config.api_base_url, "Starting cinema client");

    let app = ClientApp::build(config)?;
    let args: Vec<String> = std::env::args().skip(1).collect();

    match args.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        ["navigate", path] => {
            let decision = app.navigation.navigate(path);
            println!("{:?} -> {}", decision, app.navigator.current());
        }
        ["get", path] => {
            let body: serde_json::Value = app.http.get(path).await?;
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        ["login", email, password] => {
            let landing = app
                .session
                .login(&LoginRequest {
                    email: email.to_string(),
                    password: password.to_string(),
                })
                .await?;
            println!("logged in, landing on {}", landing);
        }
        ["logout"] => {
            app.session.logout()?;
            println!("logged out");
        }
        _ => {
            eprintln!("{}", USAGE);
            std::process::exit(2);
        }
    }

    Ok(())
}

fn init_logging(config: &Config) {
    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "cinema_client=info".into()),
            )
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "cinema_client=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
