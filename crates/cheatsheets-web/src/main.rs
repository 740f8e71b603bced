#[cfg(feature = "ssr")]
mod server {
    use anyhow::{Context, Result, bail};
    use axum::Router;
    use clap::Parser;
    use leptos::prelude::*;
    use leptos_axum::{LeptosRoutes, generate_route_list};
    use std::path::PathBuf;
    use tower_http::compression::CompressionLayer;
    use tower_http::services::ServeDir;
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    use cheatsheets_web::app::{App, shell};
    use cheatsheets_web::config::{CONFIG, SiteConfig};
    use cheatsheets_web::content::{ContentStore, init_store};

    #[derive(Debug, Parser)]
    #[command(about, version)]
    pub struct Args {
        /// Directory holding the markdown pages.
        #[arg(long, env = "CONTENT_DIR", default_value = "docs")]
        content_dir: PathBuf,

        /// Validate the site config against the content directory and exit.
        #[arg(long)]
        check: bool,

        /// Site config to validate with `--check` instead of the bundled one.
        #[arg(long, value_name = "path", requires = "check")]
        site_config: Option<PathBuf>,
    }

    pub fn init_tracing() {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        tracing_subscriber::registry().with(fmt::layer().compact()).with(filter).init();
    }

    /// Log every config issue and missing page; fail if there were any.
    fn check(args: &Args) -> Result<()> {
        let config = match &args.site_config {
            Some(path) => SiteConfig::load(path)?,
            None => SiteConfig::bundled()?,
        };
        let store = ContentStore::open(&args.content_dir, &config)
            .with_context(|| format!("Failed to open content directory {}", args.content_dir.display()))?;

        let issues = config.validate();
        for issue in &issues {
            tracing::warn!("{issue}");
        }
        for route in store.missing() {
            tracing::warn!(route = %route, "linked page has no markdown file");
        }

        let problems = issues.len() + store.missing().len();
        if problems > 0 {
            bail!("{problems} problem(s) found");
        }
        tracing::info!(sections = store.index().len(), "site config and content look good");
        Ok(())
    }

    pub async fn run(args: Args) -> Result<()> {
        if args.check {
            return check(&args);
        }

        for issue in CONFIG.validate() {
            tracing::warn!("site config: {issue}");
        }

        let store = ContentStore::open(&args.content_dir, &CONFIG)
            .with_context(|| format!("Failed to open content directory {}", args.content_dir.display()))?;
        for route in store.missing() {
            tracing::warn!(route = %route, "linked page has no markdown file");
        }
        init_store(store)?;

        let conf = get_configuration(None).context("Failed to load Leptos configuration")?;
        let leptos_options = conf.leptos_options;
        let addr = leptos_options.site_addr;
        let routes = generate_route_list(App);

        let site_root = leptos_options.site_root.clone();
        let app = Router::new()
            .leptos_routes(&leptos_options, routes, {
                let leptos_options = leptos_options.clone();
                move || shell(leptos_options.clone())
            })
            .fallback_service(ServeDir::new(&*site_root))
            .layer(CompressionLayer::new())
            .with_state(leptos_options);

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind to {addr}"))?;

        tracing::info!("Listening on http://{addr}");
        axum::serve(listener, app).await.context("Server error")?;

        Ok(())
    }
}

#[cfg(feature = "ssr")]
#[tokio::main]
async fn main() {
    use clap::Parser;

    server::init_tracing();
    let args = server::Args::parse();

    if let Err(err) = server::run(args).await {
        tracing::error!("{err:?}");
        std::process::exit(1);
    }
}

#[cfg(not(feature = "ssr"))]
fn main() {
    // The browser entry point is `hydrate` in lib.rs.
}
