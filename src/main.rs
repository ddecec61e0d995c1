use anyhow::{Context, Result};
use clap::Parser;
use keypoint_route::{
    sdk::routing::{RouteCache, RouteResolver, RouteState, RoutingProvider},
    sdk::tour::load_keypoints,
    sdk::util::{log::init_logging, rate_limit::osrm_limiter},
    CancelToken, InputPoint, OrderedPoints, RemoteOsrmProvider, RouterConfig,
};
use std::{fs, path::PathBuf, sync::Arc};

/// Computes the driving route through a tour's keypoints
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// JSON file with a keypoint array or a whole tour
    #[arg(short, long)]
    keypoints: PathBuf,

    /// Route cache shared between runs
    #[arg(long, default_value = "route_cache.json")]
    cache: PathBuf,

    /// Where to write the result (stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write a GeoJSON FeatureCollection instead of the full route state
    #[arg(long)]
    geojson: bool,

    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = RouterConfig::from_env()?;
    log::info!("Routing via {} ({})", config.base_url, config.profile);

    let provider: Arc<dyn RoutingProvider> = Arc::new(RemoteOsrmProvider::new(
        &config,
        osrm_limiter(config.requests_per_minute),
    )?);
    let cache = RouteCache::load_from_file(&cli.cache)
        .with_context(|| format!("Failed to load cache {}", cli.cache.display()))?;
    log::info!("Loaded {} cached routes", cache.len());
    let resolver = RouteResolver::new(provider, cache, config.retry);

    let keypoints = load_keypoints(&cli.keypoints)?;
    let points: Vec<InputPoint> = keypoints.iter().map(InputPoint::from).collect();
    let ordered = OrderedPoints::normalize(&points);
    log::info!(
        "{} keypoints, {} after ordering and de-duplication",
        points.len(),
        ordered.len()
    );

    let state = if ordered.is_routable() {
        match resolver.resolve(&ordered, &CancelToken::detached()).await {
            Ok(route) => {
                log::info!(
                    "Route bounds {:?}{}",
                    route.bounds,
                    if route.from_cache { " (cached)" } else { "" }
                );
                RouteState::resolved(route.segment, route.bounds)
            }
            Err(err) => {
                log::error!("Routing error: {}", err);
                RouteState::failed(&err)
            }
        }
    } else {
        log::warn!("Fewer than two distinct keypoints, nothing to route");
        RouteState::default()
    };

    let json_output = if cli.geojson {
        serde_json::to_string_pretty(&state.feature_collection())?
    } else {
        serde_json::to_string_pretty(&state)?
    };
    match &cli.output {
        Some(path) => {
            fs::write(path, json_output)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            log::info!("Route written to {}", path.display());
        }
        None => println!("{}", json_output),
    }

    resolver
        .cache()
        .save_to_file(&cli.cache)
        .with_context(|| format!("Failed to save cache {}", cli.cache.display()))?;
    log::info!("Cache saved to {}", cli.cache.display());

    Ok(())
}
