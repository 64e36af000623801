use std::{fs, time::Duration};

use anyhow::Context;
use clap::Parser;
use tracing::info;

use geocenter::{
    cli::{Args, Command},
    locator::Locator,
    providers::{fixed::FixedPosition, geoip::GeoIp, google::GoogleMaps, Position},
    render,
    scene::Scene,
};

type MapsLocator = Locator<GoogleMaps, GoogleMaps, GoogleMaps, Box<dyn Position>>;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(args.log_level())
        .with_target(false)
        .try_init();

    let timeout = Duration::from_secs(args.timeout_secs);
    let position: Box<dyn Position> = match args.position {
        Some(p) => Box::new(FixedPosition::new(p)),
        None => Box::new(GeoIp::new(args.mmdb.clone()).with_ip(args.ip).with_timeout(timeout)),
    };

    let outcome = match &args.command {
        // Needs no map services.
        Command::Whereami => return whereami(&args, position.as_ref()),
        Command::ShowCity { at } => {
            let point = at.point()?;
            locator(&args, timeout, position)?.show_city(point)?
        }
        Command::NearestCity { at } => {
            let point = at.point()?;
            locator(&args, timeout, position)?.nearest_city(point)?
        }
        Command::EarthCenter { at } => {
            let point = at.point()?;
            locator(&args, timeout, position)?.earth_center(point)?
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        println!("{}", outcome.message);
    }
    write_svg(&args, &outcome.scene)
}

fn locator(args: &Args, timeout: Duration, position: Box<dyn Position>) -> anyhow::Result<MapsLocator> {
    let api_key = args
        .api_key
        .clone()
        .context("a Google Maps API key is required (--api-key or GOOGLE_MAPS_API_KEY)")?;
    let maps = GoogleMaps::new(api_key, timeout);
    Ok(Locator::new(maps.clone(), maps.clone(), maps, position).with_search_radius(args.radius))
}

fn whereami(args: &Args, position: &dyn Position) -> anyhow::Result<()> {
    let here = position.current()?;
    let mut scene = Scene::centered(here);
    scene.add_marker(here);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&here)?);
    } else {
        println!("You are at {here}");
    }
    write_svg(args, &scene)
}

fn write_svg(args: &Args, scene: &Scene) -> anyhow::Result<()> {
    let Some(path) = &args.svg else { return Ok(()) };
    let countries = render::load_countries(&args.geojson)?;
    let svg = render::render_svg(scene, &countries);
    fs::write(path, &svg).with_context(|| format!("writing {}", path.display()))?;
    info!("Written {} ({} bytes)", path.display(), svg.len());
    Ok(())
}
