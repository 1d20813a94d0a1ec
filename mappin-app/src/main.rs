use anyhow::{anyhow, bail, Context};
use mappin::{
    location::{DeniedLocationProvider, LocationProvider, StaticLocationProvider},
    LatLng, MapSession, SearchOutcome, SessionConfig, SessionEvent, Viewport,
};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

const HELP: &str = "\
commands:
  search <text>              geocode <text> and drop the search marker
  pin                        drop a marker at the viewport center
  tap <lat> <lng>            drop a marker at a point
  select <n>                 select marker #n as listed by `show`
  pan <lat> <lng> [dlat dlng] move the viewport
  show                       print markers, viewport and route
  json                       print the session snapshot as JSON
  tiles                      print tile URLs for the viewport
  help | quit";

#[derive(Debug, PartialEq)]
enum Command {
    Search(String),
    Pin,
    Tap(LatLng),
    Select(usize),
    Pan {
        center: LatLng,
        spans: Option<(f64, f64)>,
    },
    Show,
    Json,
    Tiles,
    Help,
    Quit,
}

fn parse_f64(raw: Option<&str>, what: &str) -> anyhow::Result<f64> {
    let raw = raw.ok_or_else(|| anyhow!("missing {}", what))?;
    raw.parse::<f64>()
        .with_context(|| format!("{} must be a number, got {:?}", what, raw))
}

fn parse_command(line: &str) -> anyhow::Result<Command> {
    let line = line.trim();
    let (word, rest) = line.split_once(' ').unwrap_or((line, ""));
    let mut args = rest.split_whitespace();

    let command = match word {
        "search" => Command::Search(rest.trim().to_string()),
        "pin" => Command::Pin,
        "tap" => Command::Tap(LatLng::new(
            parse_f64(args.next(), "latitude")?,
            parse_f64(args.next(), "longitude")?,
        )),
        "select" => Command::Select(
            args.next()
                .ok_or_else(|| anyhow!("missing marker number"))?
                .parse()
                .context("marker number must be a non-negative integer")?,
        ),
        "pan" => {
            let center = LatLng::new(
                parse_f64(args.next(), "latitude")?,
                parse_f64(args.next(), "longitude")?,
            );
            let spans = match args.next() {
                Some(lat_span) => Some((
                    parse_f64(Some(lat_span), "latitude span")?,
                    parse_f64(args.next(), "longitude span")?,
                )),
                None => None,
            };
            Command::Pan { center, spans }
        }
        "show" => Command::Show,
        "json" => Command::Json,
        "tiles" => Command::Tiles,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => bail!("unknown command {:?}; try `help`", other),
    };
    Ok(command)
}

fn parse_location(raw: &str) -> anyhow::Result<LatLng> {
    let (lat, lng) = raw
        .split_once(',')
        .ok_or_else(|| anyhow!("--location expects <lat>,<lng>"))?;
    Ok(LatLng::new(
        parse_f64(Some(lat.trim()), "latitude")?,
        parse_f64(Some(lng.trim()), "longitude")?,
    ))
}

struct Args {
    config: Option<String>,
    location: Option<LatLng>,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut args = Args {
        config: None,
        location: None,
    };
    let mut argv = std::env::args().skip(1);
    while let Some(arg) = argv.next() {
        match arg.as_str() {
            "--config" => args.config = Some(argv.next().ok_or_else(|| anyhow!("--config needs a path"))?),
            "--location" => {
                let raw = argv.next().ok_or_else(|| anyhow!("--location needs <lat>,<lng>"))?;
                args.location = Some(parse_location(&raw)?);
            }
            "-h" | "--help" => {
                println!("usage: mappin-app [--config <file.json>] [--location <lat>,<lng>]");
                std::process::exit(0);
            }
            other => bail!("unexpected argument {:?}", other),
        }
    }
    Ok(args)
}

fn print_snapshot(session: &MapSession) {
    let snapshot = session.snapshot();
    let viewport = snapshot.viewport;
    println!(
        "viewport: center {} span {:.4} x {:.4}",
        viewport.center, viewport.lat_span, viewport.lng_span
    );
    for (index, (key, marker)) in snapshot.keyed_markers().iter().enumerate() {
        let selected = snapshot
            .selected_marker
            .as_ref()
            .map_or(false, |s| s.same_place(marker));
        println!(
            "  #{:<3} {:<20} {:<24} {}{}",
            index,
            key,
            marker.label(),
            marker.position(),
            if selected { "  *" } else { "" }
        );
    }
    match snapshot.route {
        Some(route) => println!(
            "route: {} -> {} ({:.0} m)",
            route.from, route.to, route.distance_meters
        ),
        None => println!("route: none"),
    }
    println!("{}", snapshot.attribution);
}

async fn run_command(session: &MapSession, command: Command) -> anyhow::Result<bool> {
    match command {
        Command::Search(text) => {
            session.set_query(text);
            match session.submit_search().await {
                SearchOutcome::Found(marker) => println!("found {} at {}", marker.label(), marker.position()),
                SearchOutcome::Skipped => println!("nothing to search for"),
                // notices are printed by the event listener
                _ => {}
            }
        }
        Command::Pin => {
            let marker = session.add_marker_at_viewport_center();
            println!("dropped {} at {}", marker.label(), marker.position());
        }
        Command::Tap(position) => {
            let marker = session.add_marker_at_point(position)?;
            println!("dropped {} at {}", marker.label(), marker.position());
        }
        Command::Select(index) => {
            let marker = session
                .snapshot()
                .markers()
                .into_iter()
                .nth(index)
                .ok_or_else(|| anyhow!("no marker #{}", index))?;
            session.select_marker(marker);
            print_snapshot(session);
        }
        Command::Pan { center, spans } => {
            let current = session.viewport();
            let (lat_span, lng_span) = spans.unwrap_or((current.lat_span, current.lng_span));
            session.on_viewport_changed(Viewport::new(center, lat_span, lng_span)?)?;
        }
        Command::Show => print_snapshot(session),
        Command::Json => println!("{}", serde_json::to_string_pretty(&session.snapshot())?),
        Command::Tiles => {
            for url in session.visible_tile_urls() {
                println!("{}", url);
            }
            println!("{}", session.attribution());
        }
        Command::Help => println!("{}", HELP),
        Command::Quit => return Ok(false),
    }
    Ok(true)
}

/// Terminal map session: stdin commands in, session state out
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = parse_args()?;

    let config = match &args.config {
        Some(path) => SessionConfig::from_file(path).with_context(|| format!("loading {}", path))?,
        None => SessionConfig::default(),
    };
    let locator: Arc<dyn LocationProvider> = match args.location {
        Some(position) => Arc::new(StaticLocationProvider::new(position)),
        None => Arc::new(DeniedLocationProvider),
    };
    let session = Arc::new(MapSession::with_nominatim(config, locator)?);

    let events = session.subscribe();
    std::thread::spawn(move || {
        for event in events.iter() {
            match event {
                SessionEvent::Notice(notice) => println!("! {}", notice),
                other => log::debug!("event {:?}", other),
            }
        }
    });

    session.spawn_initialize()?;
    println!("{}", HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(e) => {
                eprintln!("{:#}", e);
                continue;
            }
        };
        match run_command(&session, command).await {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => eprintln!("{:#}", e),
        }
    }
    Ok(())
}
