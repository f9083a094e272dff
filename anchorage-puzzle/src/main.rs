use std::{
    fmt::{self, Write as _},
    fs,
    io::{self, BufRead, Write},
    path::PathBuf,
};

use anyhow::{bail, Context};
use clap::{App, Arg, ArgMatches};
use once_cell::sync::Lazy;
use rand::Rng;
use regex::Regex;
use tracing::{info, warn};

use anchorage::{
    fleet::random::random_fleet, AnchorageSize, CannotPlaceReason, Coordinate, FleetDefinition,
    PuzzleSession, VesselId,
};

use crate::{config::PuzzleConfig, fetch::FleetClient};

mod config;
mod fetch;
mod logger;

/// Random positions tried per vessel before `randomize` gives up on it.
const RANDOM_ATTEMPTS: usize = 500;

/// Largest width or height accepted for `--random`.
const MAX_RANDOM_EXTENT: u32 = 1000;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = App::new("Anchorage")
        .version("1.0")
        .author("Zachary Stewart <zachary@zstewart.com>")
        .about("Pack a fleet of vessels into an anchorage.")
        .arg(
            Arg::with_name("config")
                .short("c")
                .long("config")
                .value_name("FILE")
                .help("read settings from a TOML file")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("api_url")
                .long("api-url")
                .value_name("URL")
                .help("base url of the fleet API, overrides the config file")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("fleet_file")
                .short("f")
                .long("fleet-file")
                .value_name("FILE")
                .help("load the fleet from a JSON file instead of the API")
                .takes_value(true)
                .conflicts_with("random"),
        )
        .arg(
            Arg::with_name("random")
                .short("r")
                .long("random")
                .value_name("WxH")
                .help("generate a random fleet for an anchorage of this size instead of using the API")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .help("log debug output"),
        )
        .get_matches();

    logger::init(matches.is_present("verbose"));

    let source = fleet_source(&matches)?;
    let stdin = io::stdin();
    let mut input = InputReader::new(stdin.lock());
    let mut rng = rand::thread_rng();

    let mut session = PuzzleSession::new();
    session.initialize(&source.load(&mut rng).await?);
    play(&source, &mut rng, &mut session, &mut input).await
}

/// Where puzzles come from.
enum FleetSource {
    /// A fleet definition stored as JSON.
    File(PathBuf),
    /// Generated locally for an anchorage of the given size.
    Random(AnchorageSize),
    /// Fetched from the fleet API.
    Api(FleetClient),
}

impl FleetSource {
    /// Produce a fleet for a new puzzle.
    async fn load(&self, rng: &mut impl Rng) -> anyhow::Result<FleetDefinition> {
        match self {
            FleetSource::File(path) => {
                let json = fs::read_to_string(path)
                    .with_context(|| format!("could not read {}", path.display()))?;
                FleetDefinition::from_json(&json)
                    .with_context(|| format!("could not load puzzle from {}", path.display()))
            }
            FleetSource::Random(size) => Ok(random_fleet(rng, *size)),
            FleetSource::Api(client) => client
                .random_fleet()
                .await
                .with_context(|| format!("could not load puzzle from {}", client.url())),
        }
    }
}

/// Choose the [`FleetSource`] from the command line and configuration.
fn fleet_source(matches: &ArgMatches) -> anyhow::Result<FleetSource> {
    if let Some(path) = matches.value_of("fleet_file") {
        return Ok(FleetSource::File(path.into()));
    }
    if let Some(size) = matches.value_of("random") {
        return Ok(FleetSource::Random(parse_random_size(size)?));
    }
    let mut config = match matches.value_of("config") {
        Some(path) => PuzzleConfig::from_file(path)
            .with_context(|| format!("could not load config {}", path))?,
        None => PuzzleConfig::default(),
    };
    config.apply_env();
    if let Some(url) = matches.value_of("api_url") {
        config.api.base_url = url.to_owned();
    }
    let url = config.fleet_url()?;
    info!(%url, "using fleet API");
    Ok(FleetSource::Api(FleetClient::new(url, config.timeout())?))
}

/// Parse an anchorage size written as `WxH`.
fn parse_size(text: &str) -> anyhow::Result<AnchorageSize> {
    static SIZE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"^\s*([0-9]+)\s*[xX]\s*([0-9]+)\s*$").unwrap());
    let captures = match SIZE.captures(text) {
        Some(captures) => captures,
        None => bail!("invalid anchorage size {:?}, expected WxH", text),
    };
    let width = captures[1].parse().context("anchorage width")?;
    let height = captures[2].parse().context("anchorage height")?;
    match AnchorageSize::try_new(width, height) {
        Some(size) => Ok(size),
        None => bail!("anchorage size {} is out of range", text),
    }
}

/// Parse the `--random` size, which is capped so generation stays quick.
fn parse_random_size(text: &str) -> anyhow::Result<AnchorageSize> {
    let size = parse_size(text)?;
    if size.width() > MAX_RANDOM_EXTENT || size.height() > MAX_RANDOM_EXTENT {
        bail!(
            "random anchorage {} is too large, at most {}x{} is supported",
            size,
            MAX_RANDOM_EXTENT,
            MAX_RANDOM_EXTENT
        );
    }
    Ok(size)
}

/// A vessel type named on the command line.
#[derive(Debug, Clone, Eq, PartialEq)]
enum VesselRef {
    /// 1-based position in the vessel list.
    Number(usize),
    /// Designation, matched case-insensitively.
    Name(String),
}

impl fmt::Display for VesselRef {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            VesselRef::Number(n) => write!(f, "#{}", n),
            VesselRef::Name(name) => f.write_str(name),
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
enum Command {
    Place(VesselRef, Coordinate, bool),
    Remove(VesselId),
    Clear,
    Randomize,
    Status,
    New,
    Help,
    Quit,
}

/// Parse one line of player input. On failure returns the message to show.
fn parse_command(line: &str) -> Result<Command, String> {
    /// Matcher for commands with args.
    static PLACE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(
            r"^(?ix)(?:place|put)\s+
        (?P<vessel>.+?)\s+
        (?:(?:at|on|to|->|=>)\s+)?
        (?P<x>-?[0-9]+)(?:\s*,\s*|\s+)(?P<y>-?[0-9]+)
        (?:\s+(?P<rot>rotated|rotate|rot|r))?$",
        )
        .unwrap()
    });
    static REMOVE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(
            r"^(?ix)(?:un-?place|remove|rm)\s+
        (?P<id>\S+)$",
        )
        .unwrap()
    });

    match line.to_ascii_lowercase().as_str() {
        "?" | "help" | "h" => return Ok(Command::Help),
        "randomize" | "rand" | "random" => return Ok(Command::Randomize),
        "clear" => return Ok(Command::Clear),
        "status" | "list" | "ls" => return Ok(Command::Status),
        "new" | "next" => return Ok(Command::New),
        "quit" | "exit" | "q" => return Ok(Command::Quit),
        _ => {}
    }

    if let Some(captures) = PLACE.captures(line) {
        let vessel = captures["vessel"].trim();
        let vessel = match vessel.parse() {
            Ok(n) => VesselRef::Number(n),
            Err(_) => VesselRef::Name(vessel.to_owned()),
        };
        let x = captures["x"]
            .parse()
            .map_err(|_| format!("invalid x: {}", &captures["x"]))?;
        let y = captures["y"]
            .parse()
            .map_err(|_| format!("invalid y: {}", &captures["y"]))?;
        let rotated = captures.name("rot").is_some();
        Ok(Command::Place(vessel, Coordinate::new(x, y), rotated))
    } else if let Some(captures) = REMOVE.captures(line) {
        match &captures["id"] {
            id if id.eq_ignore_ascii_case("all") => Ok(Command::Clear),
            id => Ok(Command::Remove(VesselId::from(id))),
        }
    } else {
        Err(format!("Invalid command \"{}\". Use '?' for help", line))
    }
}

/// Find the catalog index a [`VesselRef`] refers to. Among types sharing a designation,
/// prefers one that still has vessels to place.
fn resolve_vessel(session: &PuzzleSession, vessel: &VesselRef) -> Option<usize> {
    let types = session.vessel_types();
    match vessel {
        VesselRef::Number(n) if *n >= 1 && *n <= types.len() => Some(n - 1),
        VesselRef::Number(_) => None,
        VesselRef::Name(name) => {
            let mut matching = types
                .iter()
                .enumerate()
                .filter(|(_, vt)| vt.designation().eq_ignore_ascii_case(name));
            let first = matching.clone().next().map(|(i, _)| i);
            matching
                .find(|(_, vt)| !vt.exhausted())
                .map(|(i, _)| i)
                .or(first)
        }
    }
}

/// Run commands until the player quits.
async fn play(
    source: &FleetSource,
    rng: &mut impl Rng,
    session: &mut PuzzleSession,
    input: &mut InputReader<impl BufRead>,
) -> anyhow::Result<()> {
    println!();
    println!("Place every vessel in the anchorage. Type help or ? for commands.");
    loop {
        println!();
        print!("{}", render_board(session));
        println!();
        if session.all_vessels_placed() {
            println!("All vessels placed! Type new for another puzzle, or quit.");
        } else {
            print!("{}", render_vessel_list(session));
        }
        println!();

        let cmd = input.read_input(">", |line| match parse_command(line) {
            Ok(cmd) => Some(cmd),
            Err(msg) => {
                println!("{}", msg);
                None
            }
        })?;

        match cmd {
            Command::Place(vessel, origin, rotated) => {
                let index = match resolve_vessel(session, &vessel) {
                    Some(index) => index,
                    None => {
                        println!("Unknown vessel {}. Use status to list vessels.", vessel);
                        continue;
                    }
                };
                match session.place_vessel_of_type(index, origin, rotated) {
                    Ok(placed) => println!("Placed {} as {}.", placed, placed.id()),
                    Err(err) => match err.reason() {
                        CannotPlaceReason::OutOfBounds(_) => {
                            println!("Invalid placement: not enough space in the anchorage.")
                        }
                        CannotPlaceReason::Collision(id) => {
                            println!("Invalid placement: overlaps vessel {}.", id)
                        }
                        CannotPlaceReason::Exhausted => {
                            println!("Every {} is already placed.", err.designation())
                        }
                        _ => println!("{}", err),
                    },
                }
            }
            Command::Remove(id) => match session.remove_vessel(&id) {
                Ok(removed) => println!("Removed {}.", removed),
                Err(err) => println!("{}", err),
            },
            Command::Clear => session.clear_placements(),
            Command::Randomize => {
                let stuck = place_remaining_randomly(rng, session);
                if stuck > 0 {
                    println!("Could not find room for {} vessel(s).", stuck);
                }
            }
            Command::Status => print!("{}", render_placed_list(session)),
            Command::New => match source.load(rng).await {
                Ok(fleet) => session.initialize(&fleet),
                Err(err) => {
                    warn!("{:#}", err);
                    println!("Could not load a new puzzle, keeping the current one.");
                }
            },
            Command::Quit => break,
            Command::Help => {
                println!(
                    "Available Commands:
    place <vessel> <x>,<y> [rotated]  place a vessel with its top-left corner at the given cell.
        <vessel> is a designation or the number shown in the vessel list.
    remove <id>                       remove the placed vessel with the given id (\"all\" clears).
    clear                             remove every placed vessel.
    randomize                         place the remaining vessels at random.
    status                            list placed vessels.
    new                               start a new puzzle.
    quit                              leave the game."
                );
            }
        }
    }
    Ok(())
}

/// Place every remaining vessel at random positions. Returns how many vessels could not
/// be fit.
fn place_remaining_randomly(rng: &mut impl Rng, session: &mut PuzzleSession) -> u32 {
    let size = match session.anchorage_size() {
        Some(size) => size,
        None => return 0,
    };
    let mut stuck = 0;
    for index in 0..session.vessel_types().len() {
        while session.vessel_types()[index].remaining_count() > 0 {
            let placed = (0..RANDOM_ATTEMPTS).any(|_| {
                let origin = Coordinate::new(
                    rng.gen_range(0, size.width() as i32),
                    rng.gen_range(0, size.height() as i32),
                );
                session
                    .place_vessel_of_type(index, origin, rng.gen())
                    .is_ok()
            });
            if !placed {
                stuck += session.vessel_types()[index].remaining_count();
                break;
            }
        }
    }
    stuck
}

/// Cell of the rendered anchorage.
enum BoardCell<'a> {
    Empty,
    Vessel(&'a VesselId),
}

impl fmt::Display for BoardCell<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BoardCell::Empty => f.pad("~~"),
            BoardCell::Vessel(id) => fmt::Display::fmt(id, f),
        }
    }
}

/// Render the anchorage as a grid, showing the id of the vessel in each occupied cell.
fn render_board(session: &PuzzleSession) -> String {
    let mut out = String::new();
    let size = match session.anchorage_size() {
        Some(size) => size,
        None => return out,
    };
    out.push_str("    ");
    for i in 0..size.width() {
        let _ = write!(out, "{:^4}", i);
    }
    out.push('\n');
    for (i, row) in size.rows().enumerate() {
        let _ = write!(out, "{:>3} ", i);
        for coord in row {
            let cell = match session.vessel_at(coord) {
                Some(vessel) => BoardCell::Vessel(vessel.id()),
                None => BoardCell::Empty,
            };
            let _ = write!(out, "{:^4}", cell);
        }
        out.push('\n');
    }
    out
}

/// Render the numbered vessel list with remaining counts.
fn render_vessel_list(session: &PuzzleSession) -> String {
    let mut out = String::new();
    let progress = session.progress();
    let _ = writeln!(out, "Vessels ({}):", progress);
    for (i, vt) in session.vessel_types().iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>3}. {:<32} {:>6}  {} of {} left",
            i + 1,
            vt.designation(),
            vt.dimensions().to_string(),
            vt.remaining_count(),
            vt.required_count()
        );
    }
    out
}

/// Render the placed vessels with their ids.
fn render_placed_list(session: &PuzzleSession) -> String {
    let mut out = String::new();
    if session.placed_vessels().is_empty() {
        out.push_str("No vessels placed.\n");
    }
    for vessel in session.placed_vessels() {
        let rotated = if vessel.is_rotated() { " (rotated)" } else { "" };
        let _ = writeln!(out, "{:>5}  {}{}", vessel.id(), vessel, rotated);
    }
    out
}

/// Helper to read input from the player.
struct InputReader<B> {
    read: B,
    buf: String,
}

impl<B> InputReader<B> {
    fn new(read: B) -> Self {
        Self {
            read,
            buf: String::new(),
        }
    }
}

impl<B: BufRead> InputReader<B> {
    /// Repeatedly tries to read input until the input checker returns `Some`.
    fn read_input<F, T>(&mut self, prompt: &str, mut checker: F) -> io::Result<T>
    where
        F: FnMut(&str) -> Option<T>,
    {
        loop {
            self.read_input_inner(prompt)?;
            if let Some(val) = checker(self.buf.trim()) {
                return Ok(val);
            }
        }
    }

    /// Helper to print the prompt, clear the string buffer and read a line.
    fn read_input_inner(&mut self, prompt: &str) -> io::Result<()> {
        print!("{} ", prompt);
        io::stdout().flush()?;
        self.buf.clear();
        if self.read.read_line(&mut self.buf)? == 0 {
            println!();
            std::process::exit(0);
        }
        Ok(())
    }
}
