// The Cli selects the scenario to replay.
use clap::{Arg, ArgAction, ColorChoice, Command};
use std::fs::read_to_string;

use crate::setup::Scenario;

const CAMPUS_WALK: &str = include_str!("campus.json");

pub struct Cli {
    scenario: Scenario,
    quiet: bool,
}

impl Cli {
    pub fn new() -> Self {
        let cmd = Command::new("replay")
            .version(env!("CARGO_PKG_VERSION"))
            .about("Replays a recorded walk through the wayfinding engine")
            .arg_required_else_help(false)
            .color(ColorChoice::Always)
            .arg(
                Arg::new("scenario")
                    .short('s')
                    .long("scenario")
                    .action(ArgAction::Set)
                    .required(false)
                    .help("Load JSON scenario (Optional). Replays the campus walk by default."),
            )
            .arg(
                Arg::new("quiet")
                    .short('q')
                    .long("quiet")
                    .action(ArgAction::SetTrue)
                    .help("Only print ticks raising events"),
            );

        let matches = cmd.get_matches();

        let content = match matches.get_one::<String>("scenario") {
            Some(path) => read_to_string(path)
                .unwrap_or_else(|e| panic!("failed to read scenario: {}", e)),
            None => CAMPUS_WALK.to_string(),
        };

        let scenario: Scenario = serde_json::from_str(&content)
            .unwrap_or_else(|e| panic!("failed to parse scenario: {}", e));

        Self {
            scenario,
            quiet: matches.get_flag("quiet"),
        }
    }

    pub fn scenario(&self) -> Scenario {
        self.scenario.clone()
    }

    pub fn quiet(&self) -> bool {
        self.quiet
    }
}
