use anyhow::Result;
use clap::{Arg, ArgAction, Command};

use lpm::commands;
use lpm::commands::monitor::MonitorOptions;

fn pid_arg() -> Arg {
    Arg::new("pid")
        .help("Target process ID")
        .required(true)
        .value_parser(clap::value_parser!(u32))
        .index(1)
}

fn sort_arg() -> Arg {
    Arg::new("sort")
        .short('s')
        .long("sort")
        .value_name("KEY")
        .help("Sort descending by CPU time or memory")
        .value_parser(["cpu", "memory", "mem"])
}

fn build_cli() -> Command {
    Command::new("lpm")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Linux process monitor and manager")
        .subcommand(
            Command::new("monitor")
                .about("Live process monitor (default command)")
                .arg(
                    Arg::new("interval")
                        .short('i')
                        .long("interval")
                        .value_name("SECONDS")
                        .help("Seconds between samples (overrides config)")
                        .value_parser(clap::value_parser!(u64).range(1..)),
                )
                .arg(sort_arg())
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Stream samples as JSON lines instead of the TUI")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("list")
                .about("Print a filtered, sorted process table once")
                .arg(
                    Arg::new("query")
                        .short('q')
                        .long("query")
                        .value_name("TEXT")
                        .help("Filter text (name substring or exact PID)"),
                )
                .arg(
                    Arg::new("by")
                        .long("by")
                        .value_name("FIELD")
                        .help("Field the query matches")
                        .value_parser(["name", "pid"])
                        .default_value("name"),
                )
                .arg(
                    Arg::new("min-cpu")
                        .long("min-cpu")
                        .value_name("SECONDS")
                        .help("Only processes with at least this much CPU time")
                        .value_parser(commands::list::parse_threshold),
                )
                .arg(
                    Arg::new("min-mem")
                        .long("min-mem")
                        .value_name("MB")
                        .help("Only processes with at least this much resident memory")
                        .value_parser(commands::list::parse_threshold),
                )
                .arg(sort_arg())
                .arg(
                    Arg::new("limit")
                        .short('n')
                        .long("limit")
                        .value_name("N")
                        .help("Show at most N processes")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Print JSON instead of a table")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("kill")
                .about("Kill a process immediately (SIGKILL)")
                .arg(pid_arg())
                .arg(
                    Arg::new("yes")
                        .short('y')
                        .long("yes")
                        .help("Skip the confirmation prompt")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("renice")
                .about("Set the nice value of every thread of a process")
                .arg(pid_arg())
                .arg(
                    Arg::new("nice")
                        .help("Nice value, -20 (highest priority) to 19")
                        .required(true)
                        .allow_negative_numbers(true)
                        .value_parser(clap::value_parser!(i32))
                        .index(2),
                ),
        )
        .subcommand(
            Command::new("stop")
                .about("Suspend a process (SIGSTOP)")
                .arg(pid_arg()),
        )
        .subcommand(
            Command::new("cont")
                .about("Resume a suspended process (SIGCONT)")
                .arg(pid_arg()),
        )
        .subcommand(
            Command::new("config")
                .about("Show or change saved settings (use 'lpm config --help' for subcommands)")
                .subcommand_required(true)
                .arg_required_else_help(true)
                .subcommand(Command::new("show").about("Print the current settings"))
                .subcommand(Command::new("reset").about("Restore default settings"))
                .subcommand(
                    Command::new("set")
                        .about("Change one setting")
                        .arg(
                            Arg::new("key")
                                .help("Setting to change")
                                .required(true)
                                .value_parser(["interval", "sort", "theme", "history"])
                                .index(1),
                        )
                        .arg(
                            Arg::new("value")
                                .help("New value (history accepts a count or 'unbounded')")
                                .required(true)
                                .index(2),
                        ),
                ),
        )
}

fn main() -> Result<()> {
    lpm::init_logging();

    let matches = build_cli().get_matches();

    match matches.subcommand() {
        Some(("monitor", sub_matches)) => commands::monitor(sub_matches),
        Some(("list", sub_matches)) => commands::list(sub_matches),
        Some(("kill", sub_matches)) => commands::control::execute_kill(sub_matches),
        Some(("renice", sub_matches)) => commands::control::execute_renice(sub_matches),
        Some(("stop", sub_matches)) => commands::control::execute_stop(sub_matches),
        Some(("cont", sub_matches)) => commands::control::execute_cont(sub_matches),
        Some(("config", sub_matches)) => commands::config::execute(sub_matches),
        _ => commands::monitor::run(&MonitorOptions::default()),
    }
}
