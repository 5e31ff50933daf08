use clap::{value_parser, crate_version, Arg, ArgAction, Command};

const CONFIG_LONG_HELP: &str = "The JSON string can adjust diagnostic severities and formatting columns, e.g.,
`{\"flag\":{\"keywordAlias\":\"warn\"},\"columns\":{\"c1\":12}}`.
Severities are error, warn, info, hint, or ignore.";

fn config_arg() -> Arg {
    Arg::new("config").long("config").short('c').value_name("JSON").help("modify analyzer configuration")
        .long_help(CONFIG_LONG_HELP)
        .required(false)
        .default_value("")
}

fn indent_arg() -> Arg {
    Arg::new("indent").long("indent").help("JSON indentation, omit to minify")
        .value_name("SPACES")
        .value_parser(value_parser!(u16).range(0..16))
        .required(false)
}

pub fn build_cli() -> Command {
    let long_help = "ca65kit is always invoked with exactly one of several subcommands.
The subcommands read ca65 source from stdin and are designed to function as nodes in a pipeline.
If stdin is the console, lines are accumulated until `bye` is entered.
Set RUST_LOG environment variable to control logging level.
  levels: trace,debug,info,warn,error

Examples:
---------
line entry:            `ca65kit verify`
file check:            `ca65kit verify < main.s`
show the tree:         `ca65kit verify --sexpr < main.s`
JSON syntax tree:      `ca65kit parse --indent 2 < main.s > main.json`
realign columns:       `ca65kit format -c '{\"columns\":{\"c1\":12}}' < main.s`";

    let mut main_cmd = Command::new("ca65kit")
        .about("Parses and checks source code for the ca65 6502 assembler.")
        .after_long_help(long_help)
        .version(crate_version!());

    main_cmd = main_cmd.subcommand(
        Command::new("verify")
            .arg(Arg::new("sexpr").long("sexpr").short('s').help("write S-expressions to stderr").action(ArgAction::SetTrue))
            .arg(config_arg())
            .about("read from stdin and perform syntax check")
            .after_help("This will accept line entry if stdin is the console.\nIf the check passes and stdout is not the console, the source is piped through.")
    );
    main_cmd = main_cmd.subcommand(
        Command::new("parse")
            .arg(indent_arg())
            .about("read from stdin, write the syntax tree and errors as JSON")
    );
    main_cmd = main_cmd.subcommand(
        Command::new("format")
            .arg(config_arg())
            .about("read from stdin, write source with aligned columns")
            .after_help("Lines with errors are written as they were found.")
    );
    main_cmd = main_cmd.subcommand(
        Command::new("completions")
            .arg(
                Arg::new("shell").short('s').long("shell").help("shell target").value_name("NAME")
                    .required(true)
                    .value_parser(["bash","elv","fish","ps1","zsh"])
            )
            .about("write completions script to stdout for the specified shell")
    );
    return main_cmd;
}
