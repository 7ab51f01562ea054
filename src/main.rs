use clap::{
    crate_authors, crate_description, crate_name, crate_version, value_parser, Arg, ArgAction,
    ArgMatches, Command,
};
use hatake::{Dependency, ProjectRequest};
use std::path::PathBuf;

fn project_args(command: Command) -> Command {
    command
        .arg(Arg::new("name").help("Project name, prompted for when omitted"))
        .arg(
            Arg::new("dir")
                .short('d')
                .long("dir")
                .help("Parent directory of the project (defaults to the current directory)")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("dep")
                .long("dep")
                .value_name("NAME==VERSION")
                .help("Pinned dependency for requirements.txt, may be repeated")
                .action(ArgAction::Append)
                .value_parser(|spec: &str| spec.parse::<Dependency>().map_err(|e| e.to_string())),
        )
        .arg(
            Arg::new("author")
                .long("author")
                .help("Author shown in the README"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .help("TOML file with default author, dependencies and git settings")
                .value_parser(value_parser!(PathBuf)),
        )
}

// The CLI layer should only parse inputs and forward them to library code.
fn main() -> miette::Result<()> {
    let matches = Command::new(crate_name!())
        .about(crate_description!())
        .author(crate_authors!())
        .version(crate_version!())
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            project_args(
                Command::new("new").about("Scaffolds a new data-science project"),
            )
            .arg(
                Arg::new("git")
                    .long("git")
                    .help("Initialize a git repository and create the initial commit")
                    .action(ArgAction::SetTrue),
            )
            .arg(
                Arg::new("force")
                    .long("force")
                    .help("Write into the project directory even if it is not empty")
                    .action(ArgAction::SetTrue),
            )
            .arg(
                Arg::new("yes")
                    .short('y')
                    .long("yes")
                    .help("Skip the preview and confirmation prompt")
                    .action(ArgAction::SetTrue),
            ),
        )
        .subcommand(project_args(
            Command::new("plan").about("Shows the tree a project would get, without writing it"),
        ))
        .get_matches();

    let is_verbose = matches.get_flag("verbose");

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if is_verbose { "debug" } else { "warn" }),
    )
    .init();

    match matches.subcommand() {
        Some(("new", args)) => handle_new(args),
        Some(("plan", args)) => handle_plan(args),
        _ => unreachable!(),
    }
}

fn request_from(args: &ArgMatches) -> ProjectRequest {
    ProjectRequest {
        name: args.get_one::<String>("name").cloned(),
        target_dir: args.get_one::<PathBuf>("dir").cloned(),
        dependencies: args
            .get_many::<Dependency>("dep")
            .map(|deps| deps.cloned().collect())
            .unwrap_or_default(),
        author: args.get_one::<String>("author").cloned(),
        config: args.get_one::<PathBuf>("config").cloned(),
        ..ProjectRequest::default()
    }
}

fn handle_new(args: &ArgMatches) -> miette::Result<()> {
    let request = ProjectRequest {
        init_version_control: args.get_flag("git"),
        overwrite: args.get_flag("force"),
        assume_yes: args.get_flag("yes"),
        ..request_from(args)
    };

    log::debug!("new project request: {:?}", request);

    hatake::new_project(&request)?;

    Ok(())
}

fn handle_plan(args: &ArgMatches) -> miette::Result<()> {
    let request = request_from(args);

    log::debug!("plan request: {:?}", request);

    hatake::preview_project(&request)?;

    Ok(())
}
