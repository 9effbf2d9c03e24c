use anyhow::{anyhow, Context, Result};
use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use shikimark::build;
use shikimark::config::Config;
use std::path::{Path, PathBuf};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let matches = App::new("shikimark")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Renders Markdown with annotated code blocks")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::with_name("project")
                .long("project")
                .short("p")
                .takes_value(true)
                .global(true)
                .help("Directory to search (upwards) for site.yaml [default: .]"),
        )
        .subcommand(
            SubCommand::with_name("check")
                .about("Validates site.yaml and any data files"),
        )
        .subcommand(
            SubCommand::with_name("render")
                .about("Renders Markdown documents to HTML")
                .arg(
                    Arg::with_name("FILE")
                        .required(true)
                        .multiple(true)
                        .help("Markdown documents to render"),
                )
                .arg(
                    Arg::with_name("output")
                        .long("output")
                        .short("o")
                        .takes_value(true)
                        .help("Write `<stem>.html` files here instead of stdout"),
                ),
        )
        .subcommand(
            SubCommand::with_name("data")
                .about("Prints the loaded data files as YAML")
                .arg(Arg::with_name("KEY").help("Print only this entry")),
        )
        .get_matches();

    let project_dir = PathBuf::from(matches.value_of("project").unwrap_or("."));
    let config = Config::from_directory(&project_dir)?;

    match matches.subcommand() {
        ("check", Some(_)) => check(&config),
        ("render", Some(sub)) => render(&config, sub),
        ("data", Some(sub)) => print_data(&config, sub.value_of("KEY")),
        (name, _) => Err(anyhow!("Unknown subcommand `{}`", name)),
    }
}

fn check(config: &Config) -> Result<()> {
    log::info!("{}", build::check(config)?);
    Ok(())
}

fn render(config: &Config, matches: &ArgMatches) -> Result<()> {
    let highlighter = config.highlighter();
    let output = matches.value_of("output").map(Path::new);
    if let Some(output) = output {
        std::fs::create_dir_all(output)
            .with_context(|| format!("Creating output directory `{}`", output.display()))?;
    }

    for file in matches.values_of("FILE").into_iter().flatten() {
        let path = Path::new(file);
        match output {
            None => print!("{}", build::render_file(config, &highlighter, path)?.html),
            Some(output) => {
                let target = build::write_file(config, &highlighter, path, output)?;
                log::info!("wrote {}", target.display());
            }
        }
    }
    Ok(())
}

fn print_data(config: &Config, key: Option<&str>) -> Result<()> {
    let data = build::load_data(config)?;
    let yaml = match key {
        None => serde_yaml::to_string(&data)?,
        Some(key) => serde_yaml::to_string(build::data_entry(&data, key)?)?,
    };
    print!("{}", yaml);
    Ok(())
}
