use clap::{App, Arg, ArgMatches, SubCommand};
use heck::KebabCase;
use quill_models::{groups::*, safe_string::SafeString, Connection};

pub fn command<'a, 'b>() -> App<'a, 'b> {
    SubCommand::with_name("groups")
        .about("Manage groups")
        .subcommand(
            SubCommand::with_name("new")
                .arg(
                    Arg::with_name("title")
                        .short("t")
                        .long("title")
                        .takes_value(true)
                        .help("The title of the new group"),
                )
                .arg(
                    Arg::with_name("slug")
                        .short("s")
                        .long("slug")
                        .takes_value(true)
                        .help("The URL key of the new group, derived from the title when absent"),
                )
                .arg(
                    Arg::with_name("description")
                        .short("d")
                        .long("description")
                        .takes_value(true)
                        .help("A short description of the group"),
                )
                .about("Create a new group"),
        )
}

pub fn run<'a>(args: &ArgMatches<'a>, conn: &Connection) {
    match args.subcommand() {
        ("new", Some(x)) => new(x, conn),
        _ => println!("Unknown subcommand"),
    }
}

fn new<'a>(args: &ArgMatches<'a>, conn: &Connection) {
    let title = args
        .value_of("title")
        .map(String::from)
        .unwrap_or_else(|| super::ask_for("Title"));
    let slug = args
        .value_of("slug")
        .map(String::from)
        .unwrap_or_else(|| title.to_kebab_case());
    let description = args.value_of("description").unwrap_or("").to_string();

    let group = Group::insert(
        conn,
        NewGroup {
            title,
            slug,
            description: SafeString::new(&description),
        },
    )
    .expect("Couldn't save the group");
    println!("Created group {} (/group/{})", group.title, group.slug);
}
