use bx_runtime::{rt, ExecConfig, Program};
use clap::{value_t, App, Arg, ArgMatches};
use std::io;
use std::process;

fn exec_config(matches: &ArgMatches) -> ExecConfig {
    let mut config = ExecConfig::default();
    if matches.is_present("max-steps") {
        config.max_steps = Some(value_t!(matches, "max-steps", u64).unwrap_or_else(|e| e.exit()));
    }
    if matches.is_present("max-depth") {
        config.max_depth = value_t!(matches, "max-depth", usize).unwrap_or_else(|e| e.exit());
    }
    config
}

fn run(matches: &ArgMatches, fname: &str) -> bx_runtime::Result<()> {
    let program = Program::load(fname)?.with_config(exec_config(matches));
    if matches.is_present("check") {
        println!("{}: ok", fname);
        return Ok(());
    }

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    let ret = program.execute_to(&mut handle)?;
    log::info!("{} exited with {}", fname, ret);
    Ok(())
}

#[cfg(not(tarpaulin_include))]
#[allow(dangerous_implicit_autorefs)]
pub fn main() {
    let matches = App::new(clap::crate_name!())
        .version(clap::crate_version!())
        .author(clap::crate_authors!(", "))
        .about(clap::crate_description!())
        .args(&[
            Arg::with_name("INPUT")
                .help(".tac.json file to run")
                .required_unless_one(&["print-int", "print-bool"])
                .index(1),
            Arg::with_name("print-int")
                .long("print-int")
                .value_name("N")
                .help("Print N through the runtime's integer printer and exit")
                .allow_hyphen_values(true)
                .takes_value(true),
            Arg::with_name("print-bool")
                .long("print-bool")
                .value_name("N")
                .help("Print N through the runtime's boolean printer and exit")
                .allow_hyphen_values(true)
                .takes_value(true),
            Arg::with_name("max-steps")
                .long("max-steps")
                .value_name("N")
                .help("Abort after executing N instructions")
                .takes_value(true),
            Arg::with_name("max-depth")
                .long("max-depth")
                .value_name("N")
                .help("Abort when more than N procedure calls are live")
                .takes_value(true),
            Arg::with_name("check")
                .short("c")
                .long("check")
                .help("Load and validate the program without running it"),
        ])
        .get_matches();

    if matches.is_present("print-int") {
        rt::print_int(value_t!(matches, "print-int", i64).unwrap_or_else(|e| e.exit()));
        return;
    }
    if matches.is_present("print-bool") {
        rt::print_bool(value_t!(matches, "print-bool", i64).unwrap_or_else(|e| e.exit()));
        return;
    }

    env_logger::init();

    let fname = matches.value_of("INPUT").unwrap_or_default();
    if let Err(err) = run(&matches, fname) {
        eprintln!("{}: {}", fname, err);
        process::exit(1);
    }
}
