use itertools::{join, Itertools};
use std::path::PathBuf;

use lispy::{log, Interpreter};
use rustyline::Editor;
use rustyline::error::ReadlineError;
use structopt::StructOpt;

#[derive(StructOpt, Debug)]
#[structopt(name = "lispy", about = "a small lisp with q-expressions")]
struct Opt {
    #[structopt(short = "d", long = "debug")]
    debug: bool,

    #[structopt(long = "no-history", help = "neither read nor write the history file")]
    no_history: bool,

    #[structopt(name = "FILE", parse(from_os_str), help = "lisp files to run instead of starting the repl")]
    files: Vec<PathBuf>,
}

const HISTFILE: &str = ".lispy_hist";

fn main() {
    let opt = Opt::from_args();
    if opt.debug {
        log::debug(format!("set options: {:?}", opt))
    }

    let interpreter = Interpreter::new();

    if !opt.files.is_empty() {
        for file in &opt.files {
            if let Err(why) = interpreter.run_file(file) {
                log::warn(format!("could not run {:?}: {}", file, why));
            }
        }
        return;
    }

    repl(&interpreter, &opt);
}

fn repl(interpreter: &Interpreter, opt: &Opt) {
    let mut rl = Editor::<()>::new();
    if !opt.no_history {
        if let Err(err) = rl.load_history(HISTFILE) {
            log::warn(format!("error opening history file: {}", err));
        }
    }

    println!("lispy version 0.1.0");
    println!("press ctrl+d to exit\n");
    let prompt = format!("{}lispy>{} ", log::BLU, log::RESET);

    loop {
        let input = rl.readline(&prompt);

        match input {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }

                rl.add_history_entry(line.as_str());
                if line.starts_with('>') && line.len() > 1 {
                    println!("{}", command(interpreter, &line[1..]));
                    continue;
                }

                match interpreter.run(line) {
                    Ok(result) => {
                        if opt.debug {
                            log::debug(format!("result type: {}", result.get_type()));
                        }
                        println!("{}", interpreter.show(&result));
                    }
                    Err(err) => log::error(err),
                }
            }

            Err(ReadlineError::Interrupted) => {
                println!("^C");
            }

            Err(ReadlineError::Eof) => {
                println!("^D");
                break;
            }

            Err(err) => {
                log::error(err);
                break;
            }
        }
    }

    if !opt.no_history {
        if let Err(err) = rl.save_history(HISTFILE) {
            log::warn(format!("error saving history file: {}", err));
        }
    }
}

fn command(interpreter: &Interpreter, cmd: &str) -> String {
    match cmd.trim() {
        "env" => join(interpreter.env.borrow().vars.keys().sorted(), ", "),
        _ => "invalid command".to_owned(),
    }
}
