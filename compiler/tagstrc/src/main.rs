//! tagstr command line.

use tagstrc::commands::{run_build, run_check, run_lex, run_load, run_pieces, run_transform};
use tagstrc::{init_tracing, Config};

fn main() {
    let mut config = Config::from_env();
    let mut args: Vec<String> = Vec::new();
    for arg in std::env::args().skip(1) {
        match config.apply_flag(&arg) {
            Ok(true) => {}
            Ok(false) => args.push(arg),
            Err(msg) => {
                eprintln!("error: {msg}");
                std::process::exit(1);
            }
        }
    }
    init_tracing(&config);

    let Some(command) = args.first() else {
        print_usage();
        return;
    };

    let file_command: Option<fn(&str, &Config)> = match command.as_str() {
        "transform" => Some(run_transform),
        "check" => Some(run_check),
        "lex" => Some(run_lex),
        "pieces" => Some(run_pieces),
        "load" => Some(run_load),
        _ => None,
    };
    if let Some(run) = file_command {
        let Some(path) = args.get(1) else {
            eprintln!("Usage: tagstr {command} <file.py>");
            std::process::exit(1);
        };
        run(path, &config);
        return;
    }

    match command.as_str() {
        "build" => run_build(&args[1..], &config),
        "help" | "--help" | "-h" => print_usage(),
        "version" | "--version" | "-V" => {
            println!("tagstr {}", env!("CARGO_PKG_VERSION"));
        }
        _ => {
            eprintln!("Unknown command: {command}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    println!("tagstr - tagged f-strings for Python source");
    println!();
    println!("Usage: tagstr [options] <command> [args]");
    println!();
    println!("Commands:");
    println!("  transform <file.py>             Print the rewritten source");
    println!("  check <file.py>                 Report whether the file opts in to rewriting");
    println!("  load <file.py>                  Load the file through the loader chain");
    println!("  lex <file.py>                   Show the token stream");
    println!("  pieces <file.py>                Show each tag expression and its pieces");
    println!("  build <dir> -o <out> [--all]    Rewrite a source tree into <out>");
    println!("  help                            Show this message");
    println!("  version                         Show version information");
    println!();
    println!("Options:");
    println!("  --module=<name>    Module named by the activation marker (default: tagstr)");
    println!("  --jobs=<n>         Worker threads for build");
    println!("  --log=<filter>     Tracing filter, e.g. debug or tagstr_rewrite=trace");
    println!("  --no-color         Plain diagnostics");
    println!();
    println!("Environment:");
    println!("  TAGSTR_MODULE, TAGSTR_DISABLE_IMPORT_HOOK, TAGSTR_LOG, TAGSTR_LOG_TREE, NO_COLOR");
}
