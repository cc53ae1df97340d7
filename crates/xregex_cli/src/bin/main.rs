// xregrep - match lines against an xregex pattern
// Exit status: 0 when any line matched, 1 when none did, 2 on errors

use std::env;
use std::fs;
use std::io::{self, Read};
use std::process::ExitCode;

use xregex::{Match, Regex};

const VERSION: &str = "xregrep 0.3";

fn print_usage() {
    eprintln!("usage: xregrep [options] pattern [file ...]");
    eprintln!("Available options are:");
    eprintln!("  -e opts   engine option letters (i m s x u w , F H X)");
    eprintln!("  -n        prefix each match with its line number");
    eprintln!("  -v        print lines that do not match");
    eprintln!("  -g        also print capture groups");
    eprintln!("  -q        print nothing, report via exit status");
    eprintln!("  -V        show version information");
    eprintln!("  --        stop handling options");
}

#[derive(Default)]
struct Options {
    engine_options: String,
    pattern: Option<String>,
    files: Vec<String>,
    line_numbers: bool,
    invert: bool,
    groups: bool,
    quiet: bool,
    show_version: bool,
}

fn parse_args() -> Result<Options, String> {
    let args: Vec<String> = env::args().collect();
    let mut opts = Options::default();
    let mut stop_options = false;
    let mut i = 1;

    while i < args.len() {
        let arg = &args[i];
        if !stop_options && arg.starts_with('-') && arg.len() > 1 {
            match arg.as_str() {
                "-e" => {
                    i += 1;
                    if i >= args.len() {
                        return Err("'-e' needs argument".to_string());
                    }
                    opts.engine_options.push_str(&args[i]);
                }
                "-n" => opts.line_numbers = true,
                "-v" => opts.invert = true,
                "-g" => opts.groups = true,
                "-q" => opts.quiet = true,
                "-V" => opts.show_version = true,
                "--" => stop_options = true,
                _ => return Err(format!("unrecognized option '{arg}'")),
            }
        } else if opts.pattern.is_none() {
            opts.pattern = Some(arg.clone());
        } else {
            opts.files.push(arg.clone());
        }
        i += 1;
    }
    Ok(opts)
}

fn main() -> ExitCode {
    let opts = match parse_args() {
        Ok(opts) => opts,
        Err(message) => {
            eprintln!("xregrep: {message}");
            print_usage();
            return ExitCode::from(2);
        }
    };

    if opts.show_version {
        println!("{VERSION}");
        return ExitCode::SUCCESS;
    }

    let Some(pattern) = opts.pattern.as_deref() else {
        print_usage();
        return ExitCode::from(2);
    };

    let regex = match Regex::with_options(pattern, &opts.engine_options) {
        Ok(regex) => regex,
        Err(err) => {
            eprintln!("xregrep: bad pattern: {err}");
            return ExitCode::from(2);
        }
    };

    let mut text = String::new();
    let mut any = false;
    if opts.files.is_empty() {
        let stdin = io::stdin();
        if stdin.lock().read_to_string(&mut text).is_err() {
            eprintln!("xregrep: cannot read stdin");
            return ExitCode::from(2);
        }
        any |= scan(&regex, &opts, None, &text);
    } else {
        for file in &opts.files {
            text.clear();
            match fs::File::open(file).and_then(|mut f| f.read_to_string(&mut text)) {
                Ok(_) => {}
                Err(err) => {
                    eprintln!("xregrep: {file}: {err}");
                    return ExitCode::from(2);
                }
            }
            let label = (opts.files.len() > 1).then_some(file.as_str());
            any |= scan(&regex, &opts, label, &text);
        }
    }

    if any {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}

fn scan(regex: &Regex, opts: &Options, label: Option<&str>, text: &str) -> bool {
    let mut m = Match::new();
    let mut any = false;
    for (number, line) in text.lines().enumerate() {
        let hit = regex.matches_with(line, &mut m);
        if hit == opts.invert {
            continue;
        }
        any = true;
        if opts.quiet {
            return true;
        }
        let mut prefix = String::new();
        if let Some(label) = label {
            prefix.push_str(label);
            prefix.push(':');
        }
        if opts.line_numbers {
            prefix.push_str(&(number + 1).to_string());
            prefix.push(':');
        }
        println!("{prefix}{line}");
        if opts.groups && hit {
            for group in 1..m.group_count() {
                match m.group(group) {
                    Some(text) => println!("  group {group}: {text}"),
                    None => println!("  group {group}: <absent>"),
                }
            }
        }
    }
    any
}
