//! Mica compiler CLI.

use micac::{clean_artifacts, run_build, BuildOptions};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        print_usage();
        std::process::exit(1);
    }

    let mut options = BuildOptions::default();
    let mut clean = false;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--name" => {
                if i + 1 >= args.len() {
                    eprintln!("error: --name requires a value");
                    std::process::exit(1);
                }
                options.name = Some(args[i + 1].clone());
                i += 2;
            }
            "--save" => {
                options.save = true;
                i += 1;
            }
            "--clean" => {
                clean = true;
                i += 1;
            }
            "--debug-objects" => {
                options.debug_objects = true;
                i += 1;
            }
            "-v" | "--verbose" => {
                options.verbose = true;
                i += 1;
            }
            "-h" | "--help" => {
                print_usage();
                return;
            }
            flag if flag.starts_with('-') => {
                eprintln!("error: unknown flag '{flag}'");
                print_usage();
                std::process::exit(1);
            }
            path => {
                if options.source.is_some() {
                    eprintln!("error: more than one source path given");
                    std::process::exit(1);
                }
                options.source = Some(path.into());
                i += 1;
            }
        }
    }

    if clean {
        let out_dir = BuildOptions::out_dir();
        if let Err(e) = clean_artifacts(&out_dir) {
            eprintln!("error: cannot clean '{}': {e}", out_dir.display());
            std::process::exit(1);
        }
        if options.source.is_none() {
            return;
        }
    }

    std::process::exit(run_build(&options));
}

fn print_usage() {
    eprintln!("Usage: mica [options] <source.mica>");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --name <target>   Executable name (default: the main module's name)");
    eprintln!("  --save            Keep per-module .ll files in the build directory");
    eprintln!("  --clean           Remove the build directory");
    eprintln!("  --debug-objects   Print an inspection dump of each emitted object");
    eprintln!("  -v, --verbose     Verbose output");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  MICA_BUILD_DIR    Build output directory (default: build)");
}
