use clap::Parser;
use cssgrace_lib::{transform, Error, Options};
use log::info;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "cssgrace")]
#[command(about = "Rewrite CSS for old Internet Explorer and drop redundant declarations")]
struct Args {
    /// Input stylesheets.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output file. Defaults to stdout; several inputs are concatenated.
    #[arg(short, long, conflicts_with = "in_place")]
    output: Option<PathBuf>,

    /// Rewrite every input file in place.
    #[arg(short, long)]
    in_place: bool,
}

fn process_file(path: &Path) -> Result<String, Error> {
    let css = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    transform(&css, &Options::with_filename(path.display().to_string()))
}

fn run(args: &Args) -> Result<(), Error> {
    if args.in_place {
        args.inputs
            .par_iter()
            .map(|path| {
                let output = process_file(path)?;
                fs::write(path, output).map_err(|e| Error::io(path, e))?;
                info!("rewrote {}", path.display());
                Ok(())
            })
            .collect::<Result<Vec<()>, Error>>()?;
        return Ok(());
    }

    // Stylesheets are independent, so they can be processed side by side.
    let outputs = args
        .inputs
        .par_iter()
        .map(|path| process_file(path))
        .collect::<Result<Vec<String>, Error>>()?;
    let css = join_outputs(outputs);

    match &args.output {
        Some(path) => fs::write(path, css).map_err(|e| Error::io(path, e)),
        None => {
            print!("{}", css);
            Ok(())
        }
    }
}

/// Concatenate processed stylesheets, starting each one on a fresh line.
fn join_outputs(outputs: Vec<String>) -> String {
    let mut css = String::new();
    for output in outputs {
        if !css.is_empty() && !css.ends_with('\n') {
            css.push('\n');
        }
        css.push_str(&output);
    }
    css
}

fn main() {
    env_logger::init();

    // parse the args given in terminal
    let args: Args = Args::parse();

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::ffi::OsString;

    #[test]
    fn cli_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn output_conflicts_with_in_place() {
        let parsed = Args::try_parse_from(["cssgrace", "a.css", "-i", "-o", "b.css"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn in_place_rewrites_the_file() {
        let path = std::env::temp_dir().join(format!("cssgrace-cli-{}.css", std::process::id()));
        fs::write(&path, ".a { opacity: 0.5; }").unwrap();
        let args = Args::try_parse_from([
            OsString::from("cssgrace"),
            OsString::from("--in-place"),
            path.clone().into_os_string(),
        ])
        .unwrap();

        run(&args).unwrap();

        let rewritten = fs::read_to_string(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(rewritten, ".a { opacity: 0.5; filter: alpha(opacity=50); }");
    }

    #[test]
    fn outputs_start_on_their_own_line() {
        let joined = join_outputs(vec![
            ".a { color: red; }".to_string(),
            ".b { color: blue; }\n".to_string(),
            ".c { color: green; }".to_string(),
        ]);
        assert_eq!(
            joined,
            ".a { color: red; }\n.b { color: blue; }\n.c { color: green; }"
        );
        assert_eq!(join_outputs(Vec::new()), "");
    }

    #[test]
    fn missing_input_is_an_io_error() {
        let args = Args::try_parse_from(["cssgrace", "/nonexistent/cssgrace.css"]).unwrap();
        assert!(matches!(run(&args), Err(Error::Io { .. })));
    }
}
