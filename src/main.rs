use env_logger::{Builder, Env, Target as LogTarget};
use log::error;
use mangadl::configuration::Settings;
use mangadl::manga::scan_reload;
use mangadl::run::{run, Target};
use mangadl::Cli;
use std::io::{self, Write};
use std::path::Path;
use std::process;

#[tokio::main]
async fn main() {
    // Parse Args
    let args = Cli::new();
    let options = args.options();

    // Init logging
    let mut builder = Builder::from_env(Env::default().default_filter_or(options.log_level()));
    builder.target(LogTarget::Stderr);
    builder.init();

    // Parse Settings
    let settings = match Settings::new(&args.config_file) {
        Ok(s) => s,
        Err(e) => {
            error!("Configuration error: {}", e);
            process::exit(1);
        }
    };

    let targets = match collect_targets(&args, &settings) {
        Ok(t) if !t.is_empty() => t,
        Ok(_) => {
            error!("No URL given");
            process::exit(1);
        }
        Err(e) => {
            error!("Unable to collect URLs: {}", e);
            process::exit(1);
        }
    };

    // Run
    match run(settings, targets, options).await {
        Ok(summary) if summary.unsupported > 0 => process::exit(1),
        Ok(_) => println!("Finished."),
        Err(e) => {
            error!("Application error: {}", e);
            process::exit(1);
        }
    }
}

fn collect_targets(args: &Cli, settings: &Settings) -> anyhow::Result<Vec<Target>> {
    let urls = if args.reload {
        scan_reload(&settings.output_path(), |dir| {
            prompt(&format!(
                "Enter URL for folder {} (Press ENTER to skip) : ",
                dir.file_name().map(Path::new).unwrap_or(dir).display()
            ))
        })?
    } else if !args.update.is_empty() {
        args.update.clone()
    } else if let Some(url) = &args.url {
        return Ok(vec![Target {
            url: url.clone(),
            name: args.name.clone(),
        }]);
    } else {
        prompt("Enter URL: ").into_iter().collect()
    };

    Ok(urls
        .into_iter()
        .filter(|url| !url.trim().is_empty())
        .map(Target::new)
        .collect())
}

fn prompt(message: &str) -> Option<String> {
    print!("{}", message);
    io::stdout().flush().ok()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line).ok()?;
    Some(line.trim().to_string())
}

