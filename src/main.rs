use anyhow::Context;
use clap::Parser;
use ncli::cli::{Args, Commands};
use ncli::config::FileConfigRepository;
use ncli::logger::{set_quiet_mode, set_verbose_mode};
use ncli::react_svg::{self, ReactSvgOptions};
use ncli::tinify::{self, TerminalPrompt, TinifyClient, TinifyOptions};

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    set_quiet_mode(args.quiet);
    set_verbose_mode(args.verbose);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start the async runtime")?;

    runtime.block_on(dispatch(args.command))
}

async fn dispatch(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::ReactSvg { files, remove, ignore, jsx } => {
            let options = ReactSvgOptions { remove, ignore, jsx };
            react_svg::run(&files, options).await?;
        }
        Commands::Tinify { files, remove, postfix, ignore, webp } => {
            if remove && postfix != ncli::constants::DEFAULT_POSTFIX {
                ncli::warn!("--postfix has no effect together with --remove");
            }
            let options = TinifyOptions { remove, ignore, postfix, webp };
            let repo = FileConfigRepository::from_env()?;
            let service = TinifyClient::new()?;

            tinify::run(&files, &options, &repo, &TerminalPrompt, &service)
                .await
                .context("Something went wrong while attempting to optimize images.")?;
        }
    }

    Ok(())
}
