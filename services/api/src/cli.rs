use crate::demo::{print_search, run_demo, DemoArgs, SearchArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use nouvelle_maison::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "MaNouvelleMaison",
    about = "Run the MaNouvelleMaison front desk or walk through it from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Print the listings a location search returns
    Search(SearchArgs),
    /// Walk a visitor through search, sign-in, and every card flow
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Search(args) => print_search(args),
        Command::Demo(args) => run_demo(args).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nouvelle_maison::i18n::Language;
    use nouvelle_maison::workflows::search::SortOrder;

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["nouvelle-maison"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn search_accepts_sort_and_language() {
        let cli = Cli::try_parse_from([
            "nouvelle-maison",
            "search",
            "Cocody",
            "--sort",
            "price-high-to-low",
            "--lang",
            "en",
        ])
        .expect("parses");
        match cli.command {
            Some(Command::Search(args)) => {
                assert_eq!(args.term, "Cocody");
                assert_eq!(args.sort, SortOrder::PriceHighToLow);
                assert_eq!(args.lang, Language::En);
            }
            other => panic!("expected search, got {other:?}"),
        }
    }

    #[test]
    fn unknown_sort_is_rejected() {
        let parsed =
            Cli::try_parse_from(["nouvelle-maison", "search", "Cocody", "--sort", "cheap"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn serve_overrides_are_optional() {
        let cli =
            Cli::try_parse_from(["nouvelle-maison", "serve", "--port", "8080"]).expect("parses");
        match cli.command {
            Some(Command::Serve(args)) => {
                assert_eq!(args.port, Some(8080));
                assert!(args.host.is_none());
            }
            other => panic!("expected serve, got {other:?}"),
        }
    }
}
