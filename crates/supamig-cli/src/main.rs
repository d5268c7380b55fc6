use std::process::ExitCode;

use clap::Parser;
use supamig_cli::Cli;
use supamig_obs::LogFormat;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version are not failures
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            return ExitCode::from(code);
        }
    };

    let format = if cli.log_json {
        LogFormat::Json
    } else {
        LogFormat::Text
    };
    supamig_obs::init("supamig", format);

    let code = supamig_cli::run_from_env(&cli, std::io::stdout().lock()).await;
    ExitCode::from(code)
}
