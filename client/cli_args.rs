use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "radius-cli",
    about = "A command line interface for the radius message board",
    long_about = "radius-cli is a command line client for the radius server.\nIt drops short-lived posts at a location and lists the posts still alive around a point, interactively or one command at a time."
)]
pub struct CliArgs {
    /// Server hostname
    #[arg(long = "host", default_value = "127.0.0.1")]
    pub host: String,

    /// Server port
    #[arg(short = 'p', long = "port", default_value = "7070")]
    pub port: u16,

    /// Enter interactive mode
    #[arg(short = 'i', long = "interactive")]
    pub interactive: bool,

    /// Print raw replies instead of rendering posts
    #[arg(long = "raw")]
    pub raw: bool,

    /// Command to execute (if not in interactive mode)
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

impl CliArgs {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.port == 0 {
            return Err("Port must be greater than 0".to_string());
        }

        Ok(())
    }

    pub fn should_run_interactive(&self) -> bool {
        self.interactive || self.command.is_empty()
    }
}
